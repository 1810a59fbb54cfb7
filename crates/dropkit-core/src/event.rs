#![forbid(unsafe_code)]

//! Named-key events and the stop-propagation result.
//!
//! Widgets register interest in named keys (a [`KeySet`]) with the keyboard
//! registry and receive [`KeyEvent`]s routed by the host. A handler returns
//! [`Handled::Stop`] to consume the event: the default action is suppressed
//! and no later listener in the dispatch chain sees the key.

use bitflags::bitflags;

/// A named key the keyboard registry can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Up,
    Down,
    Left,
    Right,
    Esc,
    Space,
    Enter,
}

bitflags! {
    /// A set of named keys, used for registration maps.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeySet: u8 {
        const TAB = 1 << 0;
        const UP = 1 << 1;
        const DOWN = 1 << 2;
        const LEFT = 1 << 3;
        const RIGHT = 1 << 4;
        const ESC = 1 << 5;
        const SPACE = 1 << 6;
        const ENTER = 1 << 7;
    }
}

impl Key {
    /// The singleton [`KeySet`] for this key.
    #[must_use]
    pub const fn as_set(self) -> KeySet {
        match self {
            Self::Tab => KeySet::TAB,
            Self::Up => KeySet::UP,
            Self::Down => KeySet::DOWN,
            Self::Left => KeySet::LEFT,
            Self::Right => KeySet::RIGHT,
            Self::Esc => KeySet::ESC,
            Self::Space => KeySet::SPACE,
            Self::Enter => KeySet::ENTER,
        }
    }
}

impl KeySet {
    /// Whether the set contains the given named key.
    #[must_use]
    pub fn contains_key(self, key: Key) -> bool {
        self.contains(key.as_set())
    }

    /// Number of keys in the set. Emptiness checks use the
    /// macro-generated `is_empty`.
    #[must_use]
    pub fn len(self) -> usize {
        self.bits().count_ones() as usize
    }
}

/// A keyboard event routed through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The named key.
    pub key: Key,
    /// Whether shift was held (tab containment direction).
    pub shift: bool,
}

impl KeyEvent {
    /// A plain key press.
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    /// Mark the event as shifted.
    #[must_use]
    pub const fn shifted(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Result of offering an event to a handler.
///
/// `Stop` consumes the event: the default action is suppressed and
/// dispatch does not continue to later listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// The event was consumed.
    Stop,
    /// The event passes through to the next listener / default action.
    Pass,
}

impl Handled {
    /// Whether the event was consumed.
    #[must_use]
    pub fn is_stop(self) -> bool {
        matches!(self, Self::Stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_maps_to_singleton_set() {
        assert_eq!(Key::Tab.as_set(), KeySet::TAB);
        assert_eq!(Key::Enter.as_set(), KeySet::ENTER);
        assert_eq!(Key::Esc.as_set().len(), 1);
    }

    #[test]
    fn keyset_contains_key() {
        let set = KeySet::SPACE.union(KeySet::DOWN).union(KeySet::ENTER);
        assert!(set.contains_key(Key::Space));
        assert!(set.contains_key(Key::Down));
        assert!(!set.contains_key(Key::Up));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn empty_keyset() {
        assert!(KeySet::empty().is_empty());
        assert!(!KeySet::TAB.is_empty());
    }

    #[test]
    fn shifted_event() {
        let plain = KeyEvent::new(Key::Tab);
        assert!(!plain.shift);
        assert!(plain.shifted().shift);
    }

    #[test]
    fn handled_is_stop() {
        assert!(Handled::Stop.is_stop());
        assert!(!Handled::Pass.is_stop());
    }
}
