#![forbid(unsafe_code)]

//! Viewport size-class signal.
//!
//! The monitor tracks the viewport width and reports transitions across
//! the small-viewport breakpoint. Subscriptions are explicit handles that
//! must be stopped against the monitor; the subscriber count is exposed so
//! tests can verify subscribe/stop pairing.
//!
//! Width changes that do not cross the breakpoint produce no signal.

use tracing::debug;

/// Widths at or below this are the small size class (columns/px).
pub const SMALL_WIDTH: u16 = 720;

/// Handle for an active responsive subscription.
///
/// Stop it against the monitor it came from; dropping it without stopping
/// leaks the registration (which the pairing tests will catch).
#[derive(Debug)]
#[must_use = "stop the subscription against its monitor to release it"]
pub struct ResponsiveSubscription {
    id: u64,
}

impl ResponsiveSubscription {
    /// Release the subscription.
    pub fn stop(self, monitor: &mut ResponsiveMonitor) {
        monitor.subscribers.retain(|&s| s != self.id);
    }
}

/// Tracks viewport width and small-viewport transitions.
#[derive(Debug)]
pub struct ResponsiveMonitor {
    width: u16,
    next_id: u64,
    subscribers: Vec<u64>,
}

impl ResponsiveMonitor {
    /// Monitor starting at the given viewport width.
    #[must_use]
    pub fn new(width: u16) -> Self {
        Self {
            width,
            next_id: 1,
            subscribers: Vec::new(),
        }
    }

    /// Whether the current width is in the small size class.
    #[must_use]
    pub fn is_small(&self) -> bool {
        self.width <= SMALL_WIDTH
    }

    /// Current viewport width.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Register interest in size-class transitions.
    pub fn subscribe(&mut self) -> ResponsiveSubscription {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push(id);
        ResponsiveSubscription { id }
    }

    /// Number of live subscriptions, for pairing tests.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Update the viewport width.
    ///
    /// Returns `Some(is_small)` when the size class changed; the host
    /// routes that flag to each subscribed component. Returns `None` for
    /// width changes within the same size class.
    pub fn set_width(&mut self, width: u16) -> Option<bool> {
        let was_small = self.is_small();
        self.width = width;
        let now_small = self.is_small();
        if was_small != now_small {
            debug!(width, now_small, "responsive size class changed");
            Some(now_small)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_classification() {
        assert!(ResponsiveMonitor::new(SMALL_WIDTH).is_small());
        assert!(ResponsiveMonitor::new(320).is_small());
        assert!(!ResponsiveMonitor::new(SMALL_WIDTH + 1).is_small());
    }

    #[test]
    fn transition_reported_once() {
        let mut monitor = ResponsiveMonitor::new(1024);
        assert_eq!(monitor.set_width(600), Some(true));
        // Still small: no new signal.
        assert_eq!(monitor.set_width(500), None);
        assert_eq!(monitor.set_width(900), Some(false));
        assert_eq!(monitor.set_width(1200), None);
    }

    #[test]
    fn subscription_pairing() {
        let mut monitor = ResponsiveMonitor::new(1024);
        assert_eq!(monitor.subscriber_count(), 0);
        let sub_a = monitor.subscribe();
        let sub_b = monitor.subscribe();
        assert_eq!(monitor.subscriber_count(), 2);
        sub_a.stop(&mut monitor);
        assert_eq!(monitor.subscriber_count(), 1);
        sub_b.stop(&mut monitor);
        assert_eq!(monitor.subscriber_count(), 0);
    }

    #[test]
    fn width_updates_without_transition() {
        let mut monitor = ResponsiveMonitor::new(1024);
        assert_eq!(monitor.set_width(900), None);
        assert_eq!(monitor.width(), 900);
    }
}
