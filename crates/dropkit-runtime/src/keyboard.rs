#![forbid(unsafe_code)]

//! Named-key accelerator registry.
//!
//! Components register the set of keys they currently listen for; the
//! registry records layered `(owner, keys)` bindings, newest first. It
//! does not store handlers: for a given key it exposes the dispatch chain
//! of owners, and whoever routes the event walks the chain and stops at
//! the first handler reporting [`Handled::Stop`].
//!
//! # Invariants
//!
//! 1. **Dispatch order is newest-first**: the most recently registered
//!    binding for a key is offered the event first.
//! 2. **Pairing is countable**: `binding_count()` after N register /
//!    unregister pairs equals the count before them.
//! 3. **An owner appears at most once per key** in a dispatch chain, even
//!    when it registered the key through several layered bindings.
//!
//! # Failure Modes
//!
//! - Unregistering keys that were never registered is a no-op.
//! - Dispatch for a key with no bindings yields an empty chain.
//!
//! [`Handled::Stop`]: dropkit_core::Handled::Stop

use std::sync::atomic::{AtomicU64, Ordering};

use dropkit_core::{Key, KeySet};
use tracing::trace;

/// Global counter for unique owner ids.
static OWNER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity of a registering component, shared by all runtime registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Allocate a fresh, process-unique owner id.
    #[must_use]
    pub fn next() -> Self {
        Self(OWNER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value, for logging.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Binding {
    owner: OwnerId,
    keys: KeySet,
}

/// Layered registry of named-key bindings.
#[derive(Debug, Default)]
pub struct KeyboardRegistry {
    bindings: Vec<Binding>,
}

impl KeyboardRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a set of keys for an owner as a new layer.
    ///
    /// Registering an empty set is a no-op.
    pub fn register(&mut self, owner: OwnerId, keys: KeySet) {
        if keys.is_empty() {
            return;
        }
        trace!(owner = owner.raw(), ?keys, "keyboard register");
        self.bindings.push(Binding { owner, keys });
    }

    /// Remove keys from an owner's bindings.
    ///
    /// With `Some(keys)`, only those keys are removed (layers that become
    /// empty are dropped). With `None`, every binding of the owner is
    /// removed.
    pub fn unregister(&mut self, owner: OwnerId, keys: Option<KeySet>) {
        trace!(owner = owner.raw(), ?keys, "keyboard unregister");
        match keys {
            Some(keys) => {
                for binding in &mut self.bindings {
                    if binding.owner == owner {
                        binding.keys.remove(keys);
                    }
                }
                self.bindings.retain(|b| !b.keys.is_empty());
            }
            None => self.bindings.retain(|b| b.owner != owner),
        }
    }

    /// The dispatch chain for a key: owners listening for it, newest
    /// first, each at most once.
    #[must_use]
    pub fn dispatch_order(&self, key: Key) -> Vec<OwnerId> {
        let mut chain = Vec::new();
        for binding in self.bindings.iter().rev() {
            if binding.keys.contains_key(key) && !chain.contains(&binding.owner) {
                chain.push(binding.owner);
            }
        }
        chain
    }

    /// Whether the owner currently listens for the key.
    #[must_use]
    pub fn is_registered(&self, owner: OwnerId, key: Key) -> bool {
        self.bindings
            .iter()
            .any(|b| b.owner == owner && b.keys.contains_key(key))
    }

    /// Total number of registered `(owner, key)` pairs, for leak tests.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.iter().map(|b| b.keys.len()).sum()
    }
}
