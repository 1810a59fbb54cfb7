#![forbid(unsafe_code)]

//! Document-level click listener registry.
//!
//! The host document has a single click event stream; components that want
//! "outside click" notifications register their owner id here while they
//! need them and remove it when they stop. As with the keyboard registry,
//! no handlers are stored: the host routes a click to each registered
//! owner, newest first, until one consumes it.

use tracing::trace;

use crate::keyboard::OwnerId;

/// Registry of document-level click listeners.
#[derive(Debug, Default)]
pub struct DocumentClicks {
    listeners: Vec<OwnerId>,
}

impl DocumentClicks {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an owner. Registering twice is a no-op.
    pub fn register(&mut self, owner: OwnerId) {
        if !self.listeners.contains(&owner) {
            trace!(owner = owner.raw(), "document click register");
            self.listeners.push(owner);
        }
    }

    /// Remove an owner's registration, if any.
    pub fn unregister(&mut self, owner: OwnerId) {
        trace!(owner = owner.raw(), "document click unregister");
        self.listeners.retain(|&o| o != owner);
    }

    /// Whether the owner is currently registered.
    #[must_use]
    pub fn is_registered(&self, owner: OwnerId) -> bool {
        self.listeners.contains(&owner)
    }

    /// Registered owners, newest first.
    #[must_use]
    pub fn dispatch_order(&self) -> Vec<OwnerId> {
        self.listeners.iter().rev().copied().collect()
    }

    /// Number of registered listeners, for leak tests.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
