#![forbid(unsafe_code)]

//! Element tree, focus ownership, and event types for dropkit.
//!
//! This crate is the boundary layer between the menu widgets and the host
//! environment: a retained [`ElementTree`] standing in for the host's
//! document, the [`focusable`] query used for tab containment, the
//! declarative [`Template`] content tree that widgets render into the
//! element tree, and the named-key event types dispatched to widgets.

pub mod event;
pub mod focusable;
pub mod template;
pub mod tree;

pub use event::{Handled, Key, KeyEvent, KeySet};
pub use focusable::{FocusMemory, focusable_descendants, is_focusable};
pub use template::Template;
pub use tree::{Element, ElementFlags, ElementId, ElementKind, ElementTree};
