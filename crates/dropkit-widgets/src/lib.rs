//! dropkit-widgets: the interactive widget layer of dropkit.
//!
//! The central widget is [`MenuControl`], a collapsible drop-down menu
//! driven as an explicit finite-state machine (collapsed, focused,
//! expanded). While expanded it owns a [`MenuPanel`] that contains
//! keyboard focus inside the drop, and an overlay mounted through the
//! shared [`OverlayHost`].
//!
//! All collaborators (element tree, keyboard registry, document click
//! registry, responsive monitor, message catalog) are passed in through
//! [`UiContext`] rather than reached through globals, so several menus
//! can share one set of services and tests can assemble them freely.

#![forbid(unsafe_code)]

pub mod context;
pub mod menu;
pub mod overlay;

pub use context::UiContext;
pub use menu::{
    Direction, Inline, MenuConfig, MenuControl, MenuItem, MenuPanel, MenuSize, MenuState, Step,
    Traversal,
};
pub use overlay::{DropAlign, OverlayError, OverlayHandle, OverlayHost, OverlayOptions};
