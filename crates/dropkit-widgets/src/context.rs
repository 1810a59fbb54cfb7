//! Bundle of shared services a widget needs while handling an event.
//!
//! Widgets never own their collaborators. The host application owns one
//! [`ElementTree`], one [`KeyboardRegistry`], and so on, and lends them
//! all out together for the duration of a single call. Because every
//! field is a separate reference, a widget can hand `ctx.tree` to one
//! helper while reading `ctx.catalog` in another without fighting the
//! borrow checker.

#![forbid(unsafe_code)]

use dropkit_core::ElementTree;
use dropkit_i18n::MessageCatalog;
use dropkit_runtime::{DocumentClicks, KeyboardRegistry, ResponsiveMonitor};

use crate::overlay::OverlayHost;

/// Borrowed services threaded through every widget operation.
pub struct UiContext<'a> {
    /// The retained element tree widgets render into.
    pub tree: &'a mut ElementTree,
    /// Keyboard interest registrations, newest-first dispatch.
    pub keyboard: &'a mut KeyboardRegistry,
    /// Document-level click interest registrations.
    pub clicks: &'a mut DocumentClicks,
    /// Shared host for drop overlays.
    pub overlays: &'a mut OverlayHost,
    /// Viewport size-class monitor.
    pub responsive: &'a mut ResponsiveMonitor,
    /// Localized message lookup.
    pub catalog: &'a MessageCatalog,
    /// Locale tag used for catalog lookups, e.g. `"en"`.
    pub locale: &'a str,
}
