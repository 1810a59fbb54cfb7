//! dropkit: drop-down menu widgets over an injected service stack.
//!
//! This facade re-exports the member crates and offers a prelude with
//! the handful of types most applications touch.
//!
//! ```
//! use dropkit::prelude::*;
//!
//! let mut tree = ElementTree::new();
//! let mut keyboard = KeyboardRegistry::new();
//! let mut clicks = DocumentClicks::new();
//! let mut overlays = OverlayHost::new();
//! let mut responsive = ResponsiveMonitor::new(1024);
//! let catalog = MessageCatalog::with_defaults();
//!
//! let mut menu = MenuControl::new(
//!     MenuConfig::new().label("File"),
//!     vec![MenuItem::button("Open"), MenuItem::button("Save")],
//! );
//! let doc = tree.root();
//! menu.mount(
//!     &mut UiContext {
//!         tree: &mut tree,
//!         keyboard: &mut keyboard,
//!         clicks: &mut clicks,
//!         overlays: &mut overlays,
//!         responsive: &mut responsive,
//!         catalog: &catalog,
//!         locale: "en",
//!     },
//!     doc,
//! );
//! assert!(menu.control_element().is_some());
//! ```

#![forbid(unsafe_code)]

pub use dropkit_core;
pub use dropkit_i18n;
pub use dropkit_runtime;
pub use dropkit_widgets;

/// The types most applications need, in one import.
pub mod prelude {
    pub use dropkit_core::{
        ElementId, ElementKind, ElementTree, Handled, Key, KeyEvent, Template,
    };
    pub use dropkit_i18n::MessageCatalog;
    pub use dropkit_runtime::{
        DocumentClicks, KeyboardRegistry, OwnerId, ResponsiveMonitor,
    };
    pub use dropkit_widgets::{
        DropAlign, Inline, MenuConfig, MenuControl, MenuItem, MenuState, OverlayHost, UiContext,
    };
}
