#![forbid(unsafe_code)]

//! Localized message catalog for dropkit widget titles.
//!
//! Widgets never hard-code user-visible strings; they look up message keys
//! in a [`MessageCatalog`] with a locale fallback chain and `{name}`
//! interpolation. The catalog ships English defaults for the accessible
//! menu titles ("Open {title} Menu" / "Close {title} Menu").

pub mod catalog;

pub use catalog::{I18nError, MessageCatalog, MessageSet};
