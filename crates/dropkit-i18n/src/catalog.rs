#![forbid(unsafe_code)]

//! Message catalog with locale fallback and interpolation.
//!
//! # Invariants
//!
//! 1. **Fallback chain terminates**: a lookup tries the requested locale,
//!    then each fallback locale exactly once, returning `None` if no
//!    locale provides the key.
//!
//! 2. **Interpolation is single-pass**: `{name}` tokens are replaced once;
//!    substituted values are never re-scanned for tokens.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | Key in no locale | `get`/`format` return `None` |
//! | Missing locale | Locale never added | Falls through the chain |
//! | Unmatched `{name}` | No argument with that name | Token left as-is |
//! | Duplicate key | Same key added twice to one locale | `try_insert` errors |

use std::collections::HashMap;

/// Errors from catalog construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// A locale tag was empty or malformed.
    InvalidLocale(String),
    /// The same key was inserted twice into one locale.
    DuplicateKey {
        /// Locale the duplicate occurred in.
        locale: String,
        /// The duplicated key.
        key: String,
    },
}

impl std::fmt::Display for I18nError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLocale(l) => write!(f, "invalid locale: {l}"),
            Self::DuplicateKey { locale, key } => {
                write!(f, "duplicate key '{key}' in locale '{locale}'")
            }
        }
    }
}

impl std::error::Error for I18nError {}

/// Messages for a single locale.
#[derive(Debug, Clone, Default)]
pub struct MessageSet {
    messages: HashMap<String, String>,
}

impl MessageSet {
    /// Empty message set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a message, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.messages.insert(key.into(), value.into());
    }

    /// Insert a message, erroring on a duplicate key.
    pub fn try_insert(
        &mut self,
        locale: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), I18nError> {
        let key = key.into();
        if self.messages.contains_key(&key) {
            return Err(I18nError::DuplicateKey {
                locale: locale.to_string(),
                key,
            });
        }
        self.messages.insert(key, value.into());
        Ok(())
    }

    /// Look up a message.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Message catalog with locale fallback.
///
/// # Example
///
/// ```
/// use dropkit_i18n::MessageCatalog;
///
/// let catalog = MessageCatalog::with_defaults();
/// assert_eq!(
///     catalog.format("en", "open-menu", &[("title", "File")]),
///     Some("Open File Menu".into())
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    locales: HashMap<String, MessageSet>,
    fallback_chain: Vec<String>,
}

impl MessageCatalog {
    /// Empty catalog with no locales and no fallback chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-loaded with the English menu strings and an `["en"]`
    /// fallback chain.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut en = MessageSet::new();
        en.insert("open-menu", "Open {title} Menu");
        en.insert("open-menu-plain", "Open Menu");
        en.insert("close-menu", "Close {title} Menu");
        en.insert("close-menu-plain", "Close Menu");
        en.insert("menu-down", "menu down");
        en.insert("more", "more");
        let mut catalog = Self::new();
        catalog.add_locale("en", en);
        catalog.set_fallback_chain(vec!["en".into()]);
        catalog
    }

    /// Add (or replace) the messages for a locale.
    pub fn add_locale(&mut self, locale: impl Into<String>, messages: MessageSet) {
        self.locales.insert(locale.into(), messages);
    }

    /// Validate and add a locale, rejecting empty tags.
    pub fn try_add_locale(
        &mut self,
        locale: impl Into<String>,
        messages: MessageSet,
    ) -> Result<(), I18nError> {
        let locale = locale.into();
        if locale.trim().is_empty() {
            return Err(I18nError::InvalidLocale(locale));
        }
        self.locales.insert(locale, messages);
        Ok(())
    }

    /// Set the fallback chain, tried in order when a key is missing.
    pub fn set_fallback_chain(&mut self, chain: Vec<String>) {
        self.fallback_chain = chain;
    }

    /// Look up a message, walking the fallback chain.
    #[must_use]
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        if let Some(msg) = self.locales.get(locale).and_then(|set| set.get(key)) {
            return Some(msg);
        }
        for fallback in &self.fallback_chain {
            if fallback == locale {
                continue;
            }
            if let Some(msg) = self.locales.get(fallback.as_str()).and_then(|set| set.get(key)) {
                return Some(msg);
            }
        }
        None
    }

    /// Look up a message and interpolate `{name}` tokens from `args`.
    #[must_use]
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> Option<String> {
        self.get(locale, key).map(|template| interpolate(template, args))
    }

    /// All registered locale tags.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        self.locales.keys().map(String::as_str).collect()
    }
}

/// Single-pass `{name}` interpolation. Unmatched tokens left as-is.
fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let token = &after[..close];
                match args.iter().find(|(name, _)| *name == token) {
                    Some((_, value)) => result.push_str(value),
                    None => {
                        result.push('{');
                        result.push_str(token);
                        result.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                // Unclosed brace: emit the remainder verbatim.
                result.push('{');
                result.push_str(after);
                return result;
            }
        }
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_cover_menu_titles() {
        let catalog = MessageCatalog::with_defaults();
        assert_eq!(
            catalog.format("en", "open-menu", &[("title", "File")]),
            Some("Open File Menu".into())
        );
        assert_eq!(
            catalog.format("en", "close-menu", &[("title", "File")]),
            Some("Close File Menu".into())
        );
        assert_eq!(catalog.get("en", "open-menu-plain"), Some("Open Menu"));
        assert_eq!(catalog.get("en", "more"), Some("more"));
    }

    #[test]
    fn missing_key_returns_none() {
        let catalog = MessageCatalog::with_defaults();
        assert_eq!(catalog.get("en", "nonexistent"), None);
    }

    #[test]
    fn unknown_locale_falls_back() {
        let catalog = MessageCatalog::with_defaults();
        assert_eq!(catalog.get("fr", "open-menu-plain"), Some("Open Menu"));
    }

    #[test]
    fn fallback_chain_order() {
        let mut catalog = MessageCatalog::new();
        let mut en = MessageSet::new();
        en.insert("open-menu-plain", "Open Menu");
        en.insert("more", "more");
        let mut de = MessageSet::new();
        de.insert("open-menu-plain", "Menü öffnen");
        catalog.add_locale("en", en);
        catalog.add_locale("de", de);
        catalog.set_fallback_chain(vec!["de".into(), "en".into()]);
        assert_eq!(catalog.get("de", "open-menu-plain"), Some("Menü öffnen"));
        // "more" missing in de, falls through to en.
        assert_eq!(catalog.get("de", "more"), Some("more"));
    }

    #[test]
    fn duplicate_key_rejected() {
        let mut set = MessageSet::new();
        set.try_insert("en", "open-menu", "Open {title} Menu").unwrap();
        let err = set.try_insert("en", "open-menu", "again").unwrap_err();
        assert_eq!(
            err,
            I18nError::DuplicateKey {
                locale: "en".into(),
                key: "open-menu".into()
            }
        );
    }

    #[test]
    fn empty_locale_tag_rejected() {
        let mut catalog = MessageCatalog::new();
        let err = catalog.try_add_locale("  ", MessageSet::new()).unwrap_err();
        assert!(matches!(err, I18nError::InvalidLocale(_)));
        assert!(err.to_string().contains("invalid locale"));
    }

    #[test]
    fn interpolation_variants() {
        assert_eq!(interpolate("a {x} b", &[("x", "1")]), "a 1 b");
        assert_eq!(interpolate("{x} and {x}", &[("x", "A")]), "A and A");
        assert_eq!(interpolate("no args {y}", &[]), "no args {y}");
        assert_eq!(interpolate("unclosed {y", &[]), "unclosed {y");
        assert_eq!(interpolate("empty {}", &[]), "empty {}");
        assert_eq!(interpolate("plain", &[("x", "1")]), "plain");
    }

    #[test]
    fn interpolation_does_not_rescan_values() {
        // A substituted value containing a token must not be expanded.
        assert_eq!(
            interpolate("{a}", &[("a", "{b}"), ("b", "boom")]),
            "{b}"
        );
    }

    proptest! {
        #[test]
        fn interpolation_never_panics(template in ".{0,64}", value in "[a-z]{0,8}") {
            let _ = interpolate(&template, &[("x", value.as_str())]);
        }

        #[test]
        fn brace_free_templates_pass_through(template in "[a-z A-Z0-9]{0,64}") {
            prop_assert_eq!(interpolate(&template, &[("x", "1")]), template);
        }
    }
}
