//! Shared fixture: one full set of widget services.

#![allow(dead_code)]

use dropkit_core::{ElementId, ElementKind, ElementTree};
use dropkit_i18n::MessageCatalog;
use dropkit_runtime::{DocumentClicks, KeyboardRegistry, ResponsiveMonitor};
use dropkit_widgets::{OverlayHost, UiContext};

/// A document plus every service a menu needs, wired the way a host
/// application would wire them.
pub struct Harness {
    pub tree: ElementTree,
    pub keyboard: KeyboardRegistry,
    pub clicks: DocumentClicks,
    pub overlays: OverlayHost,
    pub responsive: ResponsiveMonitor,
    pub catalog: MessageCatalog,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            tree: ElementTree::new(),
            keyboard: KeyboardRegistry::new(),
            clicks: DocumentClicks::new(),
            overlays: OverlayHost::new(),
            responsive: ResponsiveMonitor::new(1024),
            catalog: MessageCatalog::with_defaults(),
        }
    }

    pub fn ctx(&mut self) -> UiContext<'_> {
        UiContext {
            tree: &mut self.tree,
            keyboard: &mut self.keyboard,
            clicks: &mut self.clicks,
            overlays: &mut self.overlays,
            responsive: &mut self.responsive,
            catalog: &self.catalog,
            locale: "en",
        }
    }

    /// A focusable button elsewhere in the page.
    pub fn page_button(&mut self, label: &str) -> ElementId {
        let doc = self.tree.root();
        let button = self.tree.create(ElementKind::Button);
        self.tree.set_label(button, Some(label.to_owned()));
        self.tree.append_child(doc, button);
        button
    }
}
