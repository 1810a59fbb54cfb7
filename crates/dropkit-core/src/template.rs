#![forbid(unsafe_code)]

//! Declarative content trees.
//!
//! Widgets describe what they render as a [`Template`] and hand it to the
//! tree, which either instantiates a fresh subtree or reconciles an
//! existing element in place. Reconciling keeps the target element's
//! identity (its id, parent, and position) while replacing its properties
//! and children, so an overlay can re-render without remounting.

use crate::tree::{ElementFlags, ElementId, ElementKind, ElementTree};

/// A declarative element description.
#[derive(Debug, Clone)]
pub struct Template {
    kind: ElementKind,
    flags: ElementFlags,
    label: Option<String>,
    title: Option<String>,
    children: Vec<Template>,
}

impl Template {
    /// New template of the given kind.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            flags: ElementFlags::empty(),
            label: None,
            title: None,
            children: Vec::new(),
        }
    }

    /// Shorthand for a button with a label.
    #[must_use]
    pub fn button(label: impl Into<String>) -> Self {
        Self::new(ElementKind::Button).label(label)
    }

    /// Shorthand for a link with a label.
    #[must_use]
    pub fn link(label: impl Into<String>) -> Self {
        Self::new(ElementKind::Link).label(label)
    }

    /// Shorthand for a text span.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(ElementKind::Text).label(content)
    }

    /// Set the visible label / text content.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the accessible title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set behavior flags.
    #[must_use]
    pub fn flags(mut self, flags: ElementFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Append a child template.
    #[must_use]
    pub fn child(mut self, child: Template) -> Self {
        self.children.push(child);
        self
    }

    /// Append several child templates.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Template>) -> Self {
        self.children.extend(children);
        self
    }

    /// The template's kind.
    #[must_use]
    pub fn template_kind(&self) -> ElementKind {
        self.kind
    }
}

impl ElementTree {
    /// Instantiate a template as a new subtree under `parent`.
    ///
    /// Returns the id of the subtree root, or `None` if `parent` is not a
    /// live element.
    pub fn instantiate(&mut self, parent: ElementId, template: &Template) -> Option<ElementId> {
        if self.get(parent).is_none() {
            return None;
        }
        let id = self.create(template.kind);
        self.set_flags(id, template.flags);
        self.set_label(id, template.label.clone());
        self.set_title(id, template.title.clone());
        self.append_child(parent, id);
        for child in &template.children {
            self.instantiate(id, child);
        }
        Some(id)
    }

    /// Re-render an existing element from a template, in place.
    ///
    /// The element keeps its id and position; its kind, flags, label,
    /// title, and children are replaced. Returns `false` for unknown ids.
    pub fn apply(&mut self, id: ElementId, template: &Template) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.set_kind(id, template.kind);
        self.set_flags(id, template.flags);
        self.set_label(id, template.label.clone());
        self.set_title(id, template.title.clone());
        self.reconcile(id, &template.children);
        true
    }

    /// Re-render the children of `id` against `children`, keeping `id`
    /// itself untouched.
    ///
    /// Children are matched positionally: a leading run whose kinds
    /// line up is re-rendered in place and keeps its element ids, so
    /// focus and references into a stable structure survive. From the
    /// first kind mismatch on, remaining old children are removed and
    /// the rest of `children` instantiated fresh.
    pub fn reconcile(&mut self, id: ElementId, children: &[Template]) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        let existing = self.children(id).to_vec();
        let mut kept = 0;
        for (&old, new) in existing.iter().zip(children) {
            if self.kind(old) != Some(new.kind) {
                break;
            }
            self.apply(old, new);
            kept += 1;
        }
        for &old in &existing[kept..] {
            self.remove(old);
        }
        for new in &children[kept..] {
            self.instantiate(id, new);
        }
        true
    }
}
