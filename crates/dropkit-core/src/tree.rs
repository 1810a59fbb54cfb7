#![forbid(unsafe_code)]

//! Retained element tree standing in for the host document.
//!
//! The tree is an id-keyed arena. Elements are created detached, appended
//! under a parent, and removed as whole subtrees. The tree also owns the
//! single globally shared focus: exactly one element (or none) is the
//! active element at any time.
//!
//! # Invariants
//!
//! 1. **Ids are never reused.** A removed element's id stays invalid for
//!    the lifetime of the tree.
//! 2. **Single root.** The document root always exists and can never be
//!    detached or removed.
//! 3. **Focus follows the document.** Removing a subtree that contains the
//!    active element clears the focus; [`ElementTree::try_focus`] refuses
//!    detached or non-focusable targets.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown id | Stale `ElementId` | Accessors return `None`/empty, mutators return `false` |
//! | Append cycle | Child is an ancestor of parent | `append_child` returns `false` |
//! | Focus refused | Target detached or not focusable | `try_focus` returns `false` |

use ahash::AHashMap;
use bitflags::bitflags;

/// Unique identifier of an element in a tree. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u64);

impl ElementId {
    /// Raw id value, for logging.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// The kind of an element, the coarse equivalent of a tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// The document root.
    Document,
    /// Generic block container.
    Box,
    /// Navigable container holding menu items.
    Nav,
    /// Focusable push button.
    Button,
    /// Focusable link.
    Link,
    /// Focusable check-box item.
    CheckBox,
    /// Non-focusable visible label.
    Label,
    /// Non-focusable text span.
    Text,
}

bitflags! {
    /// Per-element behavior flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ElementFlags: u8 {
        /// Explicitly focusable regardless of kind (tab-index analog).
        const TAB_INDEX = 1 << 0;
        /// Cannot take focus even if the kind is focusable.
        const DISABLED = 1 << 1;
        /// Not rendered; cannot take focus.
        const HIDDEN = 1 << 2;
    }
}

/// A single element node.
#[derive(Debug, Clone)]
pub struct Element {
    kind: ElementKind,
    flags: ElementFlags,
    label: Option<String>,
    title: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            flags: ElementFlags::empty(),
            label: None,
            title: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Element kind.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Behavior flags.
    #[must_use]
    pub fn flags(&self) -> ElementFlags {
        self.flags
    }

    /// Visible label / text content.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Accessible title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// The retained element tree with focus ownership.
#[derive(Debug)]
pub struct ElementTree {
    nodes: AHashMap<u64, Element>,
    root: ElementId,
    next_id: u64,
    active: Option<ElementId>,
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree {
    /// Create a tree containing only the document root.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = AHashMap::new();
        nodes.insert(0, Element::new(ElementKind::Document));
        Self {
            nodes,
            root: ElementId(0),
            next_id: 1,
            active: None,
        }
    }

    /// The document root.
    #[must_use]
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Create a detached element of the given kind.
    pub fn create(&mut self, kind: ElementKind) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id.0, Element::new(kind));
        id
    }

    /// Look up an element.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(&id.0)
    }

    /// Element kind, if the id is live.
    #[must_use]
    pub fn kind(&self, id: ElementId) -> Option<ElementKind> {
        self.get(id).map(Element::kind)
    }

    /// Element flags; empty for unknown ids.
    #[must_use]
    pub fn flags(&self, id: ElementId) -> ElementFlags {
        self.get(id).map(Element::flags).unwrap_or_default()
    }

    /// Visible label.
    #[must_use]
    pub fn label(&self, id: ElementId) -> Option<&str> {
        self.get(id).and_then(Element::label)
    }

    /// Accessible title.
    #[must_use]
    pub fn title(&self, id: ElementId) -> Option<&str> {
        self.get(id).and_then(Element::title)
    }

    /// Replace the element's kind in place (identity preserved).
    pub fn set_kind(&mut self, id: ElementId, kind: ElementKind) -> bool {
        match self.nodes.get_mut(&id.0) {
            Some(el) => {
                el.kind = kind;
                true
            }
            None => false,
        }
    }

    /// Replace the element's flags.
    pub fn set_flags(&mut self, id: ElementId, flags: ElementFlags) -> bool {
        match self.nodes.get_mut(&id.0) {
            Some(el) => {
                el.flags = flags;
                true
            }
            None => false,
        }
    }

    /// Set or clear the visible label.
    pub fn set_label(&mut self, id: ElementId, label: Option<String>) -> bool {
        match self.nodes.get_mut(&id.0) {
            Some(el) => {
                el.label = label;
                true
            }
            None => false,
        }
    }

    /// Set or clear the accessible title.
    pub fn set_title(&mut self, id: ElementId, title: Option<String>) -> bool {
        match self.nodes.get_mut(&id.0) {
            Some(el) => {
                el.title = title;
                true
            }
            None => false,
        }
    }

    /// Append a detached element as the last child of `parent`.
    ///
    /// Returns `false` if either id is unknown, `child` is the root or
    /// already attached, or the append would create a cycle.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if child == self.root || !self.nodes.contains_key(&parent.0) {
            return false;
        }
        match self.nodes.get(&child.0) {
            Some(el) if el.parent.is_none() => {}
            _ => return false,
        }
        // Reject cycles: parent must not live inside child's subtree.
        if self.contains(child, parent) {
            return false;
        }
        if let Some(el) = self.nodes.get_mut(&child.0) {
            el.parent = Some(parent);
        }
        if let Some(p) = self.nodes.get_mut(&parent.0) {
            p.children.push(child);
        }
        true
    }

    /// Children of an element, in document order. Empty for unknown ids.
    #[must_use]
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|el| el.children.as_slice()).unwrap_or(&[])
    }

    /// Parent of an element.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|el| el.parent)
    }

    /// Whether `id` is `ancestor` or lives inside its subtree.
    #[must_use]
    pub fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cur = Some(id);
        while let Some(node) = cur {
            if node == ancestor {
                return true;
            }
            cur = self.parent(node);
        }
        false
    }

    /// Whether the element is reachable from the document root.
    #[must_use]
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.nodes.contains_key(&id.0) && self.contains(self.root, id)
    }

    /// All descendants of `root` in document (preorder) order,
    /// excluding `root` itself.
    #[must_use]
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.children(id).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Remove an element and its whole subtree from the tree.
    ///
    /// Clears the focus if the active element was inside the subtree.
    /// The root cannot be removed.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if id == self.root || !self.nodes.contains_key(&id.0) {
            return false;
        }
        if let Some(active) = self.active {
            if self.contains(id, active) {
                self.active = None;
            }
        }
        if let Some(parent) = self.parent(id) {
            if let Some(p) = self.nodes.get_mut(&parent.0) {
                p.children.retain(|&c| c != id);
            }
        }
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for node in doomed {
            self.nodes.remove(&node.0);
        }
        true
    }

    /// The currently focused element.
    #[must_use]
    pub fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    /// Move focus to `id` if it is attached and focusable.
    ///
    /// Returns `false` (leaving focus unchanged) otherwise.
    pub fn try_focus(&mut self, id: ElementId) -> bool {
        if self.is_attached(id) && crate::focusable::is_focusable(self, id) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    /// Clear the focus.
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Number of live elements, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }
}
