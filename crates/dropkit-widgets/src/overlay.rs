//! Overlay host: mounts drop surfaces outside the normal layout flow.
//!
//! A drop is a detached subtree appended under the document root and
//! associated with an anchor element somewhere in the page. The host
//! keeps the association so a drop can be re-rendered in place (the
//! drop root element survives, its contents are reconciled) and torn
//! down as a unit.
//!
//! # Invariants
//!
//! 1. A drop can only be mounted against an attached anchor.
//! 2. Re-rendering a drop never replaces its root element; handles and
//!    element ids held by callers stay valid across renders.
//! 3. Removing a drop removes its entire subtree from the tree and
//!    invalidates the handle (the handle is consumed by value).
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |---|---|
//! | Anchor detached at mount | `Err(OverlayError::DetachedAnchor)` |
//! | Render against a removed drop | logs a warning, returns `false` |
//! | Remove with a stale handle | returns `false`, tree untouched |

#![forbid(unsafe_code)]

use core::fmt;

use ahash::AHashMap;
use dropkit_core::{ElementId, ElementKind, ElementTree, Template};
use tracing::{debug, warn};

/// Where the drop attaches relative to its anchor.
///
/// Defaults to top/left, matching a drop that opens downward from the
/// anchor's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropAlign {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for DropAlign {
    fn default() -> Self {
        Self {
            top: true,
            bottom: false,
            left: true,
            right: false,
        }
    }
}

impl DropAlign {
    /// Alignment for a drop that opens upward from the anchor.
    #[must_use]
    pub fn bottom_left() -> Self {
        Self {
            top: false,
            bottom: true,
            left: true,
            right: false,
        }
    }
}

/// Presentation options recorded with a mounted drop.
#[derive(Debug, Clone, Default)]
pub struct OverlayOptions {
    pub align: DropAlign,
    /// Color index forwarded to the positioning/styling layer.
    pub color_index: Option<String>,
    /// Size hint ("small", "medium", "large") for the drop surface.
    pub size_hint: Option<String>,
    /// Whether focus management is handled by the drop's own controller.
    pub focus_control: bool,
}

/// Errors surfaced by [`OverlayHost`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayError {
    /// The anchor element is not attached to the document.
    DetachedAnchor(ElementId),
    /// The handle no longer refers to a mounted drop.
    UnknownHandle,
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DetachedAnchor(id) => {
                write!(f, "anchor element {} is not attached to the document", id.raw())
            }
            Self::UnknownHandle => write!(f, "overlay handle does not refer to a mounted drop"),
        }
    }
}

impl std::error::Error for OverlayError {}

/// Owning handle for one mounted drop.
///
/// Deliberately neither `Copy` nor `Clone`: removal consumes the handle,
/// so a torn-down drop cannot be rendered to by a forgotten alias.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct OverlayHandle {
    id: u64,
}

#[derive(Debug)]
struct DropRecord {
    root: ElementId,
    anchor: ElementId,
    options: OverlayOptions,
}

/// Shared host for every drop overlay in a document.
#[derive(Debug, Default)]
pub struct OverlayHost {
    drops: AHashMap<u64, DropRecord>,
    next_id: u64,
}

impl OverlayHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts a new drop anchored at `anchor`, instantiating `content`
    /// under a fresh drop root appended to the document root.
    pub fn mount(
        &mut self,
        tree: &mut ElementTree,
        anchor: ElementId,
        content: &Template,
        options: OverlayOptions,
    ) -> Result<OverlayHandle, OverlayError> {
        if !tree.is_attached(anchor) {
            return Err(OverlayError::DetachedAnchor(anchor));
        }
        let root = tree.create(ElementKind::Box);
        let doc = tree.root();
        tree.append_child(doc, root);
        tree.instantiate(root, content);
        let id = self.next_id;
        self.next_id += 1;
        debug!(drop = id, root = root.raw(), anchor = anchor.raw(), "drop mounted");
        self.drops.insert(id, DropRecord { root, anchor, options });
        Ok(OverlayHandle { id })
    }

    /// Re-renders a mounted drop in place. The drop root element is
    /// preserved; only its contents are reconciled against `content`.
    pub fn render(&self, handle: &OverlayHandle, tree: &mut ElementTree, content: &Template) -> bool {
        match self.drops.get(&handle.id) {
            Some(record) => {
                tree.reconcile(record.root, core::slice::from_ref(content));
                true
            }
            None => {
                warn!(drop = handle.id, "render against unmounted drop ignored");
                false
            }
        }
    }

    /// Tears down a drop, removing its subtree from the tree.
    pub fn remove(&mut self, tree: &mut ElementTree, handle: OverlayHandle) -> bool {
        match self.drops.remove(&handle.id) {
            Some(record) => {
                tree.remove(record.root);
                debug!(drop = handle.id, "drop removed");
                true
            }
            None => false,
        }
    }

    /// Root element of a mounted drop.
    #[must_use]
    pub fn root_of(&self, handle: &OverlayHandle) -> Option<ElementId> {
        self.drops.get(&handle.id).map(|r| r.root)
    }

    /// Anchor the drop was mounted against.
    #[must_use]
    pub fn anchor_of(&self, handle: &OverlayHandle) -> Option<ElementId> {
        self.drops.get(&handle.id).map(|r| r.anchor)
    }

    /// Options recorded at mount time.
    #[must_use]
    pub fn options_of(&self, handle: &OverlayHandle) -> Option<&OverlayOptions> {
        self.drops.get(&handle.id).map(|r| &r.options)
    }

    /// Number of currently mounted drops.
    #[must_use]
    pub fn drop_count(&self) -> usize {
        self.drops.len()
    }
}
