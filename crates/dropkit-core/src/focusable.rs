#![forbid(unsafe_code)]

//! Focusable query and focus memory.
//!
//! [`focusable_descendants`] is the deterministic, document-ordered query
//! used for tab containment. [`FocusMemory`] captures the focused element
//! (with its ancestor path) so an overlay can restore focus when it
//! unmounts, falling back to the nearest focusable ancestor when the
//! remembered element can no longer take focus.

use crate::tree::{ElementFlags, ElementId, ElementKind, ElementTree};

/// Whether a single element can take focus.
///
/// Buttons, links, and check-boxes are focusable by kind; anything can opt
/// in with [`ElementFlags::TAB_INDEX`]. `DISABLED` and `HIDDEN` always win.
#[must_use]
pub fn is_focusable(tree: &ElementTree, id: ElementId) -> bool {
    let Some(el) = tree.get(id) else {
        return false;
    };
    if el.flags().intersects(ElementFlags::DISABLED | ElementFlags::HIDDEN) {
        return false;
    }
    matches!(
        el.kind(),
        ElementKind::Button | ElementKind::Link | ElementKind::CheckBox
    ) || el.flags().contains(ElementFlags::TAB_INDEX)
}

/// All focusable descendants of `root`, in document order.
///
/// `root` itself is never included. The result reflects the current tree;
/// callers must re-query after any mutation.
#[must_use]
pub fn focusable_descendants(tree: &ElementTree, root: ElementId) -> Vec<ElementId> {
    tree.descendants(root)
        .into_iter()
        .filter(|&id| is_focusable(tree, id))
        .collect()
}

/// The element focused at a point in time, with its ancestor path.
///
/// Captured before an overlay installs any keyboard listener; restored
/// before those listeners are torn down. If the remembered element can no
/// longer take focus (removed, disabled, hidden), the nearest focusable
/// ancestor from the captured path receives focus instead.
#[derive(Debug, Clone)]
pub struct FocusMemory {
    element: Option<ElementId>,
    ancestors: Vec<ElementId>,
}

impl FocusMemory {
    /// Capture the currently focused element and its ancestor chain.
    #[must_use]
    pub fn capture(tree: &ElementTree) -> Self {
        let element = tree.active_element();
        let mut ancestors = Vec::new();
        if let Some(mut cur) = element {
            while let Some(parent) = tree.parent(cur) {
                ancestors.push(parent);
                cur = parent;
            }
        }
        Self { element, ancestors }
    }

    /// The remembered element, if anything was focused at capture time.
    #[must_use]
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// Restore focus to the remembered element, or to its nearest
    /// focusable ancestor. Returns `false` if nothing could take focus
    /// (focus is left unchanged in that case).
    pub fn restore(&self, tree: &mut ElementTree) -> bool {
        let Some(element) = self.element else {
            return false;
        };
        if tree.try_focus(element) {
            return true;
        }
        for &ancestor in &self.ancestors {
            if tree.try_focus(ancestor) {
                return true;
            }
        }
        false
    }
}
