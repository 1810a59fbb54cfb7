//! Keyboard containment inside an open menu drop.
//!
//! One panel exists per open drop. It registers interest in Tab and
//! the four arrow keys for the drop's lifetime, keeps Tab focus inside
//! the drop, and moves an item cursor along the nav's children on
//! arrow keys.
//!
//! # Invariants
//!
//! 1. The element focused before the panel mounts is captured before
//!    anything else, and restored on unmount before the panel's key
//!    registration is released.
//! 2. Arrow traversal only ever lands focus on an activatable item
//!    (button, link, check box); headings and separators are skipped.
//! 3. At a traversal boundary the cursor stops; focus never wraps and
//!    never leaves the drop.

#![forbid(unsafe_code)]

use dropkit_core::{
    focusable_descendants, ElementId, ElementKind, ElementTree, FocusMemory, Handled, Key,
    KeyEvent, KeySet,
};
use dropkit_runtime::{KeyboardRegistry, OwnerId};
use tracing::debug;

/// Keys a mounted panel claims.
pub(crate) const PANEL_KEYS: KeySet = KeySet::TAB
    .union(KeySet::UP)
    .union(KeySet::DOWN)
    .union(KeySet::LEFT)
    .union(KeySet::RIGHT);

/// Direction of an arrow traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Backward,
    Forward,
}

/// Outcome of one arrow traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Focus landed on an activatable item.
    Moved,
    /// The walk hit the first/last sibling without finding a target;
    /// the cursor stays at the boundary and focus is unchanged.
    BlockedAtBoundary,
    /// The nav has no children to traverse.
    NoEligibleTarget,
}

/// What a click inside the drop should do to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelClick {
    /// Swallow the click, keep the drop open.
    Sink,
    /// Close the drop.
    Close,
}

/// Focus containment for one open drop.
#[derive(Debug)]
pub struct MenuPanel {
    owner: OwnerId,
    /// First child of the drop root: the panel surface.
    root: ElementId,
    /// Control copy rendered inside the drop, when present.
    control: Option<ElementId>,
    /// Nav whose children the arrow cursor walks.
    nav: ElementId,
    memory: FocusMemory,
    cursor: Option<ElementId>,
    close_on_click: bool,
}

impl MenuPanel {
    /// Mounts a panel over an already-instantiated drop subtree.
    ///
    /// The previously focused element is captured first, then the key
    /// registration is added, then (when `focus_into_panel`) focus
    /// moves to the drop's first focusable descendant.
    pub(crate) fn mount(
        tree: &mut ElementTree,
        keyboard: &mut KeyboardRegistry,
        drop_root: ElementId,
        close_on_click: bool,
        focus_into_panel: bool,
    ) -> Self {
        let memory = FocusMemory::capture(tree);
        let owner = OwnerId::next();
        keyboard.register(owner, PANEL_KEYS);
        let (root, control, nav) = locate(tree, drop_root);
        if focus_into_panel {
            if let Some(first) = focusable_descendants(tree, root).first().copied() {
                tree.try_focus(first);
            }
        }
        debug!(owner = owner.raw(), root = root.raw(), "menu panel mounted");
        Self {
            owner,
            root,
            control,
            nav,
            memory,
            cursor: None,
            close_on_click,
        }
    }

    /// Unmounts the panel: focus is restored first, then the key
    /// registration is released.
    pub(crate) fn unmount(self, tree: &mut ElementTree, keyboard: &mut KeyboardRegistry) {
        let restored = self.memory.restore(tree);
        keyboard.unregister(self.owner, Some(PANEL_KEYS));
        debug!(owner = self.owner.raw(), restored, "menu panel unmounted");
    }

    /// Re-resolves panel landmarks after the drop was re-rendered.
    /// The cursor is dropped if its element no longer exists.
    pub(crate) fn rebind(&mut self, tree: &ElementTree, drop_root: ElementId) {
        let (root, control, nav) = locate(tree, drop_root);
        self.root = root;
        self.control = control;
        self.nav = nav;
        if let Some(cursor) = self.cursor {
            if tree.get(cursor).is_none() {
                self.cursor = None;
            }
        }
    }

    #[must_use]
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Current arrow-traversal cursor, when one has been established.
    #[must_use]
    pub fn cursor(&self) -> Option<ElementId> {
        self.cursor
    }

    /// Routes one key event claimed by this panel.
    pub fn on_key(&mut self, tree: &mut ElementTree, event: &KeyEvent) -> Handled {
        match event.key {
            Key::Tab => self.contain_tab(tree, event),
            Key::Up | Key::Left => {
                let _ = self.advance(tree, Step::Backward);
                Handled::Stop
            }
            Key::Down | Key::Right => {
                let _ = self.advance(tree, Step::Forward);
                Handled::Stop
            }
            _ => Handled::Pass,
        }
    }

    /// Keeps Tab inside the drop: Tab on the last focusable wraps to
    /// the first, Shift+Tab on the first wraps to the last. With no
    /// focusable descendants Tab is swallowed entirely so focus cannot
    /// escape an empty drop.
    fn contain_tab(&self, tree: &mut ElementTree, event: &KeyEvent) -> Handled {
        let items = focusable_descendants(tree, self.root);
        let (Some(&first), Some(&last)) = (items.first(), items.last()) else {
            return Handled::Stop;
        };
        let active = tree.active_element();
        if event.shift {
            if active == Some(first) {
                tree.try_focus(last);
                return Handled::Stop;
            }
        } else if active == Some(last) {
            tree.try_focus(first);
            return Handled::Stop;
        }
        Handled::Pass
    }

    /// Moves the cursor one step among the nav's children, skipping
    /// past items that cannot take activation.
    pub fn advance(&mut self, tree: &mut ElementTree, step: Step) -> Traversal {
        let siblings = tree.children(self.nav).to_vec();
        if siblings.is_empty() {
            return Traversal::NoEligibleTarget;
        }
        let len = siblings.len();
        let mut index = match self.cursor.and_then(|c| siblings.iter().position(|&s| s == c)) {
            None => match step {
                Step::Backward => len - 1,
                Step::Forward => 0,
            },
            Some(i) => match step {
                Step::Backward if i > 0 => i - 1,
                Step::Forward if i + 1 < len => i + 1,
                _ => i,
            },
        };
        loop {
            self.cursor = Some(siblings[index]);
            if activatable(tree, siblings[index]) {
                tree.try_focus(siblings[index]);
                return Traversal::Moved;
            }
            let at_boundary = match step {
                Step::Backward => index == 0,
                Step::Forward => index == len - 1,
            };
            if at_boundary {
                return Traversal::BlockedAtBoundary;
            }
            index = match step {
                Step::Backward => index - 1,
                Step::Forward => index + 1,
            };
        }
    }

    /// Decides what a click landing inside the drop means. A click on
    /// the control copy always closes; elsewhere the menu's
    /// close-on-click setting decides.
    pub(crate) fn on_click(&self, tree: &ElementTree, target: ElementId) -> PanelClick {
        if let Some(control) = self.control {
            if tree.contains(control, target) {
                return PanelClick::Close;
            }
        }
        if self.close_on_click {
            PanelClick::Close
        } else {
            PanelClick::Sink
        }
    }
}

/// An item the arrow cursor may land on.
fn activatable(tree: &ElementTree, id: ElementId) -> bool {
    matches!(
        tree.kind(id),
        Some(ElementKind::Button | ElementKind::Link | ElementKind::CheckBox)
    )
}

/// Resolves the panel surface, the control copy, and the item nav
/// within a drop subtree. The surface is the drop root's first child;
/// the control copy and nav are direct children of the surface, in
/// either order depending on drop alignment.
fn locate(tree: &ElementTree, drop_root: ElementId) -> (ElementId, Option<ElementId>, ElementId) {
    let root = tree.children(drop_root).first().copied().unwrap_or(drop_root);
    let mut control = None;
    let mut nav = None;
    for &child in tree.children(root) {
        match tree.kind(child) {
            Some(ElementKind::Button) if control.is_none() => control = Some(child),
            Some(ElementKind::Nav) if nav.is_none() => nav = Some(child),
            _ => {}
        }
    }
    (root, control, nav.unwrap_or(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropkit_core::Template;

    /// Builds a drop subtree the way the menu control renders one:
    /// drop root -> surface box -> [control button, nav items].
    fn drop_fixture(tree: &mut ElementTree, items: &[Template]) -> ElementId {
        let doc = tree.root();
        let drop_root = tree.create(ElementKind::Box);
        tree.append_child(doc, drop_root);
        let surface = Template::new(ElementKind::Box)
            .child(Template::new(ElementKind::Button).title("Close Menu"))
            .child(Template::new(ElementKind::Nav).children(items.iter().cloned()));
        tree.instantiate(drop_root, &surface);
        drop_root
    }

    fn mounted(
        tree: &mut ElementTree,
        keyboard: &mut KeyboardRegistry,
        items: &[Template],
    ) -> MenuPanel {
        let drop_root = drop_fixture(tree, items);
        MenuPanel::mount(tree, keyboard, drop_root, true, true)
    }

    #[test]
    fn mount_focuses_first_focusable_and_captures_prior_focus() {
        let mut tree = ElementTree::new();
        let mut keyboard = KeyboardRegistry::new();
        let doc = tree.root();
        let outside = tree.create(ElementKind::Button);
        tree.append_child(doc, outside);
        tree.try_focus(outside);

        let panel = mounted(&mut tree, &mut keyboard, &[Template::button("a")]);
        let focused = tree.active_element().unwrap();
        assert_ne!(focused, outside, "focus moved into the drop");
        assert!(tree.contains(panel.root, focused));

        panel.unmount(&mut tree, &mut keyboard);
        assert_eq!(tree.active_element(), Some(outside), "prior focus restored");
        assert_eq!(keyboard.binding_count(), 0);
    }

    #[test]
    fn tab_wraps_at_both_ends() {
        let mut tree = ElementTree::new();
        let mut keyboard = KeyboardRegistry::new();
        let panel = mounted(
            &mut tree,
            &mut keyboard,
            &[Template::button("a"), Template::button("b")],
        );
        let items = focusable_descendants(&tree, panel.root);
        let (first, last) = (items[0], *items.last().unwrap());

        tree.try_focus(last);
        assert!(panel.contain_tab(&mut tree, &KeyEvent::new(Key::Tab)).is_stop());
        assert_eq!(tree.active_element(), Some(first));

        assert!(panel.contain_tab(&mut tree, &KeyEvent::new(Key::Tab).shifted()).is_stop());
        assert_eq!(tree.active_element(), Some(last));
    }

    #[test]
    fn tab_passes_through_mid_list() {
        let mut tree = ElementTree::new();
        let mut keyboard = KeyboardRegistry::new();
        let panel = mounted(
            &mut tree,
            &mut keyboard,
            &[Template::button("a"), Template::button("b")],
        );
        let items = focusable_descendants(&tree, panel.root);
        tree.try_focus(items[1]);
        assert_eq!(
            panel.contain_tab(&mut tree, &KeyEvent::new(Key::Tab)),
            Handled::Pass,
            "not at an end, let the host advance focus normally"
        );
    }

    #[test]
    fn tab_is_swallowed_when_nothing_is_focusable() {
        let mut tree = ElementTree::new();
        let mut keyboard = KeyboardRegistry::new();
        let doc = tree.root();
        let drop_root = tree.create(ElementKind::Box);
        tree.append_child(doc, drop_root);
        tree.instantiate(
            drop_root,
            &Template::new(ElementKind::Box)
                .child(Template::new(ElementKind::Nav).child(Template::text("empty"))),
        );
        let mut panel = MenuPanel::mount(&mut tree, &mut keyboard, drop_root, true, true);
        assert!(panel.on_key(&mut tree, &KeyEvent::new(Key::Tab)).is_stop());
        assert!(panel.on_key(&mut tree, &KeyEvent::new(Key::Tab).shifted()).is_stop());
    }

    #[test]
    fn advance_skips_non_activatable_items() {
        let mut tree = ElementTree::new();
        let mut keyboard = KeyboardRegistry::new();
        let mut panel = mounted(
            &mut tree,
            &mut keyboard,
            &[
                Template::button("a"),
                Template::new(ElementKind::Label).label("heading"),
                Template::button("b"),
            ],
        );
        let nav_children = tree.children(panel.nav).to_vec();

        assert_eq!(panel.advance(&mut tree, Step::Forward), Traversal::Moved);
        assert_eq!(tree.active_element(), Some(nav_children[0]));
        assert_eq!(panel.advance(&mut tree, Step::Forward), Traversal::Moved);
        assert_eq!(tree.active_element(), Some(nav_children[2]), "heading skipped");
    }

    #[test]
    fn advance_blocks_at_boundary_without_moving_focus() {
        let mut tree = ElementTree::new();
        let mut keyboard = KeyboardRegistry::new();
        let mut panel = mounted(
            &mut tree,
            &mut keyboard,
            &[
                Template::new(ElementKind::Label).label("heading"),
                Template::button("a"),
            ],
        );
        let nav_children = tree.children(panel.nav).to_vec();

        assert_eq!(panel.advance(&mut tree, Step::Forward), Traversal::Moved);
        let focused = tree.active_element();
        // Backward from the button reaches the heading, then the edge.
        assert_eq!(
            panel.advance(&mut tree, Step::Backward),
            Traversal::BlockedAtBoundary
        );
        assert_eq!(tree.active_element(), focused, "focus unchanged at boundary");
        assert_eq!(panel.cursor(), Some(nav_children[0]), "cursor parked at edge");
    }

    #[test]
    fn advance_reports_empty_nav() {
        let mut tree = ElementTree::new();
        let mut keyboard = KeyboardRegistry::new();
        let mut panel = mounted(&mut tree, &mut keyboard, &[]);
        assert_eq!(
            panel.advance(&mut tree, Step::Forward),
            Traversal::NoEligibleTarget
        );
        assert_eq!(panel.cursor(), None);
    }

    #[test]
    fn backward_with_no_cursor_starts_from_the_end() {
        let mut tree = ElementTree::new();
        let mut keyboard = KeyboardRegistry::new();
        let mut panel = mounted(
            &mut tree,
            &mut keyboard,
            &[Template::button("a"), Template::button("b")],
        );
        let nav_children = tree.children(panel.nav).to_vec();
        assert_eq!(panel.advance(&mut tree, Step::Backward), Traversal::Moved);
        assert_eq!(tree.active_element(), Some(*nav_children.last().unwrap()));
    }

    #[test]
    fn click_on_control_copy_always_closes() {
        let mut tree = ElementTree::new();
        let mut keyboard = KeyboardRegistry::new();
        let drop_root = drop_fixture(&mut tree, &[Template::button("a")]);
        let panel = MenuPanel::mount(&mut tree, &mut keyboard, drop_root, false, true);
        let control = panel.control.unwrap();
        assert_eq!(panel.on_click(&tree, control), PanelClick::Close);
        // Elsewhere in the drop, close_on_click=false sinks the click.
        let nav_children = tree.children(panel.nav).to_vec();
        assert_eq!(panel.on_click(&tree, nav_children[0]), PanelClick::Sink);
    }

    #[test]
    fn rebind_clears_stale_cursor() {
        let mut tree = ElementTree::new();
        let mut keyboard = KeyboardRegistry::new();
        let drop_root = drop_fixture(&mut tree, &[Template::button("a")]);
        let mut panel = MenuPanel::mount(&mut tree, &mut keyboard, drop_root, true, true);
        assert_eq!(panel.advance(&mut tree, Step::Forward), Traversal::Moved);
        assert!(panel.cursor().is_some());

        // Re-render with a structurally different nav; the cursor's
        // element does not survive the reconcile.
        tree.reconcile(
            drop_root,
            core::slice::from_ref(
                &Template::new(ElementKind::Box)
                    .child(Template::new(ElementKind::Button).title("Close Menu"))
                    .child(
                        Template::new(ElementKind::Nav)
                            .child(Template::new(ElementKind::Label).label("section"))
                            .child(Template::button("z")),
                    ),
            ),
        );
        panel.rebind(&tree, drop_root);
        assert_eq!(panel.cursor(), None);
        assert_eq!(panel.advance(&mut tree, Step::Forward), Traversal::Moved);
    }
}
