//! Keyboard behavior: opening from the focused control, tab
//! containment inside the drop, and arrow traversal over items.

mod common;

use common::Harness;
use dropkit_core::{ElementId, ElementKind, Handled, Key, KeyEvent};
use dropkit_widgets::{MenuConfig, MenuControl, MenuItem, MenuState};
use proptest::prelude::*;

fn focused_menu(h: &mut Harness, items: Vec<MenuItem>) -> MenuControl {
    let mut menu = MenuControl::new(MenuConfig::new().label("Edit"), items);
    let doc = h.tree.root();
    menu.mount(&mut h.ctx(), doc);
    let control = menu.control_element().unwrap();
    h.tree.try_focus(control);
    menu.focus_control(&mut h.ctx());
    menu
}

/// Surface parts of the open drop: (control copy, nav).
fn drop_parts(h: &Harness, menu: &MenuControl) -> (ElementId, ElementId) {
    let drop_root = h.overlays.root_of(menu.overlay().unwrap()).unwrap();
    let surface = h.tree.children(drop_root)[0];
    let parts = h.tree.children(surface);
    (parts[0], parts[1])
}

#[test]
fn space_down_and_enter_each_open_the_focused_menu() {
    for key in [Key::Space, Key::Down, Key::Enter] {
        let mut h = Harness::new();
        let mut menu = focused_menu(&mut h, vec![MenuItem::button("a")]);
        assert_eq!(menu.handle_key(&mut h.ctx(), &KeyEvent::new(key)), Handled::Stop);
        assert!(menu.is_expanded(), "{key:?} should open the menu");
    }
}

#[test]
fn open_keys_pass_while_collapsed() {
    let mut h = Harness::new();
    let mut menu = MenuControl::new(MenuConfig::new().label("Edit"), vec![MenuItem::button("a")]);
    let doc = h.tree.root();
    menu.mount(&mut h.ctx(), doc);
    for key in [Key::Space, Key::Down, Key::Enter] {
        assert_eq!(menu.handle_key(&mut h.ctx(), &KeyEvent::new(key)), Handled::Pass);
        assert_eq!(menu.state(), MenuState::Collapsed);
    }
}

#[test]
fn tab_wraps_at_the_ends_of_the_open_drop() {
    let mut h = Harness::new();
    let mut menu = focused_menu(&mut h, vec![MenuItem::button("a"), MenuItem::button("b")]);
    menu.open(&mut h.ctx());
    let (control_copy, nav) = drop_parts(&h, &menu);
    let last_item = *h.tree.children(nav).last().unwrap();

    // The control copy is the drop's first focusable; open focused it.
    assert_eq!(h.tree.active_element(), Some(control_copy));

    // Shift+Tab from the first focusable wraps to the last.
    assert!(menu
        .handle_key(&mut h.ctx(), &KeyEvent::new(Key::Tab).shifted())
        .is_stop());
    assert_eq!(h.tree.active_element(), Some(last_item));

    // Tab from the last wraps back to the first.
    assert!(menu.handle_key(&mut h.ctx(), &KeyEvent::new(Key::Tab)).is_stop());
    assert_eq!(h.tree.active_element(), Some(control_copy));
}

#[test]
fn tab_in_the_middle_of_the_drop_passes_to_the_host() {
    let mut h = Harness::new();
    let mut menu = focused_menu(&mut h, vec![MenuItem::button("a"), MenuItem::button("b")]);
    menu.open(&mut h.ctx());
    let (_, nav) = drop_parts(&h, &menu);
    let first_item = h.tree.children(nav)[0];
    h.tree.try_focus(first_item);

    assert_eq!(
        menu.handle_key(&mut h.ctx(), &KeyEvent::new(Key::Tab)),
        Handled::Pass,
        "host advances focus normally between interior items"
    );
}

#[test]
fn arrows_skip_headings_and_separators() {
    let mut h = Harness::new();
    let mut menu = focused_menu(
        &mut h,
        vec![
            MenuItem::button("a"),
            MenuItem::heading("section"),
            MenuItem::separator(),
            MenuItem::button("b"),
        ],
    );
    menu.open(&mut h.ctx());
    let (_, nav) = drop_parts(&h, &menu);
    let children = h.tree.children(nav).to_vec();

    assert!(menu.handle_key(&mut h.ctx(), &KeyEvent::new(Key::Down)).is_stop());
    assert_eq!(h.tree.active_element(), Some(children[0]));

    assert!(menu.handle_key(&mut h.ctx(), &KeyEvent::new(Key::Down)).is_stop());
    assert_eq!(
        h.tree.active_element(),
        Some(children[3]),
        "heading and separator are skipped in one step"
    );
}

#[test]
fn arrow_at_a_boundary_leaves_focus_where_it_is() {
    let mut h = Harness::new();
    let mut menu = focused_menu(&mut h, vec![MenuItem::button("a"), MenuItem::button("b")]);
    menu.open(&mut h.ctx());
    let (_, nav) = drop_parts(&h, &menu);
    let children = h.tree.children(nav).to_vec();

    assert!(menu.handle_key(&mut h.ctx(), &KeyEvent::new(Key::Down)).is_stop());
    assert!(menu.handle_key(&mut h.ctx(), &KeyEvent::new(Key::Down)).is_stop());
    assert_eq!(h.tree.active_element(), Some(children[1]));

    // Already at the last item; Down is consumed but focus stays.
    assert!(menu.handle_key(&mut h.ctx(), &KeyEvent::new(Key::Down)).is_stop());
    assert_eq!(h.tree.active_element(), Some(children[1]));
    assert!(menu.is_expanded());
}

#[test]
fn arrows_go_to_the_panel_not_the_control_while_expanded() {
    let mut h = Harness::new();
    let mut menu = focused_menu(&mut h, vec![MenuItem::button("a")]);
    menu.open(&mut h.ctx());

    // Down while expanded traverses items; it must not be taken as
    // another open request or close anything.
    assert!(menu.handle_key(&mut h.ctx(), &KeyEvent::new(Key::Down)).is_stop());
    assert!(menu.is_expanded());
    assert!(menu.panel().unwrap().cursor().is_some());
}

proptest! {
    /// Whatever sequence of arrow presses arrives, focus set by the
    /// panel only ever lands on activatable items.
    #[test]
    fn traversal_only_focuses_activatable_items(
        kinds in prop::collection::vec(0u8..4, 1..8),
        downs in prop::collection::vec(any::<bool>(), 1..24),
    ) {
        let items: Vec<MenuItem> = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| match kind {
                0 => MenuItem::button(format!("b{i}")),
                1 => MenuItem::link(format!("l{i}")),
                2 => MenuItem::heading(format!("h{i}")),
                _ => MenuItem::separator(),
            })
            .collect();

        let mut h = Harness::new();
        let mut menu = focused_menu(&mut h, items);
        menu.open(&mut h.ctx());
        let (control_copy, nav) = drop_parts(&h, &menu);

        for &down in &downs {
            let key = if down { Key::Down } else { Key::Up };
            let handled = menu.handle_key(&mut h.ctx(), &KeyEvent::new(key));
            prop_assert_eq!(handled, Handled::Stop);
            prop_assert!(menu.is_expanded());

            if let Some(active) = h.tree.active_element() {
                if active != control_copy && h.tree.contains(nav, active) {
                    prop_assert!(matches!(
                        h.tree.kind(active),
                        Some(ElementKind::Button | ElementKind::Link | ElementKind::CheckBox)
                    ));
                }
            }
            if let Some(cursor) = menu.panel().unwrap().cursor() {
                prop_assert_eq!(h.tree.parent(cursor), Some(nav));
            }
        }
    }
}
