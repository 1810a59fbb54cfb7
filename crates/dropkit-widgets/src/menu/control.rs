//! The menu's owning state machine.
//!
//! A [`MenuControl`] is always in exactly one of three states:
//!
//! * **Collapsed** — nothing registered anywhere; either the inline
//!   items or the toggle control sit in the page.
//! * **Focused** — the toggle control has focus; Space, Down and Enter
//!   are claimed so any of them opens the drop.
//! * **Expanded** — the drop is mounted through the overlay host, a
//!   [`MenuPanel`] contains keyboard focus inside it, Esc is claimed,
//!   and a document click listener watches for outside clicks.
//!
//! # Invariants
//!
//! 1. Every registration made on entering a state is released when the
//!    state is left; unmounting from any state releases everything.
//! 2. At most one overlay and one panel exist per control, and only in
//!    the expanded state.
//! 3. Re-rendering while expanded updates the drop in place; the drop
//!    root element survives and the panel is rebound, not remounted.
//! 4. A responsive switch to the small size class demotes an expanded
//!    menu to focused (tearing the drop down) and forces the collapsed
//!    control face; switching back restores the configured face.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |---|---|
//! | Open before mount (no host element) | warning logged, stays collapsed |
//! | Overlay mount fails (anchor detached) | warning logged, no panel |
//! | Transition request for the current state | no-op |

#![forbid(unsafe_code)]

use dropkit_core::{ElementId, ElementKind, Handled, Key, KeyEvent, KeySet, Template};
use dropkit_runtime::{OwnerId, ResponsiveSubscription};
use tracing::{debug, warn};

use crate::context::UiContext;
use crate::menu::panel::{MenuPanel, PanelClick};
use crate::menu::{control_contents, control_title, Inline, MenuConfig, MenuItem, RenderEnv};
use crate::overlay::{OverlayHandle, OverlayOptions};

/// Keys claimed while the toggle control has focus.
const FOCUSED_KEYS: KeySet = KeySet::SPACE.union(KeySet::DOWN).union(KeySet::ENTER);

/// Keys claimed while the drop is open.
const EXPANDED_KEYS: KeySet = KeySet::ESC;

/// Lifecycle state of a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Collapsed,
    Focused,
    Expanded,
}

/// A drop-down menu: configuration, items, and the machinery that
/// opens and closes the drop.
#[derive(Debug)]
pub struct MenuControl {
    config: MenuConfig,
    items: Vec<MenuItem>,
    owner: OwnerId,
    state: MenuState,
    /// Presentation currently in effect; diverges from the configured
    /// value while the small size class forces the control face.
    inline: Inline,
    /// Presentation to restore when leaving the small size class.
    initial_inline: Inline,
    responsive: bool,
    /// Forced by the small size class.
    control_collapsed: bool,
    root: Option<ElementId>,
    /// The toggle control's button, when the menu renders one.
    control_el: Option<ElementId>,
    overlay: Option<OverlayHandle>,
    panel: Option<MenuPanel>,
    subscription: Option<ResponsiveSubscription>,
}

impl MenuControl {
    #[must_use]
    pub fn new(config: MenuConfig, items: Vec<MenuItem>) -> Self {
        let inline = config.computed_inline();
        let responsive = config.computed_responsive(inline);
        Self {
            config,
            items,
            owner: OwnerId::next(),
            state: MenuState::Collapsed,
            inline,
            initial_inline: inline,
            responsive,
            control_collapsed: false,
            root: None,
            control_el: None,
            overlay: None,
            panel: None,
            subscription: None,
        }
    }

    /// Renders the menu's in-page face under `parent` and, when the
    /// menu is responsive, subscribes to the size-class monitor.
    pub fn mount(&mut self, ctx: &mut UiContext<'_>, parent: ElementId) {
        if self.root.is_some() {
            return;
        }
        self.render_host(ctx, Some(parent));
        if self.responsive {
            self.subscription = Some(ctx.responsive.subscribe());
        }
        debug!(owner = self.owner.raw(), inline = ?self.inline, "menu mounted");
    }

    /// Releases every registration, tears down any open drop, removes
    /// the in-page face, and returns to the collapsed state.
    pub fn unmount(&mut self, ctx: &mut UiContext<'_>) {
        ctx.keyboard.unregister(self.owner, None);
        ctx.clicks.unregister(self.owner);
        if let Some(panel) = self.panel.take() {
            panel.unmount(ctx.tree, ctx.keyboard);
        }
        if let Some(handle) = self.overlay.take() {
            ctx.overlays.remove(ctx.tree, handle);
        }
        if let Some(subscription) = self.subscription.take() {
            subscription.stop(ctx.responsive);
        }
        if let Some(root) = self.root.take() {
            ctx.tree.remove(root);
        }
        self.control_el = None;
        self.state = MenuState::Collapsed;
        debug!(owner = self.owner.raw(), "menu unmounted");
    }

    #[must_use]
    pub fn state(&self) -> MenuState {
        self.state
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.state == MenuState::Expanded
    }

    /// Presentation currently in effect.
    #[must_use]
    pub fn inline(&self) -> Inline {
        self.inline
    }

    #[must_use]
    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    /// The toggle control's button element, when one is rendered.
    #[must_use]
    pub fn control_element(&self) -> Option<ElementId> {
        self.control_el
    }

    #[must_use]
    pub fn overlay(&self) -> Option<&OverlayHandle> {
        self.overlay.as_ref()
    }

    #[must_use]
    pub fn panel(&self) -> Option<&MenuPanel> {
        self.panel.as_ref()
    }

    pub fn panel_mut(&mut self) -> Option<&mut MenuPanel> {
        self.panel.as_mut()
    }

    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    #[must_use]
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Opens the drop. No-op when already expanded or not yet mounted;
    /// an unmounted menu has no anchor to hang a drop from.
    pub fn open(&mut self, ctx: &mut UiContext<'_>) {
        if self.root.is_none() {
            warn!(owner = self.owner.raw(), "open requested before mount; staying collapsed");
            return;
        }
        if matches!(self.state, MenuState::Collapsed | MenuState::Focused) {
            self.transition(ctx, MenuState::Expanded);
        }
    }

    /// Closes the drop (or drops focus) back to collapsed.
    pub fn close(&mut self, ctx: &mut UiContext<'_>) {
        if self.state != MenuState::Collapsed {
            self.transition(ctx, MenuState::Collapsed);
        }
    }

    /// The toggle control received focus.
    pub fn focus_control(&mut self, ctx: &mut UiContext<'_>) {
        if self.state == MenuState::Collapsed {
            self.transition(ctx, MenuState::Focused);
        }
    }

    /// The toggle control lost focus. Only demotes the focused state;
    /// an expanded menu keeps its drop (focus moved into the panel).
    pub fn blur_control(&mut self, ctx: &mut UiContext<'_>) {
        if self.state == MenuState::Focused {
            self.transition(ctx, MenuState::Collapsed);
        }
    }

    /// Replaces the item list and re-renders in place.
    pub fn set_items(&mut self, ctx: &mut UiContext<'_>, items: Vec<MenuItem>) {
        self.items = items;
        self.update(ctx);
    }

    /// Replaces the configuration, re-deriving the presentation, and
    /// re-renders in place.
    pub fn set_config(&mut self, ctx: &mut UiContext<'_>, config: MenuConfig) {
        self.config = config;
        self.inline = self.config.computed_inline();
        self.update(ctx);
    }

    /// Re-renders the in-page face and, while expanded, the drop.
    /// The drop root element is preserved and the panel rebound, so
    /// focus and the traversal cursor survive where their elements do.
    pub fn update(&mut self, ctx: &mut UiContext<'_>) {
        self.render_host(ctx, None);
        if self.state != MenuState::Expanded {
            return;
        }
        let env = RenderEnv {
            catalog: ctx.catalog,
            locale: ctx.locale,
        };
        let content = self.drop_template(&env);
        if let Some(handle) = self.overlay.as_ref() {
            ctx.overlays.render(handle, ctx.tree, &content);
            if let Some(drop_root) = ctx.overlays.root_of(handle) {
                if let Some(panel) = self.panel.as_mut() {
                    panel.rebind(ctx.tree, drop_root);
                }
            }
        }
    }

    /// Offers one keyboard event to every interested owner, newest
    /// first, stopping at the first consumer.
    pub fn handle_key(&mut self, ctx: &mut UiContext<'_>, event: &KeyEvent) -> Handled {
        let chain = ctx.keyboard.dispatch_order(event.key);
        for owner in chain {
            let handled = if owner == self.owner {
                self.on_control_key(ctx, event)
            } else if self.panel.as_ref().is_some_and(|p| p.owner() == owner) {
                match self.panel.as_mut() {
                    Some(panel) => panel.on_key(ctx.tree, event),
                    None => Handled::Pass,
                }
            } else {
                Handled::Pass
            };
            if handled.is_stop() {
                return Handled::Stop;
            }
        }
        Handled::Pass
    }

    fn on_control_key(&mut self, ctx: &mut UiContext<'_>, event: &KeyEvent) -> Handled {
        match (self.state, event.key) {
            (MenuState::Focused, Key::Space | Key::Down | Key::Enter) => {
                self.open(ctx);
                Handled::Stop
            }
            (MenuState::Expanded, Key::Esc) => {
                self.close(ctx);
                Handled::Stop
            }
            _ => Handled::Pass,
        }
    }

    /// Routes one document click.
    ///
    /// A click inside an open drop is decided by the panel (the
    /// control copy closes; otherwise close-on-click applies). A click
    /// on the toggle control toggles. Any other click closes an open
    /// drop through the document listener, and passes otherwise.
    pub fn handle_click(&mut self, ctx: &mut UiContext<'_>, target: ElementId) -> Handled {
        let panel_action = match (self.overlay.as_ref(), self.panel.as_ref()) {
            (Some(handle), Some(panel)) => ctx
                .overlays
                .root_of(handle)
                .filter(|&root| ctx.tree.contains(root, target))
                .map(|_| panel.on_click(ctx.tree, target)),
            _ => None,
        };
        if let Some(action) = panel_action {
            if action == PanelClick::Close {
                self.close(ctx);
            }
            return Handled::Stop;
        }

        let on_control = self.root.is_some_and(|root| ctx.tree.contains(root, target));
        if on_control && !self.effective_inline().is_inline() {
            match self.state {
                MenuState::Expanded => self.close(ctx),
                _ => self.open(ctx),
            }
            return Handled::Stop;
        }

        if ctx.clicks.is_registered(self.owner) {
            self.close(ctx);
            return Handled::Stop;
        }
        Handled::Pass
    }

    /// Applies a size-class change reported by the responsive monitor.
    pub fn handle_responsive(&mut self, ctx: &mut UiContext<'_>, small: bool) {
        if small {
            self.inline = Inline::Off;
            self.control_collapsed = true;
            if self.state == MenuState::Expanded {
                self.transition(ctx, MenuState::Focused);
            }
        } else {
            self.inline = self.initial_inline;
            self.control_collapsed = false;
            if self.state != MenuState::Collapsed {
                self.transition(ctx, MenuState::Collapsed);
            }
        }
        debug!(owner = self.owner.raw(), small, inline = ?self.inline, "size class changed");
        self.update(ctx);
    }

    /// Presentation after the size-class override.
    fn effective_inline(&self) -> Inline {
        if self.control_collapsed {
            Inline::Off
        } else {
            self.inline
        }
    }

    fn transition(&mut self, ctx: &mut UiContext<'_>, next: MenuState) {
        let prev = self.state;
        if prev == next {
            return;
        }
        self.state = next;
        debug!(owner = self.owner.raw(), from = ?prev, to = ?next, "menu state transition");
        self.apply_transition(ctx);
    }

    fn apply_transition(&mut self, ctx: &mut UiContext<'_>) {
        match self.state {
            MenuState::Collapsed => {
                ctx.keyboard.unregister(self.owner, Some(FOCUSED_KEYS));
                self.teardown_expanded(ctx);
            }
            MenuState::Focused => {
                self.teardown_expanded(ctx);
                ctx.keyboard.register(self.owner, FOCUSED_KEYS);
            }
            MenuState::Expanded => {
                ctx.keyboard.unregister(self.owner, Some(FOCUSED_KEYS));
                ctx.keyboard.register(self.owner, EXPANDED_KEYS);
                ctx.clicks.register(self.owner);
                self.mount_overlay(ctx);
            }
        }
    }

    /// Releases everything the expanded state holds. Panel first so
    /// focus is restored before the drop subtree disappears.
    fn teardown_expanded(&mut self, ctx: &mut UiContext<'_>) {
        ctx.keyboard.unregister(self.owner, Some(EXPANDED_KEYS));
        ctx.clicks.unregister(self.owner);
        if let Some(panel) = self.panel.take() {
            panel.unmount(ctx.tree, ctx.keyboard);
        }
        if let Some(handle) = self.overlay.take() {
            ctx.overlays.remove(ctx.tree, handle);
        }
    }

    fn mount_overlay(&mut self, ctx: &mut UiContext<'_>) {
        let Some(anchor) = self.root else {
            warn!(owner = self.owner.raw(), "open requested before mount; no anchor");
            return;
        };
        let env = RenderEnv {
            catalog: ctx.catalog,
            locale: ctx.locale,
        };
        let content = self.drop_template(&env);
        let options = OverlayOptions {
            align: self.config.drop_align,
            color_index: self.config.drop_color_index.clone(),
            size_hint: self.config.size.map(|s| s.as_str().to_owned()),
            focus_control: true,
        };
        match ctx.overlays.mount(ctx.tree, anchor, &content, options) {
            Ok(handle) => {
                if let Some(drop_root) = ctx.overlays.root_of(&handle) {
                    self.panel = Some(MenuPanel::mount(
                        ctx.tree,
                        ctx.keyboard,
                        drop_root,
                        self.config.close_on_click,
                        true,
                    ));
                }
                self.overlay = Some(handle);
            }
            Err(err) => {
                warn!(owner = self.owner.raw(), %err, "failed to mount menu drop");
            }
        }
    }

    /// Renders (or re-renders in place) the menu's in-page face.
    fn render_host(&mut self, ctx: &mut UiContext<'_>, parent: Option<ElementId>) {
        let env = RenderEnv {
            catalog: ctx.catalog,
            locale: ctx.locale,
        };
        let template = self.host_template(&env);
        match self.root {
            Some(root) => {
                ctx.tree.apply(root, &template);
            }
            None => {
                if let Some(parent) = parent {
                    self.root = ctx.tree.instantiate(parent, &template);
                }
            }
        }
        self.control_el = if self.effective_inline().is_inline() {
            None
        } else {
            self.root.and_then(|root| {
                ctx.tree
                    .descendants(root)
                    .into_iter()
                    .find(|&d| ctx.tree.kind(d) == Some(ElementKind::Button))
            })
        };
    }

    /// Template for the in-page face: either the inline nav of items,
    /// or a box wrapping the titled toggle control.
    fn host_template(&self, env: &RenderEnv<'_>) -> Template {
        let inline = self.effective_inline();
        if inline.is_inline() {
            super::inline_menu_template(&self.config, &self.items, inline, env, false)
        } else {
            super::collapsed_menu_template(&self.config, env)
        }
    }

    /// Template for the drop's contents: a surface holding a copy of
    /// the toggle control (now titled for closing) and the item nav.
    /// Bottom alignment flips the order so the control copy sits over
    /// the anchor.
    fn drop_template(&self, env: &RenderEnv<'_>) -> Template {
        let title = control_title(env, false, self.config.title_text());
        let control_copy = Template::new(ElementKind::Button)
            .title(title)
            .children(control_contents(&self.config, env));
        let nav = Template::new(ElementKind::Nav)
            .children(self.items.iter().map(|item| item.template(env, true)));
        let mut contents = vec![control_copy, nav];
        if self.config.drop_align.bottom {
            contents.reverse();
        }
        Template::new(ElementKind::Box).children(contents)
    }
}
