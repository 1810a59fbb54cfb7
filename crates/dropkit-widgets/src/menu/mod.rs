//! Drop-down menu widget.
//!
//! Split across three pieces:
//!
//! * this module: declarative configuration ([`MenuConfig`]) and item
//!   descriptions ([`MenuItem`]), plus the template builders shared by
//!   the inline rendition and the drop rendition;
//! * [`control`]: the [`MenuControl`] state machine that owns the
//!   widget's lifecycle (collapsed, focused, expanded);
//! * [`panel`]: the [`MenuPanel`] that contains keyboard focus inside
//!   an open drop.

#![forbid(unsafe_code)]

pub mod control;
pub mod panel;

pub use control::{MenuControl, MenuState};
pub use panel::{MenuPanel, PanelClick, Step, Traversal};

use dropkit_core::{ElementKind, Template};
use dropkit_i18n::MessageCatalog;

use crate::overlay::DropAlign;

/// How the menu's items are presented when no drop is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inline {
    /// Items live behind a toggle control and a drop.
    Off,
    /// Items are rendered directly in the page.
    On,
    /// Inline, with the menu's label rendered above the items.
    Explode,
}

impl Inline {
    /// Whether items render directly in the page (no drop involved).
    #[must_use]
    pub fn is_inline(self) -> bool {
        matches!(self, Self::On | Self::Explode)
    }
}

/// Layout axis for inline items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Row,
    #[default]
    Column,
}

/// Size hint forwarded to the drop surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSize {
    Small,
    Medium,
    Large,
}

impl MenuSize {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// Declarative menu configuration.
///
/// Builder-style setters; start from [`MenuConfig::new`] and chain.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuConfig {
    pub label: Option<String>,
    pub icon: Option<String>,
    /// Accessible title; falls back to `label` when absent.
    pub a11y_title: Option<String>,
    /// Explicit inline mode. When `None` the mode is derived: inline
    /// unless a label or icon gives the menu a collapsed face.
    pub inline: Option<Inline>,
    pub direction: Direction,
    pub size: Option<MenuSize>,
    /// Whether activating an item closes the drop. Defaults to true.
    pub close_on_click: bool,
    pub drop_align: DropAlign,
    pub drop_color_index: Option<String>,
    /// Explicit responsive opt-in/out. When `None` the menu responds to
    /// viewport size only when inline along a row.
    pub responsive: Option<bool>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            label: None,
            icon: None,
            a11y_title: None,
            inline: None,
            direction: Direction::default(),
            size: None,
            close_on_click: true,
            drop_align: DropAlign::default(),
            drop_color_index: None,
            responsive: None,
        }
    }
}

impl MenuConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn a11y_title(mut self, title: impl Into<String>) -> Self {
        self.a11y_title = Some(title.into());
        self
    }

    #[must_use]
    pub fn inline(mut self, inline: Inline) -> Self {
        self.inline = Some(inline);
        self
    }

    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn size(mut self, size: MenuSize) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn close_on_click(mut self, close: bool) -> Self {
        self.close_on_click = close;
        self
    }

    #[must_use]
    pub fn drop_align(mut self, align: DropAlign) -> Self {
        self.drop_align = align;
        self
    }

    #[must_use]
    pub fn drop_color_index(mut self, index: impl Into<String>) -> Self {
        self.drop_color_index = Some(index.into());
        self
    }

    #[must_use]
    pub fn responsive(mut self, responsive: bool) -> Self {
        self.responsive = Some(responsive);
        self
    }

    pub(crate) fn computed_inline(&self) -> Inline {
        match self.inline {
            Some(inline) => inline,
            None if self.label.is_none() && self.icon.is_none() => Inline::On,
            None => Inline::Off,
        }
    }

    pub(crate) fn computed_responsive(&self, inline: Inline) -> bool {
        match self.responsive {
            Some(responsive) => responsive,
            None => inline.is_inline() && self.direction == Direction::Row,
        }
    }

    pub(crate) fn title_text(&self) -> &str {
        self.a11y_title
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or("")
    }
}

/// One entry in a menu.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuItem {
    /// Activatable button.
    Button { label: String },
    /// Navigation link.
    Link { label: String },
    /// Toggleable option.
    CheckBox { label: String },
    /// Non-interactive heading.
    Label { text: String },
    /// Non-interactive divider.
    Separator,
    /// Nested menu. Renders inline per its own config in the page;
    /// inside an open drop it is always flattened (exploded, column).
    Menu {
        config: MenuConfig,
        items: Vec<MenuItem>,
    },
}

impl MenuItem {
    #[must_use]
    pub fn button(label: impl Into<String>) -> Self {
        Self::Button { label: label.into() }
    }

    #[must_use]
    pub fn link(label: impl Into<String>) -> Self {
        Self::Link { label: label.into() }
    }

    #[must_use]
    pub fn check_box(label: impl Into<String>) -> Self {
        Self::CheckBox { label: label.into() }
    }

    #[must_use]
    pub fn heading(text: impl Into<String>) -> Self {
        Self::Label { text: text.into() }
    }

    #[must_use]
    pub fn separator() -> Self {
        Self::Separator
    }

    #[must_use]
    pub fn submenu(config: MenuConfig, items: Vec<MenuItem>) -> Self {
        Self::Menu { config, items }
    }

    pub(crate) fn template(&self, env: &RenderEnv<'_>, in_panel: bool) -> Template {
        match self {
            Self::Button { label } => Template::button(label.clone()),
            Self::Link { label } => Template::link(label.clone()),
            Self::CheckBox { label } => {
                Template::new(ElementKind::CheckBox).label(label.clone())
            }
            Self::Label { text } => Template::new(ElementKind::Label).label(text.clone()),
            Self::Separator => Template::new(ElementKind::Box),
            Self::Menu { config, items } => {
                if in_panel {
                    // Inside a drop a nested menu always explodes; a
                    // drop within a drop would trap focus.
                    inline_menu_template(config, items, Inline::Explode, env, true)
                } else {
                    let inline = config.computed_inline();
                    if inline.is_inline() {
                        inline_menu_template(config, items, inline, env, false)
                    } else {
                        collapsed_menu_template(config, env)
                    }
                }
            }
        }
    }
}

/// Catalog access handed down the template builders.
#[derive(Clone, Copy)]
pub(crate) struct RenderEnv<'a> {
    pub catalog: &'a MessageCatalog,
    pub locale: &'a str,
}

/// Accessible title for a menu's toggle control.
pub(crate) fn control_title(env: &RenderEnv<'_>, opening: bool, title: &str) -> String {
    if title.is_empty() {
        let key = if opening { "open-menu-plain" } else { "close-menu-plain" };
        let fallback = if opening { "Open Menu" } else { "Close Menu" };
        return env.catalog.get(env.locale, key).unwrap_or(fallback).to_owned();
    }
    let key = if opening { "open-menu" } else { "close-menu" };
    env.catalog
        .format(env.locale, key, &[("title", title)])
        .unwrap_or_else(|| {
            let verb = if opening { "Open" } else { "Close" };
            format!("{verb} {title} Menu")
        })
}

/// Visible contents of a menu's toggle control: icon and/or label with
/// a caret, or the default "more" glyph when neither is configured.
pub(crate) fn control_contents(config: &MenuConfig, env: &RenderEnv<'_>) -> Vec<Template> {
    let mut contents = Vec::new();
    if let Some(icon) = &config.icon {
        contents.push(Template::text(icon.clone()));
    }
    if let Some(label) = &config.label {
        let caret_title = env
            .catalog
            .get(env.locale, "menu-down")
            .unwrap_or("menu down")
            .to_owned();
        contents.push(Template::text(label.clone()));
        contents.push(Template::text("caret-down").title(caret_title));
    }
    if contents.is_empty() {
        let glyph = env.catalog.get(env.locale, "more").unwrap_or("more").to_owned();
        contents.push(Template::text(glyph));
    }
    contents
}

fn inline_menu_template(
    config: &MenuConfig,
    items: &[MenuItem],
    inline: Inline,
    env: &RenderEnv<'_>,
    in_panel: bool,
) -> Template {
    let mut nav = Template::new(ElementKind::Nav);
    if inline == Inline::Explode {
        if let Some(label) = &config.label {
            nav = nav.child(Template::new(ElementKind::Label).label(label.clone()));
        }
    }
    nav.children(items.iter().map(|item| item.template(env, in_panel)))
}

fn collapsed_menu_template(config: &MenuConfig, env: &RenderEnv<'_>) -> Template {
    let title = control_title(env, true, config.title_text());
    Template::new(ElementKind::Box).child(
        Template::new(ElementKind::Button)
            .title(title)
            .children(control_contents(config, env)),
    )
}
