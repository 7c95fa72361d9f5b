//! Contextual toolbar for the selected item.
//!
//! Which controls appear depends on the item variant; an action for a control
//! the variant does not offer is rejected before anything is mutated.

use serde::{Deserialize, Serialize};

use crate::validate::require_color;
use crate::{
    EditorError, EditorResult, FontStyle, FontWeight, ItemId, ItemKind, ItemPatch, Position,
    Scene, SceneItem, SceneStore,
};

/// Vertical distance between the toolbar and the top of the selected item.
pub const TOOLBAR_OFFSET_Y: f32 = 60.0;

/// An entry of the font picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontOption {
    /// CSS font-family value stored on the item.
    pub value: &'static str,
    /// Label shown in the picker.
    pub label: &'static str,
}

const fn font(value: &'static str, label: &'static str) -> FontOption {
    FontOption { value, label }
}

/// Fonts offered by the font picker, in display order.
pub const FONT_FAMILIES: [FontOption; 18] = [
    font("Arial", "Arial"),
    font("Times New Roman", "Times"),
    font("Courier New", "Courier"),
    font("Georgia", "Georgia"),
    font("Verdana", "Verdana"),
    font("Work Sans", "Work Sans"),
    font("Space Mono", "Space Mono"),
    font("Silkscreen", "Silkscreen"),
    font("Noto Serif Display", "Noto Serif Display"),
    font("Gotu", "Gotu"),
    font("Miniver", "Miniver"),
    font("Barrio", "Barrio"),
    font("Pinyon Script", "Pinyon Script"),
    font("Lora", "Lora"),
    font("Libre Baskerville", "Libre Baskerville"),
    font("Borel", "Borel"),
    font("Funnel Display", "Funnel Display"),
    font("VT323", "VT323"),
];

/// Whether `family` is one of [`FONT_FAMILIES`].
#[must_use]
pub fn is_known_font(family: &str) -> bool {
    FONT_FAMILIES.iter().any(|f| f.value == family)
}

/// A toolbar control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolbarControl {
    /// Font picker.
    FontFamily,
    /// Text color picker.
    Color,
    /// Bold toggle.
    Bold,
    /// Italic toggle.
    Italic,
    /// Button fill picker.
    BackgroundColor,
    /// Raise to top.
    BringToFront,
    /// Lower to bottom.
    SendToBack,
    /// Remove the item.
    Delete,
    /// Dismiss the toolbar.
    Close,
}

impl ToolbarControl {
    /// Stable name, used in error messages and markup.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FontFamily => "font_family",
            Self::Color => "color",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::BackgroundColor => "background_color",
            Self::BringToFront => "bring_to_front",
            Self::SendToBack => "send_to_back",
            Self::Delete => "delete",
            Self::Close => "close",
        }
    }
}

const TEXT_CONTROLS: &[ToolbarControl] = &[
    ToolbarControl::FontFamily,
    ToolbarControl::Color,
    ToolbarControl::Bold,
    ToolbarControl::Italic,
    ToolbarControl::BringToFront,
    ToolbarControl::SendToBack,
    ToolbarControl::Delete,
    ToolbarControl::Close,
];

const IMAGE_CONTROLS: &[ToolbarControl] = &[
    ToolbarControl::BringToFront,
    ToolbarControl::SendToBack,
    ToolbarControl::Delete,
    ToolbarControl::Close,
];

const LINK_CONTROLS: &[ToolbarControl] = &[
    ToolbarControl::FontFamily,
    ToolbarControl::BackgroundColor,
    ToolbarControl::BringToFront,
    ToolbarControl::SendToBack,
    ToolbarControl::Delete,
    ToolbarControl::Close,
];

/// Controls offered for an item variant, in display order.
#[must_use]
pub const fn controls_for(kind: &ItemKind) -> &'static [ToolbarControl] {
    match kind {
        ItemKind::Text(_) => TEXT_CONTROLS,
        ItemKind::Image(_) => IMAGE_CONTROLS,
        ItemKind::Link(_) => LINK_CONTROLS,
    }
}

/// Where the toolbar is drawn for `item`.
#[must_use]
pub fn toolbar_anchor(item: &SceneItem) -> Position {
    item.position.offset(0.0, -TOOLBAR_OFFSET_Y)
}

/// A user action on the toolbar. Always targets the selected item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum ToolbarAction {
    /// Pick a font from [`FONT_FAMILIES`].
    SetFontFamily(String),
    /// Set the text color.
    SetColor(String),
    /// Flip bold.
    ToggleBold,
    /// Flip italic.
    ToggleItalic,
    /// Set the link button fill.
    SetBackgroundColor(String),
    /// Raise to top.
    BringToFront,
    /// Lower to bottom.
    SendToBack,
    /// Delete the item.
    Delete,
    /// Deselect without other changes.
    Close,
}

impl ToolbarAction {
    /// Control that issues this action.
    #[must_use]
    pub const fn control(&self) -> ToolbarControl {
        match self {
            Self::SetFontFamily(_) => ToolbarControl::FontFamily,
            Self::SetColor(_) => ToolbarControl::Color,
            Self::ToggleBold => ToolbarControl::Bold,
            Self::ToggleItalic => ToolbarControl::Italic,
            Self::SetBackgroundColor(_) => ToolbarControl::BackgroundColor,
            Self::BringToFront => ToolbarControl::BringToFront,
            Self::SendToBack => ToolbarControl::SendToBack,
            Self::Delete => ToolbarControl::Delete,
            Self::Close => ToolbarControl::Close,
        }
    }

    /// Apply the action to the selected item.
    ///
    /// Returns whether the scene changed.
    ///
    /// # Errors
    ///
    /// - [`EditorError::ItemNotFound`] if nothing is selected.
    /// - [`EditorError::UnsupportedControl`] if the selected variant has no
    ///   such control.
    /// - [`EditorError::InvalidInput`] for fonts outside [`FONT_FAMILIES`] or
    ///   empty colors.
    pub fn apply(self, store: &mut SceneStore) -> EditorResult<bool> {
        let item = store
            .scene()
            .selected_item()
            .ok_or_else(|| EditorError::ItemNotFound("no item selected".into()))?;
        let id = item.id;
        let control = self.control();
        if !controls_for(&item.kind).contains(&control) {
            return Err(EditorError::UnsupportedControl {
                control: control.name(),
                kind: item.kind.name(),
            });
        }

        let patch = match self {
            Self::SetFontFamily(family) => {
                if !is_known_font(&family) {
                    return Err(EditorError::InvalidInput(format!("unknown font: {family}")));
                }
                ItemPatch {
                    font_family: Some(family),
                    ..ItemPatch::default()
                }
            }
            Self::SetColor(color) => ItemPatch {
                color: Some(css_color(color)?),
                ..ItemPatch::default()
            },
            Self::SetBackgroundColor(color) => ItemPatch {
                background_color: Some(css_color(color)?),
                ..ItemPatch::default()
            },
            Self::ToggleBold => ItemPatch {
                font_weight: text_style(&item.kind).map(|(weight, _)| weight.toggled()),
                ..ItemPatch::default()
            },
            Self::ToggleItalic => ItemPatch {
                font_style: text_style(&item.kind).map(|(_, style)| style.toggled()),
                ..ItemPatch::default()
            },
            Self::BringToFront => return Ok(store.bring_to_front(id)),
            Self::SendToBack => return Ok(store.send_to_back(id)),
            Self::Delete => return Ok(store.delete_item(id).is_some()),
            Self::Close => return Ok(store.select(None)),
        };
        Ok(store.update_item(id, &patch))
    }
}

fn css_color(color: String) -> EditorResult<String> {
    require_color(&color)?;
    Ok(color)
}

fn text_style(kind: &ItemKind) -> Option<(FontWeight, FontStyle)> {
    match kind {
        ItemKind::Text(text) => Some((text.font_weight, text.font_style)),
        ItemKind::Image(_) | ItemKind::Link(_) => None,
    }
}

/// Everything needed to draw the toolbar for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolbarState {
    /// Selected item.
    pub item: ItemId,
    /// Variant name of the selected item.
    pub kind: &'static str,
    /// Top-left corner of the toolbar.
    pub anchor: Position,
    /// Controls in display order.
    pub controls: &'static [ToolbarControl],
    /// Current font, for variants with a font picker.
    pub font_family: Option<String>,
    /// Current text color, for text items.
    pub color: Option<String>,
    /// Current button fill, for links.
    pub background_color: Option<String>,
    /// Whether the bold toggle is active.
    pub bold: bool,
    /// Whether the italic toggle is active.
    pub italic: bool,
}

impl ToolbarState {
    /// Toolbar for the selected item, or `None` when nothing is selected.
    #[must_use]
    pub fn for_scene(scene: &Scene) -> Option<Self> {
        let item = scene.selected_item()?;
        let mut state = Self {
            item: item.id,
            kind: item.kind.name(),
            anchor: toolbar_anchor(item),
            controls: controls_for(&item.kind),
            font_family: None,
            color: None,
            background_color: None,
            bold: false,
            italic: false,
        };
        match &item.kind {
            ItemKind::Text(text) => {
                state.font_family = Some(text.font_family.clone());
                state.color = Some(text.color.clone());
                state.bold = text.font_weight == FontWeight::Bold;
                state.italic = text.font_style == FontStyle::Italic;
            }
            ItemKind::Link(link) => {
                state.font_family = Some(link.font_family.clone());
                state.background_color = Some(link.background_color.clone());
            }
            ItemKind::Image(_) => {}
        }
        Some(state)
    }

    /// Whether the toolbar shows `control`.
    #[must_use]
    pub fn offers(&self, control: ToolbarControl) -> bool {
        self.controls.contains(&control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_image, create_link, create_text};

    fn store_with(item: SceneItem) -> (SceneStore, ItemId) {
        let mut store = SceneStore::new();
        let id = store.add_item(item).expect("add");
        (store, id)
    }

    #[test]
    fn capability_sets_match_variants() {
        assert_eq!(controls_for(&create_text().kind).len(), 8);
        assert_eq!(
            controls_for(&create_image("a.png").kind),
            &[
                ToolbarControl::BringToFront,
                ToolbarControl::SendToBack,
                ToolbarControl::Delete,
                ToolbarControl::Close
            ]
        );
        let link = create_link("https://a.com", "").expect("link");
        assert!(controls_for(&link.kind).contains(&ToolbarControl::BackgroundColor));
        assert!(!controls_for(&link.kind).contains(&ToolbarControl::Bold));
    }

    #[test]
    fn image_rejects_style_actions() {
        let (mut store, _) = store_with(create_image("a.png"));
        let err = ToolbarAction::SetColor("#ff0000".into())
            .apply(&mut store)
            .expect_err("images have no color");
        assert!(matches!(
            err,
            EditorError::UnsupportedControl {
                control: "color",
                kind: "image"
            }
        ));
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn bold_and_italic_toggle() {
        let (mut store, id) = store_with(create_text());
        assert!(ToolbarAction::ToggleBold.apply(&mut store).expect("bold"));
        assert!(ToolbarAction::ToggleItalic.apply(&mut store).expect("italic"));
        let state = ToolbarState::for_scene(store.scene()).expect("toolbar");
        assert!(state.bold && state.italic);

        ToolbarAction::ToggleBold.apply(&mut store).expect("bold off");
        let ItemKind::Text(text) = &store.scene().get(id).expect("item").kind else {
            panic!("expected text");
        };
        assert_eq!(text.font_weight, FontWeight::Normal);
    }

    #[test]
    fn font_must_come_from_the_list() {
        let (mut store, _) = store_with(create_text());
        assert!(ToolbarAction::SetFontFamily("Lora".into())
            .apply(&mut store)
            .expect("known font"));
        assert!(matches!(
            ToolbarAction::SetFontFamily("Comic Sans".into()).apply(&mut store),
            Err(EditorError::InvalidInput(_))
        ));
    }

    #[test]
    fn colors_must_be_plain_css_colors() {
        let (mut store, id) = store_with(create_text());
        let before = store.scene().get(id).cloned();
        for color in ["red; position: fixed; inset: 0", "", "url(https://evil/x.png)"] {
            assert!(
                matches!(
                    ToolbarAction::SetColor(color.into()).apply(&mut store),
                    Err(EditorError::InvalidInput(_))
                ),
                "{color:?}"
            );
        }
        assert_eq!(store.scene().get(id).cloned(), before);

        let (mut store, _) = store_with(create_link("https://a.com", "").expect("link"));
        assert!(matches!(
            ToolbarAction::SetBackgroundColor("#000\"; background: red".into()).apply(&mut store),
            Err(EditorError::InvalidInput(_))
        ));
        assert!(ToolbarAction::SetColor("rgb(10, 20, 30)".into())
            .apply(&mut store)
            .expect("rgb color"));
    }

    #[test]
    fn link_background_color_updates_button() {
        let (mut store, id) = store_with(create_link("https://a.com", "").expect("link"));
        ToolbarAction::SetBackgroundColor("#22aa22".into())
            .apply(&mut store)
            .expect("fill");
        let ItemKind::Link(link) = &store.scene().get(id).expect("item").kind else {
            panic!("expected link");
        };
        assert_eq!(link.background_color, "#22aa22");
    }

    #[test]
    fn close_only_deselects() {
        let (mut store, id) = store_with(create_text());
        let before = store.scene().items().to_vec();
        assert!(ToolbarAction::Close.apply(&mut store).expect("close"));
        assert_eq!(store.scene().selected_id(), None);
        assert_eq!(store.scene().items(), before.as_slice());
        assert!(store.scene().contains(id));
    }

    #[test]
    fn delete_removes_selected() {
        let (mut store, id) = store_with(create_image("a.png"));
        assert!(ToolbarAction::Delete.apply(&mut store).expect("delete"));
        assert!(!store.scene().contains(id));
        assert!(ToolbarState::for_scene(store.scene()).is_none());
    }

    #[test]
    fn actions_need_a_selection() {
        let mut store = SceneStore::new();
        assert!(matches!(
            ToolbarAction::BringToFront.apply(&mut store),
            Err(EditorError::ItemNotFound(_))
        ));
    }

    #[test]
    fn toolbar_sits_above_item() {
        let (store, id) = store_with(create_text());
        let state = ToolbarState::for_scene(store.scene()).expect("toolbar");
        assert_eq!(state.item, id);
        assert_eq!(state.anchor, Position::new(100.0, 40.0));
        assert_eq!(state.font_family.as_deref(), Some("Arial"));
    }

    #[test]
    fn font_list_is_fixed() {
        assert_eq!(FONT_FAMILIES.len(), 18);
        assert_eq!(FONT_FAMILIES[1], font("Times New Roman", "Times"));
        assert!(is_known_font("VT323"));
    }

    #[test]
    fn actions_parse_from_json() {
        let action: ToolbarAction =
            serde_json::from_str(r#"{"action":"set_font_family","value":"Gotu"}"#).expect("parse");
        assert_eq!(action, ToolbarAction::SetFontFamily("Gotu".into()));
        let close: ToolbarAction = serde_json::from_str(r#"{"action":"close"}"#).expect("parse");
        assert_eq!(close, ToolbarAction::Close);
    }
}
