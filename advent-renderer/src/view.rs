//! Frame view model.
//!
//! A [`Frame`] is rebuilt from the live scene on every render. It never
//! outlives the scene it was built from and holds no state of its own.

use advent_core::{
    is_safe_link_url, Background, DragPreview, FontStyle, FontWeight, ItemId, ItemKind, Scene,
    SceneItem,
};
use serde::Serialize;

use crate::toolbar::ToolbarView;
use crate::{RenderMode, RendererConfig};

/// Paint layer of unselected items.
pub const BASE_LAYER: u32 = 1;

/// Paint layer of the selected item.
pub const SELECTED_LAYER: u32 = 1000;

/// Text shown over an empty canvas.
pub const PLACEHOLDER_TEXT: &str = "Canvas Area";

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the point lies inside, edges included.
    #[must_use]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// The rectangle shrunk by `by` on every side.
    #[must_use]
    pub fn inset(&self, by: f32) -> Self {
        Self {
            x: self.x + by,
            y: self.y + by,
            width: (self.width - 2.0 * by).max(0.0),
            height: (self.height - 2.0 * by).max(0.0),
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// How an image fills its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    /// Scale to fit entirely, keeping aspect ratio.
    Contain,
    /// Scale to cover entirely, keeping aspect ratio.
    Cover,
}

/// What an item paints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemContent {
    /// In-place text editor.
    TextField {
        /// Current text.
        content: String,
        /// Text color.
        color: String,
        /// Font family.
        font_family: String,
        /// Weight keyword.
        font_weight: FontWeight,
        /// Style keyword.
        font_style: FontStyle,
        /// Whether keystrokes edit the item.
        editable: bool,
        /// Inner editor area; presses here go to the text field.
        field: Rect,
    },
    /// Picture fitted into the item box.
    Image {
        /// Image source.
        src: String,
        /// Fit mode, always contain for items.
        fit: ImageFit,
    },
    /// Button linking to a URL.
    LinkButton {
        /// Button label.
        label: String,
        /// Target URL.
        url: String,
        /// Fill color.
        background_color: String,
        /// Label color.
        color: String,
        /// Label font.
        font_family: String,
        /// Whether clicking follows the URL: read-only mode and an allowed
        /// scheme only.
        navigable: bool,
    },
}

/// One painted item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    /// Item identifier.
    pub id: ItemId,
    /// Variant name.
    pub kind: &'static str,
    /// Move surface, including any live drag offset.
    pub bounds: Rect,
    /// Paint layer, see [`BASE_LAYER`] and [`SELECTED_LAYER`].
    pub layer: u32,
    /// Index in the stored paint order.
    pub paint_index: usize,
    /// Whether this is the selected item.
    pub selected: bool,
    /// Whether a drag preview offset is applied.
    pub dragging: bool,
    /// Resize hot zone at the bottom-right corner, when active.
    pub resize_handle: Option<Rect>,
    /// Painted content.
    pub content: ItemContent,
}

/// Everything the backend needs to paint one canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Render mode the frame was built for.
    pub mode: RenderMode,
    /// Background layer, image backgrounds cover-fit.
    pub background: Background,
    /// Placeholder label when the canvas is empty.
    pub placeholder: Option<&'static str>,
    /// Items in paint order (later paints on top).
    pub nodes: Vec<ItemView>,
    /// Toolbar for the selected item.
    pub toolbar: Option<ToolbarView>,
}

impl Frame {
    /// Build a frame from the live scene.
    ///
    /// `preview` offsets the dragged item without touching the scene.
    #[must_use]
    pub fn build(scene: &Scene, preview: Option<DragPreview>, config: &RendererConfig) -> Self {
        let editing = config.mode == RenderMode::Edit;
        let selected = if editing { scene.selected_id() } else { None };

        let mut nodes: Vec<ItemView> = scene
            .items()
            .iter()
            .enumerate()
            .map(|(paint_index, item)| {
                let offset = preview.filter(|p| p.item == item.id);
                item_view(item, paint_index, selected == Some(item.id), offset, config)
            })
            .collect();
        nodes.sort_by_key(|node| (node.layer, node.paint_index));

        let toolbar = if editing {
            ToolbarView::for_scene(scene)
        } else {
            None
        };

        Self {
            mode: config.mode,
            background: scene.background().clone(),
            placeholder: scene.is_empty().then_some(PLACEHOLDER_TEXT),
            nodes,
            toolbar,
        }
    }

    /// Look up an item view by id.
    #[must_use]
    pub fn node(&self, id: ItemId) -> Option<&ItemView> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

fn item_view(
    item: &SceneItem,
    paint_index: usize,
    selected: bool,
    preview: Option<DragPreview>,
    config: &RendererConfig,
) -> ItemView {
    let editing = config.mode == RenderMode::Edit;
    let (dx, dy) = preview.map_or((0.0, 0.0), |p| (p.dx, p.dy));
    let x = item.position.x + dx;
    let y = item.position.y + dy;

    let (bounds, content) = match &item.kind {
        ItemKind::Text(text) => {
            let (width, height) = config.text_metrics.measure(&text.content);
            let bounds = Rect::new(x, y, width, height);
            let content = ItemContent::TextField {
                content: text.content.clone(),
                color: text.color.clone(),
                font_family: text.font_family.clone(),
                font_weight: text.font_weight,
                font_style: text.font_style,
                editable: editing,
                field: bounds.inset(config.text_metrics.padding),
            };
            (bounds, content)
        }
        ItemKind::Image(image) => (
            Rect::new(x, y, image.size.width, image.size.height),
            ItemContent::Image {
                src: image.src.clone(),
                fit: ImageFit::Contain,
            },
        ),
        ItemKind::Link(link) => (
            Rect::new(x, y, link.size.width, link.size.height),
            ItemContent::LinkButton {
                label: link.content.clone(),
                url: link.url.clone(),
                background_color: link.background_color.clone(),
                color: link.color.clone(),
                font_family: link.font_family.clone(),
                navigable: !editing && is_safe_link_url(&link.url),
            },
        ),
    };

    let resize_handle = (selected && item.kind.is_resizable()).then(|| {
        let s = config.handle_size;
        Rect::new(bounds.right() - s, bounds.bottom() - s, s, s)
    });

    ItemView {
        id: item.id,
        kind: item.kind.name(),
        bounds,
        layer: if selected { SELECTED_LAYER } else { BASE_LAYER },
        paint_index,
        selected,
        dragging: preview.is_some(),
        resize_handle,
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advent_core::{create_image, create_link, create_text, SceneStore};

    fn store_with_three() -> (SceneStore, Vec<ItemId>) {
        let mut store = SceneStore::new();
        let ids = vec![
            store.add_item(create_image("a.png")).expect("image"),
            store
                .add_item(create_link("https://a.com", "").expect("link"))
                .expect("link"),
            store.add_item(create_text()).expect("text"),
        ];
        (store, ids)
    }

    fn painted(frame: &Frame) -> Vec<ItemId> {
        frame.nodes.iter().map(|n| n.id).collect()
    }

    #[test]
    fn empty_scene_shows_placeholder() {
        let frame = Frame::build(&Scene::new(), None, &RendererConfig::default());
        assert_eq!(frame.placeholder, Some("Canvas Area"));
        assert!(frame.nodes.is_empty());
        assert!(frame.toolbar.is_none());
    }

    #[test]
    fn selected_item_paints_last_without_reordering_scene() {
        let (mut store, ids) = store_with_three();
        store.select(Some(ids[0]));
        let frame = Frame::build(store.scene(), None, &RendererConfig::default());

        assert_eq!(painted(&frame), vec![ids[1], ids[2], ids[0]]);
        assert_eq!(frame.nodes[2].layer, SELECTED_LAYER);
        assert_eq!(frame.nodes[2].paint_index, 0);
        assert_eq!(store.scene().items()[0].id, ids[0]);
    }

    #[test]
    fn resize_handle_only_on_selected_resizable_items() {
        let (mut store, ids) = store_with_three();
        store.select(Some(ids[0]));
        let frame = Frame::build(store.scene(), None, &RendererConfig::default());
        let image = frame.node(ids[0]).expect("image view");
        assert_eq!(image.resize_handle, Some(Rect::new(284.0, 284.0, 16.0, 16.0)));
        assert!(frame.node(ids[1]).expect("link").resize_handle.is_none());

        store.select(Some(ids[2]));
        let frame = Frame::build(store.scene(), None, &RendererConfig::default());
        assert!(frame.node(ids[2]).expect("text").resize_handle.is_none());
    }

    #[test]
    fn drag_preview_offsets_only_the_dragged_item() {
        let (store, ids) = store_with_three();
        let preview = DragPreview {
            item: ids[1],
            dx: 10.0,
            dy: -5.0,
        };
        let frame = Frame::build(store.scene(), Some(preview), &RendererConfig::default());
        let link = frame.node(ids[1]).expect("link");
        assert_eq!((link.bounds.x, link.bounds.y), (110.0, 95.0));
        assert!(link.dragging);
        assert_eq!(frame.node(ids[0]).expect("image").bounds.x, 100.0);
    }

    #[test]
    fn links_navigate_only_in_read_only_mode() {
        let (store, ids) = store_with_three();
        let edit = Frame::build(store.scene(), None, &RendererConfig::default());
        let view = Frame::build(store.scene(), None, &RendererConfig::read_only());

        let navigable = |frame: &Frame| match &frame.node(ids[1]).expect("link").content {
            ItemContent::LinkButton { navigable, .. } => *navigable,
            other => panic!("unexpected content {other:?}"),
        };
        assert!(!navigable(&edit));
        assert!(navigable(&view));
        assert!(view.toolbar.is_none());
        assert!(view.nodes.iter().all(|n| !n.selected));
    }

    /// A scene that bypassed store validation, e.g. one deserialized directly.
    fn scene_with_link_url(url: &str) -> Scene {
        let (store, _) = store_with_three();
        let mut json = serde_json::to_value(store.scene()).expect("serialize");
        json["items"][1]["kind"]["data"]["url"] = url.into();
        serde_json::from_value(json).expect("scene")
    }

    #[test]
    fn script_links_never_navigate() {
        let scene = scene_with_link_url("javascript:alert(document.cookie)");
        let view = Frame::build(&scene, None, &RendererConfig::read_only());
        let link = view.nodes.iter().find(|n| n.kind == "link").expect("link");
        assert!(matches!(
            link.content,
            ItemContent::LinkButton {
                navigable: false,
                ..
            }
        ));
    }

    #[test]
    fn images_are_contain_fitted() {
        let (store, ids) = store_with_three();
        let frame = Frame::build(store.scene(), None, &RendererConfig::default());
        assert!(matches!(
            frame.node(ids[0]).expect("image").content,
            ItemContent::Image {
                fit: ImageFit::Contain,
                ..
            }
        ));
    }

    #[test]
    fn text_field_sits_inside_padding() {
        let (store, ids) = store_with_three();
        let frame = Frame::build(store.scene(), None, &RendererConfig::default());
        let text = frame.node(ids[2]).expect("text");
        let ItemContent::TextField { field, editable, .. } = &text.content else {
            panic!("expected text field");
        };
        assert!(editable);
        assert!(field.width < text.bounds.width);
        assert!(text.bounds.contains(field.x, field.y));
    }

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(0.0, 0.0));
        assert!(rect.contains(10.0, 10.0));
        assert!(!rect.contains(10.1, 5.0));
    }
}
