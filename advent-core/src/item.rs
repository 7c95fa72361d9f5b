//! Scene items - the building blocks of a day's canvas.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::{require_color, require_font, require_image_src, require_link_url};
use crate::{EditorError, EditorResult};

/// Label used for new text items.
pub const DEFAULT_TEXT_CONTENT: &str = "New Text";

/// Label used for link buttons created without one.
pub const DEFAULT_LINK_LABEL: &str = "Click Here";

/// Font family applied to new text and link items.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Where every freshly created item is placed.
pub const DEFAULT_POSITION: Position = Position { x: 100.0, y: 100.0 };

/// Size of images added from the file picker.
pub const DEFAULT_IMAGE_SIZE: Size = Size::new(200.0, 200.0);

/// Size of images added from the sticker gallery.
pub const STICKER_SIZE: Size = Size::new(100.0, 100.0);

/// Size of new link buttons.
pub const DEFAULT_LINK_SIZE: Size = Size::new(150.0, 50.0);

/// Smallest size an image can be resized to.
pub const IMAGE_MIN_SIZE: Size = Size::new(50.0, 50.0);

/// Smallest size a link button can be resized to.
pub const LINK_MIN_SIZE: Size = Size::new(100.0, 40.0);

/// Unique identifier for a scene item.
///
/// Backed by a time-ordered UUID so identifiers created later in a session
/// also sort later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Create a new unique item ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an item ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Top-left anchored position in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Pixels from the left edge of the canvas.
    pub x: f32,
    /// Pixels from the top edge of the canvas.
    pub y: f32,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The position moved by a delta.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Width and height in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Floor each axis independently at `min`.
    ///
    /// NaN inputs collapse to the floor.
    #[must_use]
    pub fn clamp_min(self, min: Size) -> Self {
        Self {
            width: self.width.max(min.width),
            height: self.height.max(min.height),
        }
    }
}

/// Text weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

impl FontWeight {
    /// The other weight.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Bold,
            Self::Bold => Self::Normal,
        }
    }

    /// CSS keyword for this weight.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
        }
    }
}

/// Text slant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright text.
    #[default]
    Normal,
    /// Italic text.
    Italic,
}

impl FontStyle {
    /// The other style.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Italic,
            Self::Italic => Self::Normal,
        }
    }

    /// CSS keyword for this style.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
        }
    }
}

/// Inline-editable text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    /// Text content.
    pub content: String,
    /// Text color as a CSS color.
    pub color: String,
    /// Font family name.
    pub font_family: String,
    /// Font weight.
    pub font_weight: FontWeight,
    /// Font style.
    pub font_style: FontStyle,
}

/// A resizable picture or sticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageItem {
    /// Image source: data URI or remote URL.
    pub src: String,
    /// Box the image is contain-fitted into.
    pub size: Size,
}

/// A button that opens a URL in the published calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkItem {
    /// Button label.
    pub content: String,
    /// Target URL.
    pub url: String,
    /// Button size.
    pub size: Size,
    /// Button fill as a CSS color.
    pub background_color: String,
    /// Label color as a CSS color.
    pub color: String,
    /// Label font family.
    pub font_family: String,
}

/// The type of content an item holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ItemKind {
    /// Editable text.
    Text(TextItem),
    /// Image or sticker.
    Image(ImageItem),
    /// Link button.
    Link(LinkItem),
}

impl ItemKind {
    /// Variant name, as used in the serialized discriminant.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Link(_) => "link",
        }
    }

    /// Smallest allowed size, or `None` for items that cannot be resized.
    #[must_use]
    pub const fn min_size(&self) -> Option<Size> {
        match self {
            Self::Text(_) => None,
            Self::Image(_) => Some(IMAGE_MIN_SIZE),
            Self::Link(_) => Some(LINK_MIN_SIZE),
        }
    }

    /// Current size of resizable items.
    #[must_use]
    pub const fn size(&self) -> Option<Size> {
        match self {
            Self::Text(_) => None,
            Self::Image(image) => Some(image.size),
            Self::Link(link) => Some(link.size),
        }
    }

    /// Whether the item shows a resize handle when selected.
    #[must_use]
    pub const fn is_resizable(&self) -> bool {
        self.min_size().is_some()
    }

    /// Set the size, floored at the variant minimum.
    ///
    /// Returns `false` for text items and when the size did not change.
    pub fn set_size(&mut self, size: Size) -> bool {
        let Some(floor) = self.min_size() else {
            return false;
        };
        let clamped = size.clamp_min(floor);
        let slot = match self {
            Self::Text(_) => return false,
            Self::Image(image) => &mut image.size,
            Self::Link(link) => &mut link.size,
        };
        if *slot == clamped {
            return false;
        }
        *slot = clamped;
        true
    }
}

/// An item placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneItem {
    /// Unique identifier.
    pub id: ItemId,
    /// Top-left corner.
    pub position: Position,
    /// Item content.
    pub kind: ItemKind,
}

impl SceneItem {
    /// Create an item at the default position.
    #[must_use]
    pub fn new(kind: ItemKind) -> Self {
        Self {
            id: ItemId::new(),
            position: DEFAULT_POSITION,
            kind,
        }
    }

    /// Set the position.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Set the identifier.
    #[must_use]
    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }

    /// Check the values that end up in markup: colors, fonts, link targets
    /// and image sources.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidInput`] for the first offending value.
    pub fn validate(&self) -> EditorResult<()> {
        match &self.kind {
            ItemKind::Text(text) => {
                require_color(&text.color)?;
                require_font(&text.font_family)
            }
            ItemKind::Image(image) => require_image_src(&image.src),
            ItemKind::Link(link) => {
                require_link_url(&link.url)?;
                require_color(&link.color)?;
                require_color(&link.background_color)?;
                require_font(&link.font_family)
            }
        }
    }

    /// Raise any size below the variant floor up to it.
    pub(crate) fn enforce_min_size(&mut self) {
        if let Some(size) = self.kind.size() {
            self.kind.set_size(size);
        }
    }
}

/// A `Text` item with the default content and style.
#[must_use]
pub fn create_text() -> SceneItem {
    SceneItem::new(ItemKind::Text(TextItem {
        content: DEFAULT_TEXT_CONTENT.to_string(),
        color: "#000000".to_string(),
        font_family: DEFAULT_FONT_FAMILY.to_string(),
        font_weight: FontWeight::Normal,
        font_style: FontStyle::Normal,
    }))
}

/// An `Image` item at the picker default size.
#[must_use]
pub fn create_image(src: impl Into<String>) -> SceneItem {
    image_with_size(src.into(), DEFAULT_IMAGE_SIZE)
}

/// An `Image` item at the smaller sticker size.
#[must_use]
pub fn create_sticker(src: impl Into<String>) -> SceneItem {
    image_with_size(src.into(), STICKER_SIZE)
}

fn image_with_size(src: String, size: Size) -> SceneItem {
    SceneItem::new(ItemKind::Image(ImageItem { src, size }))
}

/// A `Link` button pointing at `url`.
///
/// An empty `label` falls back to [`DEFAULT_LINK_LABEL`].
///
/// # Errors
///
/// Returns [`EditorError::InvalidInput`] if `url` is empty or does not use
/// one of [`crate::LINK_SCHEMES`].
pub fn create_link(url: &str, label: &str) -> EditorResult<SceneItem> {
    let url = url.trim();
    if url.is_empty() {
        return Err(EditorError::InvalidInput("link URL is required".into()));
    }
    require_link_url(url)?;
    let content = if label.is_empty() {
        DEFAULT_LINK_LABEL.to_string()
    } else {
        label.to_string()
    };
    Ok(SceneItem::new(ItemKind::Link(LinkItem {
        content,
        url: url.to_string(),
        size: DEFAULT_LINK_SIZE,
        background_color: "#000000".to_string(),
        color: "#ffffff".to_string(),
        font_family: DEFAULT_FONT_FAMILY.to_string(),
    })))
}

/// Partial update merged into an item by [`crate::SceneStore::update_item`].
///
/// Fields that the target variant does not have are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemPatch {
    /// New position.
    pub position: Option<Position>,
    /// Text or button label.
    pub content: Option<String>,
    /// Text or label color.
    pub color: Option<String>,
    /// Font family for text and links.
    pub font_family: Option<String>,
    /// Text weight.
    pub font_weight: Option<FontWeight>,
    /// Text style.
    pub font_style: Option<FontStyle>,
    /// Image source.
    pub src: Option<String>,
    /// Link target.
    pub url: Option<String>,
    /// Link button fill.
    pub background_color: Option<String>,
    /// Size of images and links, floored at the variant minimum.
    pub size: Option<Size>,
}

impl ItemPatch {
    /// Patch that only replaces the text content.
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Merge the patch into `item`, returning whether anything changed.
    pub fn apply(&self, item: &mut SceneItem) -> bool {
        let mut changed = false;
        if let Some(position) = self.position {
            changed |= replace(&mut item.position, position);
        }
        if let Some(size) = self.size {
            changed |= item.kind.set_size(size);
        }
        match &mut item.kind {
            ItemKind::Text(text) => {
                changed |= replace_opt(&mut text.content, self.content.as_deref());
                changed |= replace_opt(&mut text.color, self.color.as_deref());
                changed |= replace_opt(&mut text.font_family, self.font_family.as_deref());
                if let Some(weight) = self.font_weight {
                    changed |= replace(&mut text.font_weight, weight);
                }
                if let Some(style) = self.font_style {
                    changed |= replace(&mut text.font_style, style);
                }
            }
            ItemKind::Image(image) => {
                changed |= replace_opt(&mut image.src, self.src.as_deref());
            }
            ItemKind::Link(link) => {
                changed |= replace_opt(&mut link.content, self.content.as_deref());
                changed |= replace_opt(&mut link.url, self.url.as_deref());
                changed |= replace_opt(&mut link.color, self.color.as_deref());
                changed |= replace_opt(&mut link.font_family, self.font_family.as_deref());
                changed |= replace_opt(&mut link.background_color, self.background_color.as_deref());
            }
        }
        changed
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn replace_opt(slot: &mut String, value: Option<&str>) -> bool {
    match value {
        Some(v) if slot != v => {
            v.clone_into(slot);
            true
        }
        _ => false,
    }
}

/// Canvas background layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Background {
    /// Solid CSS color.
    Color(String),
    /// Image URL or data URI, cover-fitted.
    Image(String),
}

impl Background {
    /// Background of a fresh or cleared canvas.
    pub const DEFAULT_COLOR: &'static str = "#f8fafc";

    /// Check the color or image source.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidInput`] if the value is not a CSS color
    /// or not an acceptable image source.
    pub fn validate(&self) -> EditorResult<()> {
        match self {
            Self::Color(color) => require_color(color),
            Self::Image(src) => require_image_src(src),
        }
    }

    /// The background value string.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Color(value) | Self::Image(value) => value,
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::Color(Self::DEFAULT_COLOR.to_string())
    }
}
