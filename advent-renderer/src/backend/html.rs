//! HTML markup backend.
//!
//! Emits the canvas as absolutely positioned elements, the same structure the
//! browser editor mounts. All user-provided strings are escaped. Colors and
//! fonts that would not parse as a single CSS value fall back to the item
//! defaults, and links outside the allowed schemes get no `href`.

use std::fmt::Write;

use advent_core::toolbar::is_known_font;
use advent_core::{
    is_css_color, is_safe_image_src, is_safe_link_url, Background, ItemId, ToolbarControl,
    DEFAULT_FONT_FAMILY,
};

use crate::toolbar::ToolbarView;
use crate::view::{Frame, ItemContent, ItemView};
use crate::{BackendType, RenderResult};

use super::RenderBackend;

const FALLBACK_TEXT_COLOR: &str = "#000000";
const FALLBACK_LINK_FILL: &str = "#000000";
const FALLBACK_LINK_COLOR: &str = "#ffffff";

/// Backend that renders frames to an HTML string.
#[derive(Debug, Default)]
pub struct HtmlBackend {
    markup: String,
}

impl HtmlBackend {
    /// Create a backend with empty output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for HtmlBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Html
    }

    fn render(&mut self, frame: &Frame) -> RenderResult<()> {
        self.markup = to_html(frame)?;
        tracing::trace!(
            "Rendered {} nodes to {} bytes of HTML",
            frame.nodes.len(),
            self.markup.len()
        );
        Ok(())
    }

    fn markup(&self) -> Option<&str> {
        Some(&self.markup)
    }
}

/// Render a frame to HTML.
///
/// # Errors
///
/// Returns an error if writing to the output buffer fails.
pub fn to_html(frame: &Frame) -> RenderResult<String> {
    Ok(FrameMarkup::build(frame)?.to_html())
}

/// A frame's markup split at item boundaries.
///
/// Joined by [`FrameMarkup::to_html`] it is the full canvas. The DOM backend
/// compares two of these to patch only the items that changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameMarkup {
    /// Inline style of the canvas element, unescaped.
    pub canvas_style: String,
    /// Item elements in paint order.
    pub nodes: Vec<NodeMarkup>,
    /// Placeholder and toolbar, painted after the items.
    pub overlay: String,
}

/// Markup of one item element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMarkup {
    /// Item the element shows.
    pub id: ItemId,
    /// `class` attribute of the item element.
    pub class: String,
    /// `style` attribute of the item element, unescaped.
    pub style: String,
    /// The text input of text items.
    pub field: Option<FieldMarkup>,
    /// Complete outer HTML of the element.
    pub html: String,
}

/// Attributes of a text item's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMarkup {
    /// Current text.
    pub value: String,
    /// `style` attribute, unescaped.
    pub style: String,
    /// Whether typing is disabled.
    pub read_only: bool,
}

impl FrameMarkup {
    /// Split a frame into canvas, item and overlay markup.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to an output buffer fails.
    pub fn build(frame: &Frame) -> RenderResult<Self> {
        let mut overlay = String::new();
        if let Some(placeholder) = frame.placeholder {
            write!(
                overlay,
                "<div class=\"canvas-placeholder\"><p>{}</p></div>",
                escape(placeholder)
            )?;
        }
        if let Some(toolbar) = &frame.toolbar {
            write_toolbar(&mut overlay, toolbar)?;
        }
        Ok(Self {
            canvas_style: background_style(&frame.background),
            nodes: frame
                .nodes
                .iter()
                .map(node_markup)
                .collect::<RenderResult<_>>()?,
            overlay,
        })
    }

    /// Item ids in paint order.
    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.nodes.iter().map(|node| node.id)
    }

    /// The whole canvas as one string.
    #[must_use]
    pub fn to_html(&self) -> String {
        let nodes_len: usize = self.nodes.iter().map(|node| node.html.len()).sum();
        let mut out =
            String::with_capacity(64 + self.canvas_style.len() + nodes_len + self.overlay.len());
        out.push_str("<div class=\"canvas-area\" style=\"");
        out.push_str(&escape(&self.canvas_style));
        out.push_str("\">");
        for node in &self.nodes {
            out.push_str(&node.html);
        }
        out.push_str(&self.overlay);
        out.push_str("</div>");
        out
    }
}

fn background_style(background: &Background) -> String {
    match background {
        Background::Color(color) => format!(
            "background-color: {};",
            css_color(color, Background::DEFAULT_COLOR)
        ),
        Background::Image(url) => format!(
            "background-color: transparent; background-image: url(\"{}\"); background-size: cover; background-position: center;",
            css_url(url)
        ),
    }
}

fn node_markup(node: &ItemView) -> RenderResult<NodeMarkup> {
    let b = &node.bounds;
    let kind_class = match node.content {
        ItemContent::TextField { .. } => "draggable-text",
        ItemContent::Image { .. } => "draggable-image",
        ItemContent::LinkButton { .. } => "draggable-link",
    };
    let class = if node.selected {
        format!("{kind_class} selected")
    } else {
        kind_class.to_string()
    };
    let mut style = format!("position: absolute; left: {}px; top: {}px;", b.x, b.y);
    if !matches!(node.content, ItemContent::TextField { .. }) {
        write!(style, " width: {}px; height: {}px;", b.width, b.height)?;
    }
    write!(style, " z-index: {}; cursor: move;", node.layer)?;

    let mut html = format!(
        "<div class=\"{class}\" data-item-id=\"{}\" style=\"{}\">",
        node.id,
        escape(&style)
    );
    let field = write_content(&mut html, &node.content)?;

    if node.resize_handle.is_some() {
        html.push_str("<div class=\"resize-handle\"></div>");
    }
    html.push_str("</div>");
    Ok(NodeMarkup {
        id: node.id,
        class,
        style,
        field,
        html,
    })
}

fn write_content(html: &mut String, content: &ItemContent) -> RenderResult<Option<FieldMarkup>> {
    match content {
        ItemContent::TextField {
            content,
            color,
            font_family,
            font_weight,
            font_style,
            editable,
            ..
        } => {
            let input = FieldMarkup {
                value: content.clone(),
                style: format!(
                    "color: {}; font-family: {}; font-weight: {}; font-style: {};",
                    css_color(color, FALLBACK_TEXT_COLOR),
                    css_font(font_family),
                    font_weight.as_css(),
                    font_style.as_css()
                ),
                read_only: !editable,
            };
            let readonly = if input.read_only { " readonly" } else { "" };
            write!(
                html,
                "<input type=\"text\" class=\"text-input\" value=\"{}\" style=\"{}\"{readonly}>",
                escape(&input.value),
                escape(&input.style)
            )?;
            return Ok(Some(input));
        }
        ItemContent::Image { src, .. } => {
            let src = if is_safe_image_src(src) {
                format!(" src=\"{}\"", escape(src))
            } else {
                String::new()
            };
            write!(
                html,
                "<img{src} alt=\"Custom\" style=\"width: 100%; height: 100%; object-fit: contain;\">"
            )?;
        }
        ItemContent::LinkButton {
            label,
            url,
            background_color,
            color,
            font_family,
            navigable,
        } => {
            let href = if is_safe_link_url(url) {
                format!(" href=\"{}\"", escape(url))
            } else {
                String::new()
            };
            let pointer_events = if *navigable { "auto" } else { "none" };
            let link_style = format!(
                "background-color: {}; color: {}; font-family: {}; pointer-events: {pointer_events};",
                css_color(background_color, FALLBACK_LINK_FILL),
                css_color(color, FALLBACK_LINK_COLOR),
                css_font(font_family)
            );
            write!(
                html,
                "<a{href} target=\"_blank\" rel=\"noopener noreferrer\" class=\"link-button\" style=\"{}\">{}</a>",
                escape(&link_style),
                escape(label)
            )?;
        }
    }
    Ok(None)
}

fn css_color<'a>(color: &'a str, fallback: &'a str) -> &'a str {
    if is_css_color(color) {
        color
    } else {
        fallback
    }
}

fn css_font(family: &str) -> &str {
    if is_known_font(family) {
        family
    } else {
        DEFAULT_FONT_FAMILY
    }
}

/// Percent-encode anything that could end a quoted CSS `url()`.
fn css_url(url: &str) -> String {
    const KEEP: &[u8] = b"-._~:/?#[]@!$&*+,;=%";
    let mut encoded = String::with_capacity(url.len());
    for byte in url.bytes() {
        if byte.is_ascii_alphanumeric() || KEEP.contains(&byte) {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

fn write_toolbar(out: &mut String, toolbar: &ToolbarView) -> RenderResult<()> {
    write!(
        out,
        "<div class=\"text-toolbar\" data-toolbar-for=\"{}\" style=\"left: {}px; top: {}px;\">",
        toolbar.item, toolbar.bounds.x, toolbar.bounds.y
    )?;
    for control in &toolbar.controls {
        let name = control.control.name();
        let value = control.value.as_deref().unwrap_or_default();
        match control.control {
            ToolbarControl::FontFamily => {
                write!(out, "<select class=\"font-select\" data-control=\"{name}\">")?;
                for (font, label) in &toolbar.fonts {
                    let selected = if *font == value { " selected" } else { "" };
                    write!(
                        out,
                        "<option value=\"{}\"{selected}>{}</option>",
                        escape(font),
                        escape(label)
                    )?;
                }
                out.push_str("</select>");
            }
            ToolbarControl::Color | ToolbarControl::BackgroundColor => {
                write!(
                    out,
                    "<input type=\"color\" data-control=\"{name}\" title=\"{}\" value=\"{}\">",
                    control.title,
                    escape(value)
                )?;
            }
            _ => {
                let active = if control.active { " active" } else { "" };
                write!(
                    out,
                    "<button class=\"toolbar-btn{active}\" data-control=\"{name}\" title=\"{}\"></button>",
                    control.title
                )?;
            }
        }
    }
    out.push_str("</div>");
    Ok(())
}

/// Escape text for HTML content and double-quoted attributes.
#[must_use]
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
