//! Browser DOM backend.
//!
//! The first frame, and any frame whose item order changed, replaces the
//! mount's contents. Other frames patch item elements in place. Text items
//! only ever get their attributes and value updated, so the input being typed
//! into keeps focus and caret.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement};

use crate::view::Frame;
use crate::{BackendType, RenderError, RenderResult};

use super::html::{FieldMarkup, FrameMarkup, NodeMarkup};
use super::RenderBackend;

/// Backend that writes frames into a live DOM element.
pub struct DomBackend {
    mount: Element,
    painted: Option<FrameMarkup>,
    markup: String,
}

impl DomBackend {
    /// Attach to the element with id `mount_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no window, no document or no such element.
    pub fn mount(mount_id: &str) -> RenderResult<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| RenderError::Surface("no document available".to_string()))?;
        let mount = document
            .get_element_by_id(mount_id)
            .ok_or_else(|| RenderError::Surface(format!("element #{mount_id} not found")))?;
        tracing::debug!("DOM backend mounted on #{mount_id}");
        Ok(Self {
            mount,
            painted: None,
            markup: String::new(),
        })
    }

    fn replace_all(&mut self, next: &FrameMarkup) {
        self.mount.set_inner_html(&next.to_html());
    }

    /// Patch the live tree from `prev` to `next`, which paint the same ids in
    /// the same order.
    fn patch(&self, prev: &FrameMarkup, next: &FrameMarkup) -> RenderResult<()> {
        let canvas = self
            .mount
            .first_element_child()
            .ok_or_else(|| RenderError::Surface("canvas element missing".to_string()))?;
        if prev.canvas_style != next.canvas_style {
            set_attribute(&canvas, "style", &next.canvas_style)?;
        }
        for (old, new) in prev.nodes.iter().zip(&next.nodes) {
            if old != new {
                let element = find(&canvas, &format!("[data-item-id=\"{}\"]", new.id))?;
                patch_node(&element, old, new)?;
            }
        }
        if prev.overlay != next.overlay {
            for selector in [".canvas-placeholder", ".text-toolbar"] {
                if let Some(stale) = canvas.query_selector(selector).map_err(dom_error)? {
                    stale.remove();
                }
            }
            canvas
                .insert_adjacent_html("beforeend", &next.overlay)
                .map_err(dom_error)?;
        }
        Ok(())
    }
}

impl RenderBackend for DomBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Dom
    }

    fn render(&mut self, frame: &Frame) -> RenderResult<()> {
        let next = FrameMarkup::build(frame)?;
        match self.painted.take() {
            Some(prev) if prev == next => {
                self.painted = Some(prev);
                return Ok(());
            }
            Some(prev) if prev.ids().eq(next.ids()) => {
                if let Err(e) = self.patch(&prev, &next) {
                    tracing::warn!("DOM patch failed, repainting canvas: {e}");
                    self.replace_all(&next);
                }
            }
            _ => self.replace_all(&next),
        }
        self.markup = next.to_html();
        self.painted = Some(next);
        Ok(())
    }

    fn markup(&self) -> Option<&str> {
        Some(&self.markup)
    }
}

fn patch_node(element: &Element, old: &NodeMarkup, new: &NodeMarkup) -> RenderResult<()> {
    let Some(field) = &new.field else {
        element.set_outer_html(&new.html);
        return Ok(());
    };
    if old.class != new.class {
        set_attribute(element, "class", &new.class)?;
    }
    if old.style != new.style {
        set_attribute(element, "style", &new.style)?;
    }
    let input = find(element, "input")?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| RenderError::Surface("text item without an input".to_string()))?;
    patch_field(&input, field)
}

fn patch_field(input: &HtmlInputElement, field: &FieldMarkup) -> RenderResult<()> {
    set_attribute(input, "style", &field.style)?;
    // Typing already put this value in the input; writing it back would move
    // the caret to the end.
    if input.value() != field.value {
        input.set_value(&field.value);
    }
    input.set_read_only(field.read_only);
    Ok(())
}

fn find(root: &Element, selector: &str) -> RenderResult<Element> {
    root.query_selector(selector)
        .map_err(dom_error)?
        .ok_or_else(|| RenderError::Surface(format!("no element matches {selector}")))
}

fn set_attribute(element: &Element, name: &str, value: &str) -> RenderResult<()> {
    element.set_attribute(name, value).map_err(dom_error)
}

#[allow(clippy::needless_pass_by_value)]
fn dom_error(e: wasm_bindgen::JsValue) -> RenderError {
    RenderError::Surface(format!("{e:?}"))
}
