//! Checks for user-supplied values that end up inside markup.
//!
//! Link targets, image sources, colors and font names are written into
//! `href`, `src` and `style` attributes. Anything that could change the
//! meaning of those attributes is refused before it reaches a scene.

use url::{ParseError, Url};

use crate::toolbar::is_known_font;
use crate::{EditorError, EditorResult};

/// URL schemes a link button may point at.
pub const LINK_SCHEMES: &[&str] = &["http", "https", "mailto"];

const IMAGE_SCHEMES: &[&str] = &["http", "https"];

const COLOR_FUNCTIONS: &[&str] = &["rgb", "rgba", "hsl", "hsla"];

// Longest named CSS color is "lightgoldenrodyellow".
const MAX_COLOR_NAME: usize = 32;

/// Whether `url` is an absolute URL with a scheme from [`LINK_SCHEMES`].
#[must_use]
pub fn is_safe_link_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|parsed| LINK_SCHEMES.contains(&parsed.scheme()))
}

/// Whether `src` is an image data URI, an http(s) URL or a relative path.
#[must_use]
pub fn is_safe_image_src(src: &str) -> bool {
    match Url::parse(src) {
        Ok(parsed) if parsed.scheme() == "data" => parsed
            .path()
            .get(..6)
            .is_some_and(|media| media.eq_ignore_ascii_case("image/")),
        Ok(parsed) => IMAGE_SCHEMES.contains(&parsed.scheme()),
        Err(ParseError::RelativeUrlWithoutBase) => !src.trim().is_empty(),
        Err(_) => false,
    }
}

/// Whether `value` is a single CSS color: hex, a named keyword, or an
/// `rgb()`/`rgba()`/`hsl()`/`hsla()` call with numeric arguments.
#[must_use]
pub fn is_css_color(value: &str) -> bool {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.bytes().all(|b| b.is_ascii_hexdigit());
    }
    if let Some((name, rest)) = value.split_once('(') {
        let known = COLOR_FUNCTIONS
            .iter()
            .any(|function| name.eq_ignore_ascii_case(function));
        return known
            && rest.strip_suffix(')').is_some_and(|args| {
                args.bytes()
                    .all(|b| b.is_ascii_digit() || b" .,%/-".contains(&b))
            });
    }
    !value.is_empty()
        && value.len() <= MAX_COLOR_NAME
        && value.bytes().all(|b| b.is_ascii_alphabetic())
}

pub(crate) fn require_color(color: &str) -> EditorResult<()> {
    if color.trim().is_empty() {
        return Err(EditorError::InvalidInput("color is required".into()));
    }
    if !is_css_color(color) {
        return Err(EditorError::InvalidInput(format!("not a CSS color: {color}")));
    }
    Ok(())
}

pub(crate) fn require_font(family: &str) -> EditorResult<()> {
    if !is_known_font(family) {
        return Err(EditorError::InvalidInput(format!("unknown font: {family}")));
    }
    Ok(())
}

pub(crate) fn require_link_url(url: &str) -> EditorResult<()> {
    if !is_safe_link_url(url) {
        return Err(EditorError::InvalidInput(format!(
            "link URL must use http, https or mailto: {url}"
        )));
    }
    Ok(())
}

pub(crate) fn require_image_src(src: &str) -> EditorResult<()> {
    if !is_safe_image_src(src) {
        return Err(EditorError::InvalidInput(format!("unsupported image source: {src}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_schemes_are_allowlisted() {
        assert!(is_safe_link_url("https://example.com/door-1"));
        assert!(is_safe_link_url("http://example.com"));
        assert!(is_safe_link_url("mailto:santa@example.com"));

        assert!(!is_safe_link_url("javascript:alert(document.cookie)"));
        assert!(!is_safe_link_url("JavaScript:alert(1)"));
        assert!(!is_safe_link_url("java\tscript:alert(1)"));
        assert!(!is_safe_link_url("data:text/html,<script>alert(1)</script>"));
        assert!(!is_safe_link_url("vbscript:msgbox"));
        assert!(!is_safe_link_url("example.com"));
    }

    #[test]
    fn image_sources() {
        assert!(is_safe_image_src("data:image/png;base64,AAAA"));
        assert!(is_safe_image_src("assets/stickers/star.png"));
        assert!(is_safe_image_src("https://cdn/bg.jpg"));

        assert!(!is_safe_image_src("javascript:alert(1)"));
        assert!(!is_safe_image_src("data:text/html;base64,AAAA"));
        assert!(!is_safe_image_src(""));
    }

    #[test]
    fn colors() {
        for ok in ["#fff", "#ffff", "#0b3d2e", "#0b3d2e80", "red", "Transparent", "rgb(1, 2, 3)", "hsla(120 50% 50% / 0.5)"] {
            assert!(is_css_color(ok), "{ok}");
        }
        for bad in [
            "",
            "#ff",
            "#ggg",
            "red; position: fixed",
            "red;position:fixed;top:0",
            "url(https://evil/x.png)",
            "rgb(1,2,3); left: 0",
            "expression(alert(1))",
        ] {
            assert!(!is_css_color(bad), "{bad}");
        }
    }

    #[test]
    fn require_font_rejects_unknown_family() {
        assert!(require_font("Arial").is_ok());
        assert!(matches!(
            require_font("Arial; color: red"),
            Err(EditorError::InvalidInput(_))
        ));
    }
}
