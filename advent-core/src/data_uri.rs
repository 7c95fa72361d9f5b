//! Data URIs for uploaded images.
//!
//! Uploaded files are embedded straight into the scene as
//! `data:<mime>;base64,<payload>` strings so the scene document stays
//! self-contained.

use base64::Engine;

use crate::{EditorError, EditorResult};

/// Image formats accepted from the file picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG.
    Png,
    /// JPEG.
    Jpeg,
    /// GIF.
    Gif,
    /// WebP.
    WebP,
    /// SVG.
    Svg,
    /// Anything else.
    Unknown,
}

impl ImageFormat {
    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime.to_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/gif" => Self::Gif,
            "image/webp" => Self::WebP,
            "image/svg+xml" => Self::Svg,
            _ => Self::Unknown,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }
        if data.starts_with(b"GIF8") {
            return Self::Gif;
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }
        let head = &data[..data.len().min(256)];
        if String::from_utf8_lossy(head).contains("<svg") {
            return Self::Svg;
        }
        Self::Unknown
    }

    /// Canonical MIME type, `None` for unknown formats.
    #[must_use]
    pub const fn mime(self) -> Option<&'static str> {
        match self {
            Self::Png => Some("image/png"),
            Self::Jpeg => Some("image/jpeg"),
            Self::Gif => Some("image/gif"),
            Self::WebP => Some("image/webp"),
            Self::Svg => Some("image/svg+xml"),
            Self::Unknown => None,
        }
    }
}

/// Encode image bytes as a base64 data URI.
///
/// The declared MIME type wins when it names a known image format; otherwise
/// the format is sniffed from the bytes.
///
/// # Errors
///
/// Returns [`EditorError::UploadFailed`] if the payload is empty or is not a
/// recognizable image.
pub fn encode_image(bytes: &[u8], declared_mime: Option<&str>) -> EditorResult<String> {
    if bytes.is_empty() {
        return Err(EditorError::UploadFailed("file is empty".into()));
    }
    let declared = declared_mime.map_or(ImageFormat::Unknown, ImageFormat::from_mime);
    let format = match declared {
        ImageFormat::Unknown => ImageFormat::from_magic_bytes(bytes),
        known => known,
    };
    let mime = format
        .mime()
        .ok_or_else(|| EditorError::UploadFailed("file is not a supported image".into()))?;
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{mime};base64,{payload}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_1X1: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    fn png_bytes() -> Vec<u8> {
        base64::engine::general_purpose::STANDARD
            .decode(PNG_1X1)
            .expect("fixture")
    }

    #[test]
    fn format_detection_from_magic_bytes() {
        assert_eq!(ImageFormat::from_magic_bytes(&png_bytes()), ImageFormat::Png);
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            ImageFormat::Jpeg
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(b"RIFF\x00\x00\x00\x00WEBP"),
            ImageFormat::WebP
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(b"<?xml version=\"1.0\"?><svg></svg>"),
            ImageFormat::Svg
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"hello"), ImageFormat::Unknown);
    }

    #[test]
    fn format_detection_from_mime() {
        assert_eq!(ImageFormat::from_mime("IMAGE/JPEG"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_mime("image/svg+xml"), ImageFormat::Svg);
        assert_eq!(ImageFormat::from_mime("text/plain"), ImageFormat::Unknown);
    }

    #[test]
    fn encode_sniffs_when_mime_missing() {
        let uri = encode_image(&png_bytes(), None).expect("encode");
        assert_eq!(uri, format!("data:image/png;base64,{PNG_1X1}"));
    }

    #[test]
    fn encode_rejects_non_images() {
        assert!(matches!(
            encode_image(b"plain text", Some("text/plain")),
            Err(EditorError::UploadFailed(_))
        ));
        assert!(matches!(
            encode_image(&[], Some("image/png")),
            Err(EditorError::UploadFailed(_))
        ));
    }
}
