//! Output formats and the fixed format lookup tables used for response framing.

use serde::Serialize;

/// Encodable image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Parse a client-supplied format name. `jpg` is accepted for jpeg.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::WebP),
            _ => None,
        }
    }

    /// Canonical lowercase name, as reported in metadata headers
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        mime_for_format(self.name())
    }

    pub fn extension(self) -> &'static str {
        extension_for_format(self.name())
    }
}

const FORMAT_MIME_TYPES: &[(&str, &str)] = &[
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
];

const FORMAT_EXTENSIONS: &[(&str, &str)] = &[("jpeg", "jpg"), ("png", "png"), ("webp", "webp")];

pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";
pub const FALLBACK_EXTENSION: &str = "bin";

/// Content-Type for a metadata format name; unknown names map to octet-stream.
pub fn mime_for_format(format: &str) -> &'static str {
    FORMAT_MIME_TYPES
        .iter()
        .find(|(name, _)| *name == format)
        .map(|(_, mime)| *mime)
        .unwrap_or(FALLBACK_MIME_TYPE)
}

/// File extension for a metadata format name; unknown names map to `bin`.
pub fn extension_for_format(format: &str) -> &'static str {
    FORMAT_EXTENSIONS
        .iter()
        .find(|(name, _)| *name == format)
        .map(|(_, ext)| *ext)
        .unwrap_or(FALLBACK_EXTENSION)
}
