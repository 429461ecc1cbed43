//! Transformation results reported to clients through metadata headers.

use serde::Serialize;

/// Describes the transformed image (not the source).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadataResult {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub size_bytes: usize,
}

#[derive(Debug, Serialize)]
struct ImageMetadataHeader {
    width: String,
    height: String,
    format: String,
    size: String,
}

impl ImageMetadataResult {
    /// JSON carried by the `x-file-metadata` header.
    pub fn to_header_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&ImageMetadataHeader {
            width: format!("{} px", self.width),
            height: format!("{} px", self.height),
            format: self.format.clone(),
            size: format!("{} KB", rounded_kilobytes(self.size_bytes)),
        })
    }
}

/// Before/after figures for a compressed PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfMetadataResult {
    pub file_name: String,
    pub original_size: String,
    pub compressed_size: String,
    pub compression_ratio: String,
}

impl PdfMetadataResult {
    pub fn compute(
        file_name: impl Into<String>,
        original_len: usize,
        compressed_len: usize,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            original_size: format_kilobytes(original_len),
            compressed_size: format_kilobytes(compressed_len),
            compression_ratio: compression_ratio(original_len, compressed_len),
        }
    }

    /// JSON carried by the `x-pdf-metadata` header.
    pub fn to_header_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn rounded_kilobytes(len: usize) -> u64 {
    (len as f64 / 1024.0).round() as u64
}

/// `len / 1024` with at most two decimals and trailing zeros trimmed, e.g. "200 KB",
/// "12.5 KB".
pub fn format_kilobytes(len: usize) -> String {
    let formatted = format!("{:.2}", len as f64 / 1024.0);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} KB", trimmed)
}

/// Size reduction as a percentage with exactly two decimals. Negative when the output
/// grew. An empty original yields "0.00".
pub fn compression_ratio(original_len: usize, compressed_len: usize) -> String {
    if original_len == 0 {
        return "0.00".to_string();
    }
    let ratio = (original_len as f64 - compressed_len as f64) / original_len as f64 * 100.0;
    format!("{:.2}", ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_header_json() {
        let metadata = ImageMetadataResult {
            width: 400,
            height: 300,
            format: "png".to_string(),
            size_bytes: 2560,
        };
        let json: serde_json::Value =
            serde_json::from_str(&metadata.to_header_json().unwrap()).unwrap();
        assert_eq!(json["width"], "400 px");
        assert_eq!(json["height"], "300 px");
        assert_eq!(json["format"], "png");
        assert_eq!(json["size"], "3 KB");
    }

    #[test]
    fn test_format_kilobytes() {
        assert_eq!(format_kilobytes(200 * 1024), "200 KB");
        assert_eq!(format_kilobytes(1536), "1.5 KB");
        assert_eq!(format_kilobytes(1000), "0.98 KB");
        assert_eq!(format_kilobytes(0), "0 KB");
    }

    #[test]
    fn test_compression_ratio_formula() {
        assert_eq!(compression_ratio(1000, 250), "75.00");
        assert_eq!(compression_ratio(3, 2), "33.33");
        assert_eq!(compression_ratio(1000, 1000), "0.00");
        assert_eq!(compression_ratio(0, 10), "0.00");
    }

    #[test]
    fn test_compression_ratio_can_be_negative() {
        assert_eq!(compression_ratio(100, 150), "-50.00");
    }

    #[test]
    fn test_pdf_header_uses_camel_case() {
        let metadata = PdfMetadataResult::compute("report", 2048, 1024);
        let json: serde_json::Value =
            serde_json::from_str(&metadata.to_header_json().unwrap()).unwrap();
        assert_eq!(json["fileName"], "report");
        assert_eq!(json["originalSize"], "2 KB");
        assert_eq!(json["compressedSize"], "1 KB");
        assert_eq!(json["compressionRatio"], "50.00");
    }
}
