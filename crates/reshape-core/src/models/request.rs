//! Transform request model
//!
//! Client parameters arrive as a loose JSON object (multipart text fields are strings,
//! JSON bodies may carry numbers). Each request shape has an explicit `from_fields`
//! that coerces every field, checks it against its declared type and bounds, and
//! reports all violations at once as [`AppError::Validation`].

use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::format::OutputFormat;

/// Quality used when the client does not ask for one
pub const DEFAULT_QUALITY: u8 = 80;
const MIN_QUALITY: i64 = 1;
const MAX_QUALITY: i64 = 100;

/// Bounds applied while validating client parameters
#[derive(Debug, Clone, Copy)]
pub struct RequestLimits {
    pub max_dimension: u32,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_dimension: 8192,
        }
    }
}

/// Parse raw parameter text into a JSON object.
pub fn parse_raw(text: &str) -> Result<Map<String, Value>, AppError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::InvalidInput(
            "Transform parameters must be a JSON object".to_string(),
        )),
    }
}

/// Requested output format. Names outside the encode set are kept rather than
/// rejected; the engine handles them through its passthrough branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestedFormat {
    Known(OutputFormat),
    Unrecognized(String),
}

impl RequestedFormat {
    pub fn parse(raw: &str) -> Self {
        match OutputFormat::parse(raw) {
            Some(format) => RequestedFormat::Known(format),
            None => RequestedFormat::Unrecognized(raw.trim().to_lowercase()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RequestedFormat::Known(format) => format.name(),
            RequestedFormat::Unrecognized(name) => name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageTransformRequest {
    pub required_width: Option<u32>,
    pub required_height: Option<u32>,
    pub required_quality: Option<i64>,
    pub required_format: Option<RequestedFormat>,
    pub required_rotation: Option<i32>,
}

impl ImageTransformRequest {
    pub fn from_fields(
        fields: &Map<String, Value>,
        limits: &RequestLimits,
    ) -> Result<Self, AppError> {
        let mut violations = Vec::new();

        let required_width = dimension_field(fields, "requiredWidth", limits, &mut violations);
        let required_height = dimension_field(fields, "requiredHeight", limits, &mut violations);
        let required_quality = integer_field(fields, "requiredQuality", &mut violations);
        let required_format = string_field(fields, "requiredFormat", &mut violations)
            .map(|s| RequestedFormat::parse(&s));
        let required_rotation = integer_field(fields, "requiredRotation", &mut violations)
            .and_then(|deg| match i32::try_from(deg) {
                Ok(deg) => Some(deg),
                Err(_) => {
                    violations.push("requiredRotation is out of range".to_string());
                    None
                }
            });

        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }

        Ok(Self {
            required_width,
            required_height,
            required_quality,
            required_format,
            required_rotation,
        })
    }

    /// Quality handed to the encoder: requested or 80, clamped to 1..=100.
    pub fn effective_quality(&self) -> u8 {
        self.required_quality
            .unwrap_or(DEFAULT_QUALITY as i64)
            .clamp(MIN_QUALITY, MAX_QUALITY) as u8
    }

    /// Clockwise rotation normalised to 0..360, or None when nothing should rotate.
    pub fn effective_rotation(&self) -> Option<u32> {
        let degrees = self.required_rotation?.rem_euclid(360) as u32;
        (degrees != 0).then_some(degrees)
    }

    pub fn wants_resize(&self) -> bool {
        self.required_width.is_some() || self.required_height.is_some()
    }
}

/// PDF compression strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl CompressionLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(CompressionLevel::Low),
            "medium" => Some(CompressionLevel::Medium),
            "high" => Some(CompressionLevel::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompressionLevel::Low => "low",
            CompressionLevel::Medium => "medium",
            CompressionLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfCompressionRequest {
    pub required_quality: Option<i64>,
    pub required_format: Option<String>,
    pub required_compression: Option<CompressionLevel>,
}

impl PdfCompressionRequest {
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, AppError> {
        let mut violations = Vec::new();

        let required_quality = integer_field(fields, "requiredQuality", &mut violations);

        let required_format = string_field(fields, "requiredFormat", &mut violations)
            .map(|s| s.trim().to_lowercase())
            .and_then(|s| {
                if s == "pdf" {
                    Some(s)
                } else {
                    violations.push(
                        "requiredFormat must be one of the following values: pdf".to_string(),
                    );
                    None
                }
            });

        // The web client sends `compressionLevel`; the explicit name wins when both exist.
        let compression_key = if fields.contains_key("requiredCompression") {
            "requiredCompression"
        } else {
            "compressionLevel"
        };
        let required_compression = string_field(fields, compression_key, &mut violations)
            .and_then(|s| match CompressionLevel::parse(&s) {
                Some(level) => Some(level),
                None => {
                    violations.push(format!(
                        "{} must be one of the following values: low, medium, high",
                        compression_key
                    ));
                    None
                }
            });

        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }

        Ok(Self {
            required_quality,
            required_format,
            required_compression,
        })
    }

    pub fn compression_level(&self) -> CompressionLevel {
        self.required_compression.unwrap_or_default()
    }

    /// JPEG quality for re-encoded images, clamped to 1..=100.
    pub fn image_quality(&self, default: u8) -> u8 {
        self.required_quality
            .unwrap_or(default as i64)
            .clamp(MIN_QUALITY, MAX_QUALITY) as u8
    }
}

/// Coerce an optional integer field. Absent and `null` mean "not supplied"; anything
/// that is not an integer (including non-numeric strings) is a violation.
fn integer_field(
    fields: &Map<String, Value>,
    key: &str,
    violations: &mut Vec<String>,
) -> Option<i64> {
    let not_integer = || format!("{} must be an integer number", key);

    match fields.get(key)? {
        Value::Null => None,
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Some(f as i64)
                    }
                    _ => {
                        violations.push(not_integer());
                        None
                    }
                }
            }
        }
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(i) => Some(i),
            Err(_) => {
                violations.push(not_integer());
                None
            }
        },
        _ => {
            violations.push(not_integer());
            None
        }
    }
}

fn dimension_field(
    fields: &Map<String, Value>,
    key: &str,
    limits: &RequestLimits,
    violations: &mut Vec<String>,
) -> Option<u32> {
    let value = integer_field(fields, key, violations)?;
    if value < 1 {
        violations.push(format!("{} must not be less than 1", key));
        return None;
    }
    if value > limits.max_dimension as i64 {
        violations.push(format!(
            "{} must not be greater than {}",
            key, limits.max_dimension
        ));
        return None;
    }
    Some(value as u32)
}

fn string_field(
    fields: &Map<String, Value>,
    key: &str,
    violations: &mut Vec<String>,
) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => {
            violations.push(format!("{} should not be empty", key));
            None
        }
        Value::String(s) => Some(s.clone()),
        _ => {
            violations.push(format!("{} must be a string", key));
            None
        }
    }
}
