//! API constants

/// Prefix every route is mounted under
pub const API_PREFIX: &str = "/api/v1";

/// Response header carrying the transformed image description
pub const FILE_METADATA_HEADER: &str = "x-file-metadata";

/// Response header carrying the PDF compression figures
pub const PDF_METADATA_HEADER: &str = "x-pdf-metadata";

/// Filename (without extension) offered for transformed images
pub const PROCESSED_IMAGE_BASENAME: &str = "processed-image";

/// Multipart field holding the uploaded file
pub const FILE_FIELD: &str = "file";

/// Multipart text field that may carry all parameters as one JSON object
pub const DATA_FIELD: &str = "data";

/// Extra room allowed on top of the file cap for multipart framing and text fields
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
