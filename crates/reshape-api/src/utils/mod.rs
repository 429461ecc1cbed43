pub mod upload;

pub use upload::{sanitize_filename, ImageUpload, PdfUpload, UploadForm};
