//! Reshape processing
//!
//! Stateless engines that turn one uploaded file into one output file:
//! - image transformation (resize, rotate, reformat, quality) in [`image`]
//! - PDF compression in [`document`]
//!
//! Engines are synchronous and CPU-bound; callers decide where they run.

pub mod compression;
pub mod document;
pub mod error;
pub mod image;
pub mod traits;
pub mod validator;

pub use document::PdfCompressor;
pub use error::{ImageError, PdfError};
pub use image::ImageTransformer;
pub use traits::{ImageEngine, ImageOutput, PdfEngine, PdfOutput};
pub use validator::{MediaValidator, ValidationError};
