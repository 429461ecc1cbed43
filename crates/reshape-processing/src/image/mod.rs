//! Image processing module
//!
//! - Resize with aspect preservation or cover crop (resize)
//! - Clockwise rotation by any angle (orientation)
//! - The decode, transform, encode pipeline (transformer)

pub mod orientation;
pub mod resize;
pub mod transformer;

pub use orientation::ImageOrientation;
pub use resize::{ImageResize, ResizeDimensions};
pub use transformer::{EncodeTarget, ImageTransformer, MAX_SOURCE_PIXELS, SUPPORTED_IMAGE_TYPES};
