use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Requested output dimensions; either side may be left to the aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ResizeDimensions {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Option<Self> {
        if width.is_none() && height.is_none() {
            return None;
        }
        Some(Self { width, height })
    }
}

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Target dimensions for a resize. A single side derives the other from the source
    /// aspect ratio, rounded and at least 1.
    pub fn calculate_dimensions(
        orig_width: u32,
        orig_height: u32,
        dimensions: ResizeDimensions,
    ) -> (u32, u32) {
        match (dimensions.width, dimensions.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => {
                let aspect_ratio = orig_height as f64 / orig_width as f64;
                let h = (w as f64 * aspect_ratio).round() as u32;
                (w, h.max(1))
            }
            (None, Some(h)) => {
                let aspect_ratio = orig_width as f64 / orig_height as f64;
                let w = (h as f64 * aspect_ratio).round() as u32;
                (w.max(1), h)
            }
            (None, None) => (orig_width, orig_height),
        }
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Resize to the requested dimensions. With both sides given the image is scaled to
    /// cover the box and centre-cropped, so the output is exactly `width x height`.
    pub fn resize(img: &DynamicImage, dimensions: ResizeDimensions) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = Self::calculate_dimensions(orig_width, orig_height, dimensions);
        let filter = Self::select_filter(orig_width, orig_height, width, height);

        tracing::debug!(
            from_width = orig_width,
            from_height = orig_height,
            to_width = width,
            to_height = height,
            "Resizing image"
        );

        match (dimensions.width, dimensions.height) {
            (Some(_), Some(_)) => img.resize_to_fill(width, height, filter),
            _ => img.resize_exact(width, height, filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_calculate_dimensions() {
        let width_only = ResizeDimensions::new(Some(400), None).unwrap();
        assert_eq!(ImageResize::calculate_dimensions(800, 600, width_only), (400, 300));

        let height_only = ResizeDimensions::new(None, Some(100)).unwrap();
        assert_eq!(ImageResize::calculate_dimensions(800, 600, height_only), (133, 100));

        let both = ResizeDimensions::new(Some(50), Some(70)).unwrap();
        assert_eq!(ImageResize::calculate_dimensions(800, 600, both), (50, 70));
    }

    #[test]
    fn test_derived_side_is_at_least_one() {
        let dims = ResizeDimensions::new(Some(1), None).unwrap();
        assert_eq!(ImageResize::calculate_dimensions(1000, 10, dims), (1, 1));
    }

    #[test]
    fn test_no_dimensions() {
        assert!(ResizeDimensions::new(None, None).is_none());
    }

    #[test]
    fn test_resize_cover_is_exact() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(80, 60, Rgba([1, 2, 3, 255])));

        let covered = ImageResize::resize(&img, ResizeDimensions::new(Some(30), Some(30)).unwrap());
        assert_eq!(covered.dimensions(), (30, 30));

        let scaled = ImageResize::resize(&img, ResizeDimensions::new(Some(40), None).unwrap());
        assert_eq!(scaled.dimensions(), (40, 30));
    }

    #[test]
    fn test_select_filter() {
        assert_eq!(ImageResize::select_filter(1000, 1000, 100, 100), FilterType::Triangle);
        assert_eq!(ImageResize::select_filter(1000, 1000, 600, 600), FilterType::CatmullRom);
        assert_eq!(ImageResize::select_filter(100, 100, 200, 200), FilterType::Lanczos3);
    }
}
