use image::{imageops, DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

/// Image rotation
pub struct ImageOrientation;

impl ImageOrientation {
    /// Rotate clockwise by `degrees` (expected in 0..360). Quarter turns are lossless;
    /// any other angle grows the canvas to the rotated bounding box and fills the
    /// uncovered background with transparent pixels.
    pub fn rotate(img: DynamicImage, degrees: u32) -> DynamicImage {
        match degrees % 360 {
            0 => img,
            90 => img.rotate90(),
            180 => img.rotate180(),
            270 => img.rotate270(),
            other => Self::rotate_arbitrary(&img, other),
        }
    }

    /// Dimensions `rotate` produces for a `width x height` source.
    pub fn output_dimensions(width: u32, height: u32, degrees: u32) -> (u32, u32) {
        match degrees % 360 {
            0 | 180 => (width, height),
            90 | 270 => (height, width),
            other => Self::rotated_bounds(width, height, (other as f32).to_radians()),
        }
    }

    fn rotate_arbitrary(img: &DynamicImage, degrees: u32) -> DynamicImage {
        tracing::debug!(degrees = degrees, "Rotating image about centre");

        // imageproc rotates clockwise for positive theta in image coordinates
        let theta = (degrees as f32).to_radians();
        let source = img.to_rgba8();
        let (width, height) = source.dimensions();
        let (canvas_width, canvas_height) = Self::rotated_bounds(width, height, theta);

        let mut canvas = RgbaImage::from_pixel(canvas_width, canvas_height, Rgba([0, 0, 0, 0]));
        imageops::replace(
            &mut canvas,
            &source,
            ((canvas_width - width) / 2) as i64,
            ((canvas_height - height) / 2) as i64,
        );

        let rotated = rotate_about_center(
            &canvas,
            theta,
            Interpolation::Bilinear,
            Rgba([0, 0, 0, 0]),
        );
        DynamicImage::ImageRgba8(rotated)
    }

    /// Bounding box of a `width x height` rectangle rotated by `theta`, never smaller
    /// than the source.
    pub fn rotated_bounds(width: u32, height: u32, theta: f32) -> (u32, u32) {
        let (sin, cos) = theta.sin_cos();
        let (sin, cos) = (sin.abs() as f64, cos.abs() as f64);
        let (w, h) = (width as f64, height as f64);

        // Trim float noise so exact fits do not gain a pixel
        let fit = |v: f64| ((v - 1e-6).ceil().max(1.0)) as u32;
        let bound_width = fit(w * cos + h * sin).max(width);
        let bound_height = fit(w * sin + h * cos).max(height);
        (bound_width, bound_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbaImage};

    fn sample() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 20, Rgba([255, 0, 0, 255])))
    }

    #[test]
    fn test_quarter_turns_swap_dimensions() {
        assert_eq!(ImageOrientation::rotate(sample(), 90).dimensions(), (20, 40));
        assert_eq!(ImageOrientation::rotate(sample(), 180).dimensions(), (40, 20));
        assert_eq!(ImageOrientation::rotate(sample(), 270).dimensions(), (20, 40));
        assert_eq!(ImageOrientation::rotate(sample(), 0).dimensions(), (40, 20));
    }

    #[test]
    fn test_quarter_turn_moves_pixels_clockwise() {
        let mut buf = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        buf.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        let rotated = ImageOrientation::rotate(DynamicImage::ImageRgba8(buf), 90).to_rgba8();
        assert_eq!(rotated.dimensions(), (1, 2));
        assert_eq!(rotated.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_arbitrary_angle_grows_canvas_and_clears_corners() {
        let rotated = ImageOrientation::rotate(sample(), 45);
        assert_eq!(rotated.dimensions(), (43, 43));
        let rgba = rotated.to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0)[3], 0);
        assert_eq!(rgba.get_pixel(42, 42)[3], 0);
        assert_eq!(rgba.get_pixel(21, 21), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_arbitrary_angle_keeps_whole_image() {
        // A 40x20 strip at 45 degrees spans about 42 rows; clipping would cap it at 20
        let rgba = ImageOrientation::rotate(sample(), 45).to_rgba8();
        let opaque_rows: Vec<u32> = rgba
            .enumerate_pixels()
            .filter(|(_, _, p)| p[3] == 255)
            .map(|(_, y, _)| y)
            .collect();
        let top = opaque_rows.iter().min().copied().unwrap();
        let bottom = opaque_rows.iter().max().copied().unwrap();
        assert!(bottom - top > 30, "rows {}..={}", top, bottom);
    }

    #[test]
    fn test_output_dimensions_match_rotation() {
        for degrees in [0, 30, 90, 135, 180, 270, 300] {
            let rotated = ImageOrientation::rotate(sample(), degrees);
            assert_eq!(
                ImageOrientation::output_dimensions(40, 20, degrees),
                rotated.dimensions(),
                "{} degrees",
                degrees
            );
        }
    }

    #[test]
    fn test_rotated_bounds() {
        let quarter = std::f32::consts::FRAC_PI_4;
        assert_eq!(ImageOrientation::rotated_bounds(40, 20, quarter), (43, 43));
        assert_eq!(ImageOrientation::rotated_bounds(40, 20, 0.0), (40, 20));
        assert_eq!(ImageOrientation::rotated_bounds(1, 1, quarter), (2, 2));
    }
}
