use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::error::LapseError;

/// RGBA drawing surface backing every generated frame.
///
/// Loaded frames and freshly created canvases share the same primitives, so
/// title frames, overlays, and thumbnails all go through one code path.
#[derive(Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, fill: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, fill),
        }
    }

    pub fn load(path: &Path) -> Result<Self, LapseError> {
        let image = image::open(path)
            .map_err(|source| LapseError::SourceRead {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        Ok(Self { image })
    }

    pub fn save(&self, path: &Path) -> Result<(), LapseError> {
        self.image.save(path).map_err(|source| LapseError::FrameWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x < self.width() && y < self.height() {
            Some(*self.image.get_pixel(x, y))
        } else {
            None
        }
    }

    /// Alpha-blend one pixel onto the canvas. Out-of-bounds writes are
    /// silently dropped so callers can draw with negative offsets.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.width() || y >= self.height() {
            return;
        }

        let alpha = color[3] as u16;
        if alpha == 0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x, y);
        if alpha == 255 {
            *dst = color;
            return;
        }

        // Straight-alpha source-over.
        let inv = 255 - alpha;
        for c in 0..3 {
            dst[c] = (mul_div255(color[c] as u16, alpha) + mul_div255(dst[c] as u16, inv))
                .min(255) as u8;
        }
        dst[3] = (alpha + mul_div255(dst[3] as u16, inv)).min(255) as u8;
    }

    /// Fill a rectangle, blending if the color carries alpha.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
        for dy in 0..height as i64 {
            for dx in 0..width as i64 {
                self.blend_pixel(x + dx, y + dy, color);
            }
        }
    }

    /// Draw a 1px rectangle outline.
    pub fn stroke_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
        if width == 0 || height == 0 {
            return;
        }
        let (w, h) = (width as i64, height as i64);
        for dx in 0..w {
            self.blend_pixel(x + dx, y, color);
            self.blend_pixel(x + dx, y + h - 1, color);
        }
        for dy in 0..h {
            self.blend_pixel(x, y + dy, color);
            self.blend_pixel(x + w - 1, y + dy, color);
        }
    }

    /// Blend an entire overlay image over this canvas with the given weight.
    /// `ratio` = 1.0 shows only the overlay, 0.0 leaves the canvas untouched;
    /// the overlay's own alpha scales the weight per pixel.
    pub fn blend_over(&mut self, overlay: &Canvas, ratio: f32) {
        let ratio = ratio.clamp(0.0, 1.0);
        if ratio == 0.0 {
            return;
        }
        let width = self.width().min(overlay.width());
        let height = self.height().min(overlay.height());

        for y in 0..height {
            for x in 0..width {
                let src = overlay.image.get_pixel(x, y);
                let weight = ((ratio * src[3] as f32).round() as u16).min(255);
                if weight == 0 {
                    continue;
                }
                let inv = 255 - weight;
                let dst = self.image.get_pixel_mut(x, y);
                for c in 0..3 {
                    dst[c] = (mul_div255(src[c] as u16, weight) + mul_div255(dst[c] as u16, inv))
                        .min(255) as u8;
                }
                dst[3] = dst[3].max(src[3]);
            }
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u16 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_over_full_ratio_replaces_pixels() {
        let mut base = Canvas::new(4, 4, Rgba([10, 20, 30, 255]));
        let overlay = Canvas::new(4, 4, Rgba([200, 100, 50, 255]));
        base.blend_over(&overlay, 1.0);
        assert_eq!(base.pixel(0, 0), Some(Rgba([200, 100, 50, 255])));
    }

    #[test]
    fn blend_over_zero_ratio_is_a_no_op() {
        let mut base = Canvas::new(4, 4, Rgba([10, 20, 30, 255]));
        let overlay = Canvas::new(4, 4, Rgba([200, 100, 50, 255]));
        base.blend_over(&overlay, 0.0);
        assert_eq!(base.pixel(0, 0), Some(Rgba([10, 20, 30, 255])));
    }

    #[test]
    fn blend_over_half_ratio_mixes_channels() {
        let mut base = Canvas::new(1, 1, Rgba([0, 0, 0, 255]));
        let overlay = Canvas::new(1, 1, Rgba([255, 0, 0, 255]));
        base.blend_over(&overlay, 0.5);
        let px = base.pixel(0, 0).unwrap();
        // weight = round(0.5 * 255) = 128
        assert_eq!(px[0], 128);
        assert_eq!(px[1], 0);
    }

    #[test]
    fn fill_rect_clips_negative_origin() {
        let mut canvas = Canvas::new(4, 4, Rgba([0, 0, 0, 255]));
        canvas.fill_rect(-2, -2, 4, 4, Rgba([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(0, 0), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(canvas.pixel(2, 2), Some(Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn semi_opaque_fill_darkens_instead_of_replacing() {
        let mut canvas = Canvas::new(2, 2, Rgba([255, 255, 255, 255]));
        canvas.fill_rect(0, 0, 2, 2, Rgba([0, 0, 0, 204]));
        let px = canvas.pixel(0, 0).unwrap();
        assert!(px[0] < 60, "expected a strongly darkened pixel, got {}", px[0]);
        assert_eq!(px[3], 255);
    }
}
