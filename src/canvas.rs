//! RGB drawing surface for chart images
//!
//! A plain pixel buffer with rectangle fills and anti-aliased TrueType text,
//! encoded to PNG. Text needs a system font; callers fall back to unlabelled
//! output when none can be loaded.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use anyhow::Result;

const FONT_PATHS: [&str; 7] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load the first usable sans-serif font from the usual system locations.
pub fn load_system_font() -> Result<FontVec> {
    for path in FONT_PATHS {
        let Ok(data) = std::fs::read(path) else {
            continue;
        };
        // Face 0 covers both single fonts and .ttc collections
        match FontVec::try_from_vec_and_index(data, 0) {
            Ok(font) => {
                log::debug!("Chart font: {}", path);
                return Ok(font);
            }
            Err(e) => log::debug!("Unusable font {}: {}", path, e),
        }
    }
    anyhow::bail!("No system font found. Tried: {}", FONT_PATHS.join(", "))
}

/// Width in pixels of `text` set at `height`
pub fn text_width(font: &FontVec, text: &str, height: f32) -> f32 {
    let scaled = font.as_scaled(PxScale::from(height));
    text.chars().map(|ch| scaled.h_advance(scaled.glyph_id(ch))).sum()
}

/// Row-major RGB image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: [u8; 3]) -> Self {
        let pixels = background.repeat(width * height);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * 3;
        Some([self.pixels[offset], self.pixels[offset + 1], self.pixels[offset + 2]])
    }

    /// Fill a rectangle, clipped to the canvas
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, rgb: [u8; 3]) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for row in y.min(y_end)..y_end {
            for col in x.min(x_end)..x_end {
                let offset = (row * self.width + col) * 3;
                self.pixels[offset..offset + 3].copy_from_slice(&rgb);
            }
        }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`), alpha-blended
    /// over what is already there.
    pub fn draw_text(
        &mut self,
        font: &FontVec,
        text: &str,
        x: f32,
        y: f32,
        height: f32,
        rgb: [u8; 3],
    ) {
        let scale = PxScale::from(height);
        let scaled = font.as_scaled(scale);
        let (width, img_height) = (self.width as i64, self.height as i64);
        let pixels = &mut self.pixels;

        let mut cursor = x;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            let origin = ab_glyph::point(cursor, y + scaled.ascent());
            let glyph = id.with_scale_and_position(scale, origin);
            cursor += scaled.h_advance(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + i64::from(gx);
                let py = bounds.min.y as i64 + i64::from(gy);
                if px < 0 || py < 0 || px >= width || py >= img_height {
                    return;
                }
                let offset = ((py * width + px) * 3) as usize;
                for (channel, fg) in pixels[offset..offset + 3].iter_mut().zip(rgb) {
                    let blended =
                        f32::from(fg) * coverage + f32::from(*channel) * (1.0 - coverage);
                    *channel = blended.round().clamp(0.0, 255.0) as u8;
                }
            });
        }
    }

    /// Draw `text` horizontally centred on `center_x`
    pub fn draw_text_centered(
        &mut self,
        font: &FontVec,
        text: &str,
        center_x: f32,
        y: f32,
        height: f32,
        rgb: [u8; 3],
    ) {
        let x = center_x - text_width(font, text, height) / 2.0;
        self.draw_text(font, text, x, y, height, rgb);
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut output, self.width as u32, self.height as u32);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.pixels)?;
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips() {
        let mut canvas = Canvas::new(4, 3, [255, 255, 255]);
        canvas.fill_rect(2, 1, 10, 10, [1, 2, 3]);
        assert_eq!(canvas.pixel(1, 1), Some([255, 255, 255]));
        assert_eq!(canvas.pixel(3, 2), Some([1, 2, 3]));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_encode_png_dimensions() {
        let png = Canvas::new(7, 5, [0, 0, 0]).encode_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert_eq!(u32::from_be_bytes([png[16], png[17], png[18], png[19]]), 7);
        assert_eq!(u32::from_be_bytes([png[20], png[21], png[22], png[23]]), 5);
    }

    #[test]
    fn test_text_marks_pixels() {
        // Only meaningful where a system font is installed
        let Ok(font) = load_system_font() else {
            return;
        };
        let blank = Canvas::new(60, 20, [255, 255, 255]);
        let mut canvas = blank.clone();
        canvas.draw_text(&font, "AKs", 2.0, 2.0, 14.0, [0, 0, 0]);
        assert_ne!(canvas, blank);
        assert!(text_width(&font, "AKs", 14.0) > text_width(&font, "A", 14.0));

        // Text running off the edge is clipped, not a panic
        let mut edge = blank.clone();
        edge.draw_text(&font, "100%", 50.0, 15.0, 14.0, [0, 0, 0]);
        edge.draw_text(&font, "100%", -20.0, -5.0, 14.0, [0, 0, 0]);
    }
}
