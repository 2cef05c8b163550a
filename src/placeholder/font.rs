//! Fonts used to measure and draw placeholder captions.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};

/// Well-known locations of a sans-serif TrueType font.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Edge length of a bitmap glyph before scaling.
const GLYPH_SIZE: u32 = 8;

/// A font that can measure and draw a single line of text.
pub trait CaptionFont: Send + Sync {
    /// Rendered width of `text` in pixels.
    fn text_width(&self, text: &str) -> u32;

    /// Draw `text` with its top-left corner at `(x, y)`. Pixels outside the
    /// canvas are skipped.
    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str);
}

/// A TrueType/OpenType font rasterized at a fixed pixel size.
pub struct ScalableFont {
    font: FontVec,
    scale: PxScale,
}

impl ScalableFont {
    /// Parse font data.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a usable font.
    pub fn from_bytes(data: Vec<u8>, size: f32) -> Result<Self, String> {
        let font = FontVec::try_from_vec(data).map_err(|e| format!("Invalid font data: {e}"))?;
        Ok(Self { font, scale: PxScale::from(size) })
    }

    /// Load a font file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path, size: f32) -> Result<Self, String> {
        let data = std::fs::read(path)
            .map_err(|e| format!("Failed to read font {}: {e}", path.display()))?;
        Self::from_bytes(data, size)
    }
}

impl CaptionFont for ScalableFont {
    fn text_width(&self, text: &str) -> u32 {
        text_size(self.scale, &self.font, text).0
    }

    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }
}

/// Built-in 8x8 bitmap font, each glyph blown up by an integer factor.
///
/// Characters without a glyph are drawn as `?`.
#[derive(Debug, Clone, Copy)]
pub struct BitmapFont {
    scale: u32,
}

impl BitmapFont {
    /// A bitmap font with the given magnification (at least 1).
    #[must_use]
    pub fn new(scale: u32) -> Self {
        Self { scale: scale.max(1) }
    }

    /// The magnification that comes closest to `font_size` pixel glyphs.
    #[must_use]
    pub fn for_size(font_size: u32) -> Self {
        Self::new(font_size / GLYPH_SIZE)
    }

    /// Glyph cell edge in pixels.
    #[must_use]
    pub fn cell(&self) -> u32 {
        GLYPH_SIZE * self.scale
    }

    fn glyph(c: char) -> [u8; 8] {
        BASIC_FONTS.get(c).or_else(|| BASIC_FONTS.get('?')).unwrap_or([0; 8])
    }
}

impl CaptionFont for BitmapFont {
    fn text_width(&self, text: &str) -> u32 {
        let count = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        count.saturating_mul(self.cell())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
        let scale = i64::from(self.scale);
        let cell = i64::from(self.cell());
        let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));

        for (index, c) in text.chars().enumerate() {
            let origin_x = i64::from(x) + i64::try_from(index).unwrap_or(i64::MAX) * cell;
            for (row, bits) in (0_i64..).zip(Self::glyph(c)) {
                for col in 0..8_i64 {
                    // Bit 0 is the leftmost pixel.
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    let px = origin_x + col * scale;
                    let py = i64::from(y) + row * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            let (cx, cy) = (px + dx, py + dy);
                            if (0..width).contains(&cx) && (0..height).contains(&cy) {
                                canvas.put_pixel(cx as u32, cy as u32, color);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Find a caption font for the given pixel size.
///
/// Tries `configured`, then the well-known system locations, then falls back
/// to [`BitmapFont`]. A zero size always yields the bitmap font.
#[must_use]
pub fn load_caption_font(configured: Option<&Path>, font_size: u32) -> Box<dyn CaptionFont> {
    if font_size == 0 {
        return Box::new(BitmapFont::for_size(font_size));
    }

    #[allow(clippy::cast_precision_loss)]
    let size = font_size as f32;

    if let Some(path) = configured {
        match ScalableFont::from_file(path, size) {
            Ok(font) => {
                tracing::debug!("Using caption font {}", path.display());
                return Box::new(font);
            }
            Err(e) => tracing::warn!("Configured caption font unusable: {e}"),
        }
    }

    for candidate in SYSTEM_FONTS.iter().map(Path::new).filter(|p| p.exists()) {
        if let Ok(font) = ScalableFont::from_file(candidate, size) {
            tracing::debug!("Using caption font {}", candidate.display());
            return Box::new(font);
        }
    }

    tracing::debug!("No scalable font found, using built-in bitmap font");
    Box::new(BitmapFont::for_size(font_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_width_scales_with_chars() {
        let font = BitmapFont::new(2);
        assert_eq!(font.text_width("abc"), 48);
        assert_eq!(font.text_width(""), 0);
    }

    #[test]
    fn bitmap_scale_never_zero() {
        assert_eq!(BitmapFont::for_size(3).cell(), 8);
        assert_eq!(BitmapFont::for_size(25).cell(), 24);
    }

    #[test]
    fn bitmap_draw_clips_to_canvas() {
        let mut canvas = RgbImage::new(10, 10);
        let font = BitmapFont::new(1);
        font.draw(&mut canvas, -4, 6, Rgb([255, 255, 255]), "HH");
        let lit = canvas.pixels().filter(|p| p.0 == [255, 255, 255]).count();
        assert!(lit > 0);
    }

    #[test]
    fn bitmap_draws_inside_cell() {
        let mut canvas = RgbImage::new(40, 40);
        let font = BitmapFont::new(2);
        font.draw(&mut canvas, 5, 7, Rgb([255, 255, 255]), "A");
        for (x, y, p) in canvas.enumerate_pixels() {
            if p.0 == [255, 255, 255] {
                assert!((5..21).contains(&x) && (7..23).contains(&y), "stray pixel at {x},{y}");
            }
        }
    }

    #[test]
    fn invalid_font_bytes_rejected() {
        assert!(ScalableFont::from_bytes(b"not a font".to_vec(), 12.0).is_err());
    }

    #[test]
    fn missing_font_falls_back_to_bitmap() {
        let font = load_caption_font(Some(Path::new("/nonexistent/font.ttf")), 0);
        assert_eq!(font.text_width("abc"), 24);
    }

    #[test]
    fn any_loaded_font_measures_text() {
        let font = load_caption_font(Some(Path::new("/nonexistent/font.ttf")), 24);
        assert!(font.text_width("hello") > 0);
        assert!(font.text_width("hello world") > font.text_width("hello"));
    }
}
