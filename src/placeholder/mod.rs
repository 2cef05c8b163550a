//! Local placeholder renderer: a vertical gradient with the prompt drawn on top.
//!
//! Nothing here touches the network. For a given font the output is a pure
//! function of `(prompt, width, height)`.

pub mod font;

pub use font::{load_caption_font, CaptionFont};

use std::path::Path;

use image::{Rgb, RgbImage};

/// Constant blue channel of the gradient.
const GRADIENT_BLUE: u8 = 150;
/// Horizontal space kept free around a caption line, summed over both sides.
const CAPTION_MARGIN: i64 = 40;
/// Extra spacing between caption lines.
const LINE_GAP: u32 = 10;
/// Offset of the drop shadow in both axes.
const SHADOW_OFFSET: i32 = 2;

const SHADOW: Rgb<u8> = Rgb([0, 0, 0]);
const TEXT: Rgb<u8> = Rgb([255, 255, 255]);

/// A caption line and where it goes on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    /// The words on this line.
    pub text: String,
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Measured width in pixels.
    pub width: u32,
}

/// Placement of every caption line.
#[derive(Debug, Clone)]
pub struct CaptionLayout {
    /// Lines from top to bottom.
    pub lines: Vec<PlacedLine>,
    /// Distance between consecutive line tops.
    pub line_height: u32,
    /// Top edge of the first line.
    pub top: i32,
}

impl CaptionLayout {
    /// Height of the whole text block.
    #[must_use]
    pub fn block_height(&self) -> u32 {
        u32::try_from(self.lines.len()).unwrap_or(u32::MAX).saturating_mul(self.line_height)
    }
}

/// Caption font size for an image of the given dimensions.
#[must_use]
pub fn font_size_for(width: u32, height: u32) -> u32 {
    width.min(height) / 20
}

/// Render a placeholder using the best available caption font, trying
/// `font_path` first.
#[must_use]
pub fn render(prompt: &str, width: u32, height: u32, font_path: Option<&Path>) -> RgbImage {
    let font = load_caption_font(font_path, font_size_for(width, height));
    render_with(prompt, width, height, font.as_ref())
}

/// Render a placeholder with a specific caption font.
#[must_use]
pub fn render_with(prompt: &str, width: u32, height: u32, font: &dyn CaptionFont) -> RgbImage {
    let mut canvas = gradient(width, height);
    let layout = layout_caption(prompt, width, height, font);
    tracing::debug!(
        "Caption: {} line(s), {}px block at y={}",
        layout.lines.len(),
        layout.block_height(),
        layout.top
    );
    for line in layout.lines {
        tracing::trace!("{:?} at ({}, {}), {}px wide", line.text, line.x, line.y, line.width);
        font.draw(&mut canvas, line.x + SHADOW_OFFSET, line.y + SHADOW_OFFSET, SHADOW, &line.text);
        font.draw(&mut canvas, line.x, line.y, TEXT, &line.text);
    }
    canvas
}

/// The gradient background alone.
#[must_use]
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |_, y| gradient_color(y, height))
}

/// Colour of row `y`. Every pixel in a row shares it.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn gradient_color(y: u32, height: u32) -> Rgb<u8> {
    let t = f64::from(y) / f64::from(height);
    Rgb([(255.0 * t) as u8, (255.0 * (1.0 - t)) as u8, GRADIENT_BLUE])
}

/// Greedy word wrap.
///
/// A line grows while its measured width stays strictly below
/// `width - 40`. A word that is too wide on its own keeps a line to itself.
#[must_use]
pub fn wrap_lines(prompt: &str, width: u32, font: &dyn CaptionFont) -> Vec<String> {
    let limit = i64::from(width) - CAPTION_MARGIN;
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in prompt.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {word}", current.join(" "))
        };
        if i64::from(font.text_width(&candidate)) < limit {
            current.push(word);
        } else if current.is_empty() {
            lines.push(word.to_string());
        } else {
            lines.push(current.join(" "));
            current = vec![word];
        }
    }

    if !current.is_empty() {
        lines.push(current.join(" "));
    }
    lines
}

/// Wrap the prompt and centre the resulting block on the canvas.
#[must_use]
pub fn layout_caption(
    prompt: &str,
    width: u32,
    height: u32,
    font: &dyn CaptionFont,
) -> CaptionLayout {
    let line_height = font_size_for(width, height) + LINE_GAP;
    let wrapped = wrap_lines(prompt, width, font);

    let count = i64::try_from(wrapped.len()).unwrap_or(i64::MAX);
    let top = (i64::from(height) - count * i64::from(line_height)).div_euclid(2);

    let lines = (0_i64..)
        .zip(wrapped)
        .map(|(index, text)| {
            let line_width = font.text_width(&text);
            let x = (i64::from(width) - i64::from(line_width)).div_euclid(2);
            let y = top + index * i64::from(line_height);
            PlacedLine { text, x: saturate(x), y: saturate(y), width: line_width }
        })
        .collect();

    CaptionLayout { lines, line_height, top: saturate(top) }
}

fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}
