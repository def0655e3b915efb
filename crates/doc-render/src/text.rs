//! Text layout primitives for document templates.
//!
//! Kerning-aware measurement, width-constrained wrapping, centered drawing,
//! and the dashed rules used as section separators.

use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

pub const INK: Rgba<u8> = Rgba([20, 20, 20, 255]);
pub const MUTED: Rgba<u8> = Rgba([110, 110, 110, 255]);
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Opaque white canvas; the fixed background avoids transparency artifacts
/// in the exported PDF.
pub fn blank_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width.max(1), height.max(1), PAPER)
}

/// Pixel width of `text` at the given scale, including kerning.
pub fn text_width(font: &FontRef<'_>, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = prev {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }

    width.ceil() as u32
}

/// Line height (ascent + descent + gap) for the given scale.
pub fn line_height(font: &FontRef<'_>, scale: PxScale) -> u32 {
    let scaled = font.as_scaled(scale);
    (scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil() as u32
}

/// Draw `text` horizontally centered at `y`.
pub fn draw_centered(
    img: &mut RgbaImage,
    font: &FontRef<'_>,
    scale: PxScale,
    y: i32,
    text: &str,
    color: Rgba<u8>,
) {
    let width = text_width(font, scale, text) as i32;
    let x = ((img.width() as i32) - width).max(0) / 2;
    draw_text_mut(img, color, x, y, scale, font, text);
}

/// Wrap `text` into lines no wider than `max_width` pixels.
///
/// Words that alone exceed the width are force-broken character by
/// character so nothing overflows the template.
pub fn wrap_to_width(
    font: &FontRef<'_>,
    scale: PxScale,
    text: &str,
    max_width: u32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0u32;

    for word in text.split_inclusive(|c: char| c.is_whitespace()) {
        let word_width = text_width(font, scale, word);

        if line_width + word_width > max_width && !line.is_empty() {
            lines.push(line.trim_end().to_string());
            line.clear();
            line_width = 0;
        }

        if word_width > max_width && line.is_empty() {
            for ch in word.chars() {
                let ch_width = text_width(font, scale, &ch.to_string());
                if line_width + ch_width > max_width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(ch);
                line_width += ch_width;
            }
            continue;
        }

        line.push_str(word);
        line_width += word_width;
    }

    if !line.is_empty() {
        lines.push(line.trim_end().to_string());
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Draw a `label:  value` row and return the y of the next row.
pub fn draw_field_row(
    img: &mut RgbaImage,
    font: &FontRef<'_>,
    scale: PxScale,
    x: i32,
    y: i32,
    label: &str,
    value: &str,
) -> i32 {
    let label_text = format!("{label}: ");
    draw_text_mut(img, MUTED, x, y, scale, font, &label_text);
    let offset = text_width(font, scale, &label_text) as i32;
    draw_text_mut(img, INK, x + offset, y, scale, font, value);
    y + line_height(font, scale) as i32 + 4
}

/// Draw a horizontal dashed rule across the full canvas width.
pub fn draw_dashed_rule(img: &mut RgbaImage, y: u32, thickness: u32, dash: u32, gap: u32) {
    let width = img.width();
    let mut x = 0u32;
    let mut pen_down = true;

    while x < width {
        let run = if pen_down { dash } else { gap };
        if pen_down {
            for dx in 0..run.min(width - x) {
                for dy in 0..thickness {
                    if y + dy < img.height() {
                        img.put_pixel(x + dx, y + dy, INK);
                    }
                }
            }
        }
        x += run;
        pen_down = !pen_down;
    }
}
