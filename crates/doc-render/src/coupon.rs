//! Donation coupon template.
//!
//! Fixed 600x320 logical layout rendered at [`crate::RASTER_SCALE`]:
//! partner header, prominent coupon code, wrapped description, QR block,
//! and the expiry line in the footer.

use ab_glyph::{FontRef, PxScale};
use image::DynamicImage;
use tracing::debug;

use crate::models::CouponRecord;
use crate::text::{self, INK, MUTED};
use crate::{RASTER_SCALE, Result, qr};

const LOGICAL_WIDTH: u32 = 600;
const LOGICAL_HEIGHT: u32 = 320;
const MARGIN: u32 = 20;
const QR_SLOT: u32 = 120;

/// Render a coupon record onto the fixed-size template bitmap.
pub fn render_coupon(record: &CouponRecord, font: &FontRef<'_>) -> Result<DynamicImage> {
    let s = RASTER_SCALE;
    let width = LOGICAL_WIDTH * s;
    let height = LOGICAL_HEIGHT * s;
    let margin = MARGIN * s;

    let header_scale = PxScale::from((20 * s) as f32);
    let code_scale = PxScale::from((30 * s) as f32);
    let body_scale = PxScale::from((14 * s) as f32);
    let small_scale = PxScale::from((11 * s) as f32);

    let mut canvas = text::blank_canvas(width, height);
    let mut y = margin as i32;

    // Partner header with optional discount tagline.
    text::draw_centered(&mut canvas, font, header_scale, y, &record.partner_name, INK);
    y += text::line_height(font, header_scale) as i32 + 2;
    if let Some(discount) = &record.discount_text {
        text::draw_centered(&mut canvas, font, body_scale, y, discount, MUTED);
        y += text::line_height(font, body_scale) as i32 + 2;
    }
    y += 6;

    text::draw_dashed_rule(&mut canvas, y as u32, 2 * s, 8 * s, 4 * s);
    y += (2 * s + 10 * s) as i32;

    // The code is the centerpiece.
    text::draw_centered(&mut canvas, font, code_scale, y, &record.code, INK);
    y += text::line_height(font, code_scale) as i32 + 8;

    // QR block on the right when the record carries a payload.
    let text_width_limit = if let Some(data) = &record.qr_data {
        let slot = QR_SLOT * s;
        let code_img = qr::render_qr(data, slot)?;
        let x = width - margin - slot + (slot - code_img.width()) / 2;
        image::imageops::overlay(&mut canvas, &code_img.to_rgba8(), i64::from(x), i64::from(y));
        width - margin * 3 - QR_SLOT * s
    } else {
        width - margin * 2
    };

    // Wrapped description beside the QR block.
    if let Some(description) = &record.description {
        for line in text::wrap_to_width(font, body_scale, description, text_width_limit) {
            imageproc::drawing::draw_text_mut(
                &mut canvas,
                INK,
                margin as i32,
                y,
                body_scale,
                font,
                &line,
            );
            y += text::line_height(font, body_scale) as i32 + 2;
        }
    }
    debug!(code = %record.code, body_bottom = y, "Coupon body laid out");

    // Footer: separator + expiry (falls back to a validity note).
    let footer_h = text::line_height(font, small_scale) + 10 * s;
    let rule_y = height - footer_h - 2 * s;
    text::draw_dashed_rule(&mut canvas, rule_y, 2 * s, 8 * s, 4 * s);
    let footer = match &record.expiry {
        Some(expiry) => format!("Valid until {expiry}"),
        None => "Validity as per partner terms".to_string(),
    };
    text::draw_centered(
        &mut canvas,
        font,
        small_scale,
        (rule_y + 2 * s + 4 * s) as i32,
        &footer,
        MUTED,
    );

    Ok(DynamicImage::ImageRgba8(canvas))
}
