//! Event ticket template.
//!
//! Fixed 640x360 logical layout rendered at [`crate::RASTER_SCALE`]:
//! centered event header, dashed separators, detail rows on the left,
//! QR block on the right, issue timestamp in the footer.

use ab_glyph::{FontRef, PxScale};
use image::DynamicImage;
use tracing::debug;

use crate::models::TicketRecord;
use crate::text::{self, INK, MUTED};
use crate::{RASTER_SCALE, Result, qr};

const LOGICAL_WIDTH: u32 = 640;
const LOGICAL_HEIGHT: u32 = 360;
const MARGIN: u32 = 20;
const QR_SLOT: u32 = 150;

/// Render a ticket record onto the fixed-size template bitmap.
pub fn render_ticket(record: &TicketRecord, font: &FontRef<'_>) -> Result<DynamicImage> {
    let s = RASTER_SCALE;
    let width = LOGICAL_WIDTH * s;
    let height = LOGICAL_HEIGHT * s;
    let margin = MARGIN * s;

    let title_scale = PxScale::from((26 * s) as f32);
    let body_scale = PxScale::from((15 * s) as f32);
    let small_scale = PxScale::from((11 * s) as f32);

    let mut canvas = text::blank_canvas(width, height);
    let mut y = margin as i32;

    // Header: wrapped event name + kind label.
    for line in text::wrap_to_width(font, title_scale, &record.event_name, width - margin * 2) {
        text::draw_centered(&mut canvas, font, title_scale, y, &line, INK);
        y += text::line_height(font, title_scale) as i32 + 2;
    }
    text::draw_centered(&mut canvas, font, small_scale, y, "EVENT TICKET", MUTED);
    y += text::line_height(font, small_scale) as i32 + 8;

    text::draw_dashed_rule(&mut canvas, y as u32, 2 * s, 8 * s, 4 * s);
    y += (2 * s + 12 * s) as i32;
    let body_top = y;

    // QR block on the right when the record carries a payload.
    if let Some(data) = &record.qr_data {
        let slot = QR_SLOT * s;
        let code = qr::render_qr(data, slot)?;
        let x = width - margin - slot + (slot - code.width()) / 2;
        image::imageops::overlay(&mut canvas, &code.to_rgba8(), i64::from(x), i64::from(y));
    }

    // Detail rows on the left; missing optional fields collapse.
    let x = margin as i32;
    y = text::draw_field_row(&mut canvas, font, body_scale, x, y, "Holder", &record.holder_name);
    if let Some(date) = &record.event_date {
        y = text::draw_field_row(&mut canvas, font, body_scale, x, y, "Date", date);
    }
    if let Some(venue) = &record.venue {
        y = text::draw_field_row(&mut canvas, font, body_scale, x, y, "Venue", venue);
    }
    y = text::draw_field_row(&mut canvas, font, body_scale, x, y, "Ticket", &record.ticket_id);
    debug!(
        ticket_id = %record.ticket_id,
        rows_bottom = y,
        body_top,
        "Ticket body laid out"
    );

    // Footer: separator + issue timestamp.
    let footer_h = text::line_height(font, small_scale) + 10 * s;
    let rule_y = height - footer_h - 2 * s;
    text::draw_dashed_rule(&mut canvas, rule_y, 2 * s, 8 * s, 4 * s);
    let issued = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
    text::draw_centered(
        &mut canvas,
        font,
        small_scale,
        (rule_y + 2 * s + 4 * s) as i32,
        &format!("Issued {issued}"),
        MUTED,
    );

    Ok(DynamicImage::ImageRgba8(canvas))
}
