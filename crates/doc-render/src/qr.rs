//! QR block rendering for ticket and coupon templates.

use image::{DynamicImage, GrayImage, Luma};
use qrcode::QrCode;

use crate::{RenderError, Result};

/// Modules of white quiet zone around the code.
const QUIET_ZONE: u32 = 2;

/// Render `data` as a QR code image roughly `target_width` pixels wide.
///
/// Each module is scaled to an integer pixel size (minimum 1), so the
/// output may be slightly smaller than requested but never blurry.
pub fn render_qr(data: &str, target_width: u32) -> Result<DynamicImage> {
    let code = QrCode::new(data.as_bytes()).map_err(|e| RenderError::Qr(e.to_string()))?;
    let modules = code.to_colors();
    let module_count = code.width() as u32;
    let total_modules = module_count + QUIET_ZONE * 2;

    let scale = (target_width / total_modules).max(1);
    let size = total_modules * scale;

    let mut img = GrayImage::from_pixel(size, size, Luma([255u8]));
    for (i, color) in modules.iter().enumerate() {
        if *color != qrcode::Color::Dark {
            continue;
        }
        let mx = (i as u32 % module_count + QUIET_ZONE) * scale;
        let my = (i as u32 / module_count + QUIET_ZONE) * scale;
        for dx in 0..scale {
            for dy in 0..scale {
                img.put_pixel(mx + dx, my + dy, Luma([0u8]));
            }
        }
    }

    Ok(DynamicImage::ImageLuma8(img))
}
