//! Single-page PDF export for rasterized documents.
//!
//! Fits a bitmap onto one portrait page (A4 by default) with fixed margins,
//! scale-to-fit and centered on both axes, embedded as a single RGB raster.
//! This is a "print a picture" pipeline, not a document layout engine.

pub mod filename;

pub use filename::{coupon_filename, ticket_filename};

use image::DynamicImage;
use printpdf::{ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Px};
use tracing::debug;

const MM_PER_INCH: f64 = 25.4;

/// Errors that can occur during PDF export.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("Source bitmap has zero dimensions")]
    ZeroDimension,

    #[error("PDF write error: {0}")]
    Write(String),
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Page geometry in millimeters. Defaults to A4 portrait with 10mm margins.
#[derive(Debug, Clone, Copy)]
pub struct PageSpec {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 10.0,
        }
    }
}

/// Placement of the embedded raster on the page, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentBox {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Compute the scale-to-fit, centered placement of a `px_w` x `px_h` bitmap
/// within the page's margin-adjusted usable area.
pub fn fit_content(px_w: u32, px_h: u32, page: &PageSpec) -> Result<ContentBox> {
    if px_w == 0 || px_h == 0 {
        return Err(PdfError::ZeroDimension);
    }

    let usable_w = page.width_mm - page.margin_mm * 2.0;
    let usable_h = page.height_mm - page.margin_mm * 2.0;
    let aspect = f64::from(px_w) / f64::from(px_h);

    let (width_mm, height_mm) = if aspect > usable_w / usable_h {
        (usable_w, usable_w / aspect)
    } else {
        (usable_h * aspect, usable_h)
    };

    Ok(ContentBox {
        x_mm: (page.width_mm - width_mm) / 2.0,
        y_mm: (page.height_mm - height_mm) / 2.0,
        width_mm,
        height_mm,
    })
}

/// Emit a single-page PDF embedding `bitmap`, fitted per [`fit_content`].
pub fn paginate(bitmap: &DynamicImage, page: &PageSpec) -> Result<Vec<u8>> {
    let (px_w, px_h) = (bitmap.width(), bitmap.height());
    let content = fit_content(px_w, px_h, page)?;
    debug!(px_w, px_h, ?content, "Placing bitmap on page");

    let (doc, page_idx, layer_idx) = PdfDocument::new(
        "Document",
        Mm(page.width_mm as f32),
        Mm(page.height_mm as f32),
        "Layer 1",
    );
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let rgb = bitmap.to_rgb8();
    let raster = Image::from(ImageXObject {
        width: Px(px_w as usize),
        height: Px(px_h as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // The dpi transform scales both axes uniformly, so mapping the pixel
    // width onto the content width also lands the height on content height.
    let dpi = f64::from(px_w) / (content.width_mm / MM_PER_INCH);
    raster.add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(content.x_mm as f32)),
            translate_y: Some(Mm(content.y_mm as f32)),
            dpi: Some(dpi as f32),
            ..Default::default()
        },
    );

    doc.save_to_bytes().map_err(|e| PdfError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbaImage};

    const EPSILON: f64 = 0.01;

    fn a4() -> PageSpec {
        PageSpec::default()
    }

    #[test]
    fn wide_bitmap_binds_on_width() {
        // 16:9 against a 190x277 usable area: width binds.
        let content = fit_content(1280, 720, &a4()).unwrap();
        assert!((content.width_mm - 190.0).abs() < EPSILON);
        assert!((content.height_mm - 190.0 * 9.0 / 16.0).abs() < EPSILON);
    }

    #[test]
    fn tall_bitmap_binds_on_height() {
        let content = fit_content(500, 2000, &a4()).unwrap();
        assert!((content.height_mm - 277.0).abs() < EPSILON);
        assert!((content.width_mm - 277.0 / 4.0).abs() < EPSILON);
    }

    #[test]
    fn content_fits_usable_area_and_keeps_aspect() {
        for (w, h) in [(1280u32, 720u32), (720, 1280), (333, 777), (5000, 100)] {
            let content = fit_content(w, h, &a4()).unwrap();
            assert!(content.width_mm <= 190.0 + EPSILON);
            assert!(content.height_mm <= 277.0 + EPSILON);
            let aspect = f64::from(w) / f64::from(h);
            assert!(
                (content.width_mm / content.height_mm - aspect).abs() < EPSILON,
                "aspect drift for {w}x{h}"
            );
        }
    }

    #[test]
    fn content_is_centered_on_both_axes() {
        let page = a4();
        let content = fit_content(1280, 720, &page).unwrap();
        assert!(((page.width_mm - content.width_mm) / 2.0 - content.x_mm).abs() < EPSILON);
        assert!(((page.height_mm - content.height_mm) / 2.0 - content.y_mm).abs() < EPSILON);
    }

    #[test]
    fn zero_dimension_bitmap_is_rejected() {
        assert!(matches!(
            fit_content(0, 720, &a4()).unwrap_err(),
            PdfError::ZeroDimension
        ));
        let empty = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        assert!(matches!(
            paginate(&empty, &a4()).unwrap_err(),
            PdfError::ZeroDimension
        ));
    }

    #[test]
    fn paginate_emits_pdf_bytes() {
        let bitmap = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            640,
            360,
            image::Rgba([255, 255, 255, 255]),
        ));
        let bytes = paginate(&bitmap, &a4()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1024);
    }
}
