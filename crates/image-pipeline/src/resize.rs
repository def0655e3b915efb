//! Bounded resize of user-selected images.
//!
//! Downsamples an arbitrary upload to fit within configured maxima while
//! preserving aspect ratio, then re-encodes as JPEG for transport.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

use crate::encode::jpeg_data_url;
use crate::{PipelineError, Result, UPLOAD_LIMIT_BYTES};

/// Options for the bounded resize stage.
#[derive(Debug, Clone)]
pub struct ResizeOptions {
    /// Maximum output width in pixels.
    pub max_width: u32,

    /// Maximum output height in pixels.
    pub max_height: u32,

    /// JPEG re-encode quality (1..=100).
    pub quality: u8,

    /// Input file size ceiling in bytes.
    pub max_file_bytes: u64,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
            quality: 80,
            max_file_bytes: UPLOAD_LIMIT_BYTES,
        }
    }
}

/// A resized raster bounded to the configured maxima, with its transport
/// encoding. Held in UI state only until the crop stage consumes it.
#[derive(Debug, Clone)]
pub struct BoundedImage {
    pub image: DynamicImage,
    pub data_url: String,
}

impl BoundedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Decode an uploaded file and bound it to `opts` dimensions.
///
/// Scaling uses the single factor that brings the binding dimension exactly
/// to its cap (containment, never stretching). Images already within bounds
/// are re-encoded unscaled. Uses Lanczos3 filtering for downsampling.
pub fn resize_bounded(bytes: &[u8], opts: &ResizeOptions) -> Result<BoundedImage> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyFile);
    }
    let actual = bytes.len() as u64;
    if actual > opts.max_file_bytes {
        return Err(PipelineError::FileTooLarge {
            actual,
            limit: opts.max_file_bytes,
        });
    }

    let decoded =
        image::load_from_memory(bytes).map_err(|e| PipelineError::Decode(e.to_string()))?;
    let bounded = bound_to(&decoded, opts.max_width, opts.max_height);
    let data_url = jpeg_data_url(&bounded, opts.quality)?;

    Ok(BoundedImage {
        image: bounded,
        data_url,
    })
}

/// Scale `img` down so both dimensions fit within `max_w` x `max_h`.
pub(crate) fn bound_to(img: &DynamicImage, max_w: u32, max_h: u32) -> DynamicImage {
    let (w, h) = (img.width(), img.height());
    if w <= max_w && h <= max_h {
        return img.clone();
    }

    let factor = (f64::from(max_w) / f64::from(w)).min(f64::from(max_h) / f64::from(h));
    let new_w = ((f64::from(w) * factor).round() as u32).max(1);
    let new_h = ((f64::from(h) * factor).round() as u32).max(1);

    debug!(w, h, new_w, new_h, "Bounding image to maximum dimensions");
    img.resize_exact(new_w, new_h, FilterType::Lanczos3)
}
