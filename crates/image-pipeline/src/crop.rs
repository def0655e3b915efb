//! Interactive rectangular crop over a fixed 16:9 target aspect.
//!
//! A [`CropSession`] walks Idle -> Editing -> Committed-and-back-to-Idle.
//! While editing, zoom and pan adjustments recompute the crop region in
//! source-pixel space (always clamped fully inside the image) and yield an
//! advisory low-res preview. Commit renders the final asset at the capped
//! target resolution; the preview is never the submitted value.

use image::DynamicImage;
use tracing::debug;

use crate::encode::jpeg_data_url;
use crate::resize::{BoundedImage, bound_to};
use crate::{PipelineError, Result, TARGET_ASPECT};

/// Maximum zoom factor while editing.
pub const MAX_ZOOM: f64 = 3.0;

const FINAL_MAX_W: u32 = 1200;
const FINAL_MAX_H: u32 = 675;
const FINAL_QUALITY: u8 = 75;

const PREVIEW_MAX_W: u32 = 800;
const PREVIEW_MAX_H: u32 = 450;
const PREVIEW_QUALITY: u8 = 60;

/// A crop rectangle in source-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Width / height ratio of the region.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Source used when re-opening the editor on an already-cropped asset.
///
/// `LastCommitted` re-seeds from the previous commit (progressive
/// re-cropping, the observed upstream behavior); `Original` re-seeds from
/// the untouched upload and avoids repeated lossy re-encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReseedPolicy {
    #[default]
    LastCommitted,
    Original,
}

/// Advisory low-res render of the current crop. Never submitted.
#[derive(Debug, Clone)]
pub struct Preview {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// The committed crop rendered at final resolution, ready for transport.
#[derive(Debug, Clone)]
pub struct FinalAsset {
    pub image: DynamicImage,
    pub data_url: String,
    pub region: CropRegion,
}

impl FinalAsset {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[derive(Debug)]
struct EditState {
    image: DynamicImage,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    region: Option<CropRegion>,
}

#[derive(Debug)]
enum State {
    Idle,
    Editing(EditState),
}

/// Crop session state machine.
#[derive(Debug)]
pub struct CropSession {
    state: State,
    reseed: ReseedPolicy,
    original: Option<DynamicImage>,
    committed: Option<DynamicImage>,
}

impl Default for CropSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CropSession {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            reseed: ReseedPolicy::default(),
            original: None,
            committed: None,
        }
    }

    pub fn with_reseed(mut self, policy: ReseedPolicy) -> Self {
        self.reseed = policy;
        self
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, State::Editing(_))
    }

    /// Current crop region, if one is selected. `None` disables "Apply".
    pub fn region(&self) -> Option<CropRegion> {
        match &self.state {
            State::Editing(edit) => edit.region,
            State::Idle => None,
        }
    }

    /// Load a bounded image and enter Editing with a centered full crop.
    pub fn load(&mut self, source: BoundedImage) {
        let image = source.image;
        self.original = Some(image.clone());
        self.committed = None;
        let region = compute_region(image.width(), image.height(), 1.0, 0.0, 0.0);
        self.state = State::Editing(EditState {
            image,
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            region,
        });
    }

    /// Adjust zoom (clamped to `1.0..=MAX_ZOOM`) and return a fresh preview.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<Preview> {
        let edit = self.editing_mut()?;
        edit.zoom = zoom.clamp(1.0, MAX_ZOOM);
        edit.recompute();
        self.render_preview()
    }

    /// Pan the crop window by source-pixel offsets from center.
    ///
    /// Restrict-position semantics: the region is clamped fully inside the
    /// image, so out-of-bounds pans saturate at the edges.
    pub fn set_pan(&mut self, pan_x: f64, pan_y: f64) -> Result<Preview> {
        let edit = self.editing_mut()?;
        edit.pan_x = pan_x;
        edit.pan_y = pan_y;
        edit.recompute();
        self.render_preview()
    }

    /// Set an explicit region. The height is snapped to the 16:9 aspect and
    /// the rectangle is clamped inside the image.
    pub fn set_region(&mut self, x: u32, y: u32, width: u32) -> Result<Preview> {
        let edit = self.editing_mut()?;
        if width == 0 {
            return Err(PipelineError::NoCropRegion);
        }
        let (img_w, img_h) = (edit.image.width(), edit.image.height());
        let (max_w, _) = largest_target_rect(img_w, img_h);
        let width = width.min(max_w);
        let height = ((f64::from(width) / TARGET_ASPECT).round() as u32).max(1);
        let x = x.min(img_w - width);
        let y = y.min(img_h - height);
        edit.region = Some(CropRegion {
            x,
            y,
            width,
            height,
        });
        self.render_preview()
    }

    /// Commit the current region: render the final asset at full target
    /// resolution (capped) and return to Idle.
    ///
    /// Fails with [`PipelineError::NoCropRegion`] when no region is selected
    /// or the region is degenerate.
    pub fn commit(&mut self) -> Result<FinalAsset> {
        let edit = self.editing_mut()?;
        let region = edit.region.ok_or(PipelineError::NoCropRegion)?;
        if region.area() == 0 {
            return Err(PipelineError::NoCropRegion);
        }

        let cropped = edit
            .image
            .crop_imm(region.x, region.y, region.width, region.height);
        let final_image = bound_to(&cropped, FINAL_MAX_W, FINAL_MAX_H);
        let data_url = jpeg_data_url(&final_image, FINAL_QUALITY)?;

        debug!(
            x = region.x,
            y = region.y,
            width = region.width,
            height = region.height,
            out_w = final_image.width(),
            out_h = final_image.height(),
            "Crop committed"
        );

        self.committed = Some(final_image.clone());
        self.state = State::Idle;
        Ok(FinalAsset {
            image: final_image,
            data_url,
            region,
        })
    }

    /// Discard all in-progress edit state and return to Idle.
    pub fn cancel(&mut self) {
        if self.is_editing() {
            debug!("Crop session cancelled, discarding edit state");
        }
        self.state = State::Idle;
    }

    /// Re-open the editor on an already-cropped asset, seeding per the
    /// session's [`ReseedPolicy`].
    pub fn reopen(&mut self) -> Result<()> {
        let seed = match self.reseed {
            ReseedPolicy::LastCommitted => self.committed.clone(),
            ReseedPolicy::Original => self.original.clone(),
        };
        let image = seed.ok_or(PipelineError::NothingCommitted)?;
        let region = compute_region(image.width(), image.height(), 1.0, 0.0, 0.0);
        self.state = State::Editing(EditState {
            image,
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            region,
        });
        Ok(())
    }

    fn editing_mut(&mut self) -> Result<&mut EditState> {
        match &mut self.state {
            State::Editing(edit) => Ok(edit),
            State::Idle => Err(PipelineError::NotEditing),
        }
    }

    fn render_preview(&self) -> Result<Preview> {
        let State::Editing(edit) = &self.state else {
            return Err(PipelineError::NotEditing);
        };
        let region = edit.region.ok_or(PipelineError::NoCropRegion)?;
        let cropped = edit
            .image
            .crop_imm(region.x, region.y, region.width, region.height);
        let small = bound_to(&cropped, PREVIEW_MAX_W, PREVIEW_MAX_H);
        let data_url = jpeg_data_url(&small, PREVIEW_QUALITY)?;
        Ok(Preview {
            width: small.width(),
            height: small.height(),
            data_url,
        })
    }
}

impl EditState {
    fn recompute(&mut self) {
        self.region = compute_region(
            self.image.width(),
            self.image.height(),
            self.zoom,
            self.pan_x,
            self.pan_y,
        );
    }
}

/// Largest 16:9 rectangle that fits inside `w` x `h`.
fn largest_target_rect(w: u32, h: u32) -> (u32, u32) {
    let (fw, fh) = (f64::from(w), f64::from(h));
    if fw / fh > TARGET_ASPECT {
        // Height binds.
        let bw = (fh * TARGET_ASPECT).floor().max(1.0);
        (bw as u32, h)
    } else {
        let bh = (fw / TARGET_ASPECT).floor().max(1.0);
        (w, bh as u32)
    }
}

/// Compute the crop region for the given zoom and pan, clamped inside the
/// image. Returns `None` only for degenerate (sub-pixel) windows.
fn compute_region(w: u32, h: u32, zoom: f64, pan_x: f64, pan_y: f64) -> Option<CropRegion> {
    let (base_w, _) = largest_target_rect(w, h);
    let cw = (f64::from(base_w) / zoom).floor();
    if cw < 1.0 {
        return None;
    }
    let width = cw as u32;
    let height = (((cw) / TARGET_ASPECT).round() as u32).clamp(1, h);

    let max_x = f64::from(w - width);
    let max_y = f64::from(h - height);
    let x = (max_x / 2.0 + pan_x).clamp(0.0, max_x).round() as u32;
    let y = (max_y / 2.0 + pan_y).clamp(0.0, max_y).round() as u32;

    Some(CropRegion {
        x,
        y,
        width,
        height,
    })
}
