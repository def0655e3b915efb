//! Upload image pipeline: bounded resize, interactive 16:9 crop, and
//! base64 data-URL transport.
//!
//! The stages mirror the onboarding upload flow: a user-picked file is
//! bounded by [`resize::resize_bounded`], cropped through a
//! [`crop::CropSession`], and the committed asset (plus any passthrough
//! documents) is encoded for JSON transport by the [`encode`] module.

pub mod crop;
pub mod encode;
pub mod form;
pub mod resize;

// Re-exports for convenience
pub use crop::{CropRegion, CropSession, FinalAsset, ReseedPolicy};
pub use encode::{encode_batch, encode_file, read_upload};
pub use form::{OnboardingPayload, UploadForm};
pub use resize::{BoundedImage, ResizeOptions, resize_bounded};

/// Upload ceiling for images entering the resize stage.
pub const UPLOAD_LIMIT_BYTES: u64 = 10 * 1024 * 1024;

/// Per-file ceiling for passthrough document transport.
pub const TRANSPORT_LIMIT_BYTES: u64 = 5 * 1024 * 1024;

/// Fixed crop aspect ratio (width / height).
pub const TARGET_ASPECT: f64 = 16.0 / 9.0;

/// Errors that can occur in the upload pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File too large: {actual} bytes exceeds the {limit} byte limit")]
    FileTooLarge { actual: u64, limit: u64 },

    #[error("File is empty")]
    EmptyFile,

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Image encode error: {0}")]
    Encode(String),

    #[error("No crop region selected")]
    NoCropRegion,

    #[error("Crop session has no image loaded")]
    NotEditing,

    #[error("Nothing committed to re-open")]
    NothingCommitted,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("File read error: {0}")]
    Read(#[from] std::io::Error),

    #[error("File read aborted")]
    ReadAborted,
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
