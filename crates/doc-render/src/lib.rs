//! Ticket and coupon document rendering.
//!
//! Renders server-confirmed [`models::TicketRecord`] and
//! [`models::CouponRecord`] data onto fixed-size opaque-white bitmaps at a
//! 2x device-scale factor, ready for PDF export. This is the raster
//! equivalent of filling a hidden styled template and capturing it.

pub mod coupon;
pub mod models;
pub mod qr;
pub mod text;
pub mod ticket;

// Re-exports for convenience
pub use coupon::render_coupon;
pub use models::{CouponRecord, TicketRecord};
pub use ticket::render_ticket;

/// Device-scale factor applied to all logical template dimensions for
/// crisp print output.
pub const RASTER_SCALE: u32 = 2;

/// Errors that can occur while rendering documents.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("QR encode error: {0}")]
    Qr(String),

    #[error("Font error: {0}")]
    Font(String),
}

/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;
