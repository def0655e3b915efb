//! Server-confirmed ticket and coupon records.
//!
//! The backend owns these entities; the client treats every field as opaque
//! display data. Dates and codes are rendered verbatim.

use serde::{Deserialize, Serialize};

/// An event registration returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    pub ticket_id: String,
    pub event_name: String,
    pub holder_name: String,

    #[serde(default)]
    pub event_date: Option<String>,

    #[serde(default)]
    pub venue: Option<String>,

    /// Payload for the ticket QR block (usually the registration URL).
    #[serde(default)]
    pub qr_data: Option<String>,
}

/// An issued partner-benefit coupon returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRecord {
    pub code: String,
    pub partner_name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub discount_text: Option<String>,

    #[serde(default)]
    pub expiry: Option<String>,

    /// Payload for the coupon QR block (usually the redemption URL).
    #[serde(default)]
    pub qr_data: Option<String>,
}
