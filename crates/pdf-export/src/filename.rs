//! Download filename construction.
//!
//! Identifiers coming from the backend are sanitized before landing in a
//! filesystem path: anything outside alphanumerics, underscore, or hyphen
//! is stripped.

/// Strip all characters outside `[A-Za-z0-9_-]`.
pub fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Filename for a downloaded event ticket.
pub fn ticket_filename(ticket_id: &str) -> String {
    format!("Event_Ticket_{}.pdf", sanitize_id(ticket_id))
}

/// Filename for a downloaded donation coupon.
pub fn coupon_filename(coupon_code: &str) -> String {
    format!("coupon-{}.pdf", sanitize_id(coupon_code))
}
