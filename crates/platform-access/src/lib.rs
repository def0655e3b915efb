//! Session and role-based access for the platform client.
//!
//! Replaces ad hoc ambient storage reads and string-matched permission
//! lists with an explicit session object behind one read/write boundary
//! and a closed role/capability model checked through exhaustive matches.

pub mod roles;
pub mod session;

// Re-exports for convenience
pub use roles::{Capability, NavSection, Role, visible_sections};
pub use session::{ApiError, Session, SessionStore};
