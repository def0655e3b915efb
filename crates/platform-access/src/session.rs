//! Explicit session state with a single read/write boundary.
//!
//! Components receive the session by reference instead of reading ambient
//! storage. An unauthorized backend response clears the session here and
//! nowhere else; other failures leave state intact so the user can retry.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::roles::Role;

/// Shared HTTP error taxonomy for backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Session expired or unauthorized")]
    Unauthorized,

    #[error("Backend error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),
}

/// An authenticated session. Set at login, cleared at logout or expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub role: Role,
    pub token: String,
}

/// Owner of the process-wide session lifecycle.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: Option<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, session: Session) {
        info!(user_id = %session.user_id, role = ?session.role, "Session established");
        self.current = Some(session);
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn clear(&mut self) {
        if self.current.take().is_some() {
            info!("Session cleared");
        }
    }

    /// Apply the session consequence of a failed backend call.
    ///
    /// Unauthorized clears the session (the caller then redirects to
    /// login); every other error preserves state for retry.
    pub fn absorb_error(&mut self, error: &ApiError) {
        match error {
            ApiError::Unauthorized => {
                warn!("Unauthorized response, clearing session");
                self.clear();
            }
            ApiError::Api { .. } | ApiError::Network(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partner_session() -> Session {
        Session {
            user_id: "u-42".into(),
            role: Role::Partner,
            token: "tok".into(),
        }
    }

    #[test]
    fn login_then_current() {
        let mut store = SessionStore::new();
        assert!(!store.is_authenticated());
        store.login(partner_session());
        assert_eq!(store.current().unwrap().user_id, "u-42");
    }

    #[test]
    fn unauthorized_clears_session() {
        let mut store = SessionStore::new();
        store.login(partner_session());
        store.absorb_error(&ApiError::Unauthorized);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn generic_failures_preserve_session() {
        let mut store = SessionStore::new();
        store.login(partner_session());
        store.absorb_error(&ApiError::Api {
            status: 500,
            message: "boom".into(),
        });
        store.absorb_error(&ApiError::Network("timeout".into()));
        assert!(store.is_authenticated());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut store = SessionStore::new();
        store.clear();
        store.clear();
        assert!(!store.is_authenticated());
    }
}
