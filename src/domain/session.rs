//! Client-held sessions.
//!
//! A browser can be signed in to both pools at once. The store keeps at most
//! one token per pool and an explicit active kind; the bearer sent on a
//! request is always the active kind's token, never the other one.

use super::principal::SessionKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Session {
    User { token: String },
    Admin { token: String },
}

impl Session {
    pub fn kind(&self) -> SessionKind {
        match self {
            Session::User { .. } => SessionKind::User,
            Session::Admin { .. } => SessionKind::Admin,
        }
    }

    pub fn token(&self) -> &str {
        match self {
            Session::User { token } | Session::Admin { token } => token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStore {
    user_token: Option<String>,
    admin_token: Option<String>,
    active: SessionKind,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self {
            user_token: None,
            admin_token: None,
            active: SessionKind::User,
        }
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session and make its kind active.
    pub fn store(&mut self, session: Session) {
        self.active = session.kind();
        match session {
            Session::User { token } => self.user_token = Some(token),
            Session::Admin { token } => self.admin_token = Some(token),
        }
    }

    pub fn set_active(&mut self, kind: SessionKind) {
        self.active = kind;
    }

    pub fn active(&self) -> SessionKind {
        self.active
    }

    /// Drop one kind of session. The other is left untouched.
    pub fn logout(&mut self, kind: SessionKind) {
        match kind {
            SessionKind::User => self.user_token = None,
            SessionKind::Admin => self.admin_token = None,
        }
    }

    pub fn token(&self, kind: SessionKind) -> Option<&str> {
        match kind {
            SessionKind::User => self.user_token.as_deref(),
            SessionKind::Admin => self.admin_token.as_deref(),
        }
    }

    /// Token to present as the bearer for the active kind.
    pub fn bearer(&self) -> Option<&str> {
        self.token(self.active)
    }

    pub fn is_signed_in(&self, kind: SessionKind) -> bool {
        self.token(kind).is_some()
    }
}
