//! Credential sources for private requests.
//!
//! The transport asks its `CredentialStore` for a token on every private
//! request, so signing in or out through a shared `Session` takes effect on
//! the next call without rebuilding any descriptor.

use std::sync::{Arc, PoisonError, RwLock};

pub trait CredentialStore: Send + Sync {
    /// Bearer token for the current user, if signed in.
    fn access_token(&self) -> Option<String>;
}

/// No credentials. Private requests go out without `authorization`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl CredentialStore for Anonymous {
    fn access_token(&self) -> Option<String> {
        None
    }
}

/// Shared, clonable token holder.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let session = Self::new();
        session.sign_in(token);
        session
    }

    pub fn sign_in(&self, token: &str) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    pub fn sign_out(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.access_token().is_some()
    }
}

impl CredentialStore for Session {
    fn access_token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
