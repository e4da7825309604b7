use std::sync::Arc;

use axum::extract::FromRef;

use hut_auth_types::guard::SessionSecret;
use hut_core::ratelimit::SlidingWindowLimiter;

use crate::crypto::CredentialHasher;
use crate::infra::{Directory, MailerBackend, PendingStore};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub pending: PendingStore,
    pub directory: Directory,
    pub mailer: MailerBackend,
    /// Per-subject OTP send limiter (3 per 5 minutes).
    pub otp_limiter: Arc<SlidingWindowLimiter>,
    /// Coarse per-IP limiter over the whole API (100 per 15 minutes).
    pub ip_limiter: Arc<SlidingWindowLimiter>,
    pub hasher: Arc<CredentialHasher>,
    pub admin_email: String,
    pub otp_secret: String,
    pub jwt_secret: String,
    pub cookie_domain: String,
    pub cookie_secure: bool,
}

impl FromRef<AppState> for SessionSecret {
    fn from_ref(state: &AppState) -> Self {
        SessionSecret(state.jwt_secret.clone())
    }
}
