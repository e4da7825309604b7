//! Session-cookie extractor for admin-gated routes.

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::extract::cookie::CookieJar;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use crate::cookie::HUT_ADMIN_SESSION;
use crate::token::validate_session_token;

/// Signing secret for session tokens, provided through the router state via
/// [`FromRef`].
#[derive(Debug, Clone)]
pub struct SessionSecret(pub String);

/// Verified admin identity extracted from the session cookie.
///
/// Returns a uniform 401 when the cookie is absent, expired, tampered with,
/// or carries the wrong role — callers cannot tell which.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub admin_id: Uuid,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub expires_at: u64,
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    SessionSecret: FromRef<S>,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = SessionSecret::from_ref(state);
        let token = CookieJar::from_headers(&parts.headers)
            .get(HUT_ADMIN_SESSION)
            .map(|c| c.value().to_owned());

        async move {
            let token = token.ok_or(StatusCode::UNAUTHORIZED)?;
            let info =
                validate_session_token(&token, &secret.0).map_err(|_| StatusCode::UNAUTHORIZED)?;
            Ok(Self {
                admin_id: info.admin_id,
                expires_at: info.expires_at,
            })
        }
    }
}
