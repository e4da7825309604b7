//! Admin session-token validation.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
use serde::Serialize;
use uuid::Uuid;

/// Role claim value asserted by admin session tokens.
pub const ADMIN_ROLE: &str = "admin";

/// Admin identity extracted from a validated session token.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub admin_id: Uuid,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub expires_at: u64,
}

/// Errors returned by [`validate_session_token`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("missing admin role")]
    NotAdmin,
}

/// JWT claims payload shared by token issuance (auth service) and validation
/// (admin-gated routes everywhere else).
///
/// [`Deserialize`] is always available — all consumers validate tokens.
/// [`Serialize`] requires the **`USE_ONLY_IN_AUTH_SERVICE`** cargo feature.
/// Only the auth service enables it because it is the sole token issuer.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
pub struct SessionClaims {
    /// Admin ID (UUID string).
    pub sub: String,
    /// Role claim; [`ADMIN_ROLE`] for every token this system issues.
    pub role: String,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
}

/// Decode and validate a session JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s — tolerates clock skew between services.
fn decode_session(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => SessionError::InvalidSignature,
        _ => SessionError::Malformed,
    })?;

    Ok(data.claims)
}

/// Validate a session-cookie value, returning the asserted admin identity.
///
/// Signature, expiry, and the `role=admin` claim must all hold; there is no
/// partial trust. This is the sole authorization check for admin-gated
/// routes.
pub fn validate_session_token(
    cookie_value: &str,
    secret: &str,
) -> Result<SessionInfo, SessionError> {
    let claims = decode_session(cookie_value, secret)?;
    if claims.role != ADMIN_ROLE {
        return Err(SessionError::NotAdmin);
    }
    let admin_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| SessionError::Malformed)?;
    Ok(SessionInfo {
        admin_id,
        expires_at: claims.exp,
    })
}
