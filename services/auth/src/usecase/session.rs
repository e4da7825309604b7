use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use hut_auth_types::cookie::SESSION_TTL_SECS;
use hut_auth_types::token::{ADMIN_ROLE, SessionClaims};

use crate::error::AuthServiceError;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Mint a signed admin session token with an absolute 2-hour expiry.
/// Returns the token and its expiry timestamp.
pub fn issue_session_token(
    admin_id: Uuid,
    secret: &str,
) -> Result<(String, u64), AuthServiceError> {
    let exp = now_secs() + SESSION_TTL_SECS;
    let claims = SessionClaims {
        sub: admin_id.to_string(),
        role: ADMIN_ROLE.to_owned(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))?;
    Ok((token, exp))
}
