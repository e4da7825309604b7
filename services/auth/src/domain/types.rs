use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which verification flow a pending action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowKind {
    AdminLogin,
    AdminReset,
    UserSignup,
    EmailChange,
    PasswordReset,
}

impl FlowKind {
    /// Stable tag used in store keys and rate-limit keys.
    pub fn tag(self) -> &'static str {
        match self {
            Self::AdminLogin => "admin_login",
            Self::AdminReset => "admin_reset",
            Self::UserSignup => "user_signup",
            Self::EmailChange => "email_change",
            Self::PasswordReset => "password_reset",
        }
    }

    /// OTP lifetime for this flow. Admin flows get the shorter window.
    pub fn ttl(self) -> Duration {
        match self {
            Self::AdminLogin | Self::AdminReset => Duration::seconds(ADMIN_OTP_TTL_SECS),
            Self::UserSignup | Self::EmailChange | Self::PasswordReset => {
                Duration::seconds(USER_OTP_TTL_SECS)
            }
        }
    }
}

/// Flow-specific data needed to finalize an action once verified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PendingPayload {
    None,
    /// Account data captured at signup request time. The password is already
    /// hashed — plaintext is never parked in the store.
    Signup {
        name: String,
        username: String,
        password_hash: String,
    },
    EmailChange {
        current_email: String,
        new_email: String,
    },
}

/// One in-flight verification: a code was issued for this subject and flow
/// and is awaiting the matching verify call.
///
/// There is at most one live action per `(subject_key, flow)`; a resend
/// overwrites the previous one. Records past `expires_at` read as absent
/// everywhere even before they are physically evicted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAction {
    pub subject_key: String,
    pub flow: FlowKind,
    /// SHA-256 of code + server secret; the plaintext code is never stored.
    pub otp_hash: Vec<u8>,
    pub payload: PendingPayload,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PendingAction {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// The single admin account's credentials, maintained via upsert through the
/// user directory. Exactly one row exists system-wide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Profile data for a registered user, as the directory reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub name: String,
}

/// Account data handed to the directory at signup finalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub username: String,
    pub password_hash: String,
}

/// OTP time-to-live for admin flows in seconds.
pub const ADMIN_OTP_TTL_SECS: i64 = 300;

/// OTP time-to-live for user-facing flows in seconds.
pub const USER_OTP_TTL_SECS: i64 = 600;

/// Maximum OTP sends per subject within the send window.
pub const OTP_SENDS_PER_WINDOW: usize = 3;

/// Sliding send-window length in seconds.
pub const OTP_SEND_WINDOW_SECS: i64 = 300;

/// Maximum requests per client IP within the API window.
pub const IP_REQUESTS_PER_WINDOW: usize = 100;

/// Sliding per-IP window length in seconds.
pub const IP_WINDOW_SECS: i64 = 900;

/// Minimum password length (server-enforced; the client UI may be laxer).
pub const MIN_PASSWORD_LEN: usize = 8;
