use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service error variants. Every failure a flow can surface reaches the
/// client as one of these; nothing below the handlers hits the HTTP layer
/// unconverted.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// Malformed input. The message names the offending field and is safe to
    /// reveal.
    #[error("{0}")]
    Validation(String),
    /// A business rule was violated. Enumeration-sensitive flows never reach
    /// this variant for identity mismatches — they answer generically.
    #[error("{0}")]
    Precondition(String),
    #[error("Too many requests. Please try again later.")]
    RateLimited,
    /// Wrong, expired, and absent codes — and bad admin credentials — share
    /// this one message. Clients cannot tell them apart.
    #[error("Invalid or expired verification code")]
    Verification,
    #[error("Could not send verification email")]
    Delivery,
    #[error("An unexpected error occurred")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::Precondition(_) => "PRECONDITION",
            Self::RateLimited => "RATE_LIMITED",
            Self::Verification => "VERIFICATION",
            Self::Delivery => "DELIVERY",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) | Self::Precondition(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Verification => StatusCode::UNAUTHORIZED,
            Self::Delivery => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "error": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
