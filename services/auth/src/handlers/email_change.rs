use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::email_change::{
    EmailChangeRequestInput, EmailChangeRequestUseCase, EmailChangeVerifyInput,
    EmailChangeVerifyUseCase,
};

use super::OTP_SENT;

// ── POST /auth/email/send-otp ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    pub user_id: String,
    pub current_email: String,
    pub new_email: String,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = EmailChangeRequestUseCase {
        store: state.pending.clone(),
        mailer: state.mailer.clone(),
        directory: state.directory.clone(),
        limiter: state.otp_limiter.clone(),
        otp_secret: state.otp_secret.clone(),
    };
    usecase
        .execute(EmailChangeRequestInput {
            user_id: body.user_id,
            current_email: body.current_email,
            new_email: body.new_email,
        })
        .await?;
    Ok(Json(serde_json::json!({ "message": OTP_SENT })))
}

// ── POST /auth/email/verify ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub user_id: String,
    pub otp: String,
}

pub async fn verify(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = EmailChangeVerifyUseCase {
        store: state.pending.clone(),
        directory: state.directory.clone(),
        otp_secret: state.otp_secret.clone(),
    };
    usecase
        .execute(EmailChangeVerifyInput {
            user_id: body.user_id,
            otp: body.otp,
        })
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
