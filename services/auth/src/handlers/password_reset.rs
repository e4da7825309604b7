use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::password_reset::{
    PasswordResetInput, PasswordResetRequestInput, PasswordResetRequestUseCase,
    PasswordResetUseCase,
};

use super::OTP_SENT_GENERIC;

// ── POST /auth/password/send-reset-otp ────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = PasswordResetRequestUseCase {
        store: state.pending.clone(),
        mailer: state.mailer.clone(),
        directory: state.directory.clone(),
        limiter: state.otp_limiter.clone(),
        otp_secret: state.otp_secret.clone(),
    };
    usecase
        .execute(PasswordResetRequestInput { email: body.email })
        .await?;
    Ok(Json(serde_json::json!({ "message": OTP_SENT_GENERIC })))
}

// ── POST /auth/password/reset ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

pub async fn reset(
    State(state): State<AppState>,
    Json(body): Json<ResetRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = PasswordResetUseCase {
        store: state.pending.clone(),
        directory: state.directory.clone(),
        otp_secret: state.otp_secret.clone(),
    };
    usecase
        .execute(PasswordResetInput {
            email: body.email,
            otp: body.otp,
            new_password: body.new_password,
        })
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
