use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::signup::{
    SignupRequestInput, SignupRequestUseCase, SignupVerifyInput, SignupVerifyUseCase,
};

use super::OTP_SENT;

// ── POST /auth/signup/send-otp ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
    pub name: String,
    pub username: String,
    pub password: String,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = SignupRequestUseCase {
        store: state.pending.clone(),
        mailer: state.mailer.clone(),
        directory: state.directory.clone(),
        limiter: state.otp_limiter.clone(),
        hasher: state.hasher.clone(),
        otp_secret: state.otp_secret.clone(),
    };
    usecase
        .execute(SignupRequestInput {
            email: body.email,
            name: body.name,
            username: body.username,
            password: body.password,
        })
        .await?;
    Ok(Json(serde_json::json!({ "message": OTP_SENT })))
}

// ── POST /auth/signup/verify ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: UserInfo,
}

#[derive(Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub name: String,
}

pub async fn verify(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = SignupVerifyUseCase {
        store: state.pending.clone(),
        directory: state.directory.clone(),
        otp_secret: state.otp_secret.clone(),
    };
    let user = usecase
        .execute(SignupVerifyInput {
            email: body.email,
            otp: body.otp,
        })
        .await?;

    let response = VerifyResponse {
        success: true,
        user: UserInfo {
            id: user.id,
            email: user.email,
            username: user.username,
            name: user.name,
        },
    };
    Ok((StatusCode::CREATED, Json(response)))
}
