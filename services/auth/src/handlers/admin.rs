use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hut_auth_types::cookie::{clear_session_cookie, set_session_cookie};
use hut_auth_types::guard::AdminSession;

use crate::domain::repository::UserDirectory;
use crate::domain::types::FlowKind;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::admin::{
    AdminLoginVerifyInput, AdminLoginVerifyUseCase, AdminOtpRequestInput, AdminOtpRequestUseCase,
    AdminResetInput, AdminResetUseCase,
};

use super::OTP_SENT_GENERIC;

#[derive(Serialize)]
pub struct AdminInfo {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

// ── POST /auth/admin/send-otp ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = AdminOtpRequestUseCase {
        store: state.pending.clone(),
        mailer: state.mailer.clone(),
        limiter: state.otp_limiter.clone(),
        admin_email: state.admin_email.clone(),
        otp_secret: state.otp_secret.clone(),
        flow: FlowKind::AdminLogin,
    };
    usecase
        .execute(AdminOtpRequestInput { email: body.email })
        .await?;
    Ok(Json(serde_json::json!({ "message": OTP_SENT_GENERIC })))
}

// ── POST /auth/admin/verify ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub otp: String,
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub admin: AdminInfo,
}

pub async fn verify(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<VerifyRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = AdminLoginVerifyUseCase {
        store: state.pending.clone(),
        directory: state.directory.clone(),
        hasher: state.hasher.clone(),
        otp_secret: state.otp_secret.clone(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(AdminLoginVerifyInput {
            email: body.email,
            otp: body.otp,
            username: body.username,
            password: body.password,
        })
        .await?;

    let jar = set_session_cookie(
        jar,
        out.token,
        state.cookie_domain.clone(),
        state.cookie_secure,
    );
    let response = VerifyResponse {
        success: true,
        admin: AdminInfo {
            id: out.admin.id,
            name: out.admin.username,
            is_admin: true,
        },
    };
    Ok((StatusCode::OK, jar, Json(response)))
}

// ── POST /auth/admin/reset/send-otp ───────────────────────────────────────────

pub async fn reset_send_otp(
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = AdminOtpRequestUseCase {
        store: state.pending.clone(),
        mailer: state.mailer.clone(),
        limiter: state.otp_limiter.clone(),
        admin_email: state.admin_email.clone(),
        otp_secret: state.otp_secret.clone(),
        flow: FlowKind::AdminReset,
    };
    usecase
        .execute(AdminOtpRequestInput { email: body.email })
        .await?;
    Ok(Json(serde_json::json!({ "message": OTP_SENT_GENERIC })))
}

// ── POST /auth/admin/reset ────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    pub email: String,
    pub otp: String,
    pub new_username: String,
    pub new_password: String,
}

pub async fn reset(
    State(state): State<AppState>,
    Json(body): Json<ResetRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = AdminResetUseCase {
        store: state.pending.clone(),
        directory: state.directory.clone(),
        hasher: state.hasher.clone(),
        otp_secret: state.otp_secret.clone(),
        admin_email: state.admin_email.clone(),
    };
    usecase
        .execute(AdminResetInput {
            email: body.email,
            otp: body.otp,
            new_username: body.new_username,
            new_password: body.new_password,
        })
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

// ── GET /auth/admin/session ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionResponse {
    pub admin: AdminInfo,
    #[serde(rename = "expiresAt")]
    pub expires_at: u64,
}

pub async fn session(
    State(state): State<AppState>,
    session: AdminSession,
) -> Result<impl IntoResponse, AuthServiceError> {
    let admin = state
        .directory
        .admin_credentials()
        .await?
        .filter(|admin| admin.id == session.admin_id)
        .ok_or(AuthServiceError::Verification)?;

    Ok(Json(SessionResponse {
        admin: AdminInfo {
            id: admin.id,
            name: admin.username,
            is_admin: true,
        },
        expires_at: session.expires_at,
    }))
}

// ── DELETE /auth/admin/session ────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let jar = clear_session_cookie(jar, state.cookie_domain.clone(), state.cookie_secure);
    Ok((StatusCode::NO_CONTENT, jar))
}
