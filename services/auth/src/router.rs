use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use hut_core::health::{healthz, readyz};
use hut_core::middleware::request_id_layer;
use hut_core::ratelimit::ip_rate_limit;

use crate::handlers::{
    admin::{
        logout, reset, reset_send_otp, send_otp as admin_send_otp, session, verify as admin_verify,
    },
    email_change::{send_otp as email_send_otp, verify as email_verify},
    password_reset::{reset as password_reset, send_otp as password_send_otp},
    signup::{send_otp as signup_send_otp, verify as signup_verify},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Admin login
        .route("/auth/admin/send-otp", post(admin_send_otp))
        .route("/auth/admin/verify", post(admin_verify))
        .route("/auth/admin/session", get(session))
        .route("/auth/admin/session", delete(logout))
        // Admin credential reset
        .route("/auth/admin/reset/send-otp", post(reset_send_otp))
        .route("/auth/admin/reset", post(reset))
        // Signup
        .route("/auth/signup/send-otp", post(signup_send_otp))
        .route("/auth/signup/verify", post(signup_verify))
        // Email change
        .route("/auth/email/send-otp", post(email_send_otp))
        .route("/auth/email/verify", post(email_verify))
        // Password reset
        .route("/auth/password/send-reset-otp", post(password_send_otp))
        .route("/auth/password/reset", post(password_reset))
        .layer(axum::middleware::from_fn_with_state(
            state.ip_limiter.clone(),
            ip_rate_limit,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
