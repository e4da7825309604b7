//! Admin login and admin credential-reset flows.

use std::sync::Arc;

use uuid::Uuid;

use hut_core::ratelimit::SlidingWindowLimiter;

use crate::crypto::CredentialHasher;
use crate::domain::repository::{Mailer, PendingActionStore, UserDirectory};
use crate::domain::types::{AdminCredentials, FlowKind, PendingPayload};
use crate::domain::validate::{
    normalize_email, validate_email, validate_otp, validate_password, validate_username,
};
use crate::error::AuthServiceError;
use crate::usecase::flow::{check_send_quota, issue_and_dispatch, redeem};
use crate::usecase::session::issue_session_token;

// ── Request half (shared by login and reset) ──────────────────────────────────

pub struct AdminOtpRequestInput {
    pub email: String,
}

/// Request half for `AdminLogin` and `AdminReset`. Both flows target the
/// single configured admin address and answer identically whether or not the
/// submitted email matches it — callers cannot probe for the admin account.
pub struct AdminOtpRequestUseCase<S: PendingActionStore, M: Mailer> {
    pub store: S,
    pub mailer: M,
    pub limiter: Arc<SlidingWindowLimiter>,
    pub admin_email: String,
    pub otp_secret: String,
    pub flow: FlowKind,
}

impl<S: PendingActionStore, M: Mailer> AdminOtpRequestUseCase<S, M> {
    pub async fn execute(&self, input: AdminOtpRequestInput) -> Result<(), AuthServiceError> {
        let email = normalize_email(&input.email);
        validate_email(&email)?;
        check_send_quota(&self.limiter, self.flow, &email)?;

        if email != self.admin_email {
            return Ok(());
        }

        issue_and_dispatch(
            &self.store,
            &self.mailer,
            &self.otp_secret,
            &email,
            self.flow,
            PendingPayload::None,
            &email,
        )
        .await
    }
}

// ── Login verify ──────────────────────────────────────────────────────────────

pub struct AdminLoginVerifyInput {
    pub email: String,
    pub otp: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct AdminLoginVerifyOutput {
    pub admin: AdminCredentials,
    pub token: String,
    pub token_exp: u64,
}

/// Verify half of `AdminLogin`: redeem the code, then check the stored
/// credentials, then mint a session token. A wrong password burns the code
/// like any other failed verify.
pub struct AdminLoginVerifyUseCase<S: PendingActionStore, D: UserDirectory> {
    pub store: S,
    pub directory: D,
    pub hasher: Arc<CredentialHasher>,
    pub otp_secret: String,
    pub jwt_secret: String,
}

impl<S: PendingActionStore, D: UserDirectory> AdminLoginVerifyUseCase<S, D> {
    pub async fn execute(
        &self,
        input: AdminLoginVerifyInput,
    ) -> Result<AdminLoginVerifyOutput, AuthServiceError> {
        let email = normalize_email(&input.email);
        validate_email(&email)?;
        validate_otp(&input.otp)?;

        redeem(
            &self.store,
            &self.otp_secret,
            &email,
            FlowKind::AdminLogin,
            &input.otp,
        )
        .await?;

        // Bad credentials are indistinguishable from a bad code.
        let admin = self
            .directory
            .admin_credentials()
            .await?
            .ok_or(AuthServiceError::Verification)?;
        if admin.username != input.username {
            return Err(AuthServiceError::Verification);
        }
        if !self.hasher.verify(&input.password, &admin.password_hash)? {
            return Err(AuthServiceError::Verification);
        }

        let (token, token_exp) = issue_session_token(admin.id, &self.jwt_secret)?;
        Ok(AdminLoginVerifyOutput {
            admin,
            token,
            token_exp,
        })
    }
}

// ── Credential reset ──────────────────────────────────────────────────────────

pub struct AdminResetInput {
    pub email: String,
    pub otp: String,
    pub new_username: String,
    pub new_password: String,
}

/// Verify half of `AdminReset`: redeem the code, then upsert the singleton
/// credential row. Creates it on first use, keeping the existing id on
/// subsequent resets so outstanding sessions keep a stable subject.
pub struct AdminResetUseCase<S: PendingActionStore, D: UserDirectory> {
    pub store: S,
    pub directory: D,
    pub hasher: Arc<CredentialHasher>,
    pub otp_secret: String,
    pub admin_email: String,
}

impl<S: PendingActionStore, D: UserDirectory> AdminResetUseCase<S, D> {
    pub async fn execute(&self, input: AdminResetInput) -> Result<(), AuthServiceError> {
        let email = normalize_email(&input.email);
        validate_email(&email)?;
        validate_otp(&input.otp)?;
        validate_username(&input.new_username)?;
        validate_password(&input.new_password)?;

        redeem(
            &self.store,
            &self.otp_secret,
            &email,
            FlowKind::AdminReset,
            &input.otp,
        )
        .await?;

        let password_hash = self.hasher.hash(&input.new_password)?;
        let id = self
            .directory
            .admin_credentials()
            .await?
            .map(|c| c.id)
            .unwrap_or_else(Uuid::new_v4);
        self.directory
            .upsert_admin_credentials(&AdminCredentials {
                id,
                email: self.admin_email.clone(),
                username: input.new_username,
                password_hash,
            })
            .await?;
        Ok(())
    }
}
