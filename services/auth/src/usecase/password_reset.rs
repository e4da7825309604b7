//! Password-reset flow. Whether the address is registered never shows in the
//! response; the new password is hashed by the identity provider, not here.

use std::sync::Arc;

use hut_core::ratelimit::SlidingWindowLimiter;

use crate::domain::repository::{Mailer, PendingActionStore, UserDirectory};
use crate::domain::types::{FlowKind, PendingPayload};
use crate::domain::validate::{normalize_email, validate_email, validate_otp, validate_password};
use crate::error::AuthServiceError;
use crate::usecase::flow::{check_send_quota, issue_and_dispatch, redeem};

pub struct PasswordResetRequestInput {
    pub email: String,
}

/// Request half: unknown addresses get the same Ok as a real send.
pub struct PasswordResetRequestUseCase<S: PendingActionStore, M: Mailer, D: UserDirectory> {
    pub store: S,
    pub mailer: M,
    pub directory: D,
    pub limiter: Arc<SlidingWindowLimiter>,
    pub otp_secret: String,
}

impl<S: PendingActionStore, M: Mailer, D: UserDirectory> PasswordResetRequestUseCase<S, M, D> {
    pub async fn execute(&self, input: PasswordResetRequestInput) -> Result<(), AuthServiceError> {
        let email = normalize_email(&input.email);
        validate_email(&email)?;
        check_send_quota(&self.limiter, FlowKind::PasswordReset, &email)?;

        if self.directory.find_by_email(&email).await?.is_none() {
            return Ok(());
        }

        issue_and_dispatch(
            &self.store,
            &self.mailer,
            &self.otp_secret,
            &email,
            FlowKind::PasswordReset,
            PendingPayload::None,
            &email,
        )
        .await
    }
}

pub struct PasswordResetInput {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

/// Verify half: redeem the code and hand the new plaintext to the directory,
/// which hashes it provider-side.
pub struct PasswordResetUseCase<S: PendingActionStore, D: UserDirectory> {
    pub store: S,
    pub directory: D,
    pub otp_secret: String,
}

impl<S: PendingActionStore, D: UserDirectory> PasswordResetUseCase<S, D> {
    pub async fn execute(&self, input: PasswordResetInput) -> Result<(), AuthServiceError> {
        let email = normalize_email(&input.email);
        validate_email(&email)?;
        validate_otp(&input.otp)?;
        validate_password(&input.new_password)?;

        redeem(
            &self.store,
            &self.otp_secret,
            &email,
            FlowKind::PasswordReset,
            &input.otp,
        )
        .await?;

        self.directory
            .set_password(&email, &input.new_password)
            .await
    }
}
