//! Email-change flow: the code goes to the address being adopted, so the
//! rotation proves control of the new inbox.

use std::sync::Arc;

use anyhow::anyhow;
use uuid::Uuid;

use hut_core::ratelimit::SlidingWindowLimiter;

use crate::domain::repository::{Mailer, PendingActionStore, UserDirectory};
use crate::domain::types::{FlowKind, PendingPayload};
use crate::domain::validate::{normalize_email, validate_email, validate_otp};
use crate::error::AuthServiceError;
use crate::usecase::flow::{check_send_quota, issue_and_dispatch, redeem};

fn parse_user_id(raw: &str) -> Result<Uuid, AuthServiceError> {
    raw.parse()
        .map_err(|_| AuthServiceError::Validation("Invalid user id".to_owned()))
}

pub struct EmailChangeRequestInput {
    pub user_id: String,
    pub current_email: String,
    pub new_email: String,
}

/// Request half: the caller must own the claimed current address, and the
/// new address must not belong to another account. Both are checked before
/// any code is generated.
pub struct EmailChangeRequestUseCase<S: PendingActionStore, M: Mailer, D: UserDirectory> {
    pub store: S,
    pub mailer: M,
    pub directory: D,
    pub limiter: Arc<SlidingWindowLimiter>,
    pub otp_secret: String,
}

impl<S: PendingActionStore, M: Mailer, D: UserDirectory> EmailChangeRequestUseCase<S, M, D> {
    pub async fn execute(&self, input: EmailChangeRequestInput) -> Result<(), AuthServiceError> {
        let user_id = parse_user_id(&input.user_id)?;
        let current_email = normalize_email(&input.current_email);
        let new_email = normalize_email(&input.new_email);
        validate_email(&current_email)?;
        validate_email(&new_email)?;
        if current_email == new_email {
            return Err(AuthServiceError::Validation(
                "New email must differ from the current email".to_owned(),
            ));
        }

        check_send_quota(&self.limiter, FlowKind::EmailChange, &user_id.to_string())?;

        let owns_current = self
            .directory
            .find_by_id(user_id)
            .await?
            .is_some_and(|user| normalize_email(&user.email) == current_email);
        if !owns_current {
            return Err(AuthServiceError::Precondition(
                "Current email does not match our records".to_owned(),
            ));
        }

        if self
            .directory
            .find_by_email(&new_email)
            .await?
            .is_some_and(|other| other.id != user_id)
        {
            return Err(AuthServiceError::Precondition(
                "Email already in use".to_owned(),
            ));
        }

        issue_and_dispatch(
            &self.store,
            &self.mailer,
            &self.otp_secret,
            &user_id.to_string(),
            FlowKind::EmailChange,
            PendingPayload::EmailChange {
                current_email,
                new_email: new_email.clone(),
            },
            &new_email,
        )
        .await
    }
}

pub struct EmailChangeVerifyInput {
    pub user_id: String,
    pub otp: String,
}

/// Verify half: redeem the code and rotate the account's email of record to
/// the address captured at request time.
pub struct EmailChangeVerifyUseCase<S: PendingActionStore, D: UserDirectory> {
    pub store: S,
    pub directory: D,
    pub otp_secret: String,
}

impl<S: PendingActionStore, D: UserDirectory> EmailChangeVerifyUseCase<S, D> {
    pub async fn execute(&self, input: EmailChangeVerifyInput) -> Result<(), AuthServiceError> {
        let user_id = parse_user_id(&input.user_id)?;
        validate_otp(&input.otp)?;

        let action = redeem(
            &self.store,
            &self.otp_secret,
            &user_id.to_string(),
            FlowKind::EmailChange,
            &input.otp,
        )
        .await?;

        let PendingPayload::EmailChange { new_email, .. } = action.payload else {
            return Err(AuthServiceError::Internal(anyhow!(
                "email-change action carried a different payload"
            )));
        };

        self.directory.update_email(user_id, &new_email).await
    }
}
