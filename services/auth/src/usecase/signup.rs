//! User signup flow: prove control of the inbox before any account exists.

use std::sync::Arc;

use anyhow::anyhow;

use hut_core::ratelimit::SlidingWindowLimiter;

use crate::crypto::CredentialHasher;
use crate::domain::repository::{Mailer, PendingActionStore, UserDirectory};
use crate::domain::types::{DirectoryUser, FlowKind, NewUser, PendingPayload};
use crate::domain::validate::{
    normalize_email, validate_email, validate_otp, validate_password, validate_username,
};
use crate::error::AuthServiceError;
use crate::usecase::flow::{check_send_quota, issue_and_dispatch, redeem};

pub struct SignupRequestInput {
    pub email: String,
    pub name: String,
    pub username: String,
    pub password: String,
}

/// Request half: validate, check uniqueness, park the (pre-hashed) account
/// data with the code. Signup is not enumeration-sensitive — duplicates get
/// specific errors so the form can react.
pub struct SignupRequestUseCase<S: PendingActionStore, M: Mailer, D: UserDirectory> {
    pub store: S,
    pub mailer: M,
    pub directory: D,
    pub limiter: Arc<SlidingWindowLimiter>,
    pub hasher: Arc<CredentialHasher>,
    pub otp_secret: String,
}

impl<S: PendingActionStore, M: Mailer, D: UserDirectory> SignupRequestUseCase<S, M, D> {
    pub async fn execute(&self, input: SignupRequestInput) -> Result<(), AuthServiceError> {
        let email = normalize_email(&input.email);
        validate_email(&email)?;
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AuthServiceError::Validation("Name is required".to_owned()));
        }
        validate_username(&input.username)?;
        validate_password(&input.password)?;

        check_send_quota(&self.limiter, FlowKind::UserSignup, &email)?;

        if self.directory.find_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::Precondition(
                "Email already registered".to_owned(),
            ));
        }
        if self
            .directory
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AuthServiceError::Precondition(
                "Username already taken".to_owned(),
            ));
        }

        // Hash now so the plaintext password is gone before the code parks.
        let password_hash = self.hasher.hash(&input.password)?;
        issue_and_dispatch(
            &self.store,
            &self.mailer,
            &self.otp_secret,
            &email,
            FlowKind::UserSignup,
            PendingPayload::Signup {
                name: name.to_owned(),
                username: input.username,
                password_hash,
            },
            &email,
        )
        .await
    }
}

pub struct SignupVerifyInput {
    pub email: String,
    pub otp: String,
}

/// Verify half: redeem the code and create the durable account from the
/// payload captured at request time.
pub struct SignupVerifyUseCase<S: PendingActionStore, D: UserDirectory> {
    pub store: S,
    pub directory: D,
    pub otp_secret: String,
}

impl<S: PendingActionStore, D: UserDirectory> SignupVerifyUseCase<S, D> {
    pub async fn execute(
        &self,
        input: SignupVerifyInput,
    ) -> Result<DirectoryUser, AuthServiceError> {
        let email = normalize_email(&input.email);
        validate_email(&email)?;
        validate_otp(&input.otp)?;

        let action = redeem(
            &self.store,
            &self.otp_secret,
            &email,
            FlowKind::UserSignup,
            &input.otp,
        )
        .await?;

        let PendingPayload::Signup {
            name,
            username,
            password_hash,
        } = action.payload
        else {
            return Err(AuthServiceError::Internal(anyhow!(
                "signup action carried a non-signup payload"
            )));
        };

        self.directory
            .create_user(&NewUser {
                email,
                name,
                username,
                password_hash,
            })
            .await
    }
}
