//! Shared request/verify engine behind the five verification flows.
//!
//! Every flow walks the same state machine: a request half that issues a
//! code, and a verify half that redeems it exactly once. The per-flow use
//! cases own validation, preconditions, and the terminal mutation.

use chrono::Utc;

use hut_core::ratelimit::SlidingWindowLimiter;

use crate::crypto;
use crate::domain::repository::{Mailer, PendingActionStore};
use crate::domain::types::{FlowKind, PendingAction, PendingPayload};
use crate::error::AuthServiceError;

/// Admit or reject a code send for this subject.
///
/// Checked before flow preconditions so throttling behaves identically
/// whether or not the identity exists.
pub fn check_send_quota(
    limiter: &SlidingWindowLimiter,
    flow: FlowKind,
    subject_key: &str,
) -> Result<(), AuthServiceError> {
    let key = format!("{}:{}", flow.tag(), subject_key);
    if limiter.check(&key) {
        Ok(())
    } else {
        Err(AuthServiceError::RateLimited)
    }
}

/// Generate a code, store its hash as the sole pending action for this
/// subject and flow, and dispatch the plaintext out of band.
///
/// The store write happens first: a dispatch failure leaves the action in
/// place, so the caller sees a delivery error and retries with a fresh code.
pub async fn issue_and_dispatch<S, M>(
    store: &S,
    mailer: &M,
    otp_secret: &str,
    subject_key: &str,
    flow: FlowKind,
    payload: PendingPayload,
    recipient: &str,
) -> Result<(), AuthServiceError>
where
    S: PendingActionStore,
    M: Mailer,
{
    let code = crypto::generate_otp();
    let now = Utc::now();
    let action = PendingAction {
        subject_key: subject_key.to_owned(),
        flow,
        otp_hash: crypto::hash_otp(&code, otp_secret),
        payload,
        created_at: now,
        expires_at: now + flow.ttl(),
    };
    store.put(&action).await?;
    mailer.send_otp(recipient, &code).await?;
    Ok(())
}

/// Consume the pending action and check the submitted code against it.
///
/// Consumption comes before comparison: a wrong code burns the action, and a
/// second submit of the right code finds nothing. Wrong, expired, and absent
/// all surface as the same error.
pub async fn redeem<S: PendingActionStore>(
    store: &S,
    otp_secret: &str,
    subject_key: &str,
    flow: FlowKind,
    otp: &str,
) -> Result<PendingAction, AuthServiceError> {
    let action = store
        .consume(subject_key, flow)
        .await?
        .ok_or(AuthServiceError::Verification)?;
    if action.otp_hash != crypto::hash_otp(otp, otp_secret) {
        return Err(AuthServiceError::Verification);
    }
    Ok(action)
}
