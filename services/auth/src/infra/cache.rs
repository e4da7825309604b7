use anyhow::Context as _;
use chrono::Utc;
use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use crate::domain::repository::PendingActionStore;
use crate::domain::types::{FlowKind, PendingAction};
use crate::error::AuthServiceError;

/// Redis-backed pending-action store for multi-instance deployments.
///
/// Keys expire with the action's TTL; `GET_DEL` makes consumption atomic
/// across instances.
#[derive(Clone)]
pub struct RedisPendingStore {
    pub pool: Pool,
}

fn pending_key(flow: FlowKind, subject_key: &str) -> String {
    format!("pending:{}:{}", flow.tag(), subject_key)
}

fn decode_live(value: Option<Vec<u8>>) -> Result<Option<PendingAction>, AuthServiceError> {
    let Some(bytes) = value else {
        return Ok(None);
    };
    let action: PendingAction = serde_json::from_slice(&bytes).context("decode pending action")?;
    // Redis TTL normally evicts first; the check covers clock skew.
    Ok((!action.is_expired()).then_some(action))
}

impl PendingActionStore for RedisPendingStore {
    async fn put(&self, action: &PendingAction) -> Result<(), AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let key = pending_key(action.flow, &action.subject_key);
        let bytes = serde_json::to_vec(action).context("encode pending action")?;
        let ttl = (action.expires_at - Utc::now()).num_seconds().max(1) as u64;
        let (): () = conn
            .set_ex(&key, bytes, ttl)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(())
    }

    async fn get(
        &self,
        subject_key: &str,
        flow: FlowKind,
    ) -> Result<Option<PendingAction>, AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let key = pending_key(flow, subject_key);
        let value: Option<Vec<u8>> = conn
            .get(&key)
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        decode_live(value)
    }

    async fn consume(
        &self,
        subject_key: &str,
        flow: FlowKind,
    ) -> Result<Option<PendingAction>, AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let key = pending_key(flow, subject_key);
        let value: Option<Vec<u8>> = conn
            .get_del(&key)
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        decode_live(value)
    }
}
