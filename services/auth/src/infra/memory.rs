use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::repository::PendingActionStore;
use crate::domain::types::{FlowKind, PendingAction};
use crate::error::AuthServiceError;

/// Process-local pending-action store, the default backend.
///
/// In-flight codes die with the process; the user requests a fresh one.
#[derive(Clone, Debug, Default)]
pub struct MemoryPendingStore {
    actions: Arc<Mutex<HashMap<(String, FlowKind), PendingAction>>>,
}

impl MemoryPendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(String, FlowKind), PendingAction>> {
        self.actions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PendingActionStore for MemoryPendingStore {
    async fn put(&self, action: &PendingAction) -> Result<(), AuthServiceError> {
        // Insert overwrites: a resend supersedes the previous code.
        self.lock()
            .insert((action.subject_key.clone(), action.flow), action.clone());
        Ok(())
    }

    async fn get(
        &self,
        subject_key: &str,
        flow: FlowKind,
    ) -> Result<Option<PendingAction>, AuthServiceError> {
        let key = (subject_key.to_owned(), flow);
        let mut actions = self.lock();
        match actions.get(&key) {
            Some(action) if action.is_expired() => {
                actions.remove(&key);
                Ok(None)
            }
            Some(action) => Ok(Some(action.clone())),
            None => Ok(None),
        }
    }

    async fn consume(
        &self,
        subject_key: &str,
        flow: FlowKind,
    ) -> Result<Option<PendingAction>, AuthServiceError> {
        // Remove-then-check under one lock: two racing verifies cannot both
        // receive the record.
        let removed = self.lock().remove(&(subject_key.to_owned(), flow));
        Ok(removed.filter(|action| !action.is_expired()))
    }
}
