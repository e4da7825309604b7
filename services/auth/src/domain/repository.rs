#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{AdminCredentials, DirectoryUser, FlowKind, NewUser, PendingAction};
use crate::error::AuthServiceError;

/// Store for in-flight verification actions.
///
/// The contract every backend must honor: `put` supersedes any live action
/// for the same subject and flow, `consume` is atomic (two racing verifies
/// cannot both receive the record), and expired records read as absent from
/// every method. Backends need no durability — losing in-flight actions on
/// restart is accepted.
pub trait PendingActionStore: Send + Sync {
    /// Insert the action, overwriting any live action for its key + flow.
    async fn put(&self, action: &PendingAction) -> Result<(), AuthServiceError>;

    /// Read the live action, if any. Opportunistically evicts expired ones.
    async fn get(
        &self,
        subject_key: &str,
        flow: FlowKind,
    ) -> Result<Option<PendingAction>, AuthServiceError>;

    /// Atomically remove and return the live action, if any.
    async fn consume(
        &self,
        subject_key: &str,
        flow: FlowKind,
    ) -> Result<Option<PendingAction>, AuthServiceError>;
}

/// Port to the durable user/identity store (accounts, profiles, and the
/// single admin credential row).
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<DirectoryUser>, AuthServiceError>;

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<DirectoryUser>, AuthServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DirectoryUser>, AuthServiceError>;

    /// Create the identity and profile records for a verified signup.
    async fn create_user(&self, user: &NewUser) -> Result<DirectoryUser, AuthServiceError>;

    /// Rotate the account's email of record.
    async fn update_email(&self, user_id: Uuid, new_email: &str) -> Result<(), AuthServiceError>;

    /// Rotate the account's password. The directory hashes the value; this
    /// service never stores user passwords itself.
    async fn set_password(&self, email: &str, new_password: &str) -> Result<(), AuthServiceError>;

    async fn admin_credentials(&self) -> Result<Option<AdminCredentials>, AuthServiceError>;

    async fn upsert_admin_credentials(
        &self,
        credentials: &AdminCredentials,
    ) -> Result<(), AuthServiceError>;
}

/// Outbound delivery of plaintext verification codes.
///
/// Failures surface as [`AuthServiceError::Delivery`]; provider detail stays
/// in the logs. Implementations must bound their own timeouts so a slow
/// provider cannot hang a request.
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), AuthServiceError>;
}
