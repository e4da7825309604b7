pub mod cache;
pub mod directory;
pub mod mailer;
pub mod memory;

use uuid::Uuid;

use crate::domain::repository::{Mailer, PendingActionStore, UserDirectory};
use crate::domain::types::{AdminCredentials, DirectoryUser, FlowKind, NewUser, PendingAction};
use crate::error::AuthServiceError;

// Backend selection happens once at startup; handlers hold these enums so
// `AppState` stays concrete while each port keeps its swappable adapters.

/// Pending-action backend: process-local by default, Redis when configured.
#[derive(Clone)]
pub enum PendingStore {
    Memory(memory::MemoryPendingStore),
    Redis(cache::RedisPendingStore),
}

impl PendingActionStore for PendingStore {
    async fn put(&self, action: &PendingAction) -> Result<(), AuthServiceError> {
        match self {
            Self::Memory(store) => store.put(action).await,
            Self::Redis(store) => store.put(action).await,
        }
    }

    async fn get(
        &self,
        subject_key: &str,
        flow: FlowKind,
    ) -> Result<Option<PendingAction>, AuthServiceError> {
        match self {
            Self::Memory(store) => store.get(subject_key, flow).await,
            Self::Redis(store) => store.get(subject_key, flow).await,
        }
    }

    async fn consume(
        &self,
        subject_key: &str,
        flow: FlowKind,
    ) -> Result<Option<PendingAction>, AuthServiceError> {
        match self {
            Self::Memory(store) => store.consume(subject_key, flow).await,
            Self::Redis(store) => store.consume(subject_key, flow).await,
        }
    }
}

/// User-directory backend: the external HTTP store, or in-memory for dev.
#[derive(Clone)]
pub enum Directory {
    Http(directory::HttpUserDirectory),
    Memory(directory::MemoryUserDirectory),
}

impl UserDirectory for Directory {
    async fn find_by_email(&self, email: &str) -> Result<Option<DirectoryUser>, AuthServiceError> {
        match self {
            Self::Http(d) => d.find_by_email(email).await,
            Self::Memory(d) => d.find_by_email(email).await,
        }
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<DirectoryUser>, AuthServiceError> {
        match self {
            Self::Http(d) => d.find_by_username(username).await,
            Self::Memory(d) => d.find_by_username(username).await,
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DirectoryUser>, AuthServiceError> {
        match self {
            Self::Http(d) => d.find_by_id(id).await,
            Self::Memory(d) => d.find_by_id(id).await,
        }
    }

    async fn create_user(&self, user: &NewUser) -> Result<DirectoryUser, AuthServiceError> {
        match self {
            Self::Http(d) => d.create_user(user).await,
            Self::Memory(d) => d.create_user(user).await,
        }
    }

    async fn update_email(&self, user_id: Uuid, new_email: &str) -> Result<(), AuthServiceError> {
        match self {
            Self::Http(d) => d.update_email(user_id, new_email).await,
            Self::Memory(d) => d.update_email(user_id, new_email).await,
        }
    }

    async fn set_password(&self, email: &str, new_password: &str) -> Result<(), AuthServiceError> {
        match self {
            Self::Http(d) => d.set_password(email, new_password).await,
            Self::Memory(d) => d.set_password(email, new_password).await,
        }
    }

    async fn admin_credentials(&self) -> Result<Option<AdminCredentials>, AuthServiceError> {
        match self {
            Self::Http(d) => d.admin_credentials().await,
            Self::Memory(d) => d.admin_credentials().await,
        }
    }

    async fn upsert_admin_credentials(
        &self,
        credentials: &AdminCredentials,
    ) -> Result<(), AuthServiceError> {
        match self {
            Self::Http(d) => d.upsert_admin_credentials(credentials).await,
            Self::Memory(d) => d.upsert_admin_credentials(credentials).await,
        }
    }
}

/// Outbound-mail backend: HTTP provider, log-only for dev, capture for tests.
#[derive(Clone)]
pub enum MailerBackend {
    Http(mailer::HttpMailer),
    Log(mailer::LogMailer),
    Memory(mailer::MemoryMailer),
}

impl Mailer for MailerBackend {
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), AuthServiceError> {
        match self {
            Self::Http(m) => m.send_otp(to, code).await,
            Self::Log(m) => m.send_otp(to, code).await,
            Self::Memory(m) => m.send_otp(to, code).await,
        }
    }
}
