use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::anyhow;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::repository::UserDirectory;
use crate::domain::types::{AdminCredentials, DirectoryUser, NewUser};
use crate::domain::validate::normalize_email;
use crate::error::AuthServiceError;

/// Timeout for directory calls. A slow directory must not hang a request.
const DIRECTORY_TIMEOUT: Duration = Duration::from_secs(5);

// ── HTTP directory client ─────────────────────────────────────────────────────

/// Client for the external user/identity store's REST API.
#[derive(Clone)]
pub struct HttpUserDirectory {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct EmailPatch<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct PasswordReset<'a> {
    email: &'a str,
    password: &'a str,
}

impl HttpUserDirectory {
    pub fn new(base_url: String, api_key: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DIRECTORY_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
        })
    }

    async fn get_optional<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, AuthServiceError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .query(query)
            .header("api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| AuthServiceError::Internal(anyhow!("directory request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AuthServiceError::Internal(anyhow!(
                "directory returned {} for {path}",
                response.status()
            )));
        }
        let value = response.json().await.map_err(|e| {
            AuthServiceError::Internal(anyhow!("directory response malformed: {e}"))
        })?;
        Ok(Some(value))
    }

    async fn send_json<B: Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, AuthServiceError> {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header("api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthServiceError::Internal(anyhow!("directory request failed: {e}")))
    }
}

impl UserDirectory for HttpUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<DirectoryUser>, AuthServiceError> {
        self.get_optional("/users/lookup", &[("email", email)])
            .await
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<DirectoryUser>, AuthServiceError> {
        self.get_optional("/users/lookup", &[("username", username)])
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DirectoryUser>, AuthServiceError> {
        self.get_optional(&format!("/users/{id}"), &[]).await
    }

    async fn create_user(&self, user: &NewUser) -> Result<DirectoryUser, AuthServiceError> {
        let response = self
            .send_json(reqwest::Method::POST, "/users", user)
            .await?;
        if response.status() == reqwest::StatusCode::CONFLICT {
            // Request-time uniqueness checks make this a race loser, not the norm.
            return Err(AuthServiceError::Precondition(
                "Email or username already taken".to_owned(),
            ));
        }
        if !response.status().is_success() {
            return Err(AuthServiceError::Internal(anyhow!(
                "directory returned {} creating user",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| AuthServiceError::Internal(anyhow!("directory response malformed: {e}")))
    }

    async fn update_email(&self, user_id: Uuid, new_email: &str) -> Result<(), AuthServiceError> {
        let response = self
            .send_json(
                reqwest::Method::PATCH,
                &format!("/users/{user_id}/email"),
                &EmailPatch { email: new_email },
            )
            .await?;
        if response.status() == reqwest::StatusCode::CONFLICT {
            return Err(AuthServiceError::Precondition(
                "Email already in use".to_owned(),
            ));
        }
        if !response.status().is_success() {
            return Err(AuthServiceError::Internal(anyhow!(
                "directory returned {} rotating email",
                response.status()
            )));
        }
        Ok(())
    }

    async fn set_password(&self, email: &str, new_password: &str) -> Result<(), AuthServiceError> {
        let response = self
            .send_json(
                reqwest::Method::POST,
                "/users/password",
                &PasswordReset {
                    email,
                    password: new_password,
                },
            )
            .await?;
        if !response.status().is_success() {
            return Err(AuthServiceError::Internal(anyhow!(
                "directory returned {} rotating password",
                response.status()
            )));
        }
        Ok(())
    }

    async fn admin_credentials(&self) -> Result<Option<AdminCredentials>, AuthServiceError> {
        self.get_optional("/admin/credentials", &[]).await
    }

    async fn upsert_admin_credentials(
        &self,
        credentials: &AdminCredentials,
    ) -> Result<(), AuthServiceError> {
        let response = self
            .send_json(reqwest::Method::PUT, "/admin/credentials", credentials)
            .await?;
        if !response.status().is_success() {
            return Err(AuthServiceError::Internal(anyhow!(
                "directory returned {} upserting admin credentials",
                response.status()
            )));
        }
        Ok(())
    }
}

// ── In-memory directory (dev/tests) ───────────────────────────────────────────

#[derive(Debug, Default)]
struct DirectoryInner {
    users: Vec<StoredUser>,
    admin: Option<AdminCredentials>,
}

#[derive(Debug, Clone)]
struct StoredUser {
    user: DirectoryUser,
    /// What the real directory would hash provider-side; kept verbatim here
    /// so tests can observe rotations. Development only.
    password: String,
}

/// In-memory stand-in for the external directory. Backs local development
/// when no `DIRECTORY_URL` is configured, and the integration tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryUserDirectory {
    inner: Arc<Mutex<DirectoryInner>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, DirectoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed an existing account (tests and local fixtures).
    pub fn seed_user(&self, user: DirectoryUser, password: &str) {
        self.lock().users.push(StoredUser {
            user,
            password: password.to_owned(),
        });
    }

    /// Read back the password most recently set for an account.
    pub fn password_of(&self, email: &str) -> Option<String> {
        let email = normalize_email(email);
        self.lock()
            .users
            .iter()
            .find(|s| normalize_email(&s.user.email) == email)
            .map(|s| s.password.clone())
    }
}

impl UserDirectory for MemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<DirectoryUser>, AuthServiceError> {
        let email = normalize_email(email);
        Ok(self
            .lock()
            .users
            .iter()
            .find(|s| normalize_email(&s.user.email) == email)
            .map(|s| s.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<DirectoryUser>, AuthServiceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|s| s.user.username == username)
            .map(|s| s.user.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DirectoryUser>, AuthServiceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|s| s.user.id == id)
            .map(|s| s.user.clone()))
    }

    async fn create_user(&self, user: &NewUser) -> Result<DirectoryUser, AuthServiceError> {
        let mut inner = self.lock();
        let email = normalize_email(&user.email);
        if inner
            .users
            .iter()
            .any(|s| normalize_email(&s.user.email) == email)
        {
            return Err(AuthServiceError::Precondition(
                "Email already registered".to_owned(),
            ));
        }
        if inner.users.iter().any(|s| s.user.username == user.username) {
            return Err(AuthServiceError::Precondition(
                "Username already taken".to_owned(),
            ));
        }
        let created = DirectoryUser {
            id: Uuid::now_v7(),
            email,
            username: user.username.clone(),
            name: user.name.clone(),
        };
        inner.users.push(StoredUser {
            user: created.clone(),
            password: user.password_hash.clone(),
        });
        Ok(created)
    }

    async fn update_email(&self, user_id: Uuid, new_email: &str) -> Result<(), AuthServiceError> {
        let mut inner = self.lock();
        let new_email = normalize_email(new_email);
        if inner
            .users
            .iter()
            .any(|s| s.user.id != user_id && normalize_email(&s.user.email) == new_email)
        {
            return Err(AuthServiceError::Precondition(
                "Email already in use".to_owned(),
            ));
        }
        let stored = inner
            .users
            .iter_mut()
            .find(|s| s.user.id == user_id)
            .ok_or_else(|| anyhow!("no user {user_id} in directory"))?;
        stored.user.email = new_email;
        Ok(())
    }

    async fn set_password(&self, email: &str, new_password: &str) -> Result<(), AuthServiceError> {
        let email = normalize_email(email);
        let mut inner = self.lock();
        let stored = inner
            .users
            .iter_mut()
            .find(|s| normalize_email(&s.user.email) == email)
            .ok_or_else(|| anyhow!("no user with email {email} in directory"))?;
        stored.password = new_password.to_owned();
        Ok(())
    }

    async fn admin_credentials(&self) -> Result<Option<AdminCredentials>, AuthServiceError> {
        Ok(self.lock().admin.clone())
    }

    async fn upsert_admin_credentials(
        &self,
        credentials: &AdminCredentials,
    ) -> Result<(), AuthServiceError> {
        self.lock().admin = Some(credentials.clone());
        Ok(())
    }
}
