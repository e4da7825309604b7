use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;

use crate::domain::repository::Mailer;
use crate::error::AuthServiceError;

/// Timeout for mail-provider calls. A slow provider must not hang a request;
/// timing out counts as a delivery failure.
const MAILER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct EmailAddress {
    email: String,
}

/// Transactional-email provider payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: String,
    text_content: String,
}

/// Sends codes through an HTTP mail-provider API.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    url: String,
    api_key: String,
    sender: String,
}

impl HttpMailer {
    pub fn new(url: String, api_key: String, sender: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(MAILER_TIMEOUT).build()?;
        Ok(Self {
            client,
            url,
            api_key,
            sender,
        })
    }
}

impl Mailer for HttpMailer {
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), AuthServiceError> {
        let body = SendEmailBody {
            sender: EmailAddress {
                email: self.sender.clone(),
            },
            to: vec![EmailAddress {
                email: to.to_owned(),
            }],
            subject: "Your researcher.hut verification code".to_owned(),
            text_content: format!(
                "Your verification code is {code}. It expires in a few minutes. \
                 If you did not request it, you can ignore this email."
            ),
        };
        // Provider detail never reaches the client; it lands in the logs only.
        match self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) => {
                tracing::warn!(status = %response.status(), "mail provider rejected send");
                Err(AuthServiceError::Delivery)
            }
            Err(e) => {
                tracing::warn!(error = %e, "mail provider unreachable");
                Err(AuthServiceError::Delivery)
            }
        }
    }
}

/// Local dev sender that logs the code instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), AuthServiceError> {
        tracing::info!(to = %to, code = %code, "otp email send stub");
        Ok(())
    }
}

/// Capturing sender for tests: records every (recipient, code) pair and can
/// be switched into a failing mode to exercise delivery errors.
#[derive(Clone, Debug, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(recipient, _)| recipient == to)
            .map(|(_, code)| code.clone())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Mailer for MemoryMailer {
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), AuthServiceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AuthServiceError::Delivery);
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((to.to_owned(), code.to_owned()));
        Ok(())
    }
}
