use std::sync::Arc;

use tracing::{info, warn};

use hut_auth::config::AuthConfig;
use hut_auth::crypto::CredentialHasher;
use hut_auth::domain::types::{
    IP_REQUESTS_PER_WINDOW, IP_WINDOW_SECS, OTP_SEND_WINDOW_SECS, OTP_SENDS_PER_WINDOW,
};
use hut_auth::infra::cache::RedisPendingStore;
use hut_auth::infra::directory::{HttpUserDirectory, MemoryUserDirectory};
use hut_auth::infra::mailer::{HttpMailer, LogMailer};
use hut_auth::infra::memory::MemoryPendingStore;
use hut_auth::infra::{Directory, MailerBackend, PendingStore};
use hut_auth::router::build_router;
use hut_auth::state::AppState;
use hut_core::ratelimit::SlidingWindowLimiter;
use hut_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();

    // Fail closed: no weaker hash is substituted if the parameters are bad.
    let hasher = CredentialHasher::new().expect("failed to initialize password hashing");

    let pending = match &config.redis_url {
        Some(url) => {
            let redis_cfg = deadpool_redis::Config::from_url(url);
            let pool = redis_cfg
                .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                .expect("failed to create Redis pool");
            PendingStore::Redis(RedisPendingStore { pool })
        }
        None => PendingStore::Memory(MemoryPendingStore::new()),
    };

    let directory = match (&config.directory_url, &config.directory_api_key) {
        (Some(url), Some(key)) => Directory::Http(
            HttpUserDirectory::new(url.clone(), key.clone())
                .expect("failed to build directory client"),
        ),
        _ => {
            warn!("DIRECTORY_URL not set; using in-memory user directory (development only)");
            Directory::Memory(MemoryUserDirectory::new())
        }
    };

    let mailer = match (&config.mailer_url, &config.mailer_api_key) {
        (Some(url), Some(key)) => MailerBackend::Http(
            HttpMailer::new(url.clone(), key.clone(), config.mailer_sender.clone())
                .expect("failed to build mailer client"),
        ),
        _ => {
            warn!("MAILER_URL not set; verification codes are logged, not sent");
            MailerBackend::Log(LogMailer)
        }
    };

    let state = AppState {
        pending,
        directory,
        mailer,
        otp_limiter: Arc::new(SlidingWindowLimiter::new(
            OTP_SENDS_PER_WINDOW,
            OTP_SEND_WINDOW_SECS,
        )),
        ip_limiter: Arc::new(SlidingWindowLimiter::new(
            IP_REQUESTS_PER_WINDOW,
            IP_WINDOW_SECS,
        )),
        hasher: Arc::new(hasher),
        admin_email: config.admin_email,
        otp_secret: config.otp_secret,
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        cookie_secure: config.cookie_secure,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
