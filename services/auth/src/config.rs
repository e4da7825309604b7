/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// The single admin account's email; admin flows only ever target this
    /// address. Env var: `ADMIN_EMAIL`.
    pub admin_email: String,
    /// Server-side secret mixed into stored OTP hashes.
    pub otp_secret: String,
    /// HMAC secret for signing admin session tokens.
    pub jwt_secret: String,
    /// Cookie domain attribute (root domain, e.g. "researcher.hut").
    pub cookie_domain: String,
    /// Whether the session cookie carries the Secure attribute. On by
    /// default; set `COOKIE_SECURE=false` for local HTTP development.
    pub cookie_secure: bool,
    /// Optional Redis URL. When set, pending actions live in Redis so
    /// multiple instances share them; otherwise they are process-local.
    pub redis_url: Option<String>,
    /// Optional user-directory API base URL and key. When unset, an
    /// in-memory directory backs the service (development only).
    pub directory_url: Option<String>,
    pub directory_api_key: Option<String>,
    /// Optional mail-provider API URL and key. When unset, verification
    /// codes are logged instead of sent (development only).
    pub mailer_url: Option<String>,
    pub mailer_api_key: Option<String>,
    /// Sender address for outbound verification emails.
    pub mailer_sender: String,
    /// TCP port to listen on (default 3200). Env var: `AUTH_PORT`.
    pub auth_port: u16,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            admin_email: std::env::var("ADMIN_EMAIL")
                .expect("ADMIN_EMAIL")
                .trim()
                .to_lowercase(),
            otp_secret: std::env::var("OTP_SECRET").expect("OTP_SECRET"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .map(|v| v != "false")
                .unwrap_or(true),
            redis_url: std::env::var("REDIS_URL").ok(),
            directory_url: std::env::var("DIRECTORY_URL").ok(),
            directory_api_key: std::env::var("DIRECTORY_API_KEY").ok(),
            mailer_url: std::env::var("MAILER_URL").ok(),
            mailer_api_key: std::env::var("MAILER_API_KEY").ok(),
            mailer_sender: std::env::var("MAILER_SENDER")
                .unwrap_or_else(|_| "no-reply@researcher.hut".to_owned()),
            auth_port: std::env::var("AUTH_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3200),
        }
    }
}
