/// Development-only signing key used when `JWT_SECRET` is not set.
/// Tokens signed with it can be forged by anyone who reads this file.
pub const FALLBACK_JWT_SECRET: &str = "fallback-secret-key";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 8;

pub const DEMO_EMAIL: &str = "admin@usulan-asmas.com";
pub const DEMO_PASSWORD: &str = "admin123";
pub const DEMO_USER_ID: &str = "1";
pub const DEMO_ROLE: &str = "admin";

/// Hosts that mark a database URL as a build-time placeholder rather than a real backend.
const PLACEHOLDER_HOSTS: &[&str] = &["placeholder", "placeholder.supabase.co"];

/// Process configuration, read once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub jwt_secret_is_fallback: bool,
    /// `None` when the backend is not configured (unset, empty or placeholder).
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub public_base_url: String,
    pub bind_addr: String,
    pub demo_email: String,
    pub demo_password: String,
}

impl AppConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Failed to load .env file: {e}");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let (jwt_secret, jwt_secret_is_fallback) = match get("JWT_SECRET") {
            Some(secret) => (secret, false),
            None => (FALLBACK_JWT_SECRET.to_string(), true),
        };

        let database_max_connections = get("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        AppConfig {
            jwt_secret,
            jwt_secret_is_fallback,
            database_url: get("DATABASE_URL").filter(|url| !is_placeholder_url(url)),
            database_max_connections,
            public_base_url: get("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string()),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            demo_email: get("DEMO_EMAIL").unwrap_or_else(|| DEMO_EMAIL.to_string()),
            demo_password: get("DEMO_PASSWORD").unwrap_or_else(|| DEMO_PASSWORD.to_string()),
        }
    }

    pub fn database_configured(&self) -> bool {
        self.database_url.is_some()
    }
}

/// True when the URL's host is one of the known placeholder hosts.
pub fn is_placeholder_url(url: &str) -> bool {
    let after_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let authority = after_scheme.split(['/', '?']).next().unwrap_or("");
    let host_port = authority.rsplit('@').next().unwrap_or("");
    let host = host_port.split(':').next().unwrap_or("");
    PLACEHOLDER_HOSTS.contains(&host.to_ascii_lowercase().as_str())
}
