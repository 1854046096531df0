use actix_web::cookie::Key;

use crate::errors::AppError;

const DEFAULT_DATABASE_URL: &str = "sqlite://freelancer_dashboard.db";
const DEFAULT_COOKIE_PREFIX: &str = "fd-";

/// Runtime settings read from the environment.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub session_key: Key,
    /// Any cookie whose name starts with this counts as a session for the route gate.
    pub session_cookie_prefix: String,
    pub session_cookie_secure: bool,
    pub site_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("session_cookie_prefix", &self.session_cookie_prefix)
            .field("session_cookie_secure", &self.session_cookie_secure)
            .field("site_url", &self.site_url)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Call `dotenvy::dotenv()` first if `.env` should be honoured.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key_str = lookup("SESSION_KEY").ok_or_else(|| {
            log::error!("FATAL: SESSION_KEY environment variable not set");
            AppError::ConfigError("SESSION_KEY is not set".to_owned())
        })?;
        let session_key = Key::try_from(key_str.as_bytes()).map_err(|e| {
            AppError::ConfigError(format!("SESSION_KEY must be at least 64 bytes: {}", e))
        })?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::ConfigError(format!("PORT is not a valid port: {}", raw)))?,
            None => 8080,
        };

        let session_cookie_secure = match lookup("SESSION_COOKIE_SECURE") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                AppError::ConfigError(format!("SESSION_COOKIE_SECURE is not a boolean: {}", raw))
            })?,
            None => true,
        };

        let session_cookie_prefix = lookup("SESSION_COOKIE_PREFIX")
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_COOKIE_PREFIX.to_owned());

        Ok(Config {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port,
            session_key,
            session_cookie_prefix,
            session_cookie_secure,
            site_url: lookup("SITE_URL")
                .map(|url| url.trim_end_matches('/').to_owned())
                .unwrap_or_else(|| format!("http://localhost:{}", port)),
        })
    }

    pub fn session_cookie_name(&self) -> String {
        session_cookie_name(&self.session_cookie_prefix)
    }
}

/// Name of the cookie the session middleware writes.
pub fn session_cookie_name(prefix: &str) -> String {
    format!("{}session", prefix)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
