//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_DATABASE_URL, DEFAULT_REDIS_URL,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SESSION_TTL_DAYS,
    MIN_SESSION_SECRET_LENGTH, SECONDS_PER_DAY, SESSION_BACKEND_MEMORY, SESSION_BACKEND_REDIS,
};
use crate::errors::{AppError, AppResult};

/// Where server-side session records live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Redis,
    Memory,
}

impl SessionBackend {
    fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            SESSION_BACKEND_REDIS => Ok(SessionBackend::Redis),
            SESSION_BACKEND_MEMORY => Ok(SessionBackend::Memory),
            other => Err(AppError::internal(format!(
                "Unknown SESSION_BACKEND '{}'",
                other
            ))),
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub redis_url: String,
    session_secret: String,
    pub session_ttl_days: i64,
    pub session_backend: SessionBackend,
    pub cookie_secure: bool,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("database_max_connections", &self.database_max_connections)
            .field("redis_url", &"[REDACTED]")
            .field("session_secret", &"[REDACTED]")
            .field("session_ttl_days", &self.session_ttl_days)
            .field("session_backend", &self.session_backend)
            .field("cookie_secure", &self.cookie_secure)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails if SESSION_SECRET is missing in a release build or shorter
    /// than the minimum length.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("SESSION_SECRET not set, using insecure default for development");
                "dev-session-secret-minimum-32-chars!".to_string()
            }
            Err(_) => {
                return Err(AppError::internal(
                    "SESSION_SECRET environment variable must be set in production",
                ))
            }
        };

        let mut config = Self::with_session_secret(session_secret)?;

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(max) = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.database_max_connections = max;
        }
        if let Ok(url) = env::var("REDIS_URL") {
            config.redis_url = url;
        }
        if let Some(days) = env::var("SESSION_TTL_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|days| *days > 0)
        {
            config.session_ttl_days = days;
        }
        if let Ok(backend) = env::var("SESSION_BACKEND") {
            config.session_backend = SessionBackend::parse(&backend)?;
        }
        if let Some(secure) = env::var("COOKIE_SECURE").ok().and_then(|v| v.parse().ok()) {
            config.cookie_secure = secure;
        }
        if let Ok(host) = env::var("SERVER_HOST") {
            config.server_host = host;
        }
        if let Some(port) = env::var("SERVER_PORT").ok().and_then(|v| v.parse().ok()) {
            config.server_port = port;
        }

        Ok(config)
    }

    /// Build a configuration with defaults and the given signing secret.
    pub fn with_session_secret(secret: impl Into<String>) -> AppResult<Self> {
        let session_secret = secret.into();
        if session_secret.len() < MIN_SESSION_SECRET_LENGTH {
            return Err(AppError::internal(format!(
                "SESSION_SECRET must be at least {} characters long",
                MIN_SESSION_SECRET_LENGTH
            )));
        }

        Ok(Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            session_secret,
            session_ttl_days: DEFAULT_SESSION_TTL_DAYS,
            session_backend: SessionBackend::Redis,
            cookie_secure: !cfg!(debug_assertions),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        })
    }

    /// Get secret bytes for session token signing/verification.
    pub fn session_secret_bytes(&self) -> &[u8] {
        self.session_secret.as_bytes()
    }

    /// Session lifetime in seconds.
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_days * SECONDS_PER_DAY
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_rejected() {
        assert!(Config::with_session_secret("too-short").is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::with_session_secret("a-very-long-session-secret-for-tests!").unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("a-very-long-session-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_default_session_lifetime_is_thirty_days() {
        let config = Config::with_session_secret("a-very-long-session-secret-for-tests!").unwrap();
        assert_eq!(config.session_ttl_seconds(), 30 * 86_400);
    }

    #[test]
    fn test_session_backend_parse() {
        assert_eq!(SessionBackend::parse("Memory").unwrap(), SessionBackend::Memory);
        assert_eq!(SessionBackend::parse("redis").unwrap(), SessionBackend::Redis);
        assert!(SessionBackend::parse("postgres").is_err());
    }
}
