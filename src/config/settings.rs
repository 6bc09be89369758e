//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_ACCESS_TOKEN_MINUTES, DEFAULT_DATABASE_URL, DEFAULT_REFRESH_TOKEN_DAYS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_access_secret: String,
    jwt_refresh_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_access_secret", &"[REDACTED]")
            .field("jwt_refresh_secret", &"[REDACTED]")
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_days", &self.refresh_token_days)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Build a configuration with default lifetimes and addresses.
    ///
    /// Both secrets must be at least `MIN_JWT_SECRET_LENGTH` bytes.
    pub fn new(
        jwt_access_secret: impl Into<String>,
        jwt_refresh_secret: impl Into<String>,
    ) -> AppResult<Self> {
        let jwt_access_secret = jwt_access_secret.into();
        let jwt_refresh_secret = jwt_refresh_secret.into();

        for (name, secret) in [
            ("JWT_ACCESS_SECRET", &jwt_access_secret),
            ("JWT_REFRESH_SECRET", &jwt_refresh_secret),
        ] {
            if secret.len() < MIN_JWT_SECRET_LENGTH {
                return Err(AppError::internal(format!(
                    "{} must be at least {} characters long",
                    name, MIN_JWT_SECRET_LENGTH
                )));
            }
        }

        Ok(Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_access_secret,
            jwt_refresh_secret,
            access_token_minutes: DEFAULT_ACCESS_TOKEN_MINUTES,
            refresh_token_days: DEFAULT_REFRESH_TOKEN_DAYS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        })
    }

    /// Load configuration from environment variables (and `.env`).
    ///
    /// Missing secrets fall back to insecure defaults in debug builds only.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let access = secret_from_env("JWT_ACCESS_SECRET", "dev-access-secret-minimum-32-chars!!")?;
        let refresh =
            secret_from_env("JWT_REFRESH_SECRET", "dev-refresh-secret-minimum-32-chars!")?;

        let mut config = Self::new(access, refresh)?;

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(minutes) = parse_env("JWT_ACCESS_EXPIRES_MINUTES") {
            config.access_token_minutes = minutes;
        }
        if let Some(days) = parse_env("JWT_REFRESH_EXPIRES_DAYS") {
            config.refresh_token_days = days;
        }
        if let Ok(host) = env::var("SERVER_HOST") {
            config.server_host = host;
        }
        if let Some(port) = parse_env("SERVER_PORT") {
            config.server_port = port;
        }

        Ok(config)
    }

    /// Secret used to sign and verify access tokens.
    pub fn access_secret_bytes(&self) -> &[u8] {
        self.jwt_access_secret.as_bytes()
    }

    /// Secret used to sign and verify refresh tokens.
    pub fn refresh_secret_bytes(&self) -> &[u8] {
        self.jwt_refresh_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn secret_from_env(name: &str, dev_default: &str) -> AppResult<String> {
    match env::var(name) {
        Ok(secret) => Ok(secret),
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("{} not set, using insecure default for development", name);
            Ok(dev_default.to_string())
        }
        Err(_) => Err(AppError::internal(format!(
            "{} environment variable must be set in production",
            name
        ))),
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
