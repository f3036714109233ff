// tasktracker-service/src/config.rs
use crate::utils::jwt::JwtKeys;
use chrono::Duration;
use derive_more::Display;
use log::warn;
use std::env;
use std::path::PathBuf;

const DEV_JWT_SECRET: &str = "dev-only-insecure-secret";

#[derive(Debug, Display, PartialEq)]
pub enum ConfigError {
    #[display(fmt = "Missing required environment variable {}", _0)]
    Missing(String),
    #[display(fmt = "Invalid value for {}: {}", _0, _1)]
    Invalid(String, String),
}

impl std::error::Error for ConfigError {}

// Exactly one login path is mounted per deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Password,
    Dev,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub frontend_url: String,
    pub cors_allowed_origins: Vec<String>,
    pub auth_mode: AuthMode,
    // None keeps the store in memory only
    pub storage_path: Option<PathBuf>,
    pub resend_api_key: Option<String>,
    pub email_from: String,
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3001,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            access_token_ttl: Duration::minutes(15),
            refresh_token_ttl: Duration::days(7),
            frontend_url: "http://localhost:3000".to_string(),
            cors_allowed_origins: Vec::new(),
            auth_mode: AuthMode::Password,
            storage_path: Some(PathBuf::from("./storage/db.json")),
            resend_api_key: None,
            email_from: "Task Tracker <noreply@tasktracker.local>".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let auth_mode = match get("AUTH_MODE").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("password") => AuthMode::Password,
            Some("dev") => AuthMode::Dev,
            Some(other) => return Err(ConfigError::Invalid("AUTH_MODE".to_string(), other.to_string())),
        };

        let jwt_secret = match (get("JWT_SECRET"), auth_mode) {
            (Some(secret), _) => secret,
            (None, AuthMode::Password) => return Err(ConfigError::Missing("JWT_SECRET".to_string())),
            (None, AuthMode::Dev) => {
                warn!("⚠️ JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let storage_path = match get("STORAGE_PATH") {
            Some(path) if path.eq_ignore_ascii_case("memory") => None,
            Some(path) => Some(PathBuf::from(path)),
            None => defaults.storage_path,
        };

        Ok(Self {
            bind_address: get("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            jwt_secret,
            access_token_ttl: Duration::minutes(parse_or(
                "ACCESS_TOKEN_TTL_MINUTES",
                get("ACCESS_TOKEN_TTL_MINUTES"),
                15,
            )?),
            refresh_token_ttl: Duration::days(parse_or("REFRESH_TOKEN_TTL_DAYS", get("REFRESH_TOKEN_TTL_DAYS"), 7)?),
            frontend_url: get("FRONTEND_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.frontend_url),
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            auth_mode,
            storage_path,
            resend_api_key: get("RESEND_API_KEY"),
            email_from: get("EMAIL_FROM").unwrap_or(defaults.email_from),
            bcrypt_cost: parse_or("BCRYPT_COST", get("BCRYPT_COST"), defaults.bcrypt_cost)?,
        })
    }

    pub fn jwt_keys(&self) -> JwtKeys {
        JwtKeys::new(&self.jwt_secret, self.access_token_ttl, self.refresh_token_ttl)
    }

    // Frontend URL, the localhost dev origins, then any extras
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![
            self.frontend_url.clone(),
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ];
        for origin in &self.cors_allowed_origins {
            if !origins.contains(origin) {
                origins.push(origin.clone());
            }
        }
        origins.dedup();
        origins
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value)),
        None => Ok(default),
    }
}
