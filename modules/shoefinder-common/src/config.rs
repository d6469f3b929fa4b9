use std::env;
use std::str::FromStr;

use tracing::debug;

use crate::error::ShoefinderError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // MySQL catalog
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_max_connections: u32,

    // Gemini
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: Option<String>,

    // Web server
    pub host: String,
    pub port: u16,

    // CORS
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ShoefinderError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ShoefinderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ShoefinderError::Config(format!("{key} environment variable is required")))
        };

        Ok(Self {
            db_host: required("DB_HOST")?,
            db_port: parsed(&lookup, "DB_PORT", 3306)?,
            db_user: required("DB_USER")?,
            db_password: required("DB_PASSWORD")?,
            db_name: required("DB_NAME")?,
            db_max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            gemini_api_key: required("GEMINI_API_KEY")?,
            gemini_model: lookup("GEMINI_MODEL")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "gemini-1.5-flash-latest".to_string()),
            gemini_base_url: lookup("GEMINI_BASE_URL").filter(|v| !v.is_empty()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed(&lookup, "PORT", 5000)?,
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ShoefinderError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ShoefinderError::Config(format!("{key} must be a number, got {raw:?}"))),
        _ => Ok(default),
    }
}
