//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use std::env;

/// Which document store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    /// Process-local store, lost on restart
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Firebase/GCP project ID
    pub firebase_project_id: String,
    /// Document store backend
    pub store_backend: StoreBackend,
    /// Server port
    pub port: u16,
    /// Identity provider token key: HS256 secret, or RS256 public key in PEM form
    pub identity_jwt_key: Vec<u8>,
    /// SMS gateway endpoint; SMS is unavailable when unset
    pub sms_gateway_url: Option<String>,
    /// Bearer token for the SMS gateway
    pub sms_gateway_token: Option<String>,
    /// Looping alert sound asset
    pub alert_sound_asset: String,
    /// Prefix prefilled into an empty profile phone number
    pub default_phone_prefix: String,
}

pub const DEFAULT_ALERT_SOUND_ASSET: &str = "assets/audio/sos.mp3";
pub const DEFAULT_PHONE_PREFIX: &str = "+91";

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:8081".to_string(),
            firebase_project_id: "test-project".to_string(),
            store_backend: StoreBackend::Memory,
            port: 8080,
            identity_jwt_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            sms_gateway_url: None,
            sms_gateway_token: None,
            alert_sound_asset: DEFAULT_ALERT_SOUND_ASSET.to_string(),
            default_phone_prefix: DEFAULT_PHONE_PREFIX.to_string(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "firestore".to_string())
            .trim()
        {
            "firestore" => StoreBackend::Firestore,
            "memory" => StoreBackend::Memory,
            other => return Err(ConfigError::Invalid("STORE_BACKEND", other.to_string())),
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .unwrap_or_else(|_| "local-dev".to_string()),
            store_backend,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            identity_jwt_key: env::var("IDENTITY_JWT_KEY")
                .map_err(|_| ConfigError::Missing("IDENTITY_JWT_KEY"))?
                .into_bytes(),
            sms_gateway_url: optional_var("SMS_GATEWAY_URL"),
            sms_gateway_token: optional_var("SMS_GATEWAY_TOKEN"),
            alert_sound_asset: env::var("ALERT_SOUND_ASSET")
                .unwrap_or_else(|_| DEFAULT_ALERT_SOUND_ASSET.to_string()),
            default_phone_prefix: env::var("DEFAULT_PHONE_PREFIX")
                .unwrap_or_else(|_| DEFAULT_PHONE_PREFIX.to_string()),
        })
    }
}

/// Read a variable, treating blank values as unset.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("IDENTITY_JWT_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("STORE_BACKEND", "memory");
        env::set_var("SMS_GATEWAY_URL", "  ");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.identity_jwt_key, b"test_jwt_key_32_bytes_minimum!!");
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.sms_gateway_url, None);
        assert_eq!(config.port, 8080);
    }
}
