//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use serde::Deserialize;
use std::net::Ipv4Addr;
use thiserror::Error;

#[derive(Error, Debug)]
#[allow(dead_code)]
pub enum ConfigError {
    #[error("Failed to load environment variables: {0}")]
    EnvLoad(#[from] dotenvy::Error),

    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0), // Bind to 0.0.0.0 for Railway/Docker
            port: 3000,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Intake pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IntakeConfig {
    /// Secret used to sign public intake link tokens
    pub link_secret: String,
    /// Grade assigned to injected students when none is known
    pub default_grade: String,
    /// Group assigned to injected students when none is known
    pub default_group: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            link_secret: "admitflow-dev-secret-change-in-production".to_string(),
            default_grade: "1".to_string(),
            default_group: "A".to_string(),
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub intake: IntakeConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        let server = ServerConfig {
            host: std::env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().port),
        };

        let cors = CorsConfig {
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        let intake = IntakeConfig {
            link_secret: std::env::var("LINK_SECRET")
                .unwrap_or_else(|_| IntakeConfig::default().link_secret),
            default_grade: std::env::var("DEFAULT_GRADE")
                .unwrap_or_else(|_| IntakeConfig::default().default_grade),
            default_group: std::env::var("DEFAULT_GROUP")
                .unwrap_or_else(|_| IntakeConfig::default().default_group),
        };

        if intake.link_secret.len() < 16 {
            return Err(ConfigError::InvalidValue(
                "LINK_SECRET must be at least 16 characters".to_string(),
            ));
        }

        Ok(Self {
            server,
            cors,
            intake,
        })
    }
}
