//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// HTTP header name carrying the caller's user id.
pub const USER_ID_HEADER: &str = "User-ID";

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_DATABASE_URL: &str = "file:data/compliance.db";
    pub const DEV_UPLOAD_DIR: &str = "data/uploads";
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const DEV_MAX_UPLOAD_SIZE: usize = 10_485_760; // 10MB per attached document
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL (`file:` path to the SQLite database)
    pub database_url: String,
    /// Directory holding uploaded policy documents
    pub upload_dir: PathBuf,
    /// Maximum upload size in bytes for an attached document (default: 10MB)
    pub max_upload_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development):
    /// - All variables have sensible defaults
    /// - Only RUST_ENV is required
    ///
    /// In production mode (RUST_ENV=production):
    /// - DATABASE_URL and CPS_UPLOAD_DIR must not match development defaults
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `CPS_HOST`: Server host (default: 127.0.0.1)
    /// - `CPS_PORT`: Server port (default: 8080)
    /// - `DATABASE_URL`: SQLite path as `file:path` (default: file:data/compliance.db)
    /// - `CPS_UPLOAD_DIR`: Upload directory (default: data/uploads)
    /// - `CPS_MAX_UPLOAD_SIZE`: Max attached-document size in bytes (default: 10MB)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Parse environment - required
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("CPS_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("CPS_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("CPS_PORT must be a valid port number"))?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| defaults::DEV_DATABASE_URL.to_string());

        let upload_dir = PathBuf::from(
            env::var("CPS_UPLOAD_DIR").unwrap_or_else(|_| defaults::DEV_UPLOAD_DIR.to_string()),
        );

        let max_upload_size = env::var("CPS_MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| defaults::DEV_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue("CPS_MAX_UPLOAD_SIZE must be a valid number"))?;

        let config = Config {
            environment,
            host,
            port,
            database_url,
            upload_dir,
            max_upload_size,
        };

        // Validate production configuration
        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url == defaults::DEV_DATABASE_URL {
            errors.push(format!(
                "DATABASE_URL is using development default '{}'. Set a production database path.",
                defaults::DEV_DATABASE_URL
            ));
        }

        if self.upload_dir == PathBuf::from(defaults::DEV_UPLOAD_DIR) {
            errors.push(format!(
                "CPS_UPLOAD_DIR is using development default '{}'. Set a production upload directory.",
                defaults::DEV_UPLOAD_DIR
            ));
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }

    /// SQLite database path extracted from the `file:` URL.
    pub fn database_path(&self) -> Result<&str, ConfigError> {
        self.database_url
            .strip_prefix("file:")
            .ok_or(ConfigError::InvalidValue(
                "DATABASE_URL must be of the form 'file:path'",
            ))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
