//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const DEV_FILE_DIR: &str = "./data/files";
    pub const DEV_MAX_UPLOAD_SIZE: usize = 10_485_760; // 10MB per multipart request
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
    /// Directory where uploaded files are stored under generated names
    pub file_dir: PathBuf,
    /// Maximum multipart request size in bytes (default: 10MB)
    pub max_upload_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development) every variable has a default.
    /// In production mode (RUST_ENV=production) `FIS_FILE_DIR` is required and
    /// must be an absolute path.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `FIS_HOST`: Server host (default: 127.0.0.1)
    /// - `FIS_PORT`: Server port (default: 8080)
    /// - `FIS_FILE_DIR`: Upload storage directory (default: ./data/files in development)
    /// - `FIS_MAX_UPLOAD_SIZE`: Max multipart request size in bytes (default: 10MB)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Parse environment - required
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("FIS_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("FIS_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("FIS_PORT must be a valid port number"))?;

        let file_dir = match env::var("FIS_FILE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) if environment.is_development() => PathBuf::from(defaults::DEV_FILE_DIR),
            Err(_) => return Err(ConfigError::MissingEnvVar("FIS_FILE_DIR")),
        };

        let max_upload_size = env::var("FIS_MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| defaults::DEV_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue("FIS_MAX_UPLOAD_SIZE must be a valid number"))?;

        let config = Config {
            environment,
            host,
            port,
            file_dir,
            max_upload_size,
        };

        // Validate production configuration
        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not rely on development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !self.file_dir.is_absolute() {
            errors.push(format!(
                "FIS_FILE_DIR must be an absolute path in production, got '{}'.",
                self.file_dir.display()
            ));
        }

        if self.max_upload_size == 0 {
            errors.push("FIS_MAX_UPLOAD_SIZE must be greater than zero.".to_string());
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
