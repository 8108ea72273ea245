//! Server configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use skycast_core::{ClientConfig, DEFAULT_GEOCODING_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_WEATHER_URL};

/// Button color used when neither `BG_COLOR` nor the config file sets one.
pub const DEFAULT_BUTTON_COLOR: &str = "#007BFF";

/// Minimum outbound request timeout in seconds.
pub const MIN_TIMEOUT_SECS: u64 = 1;
/// Maximum outbound request timeout in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 120;

/// Server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server settings.
    pub server: ServerConfig,
    /// Storage settings.
    pub storage: StorageConfig,
    /// Page appearance.
    pub appearance: AppearanceConfig,
    /// Outbound API settings.
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return every problem found.
    ///
    /// # Example
    ///
    /// ```
    /// use skycast_service::Config;
    ///
    /// let config = Config::default();
    /// config.validate().expect("Default config should be valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.server.validate());
        errors.extend(self.storage.validate());
        errors.extend(self.appearance.validate());
        errors.extend(self.api.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Settings for the outbound geocoding/weather client.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            geocoding_url: self.api.geocoding_url.clone(),
            weather_url: self.api.weather_url.clone(),
            weather_api_key: self.api.weather_api_key.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:5000").
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

impl ServerConfig {
    /// Validate server configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.bind.is_empty() {
            errors.push(ValidationError::new(
                "server.bind",
                "bind address cannot be empty",
            ));
            return errors;
        }

        let Some((_, port)) = self.bind.rsplit_once(':') else {
            errors.push(ValidationError::new(
                "server.bind",
                format!(
                    "invalid bind address '{}': expected format 'host:port'",
                    self.bind
                ),
            ));
            return errors;
        };

        match port.parse::<u16>() {
            Ok(0) => errors.push(ValidationError::new("server.bind", "port cannot be 0")),
            Err(_) => errors.push(ValidationError::new(
                "server.bind",
                format!("invalid port '{}': must be a number 1-65535", port),
            )),
            Ok(_) => {}
        }

        errors
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Search history file path.
    pub history_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            history_path: skycast_store::default_history_path(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.history_path.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "storage.history_path",
                "history path cannot be empty",
            ));
        }

        errors
    }
}

/// Page appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// CSS color of the page buttons.
    pub button_color: String,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            button_color: DEFAULT_BUTTON_COLOR.to_string(),
        }
    }
}

impl AppearanceConfig {
    /// Validate appearance configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.button_color.trim().is_empty() {
            errors.push(ValidationError::new(
                "appearance.button_color",
                "button color cannot be empty",
            ));
        } else if self.button_color.contains(['"', '<', '>', ';']) {
            errors.push(ValidationError::new(
                "appearance.button_color",
                format!("'{}' is not a CSS color", self.button_color),
            ));
        }

        errors
    }
}

/// Outbound API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the geocoding service.
    pub geocoding_url: String,
    /// Base URL of the weather service.
    pub weather_url: String,
    /// Weather service API key.
    pub weather_api_key: String,
    /// Timeout for each outbound request, in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            weather_api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Validate API configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (field, url) in [
            ("api.geocoding_url", &self.geocoding_url),
            ("api.weather_url", &self.weather_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                errors.push(ValidationError::new(
                    field,
                    format!("'{}' must start with http:// or https://", url),
                ));
            }
        }

        if self.timeout_secs < MIN_TIMEOUT_SECS {
            errors.push(ValidationError::new(
                "api.timeout_secs",
                format!(
                    "timeout {} is too short (minimum {} second)",
                    self.timeout_secs, MIN_TIMEOUT_SECS
                ),
            ));
        } else if self.timeout_secs > MAX_TIMEOUT_SECS {
            errors.push(ValidationError::new(
                "api.timeout_secs",
                format!(
                    "timeout {} is too long (maximum {} seconds)",
                    self.timeout_secs, MAX_TIMEOUT_SECS
                ),
            ));
        }

        errors
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `server.bind`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skycast")
        .join("server.toml")
}
