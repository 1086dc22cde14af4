//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `fieldhub.toml` in the working directory, or the file named by
//! `FIELDHUB_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use rust_decimal::Decimal;
use serde::Deserialize;

use fieldhub_domain::rules::LifecycleRules;

const DEFAULT_PATH: &str = "fieldhub.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Business rules enforced by the lifecycle services.
    pub lifecycle: LifecycleRules,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `fieldhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is inconsistent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("FIELDHUB_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("FIELDHUB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("FIELDHUB_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("FIELDHUB_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("FIELDHUB_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("FIELDHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("FIELDHUB_LABOR_RATE") {
            self.lifecycle.labor_rate = val.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("FIELDHUB_LABOR_RATE is not a number: {val:?}"))
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        let rules = &self.lifecycle;
        if rules.labor_rate < Decimal::ZERO {
            return Err(ConfigError::Validation(
                "labor_rate must not be negative".to_string(),
            ));
        }
        if rules.business_open_hour >= rules.business_close_hour || rules.business_close_hour > 24
        {
            return Err(ConfigError::Validation(format!(
                "business hours {}-{} are not a valid window",
                rules.business_open_hour, rules.business_close_hour
            )));
        }
        if rules.min_appointment_minutes == 0
            || rules.default_appointment_minutes < rules.min_appointment_minutes
        {
            return Err(ConfigError::Validation(
                "default appointment length must be at least the minimum, which must be non-zero"
                    .to_string(),
            ));
        }
        if rules.delete_protection_days < 0 || rules.max_service_horizon_days < 0 {
            return Err(ConfigError::Validation(
                "day counts must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:fieldhub.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "fieldhubd=info,fieldhub_app=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:fieldhub.db?mode=rwc");
        assert_eq!(config.lifecycle, LifecycleRules::default());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.lifecycle.labor_rate, Decimal::from(80));
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [lifecycle]
            labor_rate = 95
            business_open_hour = 7
            business_close_hour = 19
            delete_protection_days = 60
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.lifecycle.labor_rate, Decimal::from(95));
        assert_eq!(config.lifecycle.business_open_hour, 7);
        assert_eq!(config.lifecycle.business_close_hour, 19);
        assert_eq!(config.lifecycle.delete_protection_days, 60);
        assert_eq!(config.lifecycle.min_appointment_minutes, 15);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_reject_negative_labor_rate() {
        let mut config = Config::default();
        config.lifecycle.labor_rate = Decimal::from(-1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_inverted_business_hours() {
        let mut config = Config::default();
        config.lifecycle.business_open_hour = 18;
        config.lifecycle.business_close_hour = 8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_default_duration_below_minimum() {
        let mut config = Config::default();
        config.lifecycle.default_appointment_minutes = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_return_database_url() {
        let config = Config::default();
        assert_eq!(config.database_url(), "sqlite:fieldhub.db?mode=rwc");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
