//! # Client Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Environment variables (PLATTER_*)          ← highest               │
//! │  2. Config file                                                         │
//! │     ~/.config/platter/client.toml (Linux)                              │
//! │     ~/Library/Application Support/app.platter.client/client.toml       │
//! │  3. Defaults (this file)                       ← lowest                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example File
//! ```toml
//! # client.toml
//! tax_rate_bps = 825
//! currency_code = "EUR"
//! currency_symbol = "€"
//! currency_decimals = 2
//! storage_namespace = "persist:cart"
//! ```
//!
//! Read-only after initialization; commands take it by reference.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use platter_core::validation::validate_tax_rate_bps;
use platter_core::{Money, TaxRate, DEFAULT_TAX_RATE};
use platter_db::CART_NAMESPACE;

const CONFIG_FILE: &str = "client.toml";
const DATABASE_FILE: &str = "platter.db";

// =============================================================================
// Errors
// =============================================================================

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but couldn't be read or parsed.
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    /// The file couldn't be written.
    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    /// A value is out of range or malformed.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// No platform data directory and no explicit database path.
    #[error("Could not determine app data directory")]
    NoDataDir,
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// ClientConfig
// =============================================================================

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Sales tax in basis points, e.g. 825 = 8.25%.
    pub tax_rate_bps: u32,

    /// Currency code (ISO 4217).
    pub currency_code: String,

    /// Currency symbol (for display).
    pub currency_symbol: String,

    /// Number of fraction digits shown.
    pub currency_decimals: u32,

    /// SQLite file. `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Key-value namespace for the cart snapshot.
    pub storage_namespace: String,
}

impl Default for ClientConfig {
    /// USD, 8% tax, database in the platform data directory.
    fn default() -> Self {
        ClientConfig {
            tax_rate_bps: DEFAULT_TAX_RATE.bps(),
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            database_path: None,
            storage_namespace: CART_NAMESPACE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`client.toml`), if present
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_tax_rate_bps(self.tax_rate_bps)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.currency_decimals > 4 {
            return Err(ConfigError::Invalid(format!(
                "currency_decimals must be at most 4, got {}",
                self.currency_decimals
            )));
        }

        if self.storage_namespace.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage_namespace must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies `PLATTER_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from `lookup` (the environment, or a map in tests).
    ///
    /// Unparseable numbers are logged and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bps) = lookup("PLATTER_TAX_RATE_BPS") {
            match bps.parse::<u32>() {
                Ok(bps) => {
                    debug!(bps, "Overriding tax rate from environment");
                    self.tax_rate_bps = bps;
                }
                Err(_) => warn!(value = %bps, "Ignoring invalid PLATTER_TAX_RATE_BPS"),
            }
        }

        if let Some(code) = lookup("PLATTER_CURRENCY_CODE") {
            self.currency_code = code;
        }

        if let Some(symbol) = lookup("PLATTER_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(decimals) = lookup("PLATTER_CURRENCY_DECIMALS") {
            match decimals.parse::<u32>() {
                Ok(d) => self.currency_decimals = d,
                Err(_) => warn!(value = %decimals, "Ignoring invalid PLATTER_CURRENCY_DECIMALS"),
            }
        }

        if let Some(path) = lookup("PLATTER_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(namespace) = lookup("PLATTER_STORAGE_NAMESPACE") {
            self.storage_namespace = namespace;
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("app", "platter", "client")
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Resolves the database file, creating the data directory if needed.
    pub fn resolve_database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let dirs = Self::project_dirs().ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join(DATABASE_FILE))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The configured tax rate.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Formats an amount for display: `$21.60`, `-€5.50`.
    ///
    /// Rounds half away from zero to `currency_decimals` digits.
    pub fn format_currency(&self, amount: Money) -> String {
        let rounded = amount.rounded_to(self.currency_decimals);
        let sign = if rounded.is_negative() { "-" } else { "" };
        format!("{}{}{}", sign, self.currency_symbol, rounded.abs().amount())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.tax_rate(), DEFAULT_TAX_RATE);
        assert_eq!(config.storage_namespace, "persist:cart");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            tax_rate_bps = 825
            currency_symbol = "€"
            "#,
        )
        .unwrap();

        assert_eq!(config.tax_rate_bps, 825);
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.currency_code, "USD");
        assert_eq!(config.currency_decimals, 2);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ClientConfig {
            database_path: Some(PathBuf::from("/tmp/platter.db")),
            ..ClientConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("tax_rate_bps = 800"));
        assert_eq!(ClientConfig::from_toml_str(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("PLATTER_TAX_RATE_BPS", "1000"),
            ("PLATTER_CURRENCY_DECIMALS", "not a number"),
            ("PLATTER_DB_PATH", "/data/cart.db"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.tax_rate_bps, 1000);
        assert_eq!(config.currency_decimals, 2);
        assert_eq!(config.database_path, Some(PathBuf::from("/data/cart.db")));
        assert_eq!(
            config.resolve_database_path().unwrap(),
            PathBuf::from("/data/cart.db")
        );
    }

    #[test]
    fn test_validation() {
        let too_much_tax = ClientConfig {
            tax_rate_bps: 10_001,
            ..ClientConfig::default()
        };
        assert!(matches!(too_much_tax.validate(), Err(ConfigError::Invalid(_))));

        let blank_namespace = ClientConfig {
            storage_namespace: " ".to_string(),
            ..ClientConfig::default()
        };
        assert!(blank_namespace.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("platter-missing-config-file.toml");
        let config = ClientConfig::load_or_default(Some(path));
        assert_eq!(config.currency_code, ClientConfig::default().currency_code);
    }

    #[test]
    fn test_format_currency() {
        let config = ClientConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(2160)), "$21.60");
        assert_eq!(config.format_currency(Money::from_cents(-550)), "-$5.50");

        let yen = ClientConfig {
            currency_symbol: "¥".to_string(),
            currency_decimals: 0,
            ..ClientConfig::default()
        };
        assert_eq!(yen.format_currency(Money::from_cents(12_350)), "¥124");
    }
}
