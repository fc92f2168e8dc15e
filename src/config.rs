//! Configuration management

use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Primary location of the order table.
    pub path: String,
    /// Alternate locations tried in order when the primary is missing.
    #[serde(default)]
    pub fallback_paths: Vec<String>,
}

impl DatasetConfig {
    /// Ordered candidate paths, primary first.
    pub fn candidates(&self) -> Vec<PathBuf> {
        std::iter::once(&self.path)
            .chain(self.fallback_paths.iter())
            .map(PathBuf::from)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Currency/locale pairs for the summary cards. The revenue card and the
/// average-monetary card are formatted independently.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    pub revenue: CurrencyConfig,
    pub monetary: CurrencyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyConfig {
    pub code: String,
    pub symbol: String,
    pub locale: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";

        let builder = config::Config::builder()
            .add_source(config::File::with_name(config_path))
            .add_source(config::Environment::with_prefix("SHOPDASH"));

        let settings = builder.build()?;
        let config: Config = settings.try_deserialize()?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate server config
        if self.server.http_port == 0 {
            anyhow::bail!("Invalid http_port: 0 is not allowed");
        }
        if self.server.host.is_empty() {
            anyhow::bail!("Server host cannot be empty");
        }

        // Validate dataset config
        if self.dataset.path.is_empty() {
            anyhow::bail!("Dataset path cannot be empty");
        }

        // Validate logging level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid logging level '{}'. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            );
        }

        // Validate display locales
        for currency in [&self.display.revenue, &self.display.monetary] {
            if crate::currency::parse_locale(&currency.locale).is_err() {
                anyhow::bail!(
                    "Unknown locale '{}' for currency {}",
                    currency.locale,
                    currency.code
                );
            }
        }

        Ok(())
    }
}
