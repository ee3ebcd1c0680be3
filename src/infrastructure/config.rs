//! Configuration infrastructure
//!
//! Contains configuration loading and management for the results harvester.
//!
//! Configuration is organized into sections:
//! 1. Source: where the results page comes from
//! 2. Output: where the archive is written, and in which timezone a run lives
//! 3. Logging and parsing settings
//! 4. An optional operator list replacing the built-in registry

use crate::domain::{OperatorDescriptor, OperatorRegistry};
use crate::infrastructure::harvest_error::{HarvestError, HarvestResult};
use crate::infrastructure::parsing::ParsingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub parsing: ParsingConfig,

    /// Replaces the built-in operator registry when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operators: Option<Vec<OperatorDescriptor>>,
}

/// Results page source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

/// Archive output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Archive root
    pub data_dir: PathBuf,

    /// Offset of the timezone the draws happen in; decides the processing date
    pub utc_offset_hours: i32,

    /// Write `latest.json` with the document-wide date and draw number
    pub write_summary: bool,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    pub console_output: bool,
    pub file_output: bool,

    /// Log directory; next to the executable when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: defaults::SOURCE_URL.to_string(),
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::TIMEOUT_SECONDS,
            max_retries: defaults::MAX_RETRIES,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(defaults::DATA_DIR),
            utc_offset_hours: defaults::UTC_OFFSET_HOURS,
            write_summary: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Reject values that would make a run meaningless
    pub fn validate(&self) -> HarvestResult<()> {
        let url = url::Url::parse(&self.source.url)
            .map_err(|e| HarvestError::Config(format!("invalid source url '{}': {}", self.source.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HarvestError::Config(format!(
                "unsupported url scheme '{}'",
                url.scheme()
            )));
        }
        if self.source.timeout_seconds == 0 {
            return Err(HarvestError::Config(
                "source.timeout_seconds must be positive".to_string(),
            ));
        }
        if !(-12..=14).contains(&self.output.utc_offset_hours) {
            return Err(HarvestError::Config(format!(
                "output.utc_offset_hours out of range: {}",
                self.output.utc_offset_hours
            )));
        }
        Ok(())
    }

    /// Operator registry for this run: the configured list or the built-in one
    pub fn registry(&self) -> HarvestResult<OperatorRegistry> {
        let registry = match &self.operators {
            Some(operators) => OperatorRegistry::new(operators.clone())?,
            None => OperatorRegistry::builtin()?,
        };
        Ok(registry)
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> HarvestResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(defaults::APP_DIR))
            .ok_or_else(|| HarvestError::Config("failed to get user config directory".to_string()))
    }

    /// Manager for the default configuration file
    pub fn new() -> HarvestResult<Self> {
        Ok(Self {
            config_path: Self::get_config_dir()?.join(defaults::CONFIG_FILE),
        })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    /// Load configuration from file, creating the default if it doesn't exist
    pub async fn load_config(&self) -> HarvestResult<AppConfig> {
        if !fs::try_exists(&self.config_path).await.unwrap_or(false) {
            info!(
                "Configuration file not found, creating default: {:?}",
                self.config_path
            );
            let default_config = AppConfig::default();
            if let Err(e) = self.save_config(&default_config).await {
                // A read-only config location must not stop a run
                warn!("Could not write default configuration: {}", e);
            }
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| HarvestError::io(&self.config_path, e))?;

        let config: AppConfig = serde_json::from_str(&content).map_err(|e| {
            HarvestError::Config(format!(
                "malformed configuration {}: {}",
                self.config_path.display(),
                e
            ))
        })?;
        config.validate()?;

        info!("Loaded configuration from: {:?}", self.config_path);
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> HarvestResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| HarvestError::io(parent, e))?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, content)
            .await
            .map_err(|e| HarvestError::io(&self.config_path, e))?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Default values
pub mod defaults {
    pub const APP_DIR: &str = "fourd-harvest";
    pub const CONFIG_FILE: &str = "fourd_harvest_config.json";

    pub const SOURCE_URL: &str = "https://4d4d.co/";
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
    pub const TIMEOUT_SECONDS: u64 = 15;
    pub const MAX_RETRIES: u32 = 3;

    pub const DATA_DIR: &str = "docs/data";
    /// Malaysia time
    pub const UTC_OFFSET_HOURS: i32 = 8;
}
