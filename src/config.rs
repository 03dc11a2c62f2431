use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AnalyzerError, Result};
use crate::query::{DEFAULT_DAILY_WINDOW, DEFAULT_PAGE_SIZE, DEFAULT_WEEKLY_WINDOW};

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub report: ReportConfig,
    pub display: DisplayConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub default_format: String,
    pub output_directory: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub page_size: usize,
    pub daily_window: usize,
    pub weekly_window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Exports above this size still load, with a warning
    pub max_file_size_mb: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            report: ReportConfig {
                default_format: "txt".to_string(),
                output_directory: "./output".to_string(),
            },
            display: DisplayConfig {
                page_size: DEFAULT_PAGE_SIZE,
                daily_window: DEFAULT_DAILY_WINDOW,
                weekly_window: DEFAULT_WEEKLY_WINDOW,
            },
            input: InputConfig {
                max_file_size_mb: 512,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from the working directory, then the environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration with precedence: defaults, then files under `base_dir`
    /// (`config/default`, `config/local`, `tgstats`), then `TGSTATS_*` variables.
    ///
    /// Nested keys use a double underscore, e.g. `TGSTATS_DISPLAY__PAGE_SIZE=50`.
    pub fn load_from(base_dir: &Path) -> Result<Self> {
        let mut builder = Config::builder();
        for (key, value) in AppConfig::default().into_iter() {
            builder = builder.set_default(key, value)?;
        }

        let config = builder
            .add_source(File::from(base_dir.join("config/default")).required(false))
            .add_source(File::from(base_dir.join("config/local")).required(false))
            .add_source(File::from(base_dir.join("tgstats")).required(false))
            .add_source(
                Environment::with_prefix("TGSTATS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AnalyzerError::InvalidConfig(format!("Failed to load configuration: {e}")))?;

        let app_config: AppConfig = config.try_deserialize().map_err(|e| {
            AnalyzerError::InvalidConfig(format!("Failed to deserialize configuration: {e}"))
        })?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(AnalyzerError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(AnalyzerError::InvalidConfig(format!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format, valid_formats
            )));
        }

        let valid_formats = ["txt", "csv", "json"];
        if !valid_formats.contains(&self.report.default_format.as_str()) {
            return Err(AnalyzerError::InvalidConfig(format!(
                "Invalid report format: {}. Must be one of: {:?}",
                self.report.default_format, valid_formats
            )));
        }

        if self.display.page_size == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "page_size must be greater than 0".to_string(),
            ));
        }
        if self.display.daily_window == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "daily_window must be greater than 0".to_string(),
            ));
        }
        if self.display.weekly_window == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "weekly_window must be greater than 0".to_string(),
            ));
        }

        if self.input.max_file_size_mb == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "max_file_size_mb must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }

    /// Warn threshold for export size, in bytes
    #[must_use]
    pub const fn max_file_size_bytes(&self) -> u64 {
        self.input.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

impl IntoIterator for AppConfig {
    type Item = (String, config::Value);
    type IntoIter = std::collections::hash_map::IntoIter<String, config::Value>;

    fn into_iter(self) -> Self::IntoIter {
        let mut map = std::collections::HashMap::new();

        // Flatten the configuration into key-value pairs
        map.insert("logging.level".to_string(), config::Value::from(self.logging.level));
        if let Some(file_path) = self.logging.file_path {
            map.insert("logging.file_path".to_string(), config::Value::from(file_path));
        }
        map.insert("logging.format".to_string(), config::Value::from(self.logging.format));

        map.insert("report.default_format".to_string(), config::Value::from(self.report.default_format));
        map.insert("report.output_directory".to_string(), config::Value::from(self.report.output_directory));

        map.insert("display.page_size".to_string(), config::Value::from(self.display.page_size as u64));
        map.insert("display.daily_window".to_string(), config::Value::from(self.display.daily_window as u64));
        map.insert("display.weekly_window".to_string(), config::Value::from(self.display.weekly_window as u64));

        map.insert("input.max_file_size_mb".to_string(), config::Value::from(self.input.max_file_size_mb));

        map.into_iter()
    }
}
