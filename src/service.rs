use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::Result;
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{AnalysisResult, RawExport};
use crate::parser::{analyze_with_stats, load_export};
use crate::validation::InputValidator;

/// Loads exports from disk and runs the analysis, recording metrics on the way
pub struct AnalysisService {
    config: AppConfig,
    metrics: MetricsCollector,
}

impl AnalysisService {
    /// Create a service with a fresh metrics collector
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            metrics: MetricsCollector::default(),
        }
    }

    /// Configuration this service was built with
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Metrics recorded so far
    #[must_use]
    pub const fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Validate, read and analyse an export file
    pub fn analyze_file(&mut self, path: &Path) -> Result<AnalysisResult> {
        let outcome = self.load_checked(path);
        match outcome {
            Ok(export) => self.analyze_export(&export),
            Err(err) => {
                self.metrics.record_error(err.kind(), "load");
                Err(err)
            }
        }
    }

    /// Analyse an already-parsed export
    pub fn analyze_export(&mut self, export: &RawExport) -> Result<AnalysisResult> {
        let timer = OperationTimer::new("analyze");
        match analyze_with_stats(export) {
            Ok((result, stats)) => {
                self.metrics
                    .record_analysis(&stats, result.chats.len(), timer.elapsed());
                if stats.dates_skipped > 0 {
                    info!(
                        skipped = stats.dates_skipped,
                        "Some messages had no usable date and were left out of the activity chart"
                    );
                }
                timer.finish();
                Ok(result)
            }
            Err(err) => {
                self.metrics.record_error(err.kind(), "analyze");
                Err(err)
            }
        }
    }

    fn load_checked(&self, path: &Path) -> Result<RawExport> {
        InputValidator::validate_export_path(path)?;

        let size = fs::metadata(path)?.len();
        if size > self.config.max_file_size_bytes() {
            warn!(
                path = %path.display(),
                size_mb = size / (1024 * 1024),
                limit_mb = self.config.input.max_file_size_mb,
                "Export is larger than the configured size; loading it fully into memory"
            );
        }

        info!(path = %path.display(), "Loading export");
        load_export(path)
    }
}
