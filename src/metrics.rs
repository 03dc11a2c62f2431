use metrics::{counter, gauge, histogram};
use std::time::Duration;

use crate::models::AnalysisStats;

/// Metric names recorded around analysis runs.
///
/// Recording goes through the `metrics` facade and is a no-op until a recorder is
/// installed. Plain totals are kept alongside so callers can inspect them directly.
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    pub analyses_total: &'static str,
    pub messages_processed_total: &'static str,
    pub dates_skipped_total: &'static str,
    pub chats_merged_total: &'static str,
    pub chats_ranked: &'static str,
    pub analysis_duration: &'static str,
    pub errors_total: &'static str,

    totals: MetricTotals,
}

/// Running totals mirrored from what was sent to the recorder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricTotals {
    pub analyses: u64,
    pub messages_processed: u64,
    pub dates_skipped: u64,
    pub chats_merged: u64,
    pub errors: u64,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            analyses_total: "tgstats_analyses_total",
            messages_processed_total: "tgstats_messages_processed_total",
            dates_skipped_total: "tgstats_dates_skipped_total",
            chats_merged_total: "tgstats_chats_merged_total",
            chats_ranked: "tgstats_chats_ranked",
            analysis_duration: "tgstats_analysis_duration_seconds",
            errors_total: "tgstats_errors_total",
            totals: MetricTotals::default(),
        }
    }
}

impl MetricsCollector {
    /// Record a completed analysis
    pub fn record_analysis(&mut self, stats: &AnalysisStats, chats_ranked: usize, duration: Duration) {
        let messages = stats.messages_total as u64;
        let skipped = stats.dates_skipped as u64;
        let merged = stats.chats_merged as u64;

        counter!(self.analyses_total).increment(1);
        counter!(self.messages_processed_total).increment(messages);
        counter!(self.dates_skipped_total).increment(skipped);
        counter!(self.chats_merged_total).increment(merged);
        gauge!(self.chats_ranked).set(chats_ranked as f64);
        histogram!(self.analysis_duration).record(duration.as_secs_f64());

        self.totals.analyses += 1;
        self.totals.messages_processed += messages;
        self.totals.dates_skipped += skipped;
        self.totals.chats_merged += merged;
    }

    /// Record error metrics
    pub fn record_error(&mut self, error_type: &'static str, operation: &'static str) {
        counter!(self.errors_total, "type" => error_type, "operation" => operation).increment(1);
        self.totals.errors += 1;
    }

    /// Totals recorded by this collector
    #[must_use]
    pub const fn totals(&self) -> MetricTotals {
        self.totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::default();
        assert_eq!(collector.analyses_total, "tgstats_analyses_total");
        assert_eq!(collector.totals(), MetricTotals::default());
    }

    #[test]
    fn test_record_without_recorder_is_noop_but_counts() {
        let mut collector = MetricsCollector::default();
        let stats = AnalysisStats {
            messages_total: 10,
            dates_skipped: 2,
            chats_merged: 1,
            ..AnalysisStats::default()
        };
        collector.record_analysis(&stats, 3, Duration::from_millis(5));
        collector.record_error("io", "load");

        let totals = collector.totals();
        assert_eq!(totals.analyses, 1);
        assert_eq!(totals.messages_processed, 10);
        assert_eq!(totals.dates_skipped, 2);
        assert_eq!(totals.chats_merged, 1);
        assert_eq!(totals.errors, 1);
    }
}
