//! Export parsing and the analysis pipeline.
//!
//! `analyze` is a pure function of the export: validate, resolve the owner,
//! aggregate chats and activity in one pass, then rank.

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::activity::ActivityAggregator;
use crate::chats::ChatAggregator;
use crate::error::{AnalyzerError, Result};
use crate::models::{AnalysisResult, AnalysisStats, RawExport};
use crate::resolve::resolve_owner_id;
use crate::validation::InputValidator;

/// Analyse a parsed export
pub fn analyze(export: &RawExport) -> Result<AnalysisResult> {
    analyze_with_stats(export).map(|(result, _)| result)
}

/// Analyse a parsed export and report what was skipped or merged on the way
pub fn analyze_with_stats(export: &RawExport) -> Result<(AnalysisResult, AnalysisStats)> {
    let chats = InputValidator::validate_export(export)?;

    let owner_id = resolve_owner_id(export.personal_information.as_ref());
    debug!(owner_known = owner_id.is_some(), chats = chats.len(), "Analysing export");

    let mut chat_aggregator = ChatAggregator::new(owner_id);
    let mut activity = ActivityAggregator::new();
    let mut stats = AnalysisStats {
        chats_seen: chats.len(),
        ..AnalysisStats::default()
    };

    for chat in chats {
        if !chat_aggregator.add(chat) {
            stats.chats_skipped += 1;
            continue;
        }
        for message in chat.messages() {
            activity.record(message.date.as_deref());
        }
        stats.messages_total += chat.messages().len();
    }

    stats.chats_merged = chat_aggregator.merged();
    stats.messages_dated = activity.counted();
    stats.dates_skipped = activity.skipped();

    let result = AnalysisResult {
        chats: chat_aggregator.into_ranked(),
        message_activity: activity.finish(),
    };

    info!(
        chats = result.chats.len(),
        messages = stats.messages_total,
        skipped_dates = stats.dates_skipped,
        days = result.message_activity.daily.len(),
        "Export analysed"
    );
    Ok((result, stats))
}

/// Deserialize an export from JSON text.
///
/// Syntax errors surface as `Json`; a document that is not an object is `InvalidFormat`.
/// Below the top level, values of the wrong type read as absent.
pub fn parse_export_str(json: &str) -> Result<RawExport> {
    parse_export_value(serde_json::from_str(json)?)
}

/// Deserialize an export from raw bytes
pub fn parse_export_slice(bytes: &[u8]) -> Result<RawExport> {
    parse_export_value(serde_json::from_slice(bytes)?)
}

/// Deserialize an export from an already-parsed JSON value
pub fn parse_export_value(value: Value) -> Result<RawExport> {
    RawExport::from_value(value).ok_or_else(|| {
        debug!("Export document is not a JSON object");
        AnalyzerError::InvalidFormat
    })
}

/// Read and deserialize an export file
pub fn load_export(path: &Path) -> Result<RawExport> {
    let bytes = fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read export file");
    parse_export_slice(&bytes)
}

/// Parse JSON text and analyse it in one step
pub fn analyze_str(json: &str) -> Result<AnalysisResult> {
    analyze(&parse_export_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_syntax_error_is_json_error() {
        assert!(matches!(
            parse_export_str("{\"chats\": "),
            Err(AnalyzerError::Json(_))
        ));
    }

    #[test]
    fn test_wrong_shape_is_invalid_format() {
        assert!(matches!(
            analyze_str("{\"chats\": {\"list\": \"nope\"}}"),
            Err(AnalyzerError::InvalidFormat)
        ));
        assert!(matches!(
            parse_export_str("[1, 2, 3]"),
            Err(AnalyzerError::InvalidFormat)
        ));
    }

    #[test]
    fn test_merged_duplicate_feeds_activity() {
        let export = parse_export_value(json!({
            "chats": { "list": [
                { "name": "Bob", "id": 7, "messages": [{ "date": "2023-01-01T10:00:00" }] },
                { "name": "Bob", "id": 7, "messages": [{ "date": "2023-01-04T10:00:00" }] }
            ]}
        }))
        .unwrap();

        let (result, stats) = analyze_with_stats(&export).unwrap();
        assert_eq!(stats.chats_merged, 1);
        assert_eq!(result.chats.len(), 1);
        assert_eq!(result.chats[0].message_count, 2);
        let daily: Vec<_> = result
            .message_activity
            .daily
            .iter()
            .map(|b| (b.date.as_str(), b.message_count))
            .collect();
        assert_eq!(daily, vec![("2023-01-01", 1), ("2023-01-04", 1)]);
        assert_eq!(result.message_activity.weekly[0].message_count, 2);
    }

    #[test]
    fn test_stats_track_skips_and_merges() {
        let export = parse_export_value(json!({
            "chats": { "list": [
                { "name": "Bob", "id": 7, "messages": [{ "date": "2023-01-01T10:00:00" }] },
                { "name": "Bob", "id": 7, "messages": [{ "date": "bogus" }, {}] },
                { "name": "Quiet", "id": 8, "messages": [] },
                { "name": "Gone", "id": 9 }
            ]}
        }))
        .unwrap();

        let (result, stats) = analyze_with_stats(&export).unwrap();
        assert_eq!(result.chats.len(), 1);
        assert_eq!(result.chats[0].message_count, 3);
        assert_eq!(
            stats,
            AnalysisStats {
                chats_seen: 4,
                chats_skipped: 2,
                chats_merged: 1,
                messages_total: 3,
                messages_dated: 1,
                dates_skipped: 2,
            }
        );
    }
}
