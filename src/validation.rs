use std::path::Path;

use crate::error::{AnalyzerError, Result};
use crate::models::{RawChat, RawExport};

/// Validation utilities for export documents and caller input
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Confirm the export carries `chats.list` and hand back the chat list.
    ///
    /// This is the only shape check; everything below the list is handled by
    /// per-field fallbacks.
    pub fn validate_export(export: &RawExport) -> Result<&[RawChat]> {
        export
            .chats
            .as_ref()
            .and_then(|chats| chats.list.as_deref())
            .ok_or(AnalyzerError::InvalidFormat)
    }

    /// Validate the path of an export file before reading it
    pub fn validate_export_path(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(AnalyzerError::InvalidInput(
                "Export path cannot be empty".to_string(),
            ));
        }

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            return Err(AnalyzerError::InvalidInput(format!(
                "Expected a .json export file, got {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Validate a page size for chat listings
    pub fn validate_page_size(page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(AnalyzerError::InvalidInput(
                "Page size must be greater than 0".to_string(),
            ));
        }

        if page_size > 10_000 {
            return Err(AnalyzerError::InvalidInput(
                "Page size too large (max 10,000)".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate the number of buckets shown for an activity window
    pub fn validate_window(limit: usize) -> Result<()> {
        if limit == 0 {
            return Err(AnalyzerError::InvalidInput(
                "Activity window must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Sanitize a search query: drop control characters and trim
    #[must_use]
    pub fn sanitize_query(query: &str) -> String {
        query
            .chars()
            .filter(|c| !c.is_control())
            .collect::<String>()
            .trim()
            .to_string()
    }
}
