//! Script detection for display names.

use regex::Regex;

use crate::error::{AnalyzerError, Result};

const FIRST_STRONG_ISOLATE: char = '\u{2068}';
const POP_DIRECTIONAL_ISOLATE: char = '\u{2069}';

/// Detects right-to-left (Arabic-script) text so reports can isolate it
#[derive(Debug, Clone)]
pub struct ScriptDetector {
    rtl_regex: Regex,
}

impl ScriptDetector {
    /// Compile the detector
    pub fn new() -> Result<Self> {
        let rtl_regex = Regex::new(
            r"[\x{0600}-\x{06FF}\x{0750}-\x{077F}\x{08A0}-\x{08FF}\x{FB50}-\x{FDFF}\x{FE70}-\x{FEFF}]",
        )
        .map_err(|e| AnalyzerError::Other(format!("Failed to compile RTL regex: {e}")))?;
        Ok(Self { rtl_regex })
    }

    /// Whether `text` contains Persian or Arabic characters
    #[must_use]
    pub fn contains_rtl_script(&self, text: &str) -> bool {
        self.rtl_regex.is_match(text)
    }

    /// Wrap right-to-left text in first-strong isolates so it does not reorder
    /// the surrounding columns; other text is returned unchanged
    #[must_use]
    pub fn isolate(&self, text: &str) -> String {
        if self.contains_rtl_script(text) {
            format!("{FIRST_STRONG_ISOLATE}{text}{POP_DIRECTIONAL_ISOLATE}")
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_persian_and_arabic() {
        let detector = ScriptDetector::new().unwrap();
        assert!(detector.contains_rtl_script("سلام"));
        assert!(detector.contains_rtl_script("Ali علی"));
        assert!(!detector.contains_rtl_script("Ann Lee"));
        assert!(!detector.contains_rtl_script("Привет"));
    }

    #[test]
    fn test_isolate_only_wraps_rtl() {
        let detector = ScriptDetector::new().unwrap();
        assert_eq!(detector.isolate("Bob"), "Bob");
        let wrapped = detector.isolate("مریم");
        assert!(wrapped.starts_with('\u{2068}'));
        assert!(wrapped.ends_with('\u{2069}'));
    }
}
