//! Collected barcode entries.

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Where an accepted barcode came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CodeSource {
    /// Reported by the detection capability.
    Detector,
    /// Typed by the user, or seeded from an existing entry being edited.
    Manual,
}

/// One accepted barcode with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeEntry {
    /// The barcode value, already trimmed.
    pub code: CompactString,
    /// How the value entered the session.
    pub source: CodeSource,
    /// When the value was accepted.
    pub accepted_at: DateTime<Utc>,
}

impl CodeEntry {
    /// Create an entry accepted now.
    pub fn new(code: impl Into<CompactString>, source: CodeSource) -> Self {
        Self {
            code: code.into(),
            source,
            accepted_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CodeEntry::new("PKG-001", CodeSource::Detector);
        assert_eq!(entry.code, "PKG-001");
        assert_eq!(entry.source, CodeSource::Detector);
    }

    #[test]
    fn test_source_display() {
        assert_eq!(CodeSource::Detector.to_string(), "detector");
        assert_eq!(CodeSource::Manual.to_string(), "manual");
    }
}
