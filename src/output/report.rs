//! Batch report structures

use crate::processing::batch::PredictionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// One entry per uploaded file, in upload order
    pub results: Vec<PredictionResult>,

    pub summary: BatchSummary,

    /// Raw extracted text, only when requested
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extracted_text: Vec<ExtractedTextPreview>,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub categories: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTextPreview {
    pub document_name: String,
    /// Extracted text, or the extraction error message
    pub text: String,
    pub total_chars: usize,
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub artifacts_dir: String,
    pub classifier_kind: String,
    pub tool_version: String,
}

impl BatchSummary {
    pub fn from_results(results: &[PredictionResult]) -> Self {
        let mut summary = BatchSummary {
            total: results.len(),
            ..Default::default()
        };

        for result in results {
            match result.category() {
                Some(category) => {
                    summary.succeeded += 1;
                    *summary.categories.entry(category.to_string()).or_insert(0) += 1;
                }
                None => summary.failed += 1,
            }
        }

        summary
    }
}

impl ExtractedTextPreview {
    pub fn new(document_name: impl Into<String>, text: &str, max_chars: usize) -> Self {
        let total_chars = text.chars().count();
        Self {
            document_name: document_name.into(),
            text: truncate_text(text, max_chars),
            total_chars,
            truncated: total_chars > max_chars,
        }
    }
}

impl ReportMetadata {
    pub fn new(artifacts_dir: impl Into<String>, classifier_kind: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            artifacts_dir: artifacts_dir.into(),
            classifier_kind: classifier_kind.into(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl BatchReport {
    pub fn new(results: Vec<PredictionResult>, metadata: ReportMetadata) -> Self {
        let summary = BatchSummary::from_results(&results);
        Self {
            results,
            summary,
            extracted_text: Vec::new(),
            metadata,
        }
    }

    pub fn with_extracted_text(mut self, previews: Vec<ExtractedTextPreview>) -> Self {
        self.extracted_text = previews;
        self
    }
}

/// Truncate text to at most `max_chars` characters, preferring a word boundary
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => {
            let truncated = &text[..cut];
            let end = truncated.rfind(' ').filter(|&i| i > 0).unwrap_or(cut);
            format!("{}...", &text[..end])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::batch::{ErrorDetail, ErrorKind};

    #[test]
    fn test_summary_counts() {
        let results = vec![
            PredictionResult::success("a.pdf", "Java Developer"),
            PredictionResult::success("b.pdf", "Java Developer"),
            PredictionResult::failure(
                "c.png",
                ErrorDetail {
                    kind: ErrorKind::UnsupportedFormat,
                    message: "png".to_string(),
                },
            ),
            PredictionResult::success("d.txt", "HR"),
        ];

        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.categories.get("Java Developer"), Some(&2));
        assert_eq!(summary.categories.get("HR"), Some(&1));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("hello brave new world", 13), "hello brave...");
        // multi-byte characters never split
        assert_eq!(truncate_text("ééééé", 3), "ééé...");
    }

    #[test]
    fn test_preview_flags_truncation() {
        let preview = ExtractedTextPreview::new("a.txt", "one two three", 7);
        assert!(preview.truncated);
        assert_eq!(preview.total_chars, 13);
        assert_eq!(preview.text, "one...");
    }
}
