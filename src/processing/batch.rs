//! Batch prediction with per-document failure isolation

use crate::error::{Result, ResumeClassifierError};
use crate::input::document::RawDocument;
use crate::input::manager::{display_name, InputManager};
use crate::input::text_extractor::DocumentExtractor;
use crate::processing::pipeline::PredictionPipeline;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    UnsupportedFormat,
    Decode,
    Extraction,
    ModelInference,
    Io,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UnsupportedFormat => "UnsupportedFormat",
            ErrorKind::Decode => "DecodeError",
            ErrorKind::Extraction => "ExtractionError",
            ErrorKind::ModelInference => "ModelInferenceError",
            ErrorKind::Io => "IoError",
            ErrorKind::Other => "Error",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ResumeClassifierError> for ErrorDetail {
    fn from(err: &ResumeClassifierError) -> Self {
        let kind = match err {
            ResumeClassifierError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            ResumeClassifierError::Decode(_) => ErrorKind::Decode,
            ResumeClassifierError::Extraction(_) => ErrorKind::Extraction,
            ResumeClassifierError::ModelInference(_) => ErrorKind::ModelInference,
            ResumeClassifierError::Io(_) | ResumeClassifierError::InvalidInput(_) => ErrorKind::Io,
            _ => ErrorKind::Other,
        };

        Self {
            kind,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Category { category: String },
    Error { error: ErrorDetail },
}

/// Exactly one per input document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub document_name: String,
    pub outcome: Outcome,
}

impl PredictionResult {
    pub fn success(document_name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            document_name: document_name.into(),
            outcome: Outcome::Category {
                category: category.into(),
            },
        }
    }

    pub fn failure(document_name: impl Into<String>, error: ErrorDetail) -> Self {
        Self {
            document_name: document_name.into(),
            outcome: Outcome::Error { error },
        }
    }

    /// Turn a stage result into a recorded outcome, logging failures.
    pub fn record(document_name: impl Into<String>, result: Result<String>) -> Self {
        let document_name = document_name.into();
        match result {
            Ok(category) => Self::success(document_name, category),
            Err(err) => {
                let detail = ErrorDetail::from(&err);
                if detail.kind == ErrorKind::ModelInference {
                    error!("Inference failed for {} (possible artifact mismatch): {}", document_name, err);
                } else {
                    warn!("Skipping {}: {}", document_name, err);
                }
                Self::failure(document_name, detail)
            }
        }
    }

    pub fn category(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Category { category } => Some(category),
            Outcome::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorDetail> {
        match &self.outcome {
            Outcome::Category { .. } => None,
            Outcome::Error { error } => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.category().is_some()
    }
}

pub struct BatchRunner {
    extractor: Arc<DocumentExtractor>,
    pipeline: Arc<PredictionPipeline>,
}

impl BatchRunner {
    pub fn new(extractor: Arc<DocumentExtractor>, pipeline: Arc<PredictionPipeline>) -> Self {
        Self { extractor, pipeline }
    }

    pub fn extractor(&self) -> &DocumentExtractor {
        &self.extractor
    }

    pub fn process_document(&self, doc: &RawDocument) -> PredictionResult {
        process_with(&self.extractor, &self.pipeline, doc)
    }

    /// One result per document, in input order.
    pub fn run_batch(&self, docs: &[RawDocument]) -> Vec<PredictionResult> {
        info!("Classifying {} document(s)", docs.len());
        docs.iter().map(|doc| self.process_document(doc)).collect()
    }

    /// Same contract as `run_batch`, with documents processed on the blocking pool.
    pub async fn run_batch_concurrent(&self, docs: Vec<RawDocument>) -> Vec<PredictionResult> {
        info!("Classifying {} document(s) concurrently", docs.len());

        let handles: Vec<_> = docs
            .into_iter()
            .map(|doc| {
                let extractor = Arc::clone(&self.extractor);
                let pipeline = Arc::clone(&self.pipeline);
                let name = doc.name().to_string();
                let handle = tokio::task::spawn_blocking(move || process_with(&extractor, &pipeline, &doc));
                (name, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!("Processing task for {} failed: {}", name, e);
                    PredictionResult::failure(
                        name,
                        ErrorDetail {
                            kind: ErrorKind::Other,
                            message: format!("Processing task failed: {}", e),
                        },
                    )
                }
            };
            results.push(result);
        }

        results
    }

    /// Read each path and classify it; unreadable files get an error in their slot.
    pub async fn run_paths(&self, input: &InputManager, paths: &[PathBuf], concurrent: bool) -> Vec<PredictionResult> {
        let mut slots: Vec<Option<PredictionResult>> = Vec::with_capacity(paths.len());
        let mut docs = Vec::new();
        let mut positions = Vec::new();

        for (position, path) in paths.iter().enumerate() {
            match input.load(path).await {
                Ok(doc) => {
                    positions.push(position);
                    docs.push(doc);
                    slots.push(None);
                }
                Err(err) => slots.push(Some(PredictionResult::record(display_name(path), Err(err)))),
            }
        }

        let processed = if concurrent {
            self.run_batch_concurrent(docs).await
        } else {
            self.run_batch(&docs)
        };

        for (position, result) in positions.into_iter().zip(processed) {
            slots[position] = Some(result);
        }

        slots.into_iter().flatten().collect()
    }
}

fn process_with(extractor: &DocumentExtractor, pipeline: &PredictionPipeline, doc: &RawDocument) -> PredictionResult {
    let outcome = extractor.extract(doc).and_then(|text| pipeline.predict(&text));
    PredictionResult::record(doc.name(), outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::artifacts::ModelArtifacts;
    use crate::processing::classifier::LinearClassifier;
    use crate::processing::label_decoder::LabelDecoder;
    use crate::processing::vectorizer::{TfidfArtifact, TfidfVectorizer};
    use ndarray::array;

    fn runner() -> BatchRunner {
        let vectorizer = TfidfVectorizer::from_artifact(TfidfArtifact {
            vocabulary: [("python".to_string(), 0), ("nurse".to_string(), 1)].into_iter().collect(),
            idf: vec![1.0, 1.0],
            ..TfidfArtifact::default()
        })
        .unwrap();
        let classifier = LinearClassifier::new(vec![0, 1], array![[1.0, 0.0], [0.0, 1.0]], array![0.0, 0.0]).unwrap();
        let decoder = LabelDecoder::new(vec!["Data Science".to_string(), "Healthcare".to_string()]).unwrap();

        let artifacts = ModelArtifacts::new(Box::new(vectorizer), Box::new(classifier), decoder).unwrap();
        let pipeline = PredictionPipeline::new(Arc::new(artifacts));
        BatchRunner::new(Arc::new(DocumentExtractor::new()), Arc::new(pipeline))
    }

    fn docs() -> Vec<RawDocument> {
        vec![
            RawDocument::new("a.txt", b"Python engineer".to_vec()),
            RawDocument::new("b.exe", b"MZ".to_vec()),
            RawDocument::new("c.txt", b"Night nurse".to_vec()),
        ]
    }

    #[test]
    fn test_one_unsupported_document_is_isolated() {
        let results = runner().run_batch(&docs());

        assert_eq!(results.len(), 3);
        assert_eq!(results[0], PredictionResult::success("a.txt", "Data Science"));
        assert_eq!(results[2], PredictionResult::success("c.txt", "Healthcare"));

        let error = results[1].error().unwrap();
        assert_eq!(results[1].document_name, "b.exe");
        assert_eq!(error.kind, ErrorKind::UnsupportedFormat);
        assert!(error.message.contains("exe"));
    }

    #[test]
    fn test_extraction_error_recorded() {
        let results = runner().run_batch(&[RawDocument::new("broken.docx", b"not a zip".to_vec())]);
        assert_eq!(results[0].error().unwrap().kind, ErrorKind::Extraction);
    }

    #[test]
    fn test_empty_batch() {
        assert!(runner().run_batch(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let runner = runner();
        let sequential = runner.run_batch(&docs());
        let concurrent = runner.run_batch_concurrent(docs()).await;
        assert_eq!(sequential, concurrent);
    }

    #[test]
    fn test_error_detail_mapping() {
        let detail = ErrorDetail::from(&ResumeClassifierError::ModelInference("bad shape".to_string()));
        assert_eq!(detail.kind, ErrorKind::ModelInference);
        assert_eq!(detail.message, "Model inference error: bad shape");

        let detail = ErrorDetail::from(&ResumeClassifierError::InvalidInput("missing".to_string()));
        assert_eq!(detail.kind, ErrorKind::Io);
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_value(PredictionResult::success("a.txt", "HR")).unwrap();
        assert_eq!(json["document_name"], "a.txt");
        assert_eq!(json["outcome"]["status"], "category");
        assert_eq!(json["outcome"]["category"], "HR");
    }
}
