//! The matched vectorizer / classifier / label decoder triple

use crate::config::ModelConfig;
use crate::error::{Result, ResumeClassifierError};
use crate::processing::classifier::{classifier_from_file, Classifier};
use crate::processing::label_decoder::LabelDecoder;
use crate::processing::vectorizer::{TfidfVectorizer, Vectorizer};
use log::info;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// Immutable after construction; shared read-only across predictions.
pub struct ModelArtifacts {
    vectorizer: Box<dyn Vectorizer>,
    classifier: Box<dyn Classifier>,
    decoder: LabelDecoder,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSummary {
    pub feature_dimension: usize,
    pub classifier_kind: String,
    pub categories: Vec<String>,
}

impl ModelArtifacts {
    /// Fails when the three artifacts do not come from the same training run.
    pub fn new(
        vectorizer: Box<dyn Vectorizer>,
        classifier: Box<dyn Classifier>,
        decoder: LabelDecoder,
    ) -> Result<Self> {
        if vectorizer.dimension() != classifier.n_features() {
            return Err(ResumeClassifierError::ModelLoading(format!(
                "vectorizer produces {} features but the {} classifier expects {}",
                vectorizer.dimension(),
                classifier.kind(),
                classifier.n_features()
            )));
        }

        if let Some(&index) = classifier.classes().iter().find(|&&c| c >= decoder.len()) {
            return Err(ResumeClassifierError::ModelLoading(format!(
                "classifier can emit class {} but the label decoder only knows {} categories",
                index,
                decoder.len()
            )));
        }

        Ok(Self {
            vectorizer,
            classifier,
            decoder,
        })
    }

    /// Load all three artifacts from `dir`; any failure is fatal to the caller.
    pub fn load(dir: &Path, config: &ModelConfig) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading model artifacts from: {}", dir.display());

        let vectorizer_path = dir.join(&config.vectorizer_file);
        let classifier_path = dir.join(&config.classifier_file);
        let encoder_path = dir.join(&config.encoder_file);

        for path in [&vectorizer_path, &classifier_path, &encoder_path] {
            if !path.exists() {
                return Err(ResumeClassifierError::ModelLoading(format!(
                    "missing artifact: {}",
                    path.display()
                )));
            }
        }

        let vectorizer = TfidfVectorizer::from_file(&vectorizer_path)?;
        let classifier = classifier_from_file(&classifier_path)?;
        let decoder = LabelDecoder::from_file(&encoder_path)?;

        let artifacts = Self::new(Box::new(vectorizer), classifier, decoder)?;
        info!(
            "Model artifacts loaded in {:.2?} ({} features, {} categories)",
            start_time.elapsed(),
            artifacts.vectorizer.dimension(),
            artifacts.decoder.len()
        );

        Ok(artifacts)
    }

    pub fn vectorizer(&self) -> &dyn Vectorizer {
        self.vectorizer.as_ref()
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn decoder(&self) -> &LabelDecoder {
        &self.decoder
    }

    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            feature_dimension: self.vectorizer.dimension(),
            classifier_kind: self.classifier.kind().to_string(),
            categories: self
                .classifier
                .classes()
                .iter()
                .filter_map(|&c| self.decoder.decode(c).ok())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::classifier::LinearClassifier;
    use crate::processing::vectorizer::TfidfArtifact;
    use ndarray::array;

    fn vectorizer(terms: &[&str]) -> Box<dyn Vectorizer> {
        let artifact = TfidfArtifact {
            vocabulary: terms.iter().enumerate().map(|(i, t)| (t.to_string(), i)).collect(),
            idf: vec![1.0; terms.len()],
            ..TfidfArtifact::default()
        };
        Box::new(TfidfVectorizer::from_artifact(artifact).unwrap())
    }

    fn decoder(names: &[&str]) -> LabelDecoder {
        LabelDecoder::new(names.iter().map(|n| n.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_matched_triple() {
        let clf = LinearClassifier::new(vec![0, 1], array![[1.0, 0.0], [0.0, 1.0]], array![0.0, 0.0]).unwrap();
        let artifacts = ModelArtifacts::new(vectorizer(&["java", "nurse"]), Box::new(clf), decoder(&["IT", "Health"])).unwrap();

        let summary = artifacts.summary();
        assert_eq!(summary.feature_dimension, 2);
        assert_eq!(summary.classifier_kind, "linear");
        assert_eq!(summary.categories, vec!["IT", "Health"]);
    }

    #[test]
    fn test_dimension_mismatch_fails_fast() {
        let clf = LinearClassifier::new(vec![0, 1], array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], array![0.0, 0.0]).unwrap();
        let result = ModelArtifacts::new(vectorizer(&["java", "nurse"]), Box::new(clf), decoder(&["IT", "Health"]));
        assert!(matches!(result, Err(ResumeClassifierError::ModelLoading(_))));
    }

    #[test]
    fn test_undecodable_class_fails_fast() {
        let clf = LinearClassifier::new(vec![0, 5], array![[1.0, 0.0], [0.0, 1.0]], array![0.0, 0.0]).unwrap();
        let result = ModelArtifacts::new(vectorizer(&["java", "nurse"]), Box::new(clf), decoder(&["IT", "Health"]));
        assert!(matches!(result, Err(ResumeClassifierError::ModelLoading(_))));
    }

    #[test]
    fn test_missing_artifact() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let result = ModelArtifacts::load(temp_dir.path(), &crate::config::Config::default().models);
        assert!(matches!(result, Err(ResumeClassifierError::ModelLoading(_))));
    }
}
