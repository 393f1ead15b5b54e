//! normalize → vectorize → classify → decode

use crate::error::Result;
use crate::processing::artifacts::ModelArtifacts;
use crate::processing::text_processor::TextNormalizer;
use log::debug;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub category: String,
    pub class_index: usize,
    pub normalized_text: String,
}

pub struct PredictionPipeline {
    normalizer: TextNormalizer,
    artifacts: Arc<ModelArtifacts>,
}

impl PredictionPipeline {
    pub fn new(artifacts: Arc<ModelArtifacts>) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            artifacts,
        }
    }

    /// Predict the category name for raw resume text.
    pub fn predict(&self, text: &str) -> Result<String> {
        self.predict_detailed(text).map(|prediction| prediction.category)
    }

    pub fn predict_detailed(&self, text: &str) -> Result<Prediction> {
        let normalized_text = self.normalizer.normalize(text);

        let features = self.artifacts.vectorizer().transform(&normalized_text)?;
        let class_index = self.artifacts.classifier().predict(&features)?;
        let category = self.artifacts.decoder().decode(class_index)?.to_string();

        debug!(
            "Predicted '{}' (class {}) from {} normalized characters",
            category,
            class_index,
            normalized_text.len()
        );

        Ok(Prediction {
            category,
            class_index,
            normalized_text,
        })
    }
}
