//! Maps encoded class indices back to category names

use crate::error::{Result, ResumeClassifierError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelDecoderArtifact {
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelDecoder {
    classes: Vec<String>,
}

impl LabelDecoder {
    pub fn new(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            return Err(ResumeClassifierError::ModelLoading(
                "label decoder has no classes".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = classes.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(ResumeClassifierError::ModelLoading(format!(
                "label decoder lists '{}' more than once",
                duplicate
            )));
        }

        Ok(Self { classes })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ResumeClassifierError::ModelLoading(format!("cannot read label decoder {}: {}", path.display(), e))
        })?;
        let artifact: LabelDecoderArtifact = serde_json::from_str(&json)
            .map_err(|e| ResumeClassifierError::ModelLoading(format!("malformed label decoder artifact: {}", e)))?;
        Self::new(artifact.classes)
    }

    pub fn decode(&self, index: usize) -> Result<&str> {
        self.classes.get(index).map(String::as_str).ok_or_else(|| {
            ResumeClassifierError::ModelInference(format!(
                "class index {} is outside the {} known categories",
                index,
                self.classes.len()
            ))
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
