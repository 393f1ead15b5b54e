//! TF-IDF vectorization over a fitted vocabulary

use crate::error::{Result, ResumeClassifierError};
use ndarray::Array1;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

pub type FeatureVector = Array1<f64>;

/// Turns normalized text into a fixed-length feature vector.
pub trait Vectorizer: Send + Sync {
    fn transform(&self, text: &str) -> Result<FeatureVector>;

    /// Length of every vector `transform` produces
    fn dimension(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
    None,
}

/// On-disk form of a fitted TF-IDF vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfArtifact {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default = "default_norm")]
    pub norm: Norm,
    #[serde(default)]
    pub sublinear_tf: bool,
}

fn default_lowercase() -> bool {
    true
}

fn default_token_pattern() -> String {
    r"\b\w\w+\b".to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Norm {
    Norm::L2
}

impl Default for TfidfArtifact {
    fn default() -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            lowercase: default_lowercase(),
            token_pattern: default_token_pattern(),
            ngram_range: default_ngram_range(),
            stop_words: Vec::new(),
            norm: default_norm(),
            sublinear_tf: false,
        }
    }
}

#[derive(Debug)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Array1<f64>,
    lowercase: bool,
    token_regex: Regex,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    norm: Norm,
    sublinear_tf: bool,
}

impl TfidfVectorizer {
    pub fn from_artifact(artifact: TfidfArtifact) -> Result<Self> {
        let dimension = artifact.idf.len();

        if artifact.vocabulary.len() != dimension {
            return Err(ResumeClassifierError::ModelLoading(format!(
                "vectorizer vocabulary has {} terms but idf has {} weights",
                artifact.vocabulary.len(),
                dimension
            )));
        }

        let mut seen = vec![false; dimension];
        for (term, &index) in &artifact.vocabulary {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(ResumeClassifierError::ModelLoading(format!(
                        "vectorizer feature index {} is assigned twice (term '{}')",
                        index, term
                    )))
                }
                None => {
                    return Err(ResumeClassifierError::ModelLoading(format!(
                        "vectorizer term '{}' has index {} outside 0..{}",
                        term, index, dimension
                    )))
                }
            }
        }

        if let Some(bad) = artifact.idf.iter().find(|w| !w.is_finite()) {
            return Err(ResumeClassifierError::ModelLoading(format!(
                "vectorizer idf contains a non-finite weight: {}",
                bad
            )));
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ResumeClassifierError::ModelLoading(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let token_regex = Regex::new(&artifact.token_pattern).map_err(|e| {
            ResumeClassifierError::ModelLoading(format!("invalid token_pattern '{}': {}", artifact.token_pattern, e))
        })?;
        if token_regex.captures_len() > 2 {
            return Err(ResumeClassifierError::ModelLoading(
                "token_pattern may contain at most one capturing group".to_string(),
            ));
        }

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: Array1::from(artifact.idf),
            lowercase: artifact.lowercase,
            token_regex,
            ngram_range: artifact.ngram_range,
            stop_words: artifact.stop_words.into_iter().collect(),
            norm: artifact.norm,
            sublinear_tf: artifact.sublinear_tf,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: TfidfArtifact = serde_json::from_str(json)
            .map_err(|e| ResumeClassifierError::ModelLoading(format!("malformed vectorizer artifact: {}", e)))?;
        Self::from_artifact(artifact)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ResumeClassifierError::ModelLoading(format!("cannot read vectorizer {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase { text.to_lowercase() } else { text.to_string() };

        let use_group = self.token_regex.captures_len() == 2;
        self.token_regex
            .captures_iter(&text)
            .filter_map(|caps| if use_group { caps.get(1) } else { caps.get(0) })
            .map(|m| m.as_str().to_string())
            .filter(|token| !self.stop_words.contains(token))
            .collect()
    }

    fn ngrams(&self, tokens: Vec<String>) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        if max_n == 1 {
            return tokens;
        }

        let mut grams = Vec::new();
        let mut start_n = min_n;
        if min_n == 1 {
            grams.extend(tokens.iter().cloned());
            start_n = 2;
        }

        for n in start_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                grams.push(window.join(" "));
            }
        }

        grams
    }
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, text: &str) -> Result<FeatureVector> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.ngrams(self.tokenize(text)) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut features = Array1::<f64>::zeros(self.dimension());
        for (index, count) in counts {
            let tf = if self.sublinear_tf { 1.0 + count.ln() } else { count };
            features[index] = tf * self.idf[index];
        }

        let norm = match self.norm {
            Norm::L2 => features.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Norm::L1 => features.iter().map(|v| v.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if norm > 0.0 {
            features.mapv_inplace(|v| v / norm);
        }

        Ok(features)
    }

    fn dimension(&self) -> usize {
        self.idf.len()
    }
}
