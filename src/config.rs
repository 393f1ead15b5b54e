//! Configuration management for the resume classifier

use crate::error::{Result, ResumeClassifierError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub extraction: ExtractionConfig,
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
}

/// Location of the matched artifact triple
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub artifacts_dir: PathBuf,
    pub vectorizer_file: String,
    pub classifier_file: String,
    pub encoder_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub accepted_extensions: Vec<String>,
    pub max_file_size_mb: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub concurrent_batch: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub preview_chars: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        let artifacts_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-classifier")
            .join("models");

        Self {
            models: ModelConfig {
                artifacts_dir,
                vectorizer_file: "tfidf.json".to_string(),
                classifier_file: "clf.json".to_string(),
                encoder_file: "encoder.json".to_string(),
            },
            extraction: ExtractionConfig {
                accepted_extensions: vec!["pdf".to_string(), "docx".to_string(), "txt".to_string()],
                max_file_size_mb: 200,
            },
            processing: ProcessingConfig {
                concurrent_batch: false,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
                preview_chars: 500,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ResumeClassifierError::Configuration(format!("Failed to parse config {}: {}", path.display(), e)))
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeClassifierError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-classifier")
            .join("config.toml")
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.models.artifacts_dir
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.extraction.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}
