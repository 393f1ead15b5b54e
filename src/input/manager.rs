//! Input manager for reading uploaded files from disk

use crate::config::ExtractionConfig;
use crate::error::{Result, ResumeClassifierError};
use crate::input::document::RawDocument;
use log::info;
use std::path::Path;
use tokio::fs;

pub struct InputManager {
    max_file_size: u64,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            max_file_size: u64::MAX,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_max_file_size(config.max_file_size_mb.saturating_mul(1024 * 1024))
    }

    pub fn with_max_file_size(mut self, max_bytes: u64) -> Self {
        self.max_file_size = max_bytes;
        self
    }

    /// Read a file into a `RawDocument` named after its file name.
    pub async fn load(&self, path: &Path) -> Result<RawDocument> {
        if !path.exists() {
            return Err(ResumeClassifierError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let metadata = fs::metadata(path).await?;
        if metadata.len() > self.max_file_size {
            return Err(ResumeClassifierError::InvalidInput(format!(
                "File {} is {} bytes, limit is {} bytes",
                path.display(),
                metadata.len(),
                self.max_file_size
            )));
        }

        info!("Reading upload: {}", path.display());
        let bytes = fs::read(path).await?;

        Ok(RawDocument::new(display_name(path), bytes))
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::file_detector::FileType;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_uses_file_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("resume.txt");
        std::fs::write(&path, "Python developer").unwrap();

        let doc = InputManager::new().load(&path).await.unwrap();
        assert_eq!(doc.name(), "resume.txt");
        assert_eq!(doc.format(), &FileType::Text);
        assert_eq!(doc.bytes(), b"Python developer");
    }

    #[tokio::test]
    async fn test_nonexistent_file() {
        let result = InputManager::new().load(Path::new("does/not/exist.txt")).await;
        assert!(matches!(result, Err(ResumeClassifierError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_size_limit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("big.txt");
        std::fs::write(&path, vec![b'a'; 64]).unwrap();

        let manager = InputManager::new().with_max_file_size(16);
        let result = manager.load(&path).await;
        assert!(matches!(result, Err(ResumeClassifierError::InvalidInput(_))));
    }
}
