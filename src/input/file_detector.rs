//! File type detection

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    Pdf,
    Docx,
    Text,
    /// Carries the offending extension
    Unknown(String),
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "docx" => FileType::Docx,
            "txt" => FileType::Text,
            other => FileType::Unknown(other.to_string()),
        }
    }

    /// Everything after the last `.`, or the whole name when there is none.
    pub fn from_file_name(name: &str) -> Self {
        let ext = name.rsplit('.').next().unwrap_or(name);
        Self::from_extension(ext)
    }

    pub fn extension(&self) -> &str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Docx => "docx",
            FileType::Text => "txt",
            FileType::Unknown(ext) => ext,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, FileType::Unknown(_))
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}
