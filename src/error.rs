//! Error handling for the resume classifier

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeClassifierError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file type '{0}'. Please upload a PDF, DOCX, or TXT file.")]
    UnsupportedFormat(String),

    #[error("Text decoding error: {0}")]
    Decode(String),

    #[error("Text extraction error: {0}")]
    Extraction(String),

    #[error("Model inference error: {0}")]
    ModelInference(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeClassifierError>;

impl From<lopdf::Error> for ResumeClassifierError {
    fn from(err: lopdf::Error) -> Self {
        ResumeClassifierError::Extraction(format!("PDF: {}", err))
    }
}

impl From<ndarray::ShapeError> for ResumeClassifierError {
    fn from(err: ndarray::ShapeError) -> Self {
        ResumeClassifierError::ModelLoading(format!("artifact shape: {}", err))
    }
}
