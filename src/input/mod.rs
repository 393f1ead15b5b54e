//! Input processing module
//! Handles file detection, upload loading, and text extraction

pub mod document;
pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use document::RawDocument;
pub use file_detector::FileType;
pub use manager::InputManager;
pub use text_extractor::DocumentExtractor;
