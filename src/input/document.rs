//! Uploaded document representation

use crate::input::file_detector::FileType;

/// An uploaded file: its name, declared format and raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    name: String,
    format: FileType,
    bytes: Vec<u8>,
}

impl RawDocument {
    /// Declared format is taken from the file name's extension.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let format = FileType::from_file_name(&name);
        Self { name, format, bytes }
    }

    pub fn with_format(name: impl Into<String>, format: FileType, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            format,
            bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> &FileType {
        &self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
