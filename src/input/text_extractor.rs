//! Text extraction from the supported upload formats

use crate::config::ExtractionConfig;
use crate::error::{Result, ResumeClassifierError};
use crate::input::document::RawDocument;
use crate::input::file_detector::FileType;
use docx_rs::{read_docx, DocumentChild, Docx, Paragraph, ParagraphChild, Run, RunChild};
use log::debug;
use lopdf::Document;

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// Per-page PDF text, joined in page order with no separator.
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let doc = Document::load_mem(bytes)?;
        let pages = doc.get_pages();

        let mut text = String::new();
        for page_number in pages.keys() {
            let page_text = doc.extract_text(&[*page_number]).map_err(|e| {
                ResumeClassifierError::Extraction(format!("PDF page {}: {}", page_number, e))
            })?;
            // lopdf closes every page with a newline of its own
            text.push_str(page_text.strip_suffix('\n').unwrap_or(&page_text));
        }

        debug!("Extracted {} characters from {} PDF pages", text.len(), pages.len());
        Ok(text)
    }
}

/// Text of the top-level body paragraphs, one `\n` after each.
///
/// Tables, text boxes and other nested content are skipped, so a text box
/// inside a paragraph never splits that paragraph's own runs.
pub struct DocxExtractor;

impl DocxExtractor {
    fn document_text(docx: &Docx) -> String {
        let mut text = String::new();

        for child in &docx.document.children {
            if let DocumentChild::Paragraph(paragraph) = child {
                text.push_str(&Self::paragraph_text(paragraph));
                text.push('\n');
            }
        }

        text
    }

    fn paragraph_text(paragraph: &Paragraph) -> String {
        let mut text = String::new();

        for child in &paragraph.children {
            match child {
                ParagraphChild::Run(run) => push_run_text(&mut text, run),
                ParagraphChild::Hyperlink(link) => {
                    for link_child in &link.children {
                        if let ParagraphChild::Run(run) = link_child {
                            push_run_text(&mut text, run);
                        }
                    }
                }
                _ => {}
            }
        }

        text
    }
}

fn push_run_text(text: &mut String, run: &Run) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let docx = read_docx(bytes).map_err(|e| ResumeClassifierError::Extraction(format!("DOCX: {:?}", e)))?;
        let text = Self::document_text(&docx);

        debug!("Extracted {} characters from DOCX paragraphs", text.len());
        Ok(text)
    }
}

/// UTF-8 with a Latin-1 fallback.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_string()),
            Err(e) => {
                debug!("Text is not valid UTF-8 ({}), decoding as Latin-1", e);
                decode_latin1(bytes)
            }
        }
    }
}

/// Last link of the decode chain; every byte maps to the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> Result<String> {
    Ok(bytes.iter().map(|&b| char::from(b)).collect())
}

/// Dispatches a `RawDocument` to the extractor for its declared format.
pub struct DocumentExtractor {
    pdf: PdfExtractor,
    docx: DocxExtractor,
    text: PlainTextExtractor,
    /// Lowercase extensions allowed through; `None` accepts every supported format
    accepted: Option<Vec<String>>,
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor {
    pub fn new() -> Self {
        Self {
            pdf: PdfExtractor,
            docx: DocxExtractor,
            text: PlainTextExtractor,
            accepted: None,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        let mut extractor = Self::new();
        extractor.accepted = Some(
            config
                .accepted_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
        );
        extractor
    }

    pub fn extract(&self, doc: &RawDocument) -> Result<String> {
        if let Some(accepted) = &self.accepted {
            let ext = doc.format().extension();
            if !accepted.iter().any(|a| a == ext) {
                return Err(ResumeClassifierError::UnsupportedFormat(ext.to_string()));
            }
        }

        match doc.format() {
            FileType::Pdf => {
                debug!("Extracting text from PDF: {}", doc.name());
                self.pdf.extract(doc.bytes())
            }
            FileType::Docx => {
                debug!("Extracting text from DOCX: {}", doc.name());
                self.docx.extract(doc.bytes())
            }
            FileType::Text => {
                debug!("Decoding plain text file: {}", doc.name());
                self.text.extract(doc.bytes())
            }
            FileType::Unknown(ext) => Err(ResumeClassifierError::UnsupportedFormat(ext.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{BreakType, Table, TableCell, TableRow};
    use std::io::{Cursor, Read, Write};
    use zip::write::SimpleFileOptions;

    #[test]
    fn test_utf8_text() {
        let text = PlainTextExtractor.extract("Café manager".as_bytes()).unwrap();
        assert_eq!(text, "Café manager");
    }

    #[test]
    fn test_latin1_fallback() {
        // "Café" in Latin-1: 0xE9 alone is not valid UTF-8
        let bytes = [b'C', b'a', b'f', 0xE9, b' ', b'x'];
        let text = PlainTextExtractor.extract(&bytes).unwrap();
        assert_eq!(text, "Café x");
    }

    #[test]
    fn test_latin1_maps_every_byte() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = decode_latin1(&bytes).unwrap();

        assert_eq!(text.chars().count(), 256);
        assert!(text.chars().zip(bytes).all(|(c, b)| c as u32 == u32::from(b)));
    }

    fn pack(docx: Docx) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    /// A valid package whose `word/document.xml` body is replaced verbatim.
    fn docx_with_body(body: &str) -> Vec<u8> {
        let document = format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
                r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
                r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
                r#"xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape">"#,
                r#"<w:body>{}</w:body></w:document>"#
            ),
            body
        );

        let mut source = zip::ZipArchive::new(Cursor::new(pack(Docx::new()))).unwrap();
        let mut output = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut output);
            for index in 0..source.len() {
                let mut entry = source.by_index(index).unwrap();
                let name = entry.name().to_string();
                let mut data = Vec::new();
                entry.read_to_end(&mut data).unwrap();
                if name == "word/document.xml" {
                    data = document.clone().into_bytes();
                }
                writer.start_file(name, SimpleFileOptions::default()).unwrap();
                writer.write_all(&data).unwrap();
            }
            writer.finish().unwrap();
        }
        output.into_inner()
    }

    #[test]
    fn test_docx_paragraphs() {
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Senior Engineer")))
            .add_paragraph(Paragraph::new())
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("R&D").add_tab().add_text("Rust <3"))
                    .add_run(Run::new().add_break(BreakType::TextWrapping).add_text("été")),
            )
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Rust")).add_run(Run::new().add_text("acean")));

        let text = DocxExtractor.extract(&pack(docx)).unwrap();
        assert_eq!(text, "Senior Engineer\n\nR&D\tRust <3\nété\nRustacean\n");
    }

    #[test]
    fn test_docx_table_cells_skipped() {
        let cell = TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Cell")));
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Before")))
            .add_table(Table::new(vec![TableRow::new(vec![cell])]))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("After")));

        let text = DocxExtractor.extract(&pack(docx)).unwrap();
        assert_eq!(text, "Before\nAfter\n");
    }

    #[test]
    fn test_docx_text_box_keeps_outer_paragraph() {
        let body = concat!(
            r#"<w:p><w:r><w:t>Outer</w:t></w:r>"#,
            r#"<w:r><w:drawing><wp:anchor><a:graphic>"#,
            r#"<a:graphicData uri="http://schemas.microsoft.com/office/word/2010/wordprocessingShape">"#,
            r#"<wps:wsp><wps:txbx><w:txbxContent><w:p><w:r><w:t>Inner</w:t></w:r></w:p></w:txbxContent></wps:txbx></wps:wsp>"#,
            r#"</a:graphicData></a:graphic></wp:anchor></w:drawing></w:r>"#,
            r#"<w:r><w:t>Tail</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Next</w:t></w:r></w:p>"#
        );

        let text = DocxExtractor.extract(&docx_with_body(body)).unwrap();
        assert_eq!(text, "OuterTail\nNext\n");
    }

    #[test]
    fn test_invalid_docx_container() {
        let result = DocxExtractor.extract(b"definitely not a zip file");
        assert!(matches!(result, Err(ResumeClassifierError::Extraction(_))));
    }

    #[test]
    fn test_invalid_pdf() {
        let result = PdfExtractor.extract(b"%PDF-1.4 truncated");
        assert!(matches!(result, Err(ResumeClassifierError::Extraction(_))));
    }

    #[test]
    fn test_unsupported_format_names_extension() {
        let doc = RawDocument::new("photo.jpeg", vec![0xFF, 0xD8]);
        match DocumentExtractor::new().extract(&doc) {
            Err(ResumeClassifierError::UnsupportedFormat(ext)) => assert_eq!(ext, "jpeg"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_accepted_extensions_restrict_formats() {
        let config = ExtractionConfig {
            accepted_extensions: vec!["pdf".to_string(), ".TXT".to_string()],
            max_file_size_mb: 1,
        };
        let extractor = DocumentExtractor::from_config(&config);

        let text = extractor.extract(&RawDocument::new("cv.txt", b"Rust".to_vec())).unwrap();
        assert_eq!(text, "Rust");

        let result = extractor.extract(&RawDocument::new("cv.docx", Vec::new()));
        assert!(matches!(result, Err(ResumeClassifierError::UnsupportedFormat(ext)) if ext == "docx"));
    }
}
