//! Console, JSON and Markdown rendering of batch reports

use crate::config::OutputFormat;
use crate::error::{Result, ResumeClassifierError};
use crate::output::report::BatchReport;
use crate::processing::batch::{Outcome, PredictionResult};
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &BatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Coloured terminal output
pub struct ConsoleFormatter {
    use_colors: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Picks the formatter for a requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    /// One line per document
    pub fn format_result(&self, result: &PredictionResult) -> String {
        match &result.outcome {
            Outcome::Category { category } => format!(
                "📄 {} ➜ Predicted Category: {}",
                result.document_name,
                self.colorize(category, Color::Green)
            ),
            Outcome::Error { error } => format!(
                "📄 {} ➜ {}",
                result.document_name,
                self.colorize(&format!("Error: {}", error.message), Color::Red)
            ),
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &BatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("Resume Category Predictions", 1));
        for result in &report.results {
            output.push_str(&self.format_result(result));
            output.push('\n');
        }

        let summary = &report.summary;
        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "  • Documents: {}  • Classified: {}  • Failed: {}\n",
            summary.total,
            self.colorize(&summary.succeeded.to_string(), Color::Green),
            self.colorize(
                &summary.failed.to_string(),
                if summary.failed > 0 { Color::Red } else { Color::White }
            )
        ));

        if !summary.categories.is_empty() {
            output.push_str("\n  Category distribution:\n");
            for (category, count) in &summary.categories {
                output.push_str(&format!("    {:<30} {}\n", category, count));
            }
        }

        if !report.extracted_text.is_empty() {
            output.push_str(&self.format_header("Extracted Text", 2));
            for preview in &report.extracted_text {
                output.push_str(&self.format_header(&preview.document_name, 3));
                output.push_str(&preview.text);
                output.push('\n');
                if preview.truncated {
                    output.push_str(&self.colorize(
                        &format!("  ({} characters total)\n", preview.total_chars),
                        Color::BrightBlack,
                    ));
                }
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &BatchReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &BatchReport) -> Result<String> {
        let mut md = String::from("# Resume Category Predictions\n\n");

        if self.include_metadata {
            md.push_str(&format!(
                "*Generated {} with {} classifier from `{}`*\n\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.classifier_kind,
                report.metadata.artifacts_dir
            ));
        }

        md.push_str("| Document | Result |\n|---|---|\n");
        for result in &report.results {
            let cell = match &result.outcome {
                Outcome::Category { category } => format!("**{}**", Self::escape_cell(category)),
                Outcome::Error { error } => format!("Error ({}): {}", error.kind, Self::escape_cell(&error.message)),
            };
            md.push_str(&format!("| {} | {} |\n", Self::escape_cell(&result.document_name), cell));
        }

        let summary = &report.summary;
        md.push_str(&format!(
            "\n## Summary\n\n- Documents: {}\n- Classified: {}\n- Failed: {}\n",
            summary.total, summary.succeeded, summary.failed
        ));

        if !summary.categories.is_empty() {
            md.push_str("\n| Category | Count |\n|---|---|\n");
            for (category, count) in &summary.categories {
                md.push_str(&format!("| {} | {} |\n", Self::escape_cell(category), count));
            }
        }

        if !report.extracted_text.is_empty() {
            md.push_str("\n## Extracted Text\n");
            for preview in &report.extracted_text {
                md.push_str(&format!("\n### {}\n\n```text\n{}\n```\n", preview.document_name, preview.text));
            }
        }

        Ok(md)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, true)
    }

    pub fn with_options(use_colors: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &BatchReport, format: &OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        };
        formatter.format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;

    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ResumeClassifierError::OutputFormatting(format!("cannot create {}: {}", parent.display(), e))
        })?;
    }
    fs::write(file_path, content)?;
    Ok(())
}
