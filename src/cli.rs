//! CLI interface for the resume classifier

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-classifier")]
#[command(about = "Predict the job category of resumes")]
#[command(long_about = "Extract text from PDF, DOCX and TXT resumes and classify each one with a pre-trained TF-IDF model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict a category for each resume
    Predict {
        /// Resume files (PDF, DOCX, TXT)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Show the extracted text of each resume
        #[arg(long)]
        show_text: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Process documents concurrently
        #[arg(long)]
        concurrent: bool,

        /// Directory holding the model artifacts
        #[arg(short, long)]
        models_dir: Option<PathBuf>,
    },

    /// Print the normalized form of some text
    Normalize {
        /// Text to normalize
        text: Option<String>,

        /// Normalize the extracted text of a document instead
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Print the raw extracted text of a document
    Extract {
        file: PathBuf,
    },

    /// Model artifact commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// Load and validate the artifacts, then describe them
    Info {
        /// Directory holding the model artifacts
        #[arg(short, long)]
        models_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}
