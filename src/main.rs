//! Resume classifier: predict job categories for uploaded resumes

mod cli;
mod config;
mod error;
mod input;
mod output;
mod processing;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction, ModelAction};
use config::Config;
use error::{Result, ResumeClassifierError};
use input::{DocumentExtractor, InputManager};
use log::{error, info};
use output::{save_report_to_file, BatchReport, ExtractedTextPreview, ReportGenerator, ReportMetadata};
use processing::{BatchRunner, ModelArtifacts, PredictionPipeline, TextNormalizer};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Predict {
            files,
            output,
            show_text,
            save,
            concurrent,
            models_dir,
        } => {
            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeClassifierError::InvalidInput)?,
                None => config.output.format,
            };

            let artifacts_dir = models_dir.unwrap_or_else(|| config.artifacts_dir().to_path_buf());
            let artifacts = Arc::new(ModelArtifacts::load(&artifacts_dir, &config.models)?);
            let classifier_kind = artifacts.classifier().kind().to_string();

            let extractor = Arc::new(DocumentExtractor::from_config(&config.extraction));
            let pipeline = Arc::new(PredictionPipeline::new(artifacts));
            let runner = BatchRunner::new(extractor, pipeline);
            let input_manager = InputManager::from_config(&config.extraction);

            let concurrent = concurrent || config.processing.concurrent_batch;
            info!("Classifying {} file(s)", files.len());
            let results = runner.run_paths(&input_manager, &files, concurrent).await;

            let metadata = ReportMetadata::new(artifacts_dir.display().to_string(), classifier_kind);
            let mut report = BatchReport::new(results, metadata);

            if show_text {
                let mut previews = Vec::with_capacity(files.len());
                for path in &files {
                    let text = match input_manager.load(path).await.and_then(|doc| runner.extractor().extract(&doc)) {
                        Ok(text) => text,
                        Err(e) => format!("Error: {}", e),
                    };
                    previews.push(ExtractedTextPreview::new(
                        input::manager::display_name(path),
                        &text,
                        config.output.preview_chars,
                    ));
                }
                report = report.with_extracted_text(previews);
            }

            let generator = ReportGenerator::with_options(config.output.color_output, true);
            let rendered = generator.generate_report(&report, &output_format)?;
            println!("{}", rendered);

            if let Some(save_path) = save {
                // saved copies are never coloured
                let content = ReportGenerator::with_options(false, true).generate_report(&report, &output_format)?;
                save_report_to_file(&content, &save_path)?;
                println!("💾 Report saved to {}", save_path.display());
            }
        }

        Commands::Normalize { text, file } => {
            let normalizer = TextNormalizer::new();
            let raw = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => extract_file(&path, &config).await?,
                (None, None) => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            println!("{}", normalizer.normalize(&raw));
        }

        Commands::Extract { file } => {
            let text = extract_file(&file, &config).await?;
            println!("{}", text);
        }

        Commands::Models { action } => match action {
            ModelAction::Info { models_dir } => {
                let artifacts_dir = models_dir.unwrap_or_else(|| config.artifacts_dir().to_path_buf());
                let artifacts = ModelArtifacts::load(&artifacts_dir, &config.models)?;
                let summary = artifacts.summary();

                println!("📋 Model artifacts in {}\n", artifacts_dir.display());
                println!("Vocabulary size: {}", summary.feature_dimension);
                println!("Classifier: {}", summary.classifier_kind);
                println!("Categories ({}):", summary.categories.len());
                for category in &summary.categories {
                    println!("  • {}", category);
                }
            }
        },

        Commands::Config { action } => {
            let config_path = config_override.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    let content = toml::to_string_pretty(&config)
                        .map_err(|e| ResumeClassifierError::Configuration(e.to_string()))?;
                    println!("⚙️  Current Configuration ({})\n", config_path.display());
                    println!("{}", content);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&config_path)?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => {
                    println!("{}", config_path.display());
                }
            }
        }
    }

    Ok(())
}

async fn extract_file(path: &Path, config: &Config) -> Result<String> {
    let doc = InputManager::from_config(&config.extraction).load(path).await?;
    DocumentExtractor::from_config(&config.extraction).extract(&doc)
}
