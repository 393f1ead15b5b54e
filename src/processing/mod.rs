//! Text normalization, model artifacts and the prediction pipeline

pub mod artifacts;
pub mod batch;
pub mod classifier;
pub mod label_decoder;
pub mod pipeline;
pub mod text_processor;
pub mod vectorizer;

pub use artifacts::ModelArtifacts;
pub use batch::{BatchRunner, ErrorDetail, ErrorKind, Outcome, PredictionResult};
pub use pipeline::PredictionPipeline;
pub use text_processor::TextNormalizer;
