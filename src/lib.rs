//! Workspace umbrella crate for Mindsignal.
//!
//! Turns one block of free text into two independent signals and merges them:
//!
//! - an emotion distribution from [`emotion`], computed over the whole text;
//! - a PHQ-8 estimate from [`session`], computed by segmenting the text into
//!   utterances, encoding each with [`encoder`] and aggregating the ordered
//!   embeddings.
//!
//! [`ModelOrchestrator`] owns both models behind once-only [`ModelHandle`]s and
//! exposes the single [`ModelOrchestrator::run`] entry point. Stage failures are
//! mapped onto [`PipelineError`].
//!
//! ```no_run
//! use mindsignal::{MindsignalConfig, ModelOrchestrator};
//!
//! let cfg = MindsignalConfig::from_file("mindsignal.yaml").unwrap();
//! let orchestrator = ModelOrchestrator::from_config(&cfg).unwrap();
//! let result = orchestrator.run("I feel okay. Today was fine!").unwrap();
//! println!("{} {}", result.top_label, result.score);
//! ```

pub mod config;
mod error;
mod metrics;
mod models;
mod orchestrator;

pub use crate::config::{ConfigLoadError, MindsignalConfig, OrchestratorConfig};
pub use crate::error::PipelineError;
pub use crate::metrics::{PipelineMetrics, set_pipeline_metrics};
pub use crate::orchestrator::{CombinedResult, LoadPolicy, Model, ModelHandle, ModelOrchestrator};

pub use emotion::{
    EMOTION_MODEL_NAME, EmotionClassifier, EmotionConfig, EmotionError, EmotionResult,
    LabelDistribution, LabelIndex,
};
pub use encoder::{ArtifactKind, EncoderConfig, EncoderError, UtteranceEncoder};
pub use session::{
    AggregateOutput, DEPRESSION_MODEL_NAME, DepressionPipeline, DepressionResult,
    EncodedUtterance, SessionAggregator, SessionConfig, SessionError, Utterance,
    UtteranceEmbedder, postprocess, segment,
};
