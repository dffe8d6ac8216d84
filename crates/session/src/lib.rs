//! Mindsignal session pipeline
//!
//! Estimates a PHQ-8 depression score for one block of free text treated as a
//! single session:
//!
//! 1. [`segment`] splits the text into ordered utterances (capped at
//!    [`SessionConfig::max_utterances`]).
//! 2. An [`UtteranceEmbedder`] turns every utterance into a fixed-width vector.
//! 3. [`SessionAggregator`] runs a bidirectional LSTM over the ordered vectors and
//!    applies a regression head and a binary head to the session representation.
//! 4. [`postprocess`] clamps, rounds and thresholds the raw outputs into a
//!    [`DepressionResult`].
//!
//! Every call is independent. Weights are read once at load time and never
//! mutated, so a loaded [`DepressionPipeline`] can be shared across threads.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod lstm;
pub mod postprocess;
pub mod segment;
pub mod types;

mod weights;

pub use crate::aggregator::{AggregateOutput, SessionAggregator};
pub use crate::config::SessionConfig;
pub use crate::error::SessionError;
pub use crate::postprocess::postprocess;
pub use crate::segment::segment;
pub use crate::types::{DepressionResult, EncodedUtterance, Utterance};

use std::time::Instant;

use encoder::{EncoderConfig, UtteranceEncoder};
use tracing::{info, warn, Level};

/// Stable model name used in logs and load errors.
pub const DEPRESSION_MODEL_NAME: &str = "daic_phq8";

/// Produces one embedding per utterance, in order.
pub trait UtteranceEmbedder: Send + Sync {
    fn embed(&self, utterances: &[Utterance]) -> Result<Vec<EncodedUtterance>, SessionError>;
}

impl UtteranceEmbedder for UtteranceEncoder {
    fn embed(&self, utterances: &[Utterance]) -> Result<Vec<EncodedUtterance>, SessionError> {
        let texts: Vec<&str> = utterances.iter().map(Utterance::text).collect();
        let vectors = self.encode(&texts)?;
        if vectors.len() != utterances.len() {
            return Err(SessionError::Shape(format!(
                "encoder returned {} vectors for {} utterances",
                vectors.len(),
                utterances.len()
            )));
        }
        Ok(utterances
            .iter()
            .zip(vectors)
            .map(|(utterance, vector)| EncodedUtterance::new(utterance.position(), vector))
            .collect())
    }
}

/// Loaded depression model: embedder, aggregator and post-processing settings.
pub struct DepressionPipeline<E = UtteranceEncoder> {
    embedder: E,
    aggregator: SessionAggregator,
    cfg: SessionConfig,
}

impl DepressionPipeline<UtteranceEncoder> {
    /// Loads the encoder and aggregator weights. Fails if either artifact is missing.
    pub fn load(encoder_cfg: &EncoderConfig, cfg: &SessionConfig) -> Result<Self, SessionError> {
        let embedder = UtteranceEncoder::load(encoder_cfg)?;
        let aggregator =
            SessionAggregator::load(&cfg.aggregator_path, cfg.encoder_hidden, cfg.aggregator_hidden)?;
        Self::new(embedder, aggregator, cfg.clone())
    }
}

impl<E: UtteranceEmbedder> DepressionPipeline<E> {
    pub fn new(
        embedder: E,
        aggregator: SessionAggregator,
        cfg: SessionConfig,
    ) -> Result<Self, SessionError> {
        if !(cfg.phq_min <= cfg.phq_max) {
            return Err(SessionError::Shape(format!(
                "phq bounds [{}, {}] are inverted",
                cfg.phq_min, cfg.phq_max
            )));
        }
        Ok(Self {
            embedder,
            aggregator,
            cfg,
        })
    }

    /// Segments, embeds and aggregates `text` into a PHQ-8 estimate.
    pub fn assess(&self, text: &str) -> Result<DepressionResult, SessionError> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "mindsignal_session.assess",
            model = DEPRESSION_MODEL_NAME,
            text_len = text.len()
        );
        let _guard = span.enter();

        match self.assess_inner(text) {
            Ok(result) => {
                info!(
                    utterances = result.utterance_count,
                    phq8_score = result.score,
                    phq8_binary = result.binary,
                    elapsed_micros = start.elapsed().as_micros(),
                    "depression_success"
                );
                Ok(result)
            }
            Err(err) => {
                warn!(error = %err, "depression_failure");
                Err(err)
            }
        }
    }

    fn assess_inner(&self, text: &str) -> Result<DepressionResult, SessionError> {
        let utterances = segment(text, self.cfg.max_utterances)?;
        let embeddings = self.embedder.embed(&utterances)?;
        if embeddings.len() != utterances.len() {
            return Err(SessionError::Shape(format!(
                "{} embeddings for {} utterances",
                embeddings.len(),
                utterances.len()
            )));
        }
        let raw = self.aggregator.aggregate(&embeddings)?;
        Ok(postprocess(raw.score, raw.logit, utterances.len(), &self.cfg))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.cfg
    }

    pub fn aggregator(&self) -> &SessionAggregator {
        &self.aggregator
    }
}
