use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Session-level settings for the depression pipeline.
///
/// Bounds and threshold are fixed configuration values, set once at load time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Upper bound on utterances kept from one input; later ones are dropped.
    pub max_utterances: usize,
    /// `safetensors` file holding the BiLSTM and both session heads.
    pub aggregator_path: PathBuf,
    /// Width of each embedding fed to the aggregator (encoder hidden size).
    pub encoder_hidden: usize,
    /// Hidden size of one LSTM direction.
    pub aggregator_hidden: usize,
    /// Lower clamp for the regression score.
    pub phq_min: f64,
    /// Upper clamp for the regression score.
    pub phq_max: f64,
    /// Probability at or above which the binary decision is positive.
    pub threshold: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_utterances: 40,
            aggregator_path: PathBuf::from("./models/daic/aggregator.safetensors"),
            encoder_hidden: 768,
            aggregator_hidden: 256,
            phq_min: 0.0,
            phq_max: 24.0,
            threshold: 0.5,
        }
    }
}
