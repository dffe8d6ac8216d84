//! Mindsignal emotion classification
//!
//! Classifies a whole input text (never segmented) into a probability
//! distribution over an emotion label set. The model is an ONNX sequence
//! classifier exported with one logit per label; labels come from the
//! `id2label` object of the model's `config.json`.
//!
//! ```no_run
//! use emotion::{EmotionClassifier, EmotionConfig};
//!
//! let classifier = EmotionClassifier::load(&EmotionConfig::default()).unwrap();
//! let result = classifier.classify("What a lovely surprise!").unwrap();
//! println!("{} {:?}", result.top_label, result.probabilities.top());
//! ```

pub mod config;
pub mod error;
pub mod labels;
pub mod softmax;
pub mod types;

pub use crate::config::EmotionConfig;
pub use crate::error::EmotionError;
pub use crate::labels::LabelIndex;
pub use crate::types::{EmotionResult, LabelDistribution};

use std::time::Instant;

use encoder::{resolve_model_assets, OnnxModel};
use tracing::{info, warn, Level};

use crate::softmax::softmax;

/// Stable model name used in logs and load errors.
pub const EMOTION_MODEL_NAME: &str = "goemotions_v1";

/// Loaded emotion model: ONNX session, tokenizer and label index.
pub struct EmotionClassifier {
    model: OnnxModel,
    labels: LabelIndex,
}

impl EmotionClassifier {
    /// Loads every artifact up front; a missing file fails the load.
    pub fn load(cfg: &EmotionConfig) -> Result<Self, EmotionError> {
        let assets = resolve_model_assets(&cfg.model_path, &cfg.tokenizer_path)?;
        let labels = LabelIndex::load(&cfg.labels_path)?;
        let model = OnnxModel::load(
            EMOTION_MODEL_NAME,
            &assets,
            cfg.max_sequence_length,
            cfg.intra_threads,
        )?;
        Ok(Self { model, labels })
    }

    pub fn labels(&self) -> &LabelIndex {
        &self.labels
    }

    /// Runs one forward pass over the truncated text and returns the full
    /// label distribution.
    pub fn classify(&self, text: &str) -> Result<EmotionResult, EmotionError> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "mindsignal_emotion.classify",
            model = EMOTION_MODEL_NAME,
            text_len = text.len()
        );
        let _guard = span.enter();

        match self.classify_inner(text) {
            Ok(result) => {
                info!(
                    labels = result.probabilities.len(),
                    top_label = %result.top_label,
                    elapsed_micros = start.elapsed().as_micros(),
                    "emotion_success"
                );
                Ok(result)
            }
            Err(err) => {
                warn!(error = %err, "emotion_failure");
                Err(err)
            }
        }
    }

    fn classify_inner(&self, text: &str) -> Result<EmotionResult, EmotionError> {
        validate_text(text)?;
        let output = self.model.run(&[text])?;
        let (batch, _num_labels) = output.dims2()?;
        if batch != 1 {
            return Err(EmotionError::Shape(format!(
                "expected a single row of logits, got {batch}"
            )));
        }
        distribution(output.row(0)?, &self.labels)
    }
}

/// Rejects empty and whitespace-only input before any inference runs.
pub fn validate_text(text: &str) -> Result<(), EmotionError> {
    if text.trim().is_empty() {
        return Err(EmotionError::EmptyInput);
    }
    Ok(())
}

/// Turns one row of logits into an [`EmotionResult`] using `labels` for names.
///
/// The logit count must equal the label count.
pub fn distribution(logits: &[f32], labels: &LabelIndex) -> Result<EmotionResult, EmotionError> {
    if logits.len() != labels.len() {
        return Err(EmotionError::Shape(format!(
            "{} logits for {} labels",
            logits.len(),
            labels.len()
        )));
    }
    let probs = softmax(logits)?;
    let pairs = probs
        .into_iter()
        .enumerate()
        .map(|(i, p)| (labels.name(i), p))
        .collect();
    let probabilities = LabelDistribution::from_unsorted(pairs);
    let top_label = probabilities
        .top()
        .map(|(label, _)| label.to_string())
        .ok_or_else(|| EmotionError::Shape("empty label distribution".into()))?;
    Ok(EmotionResult {
        top_label,
        probabilities,
    })
}
