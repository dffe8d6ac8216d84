//! Shared fixtures for the integration tests: a deterministic embedder, a
//! hand-built aggregator and a logit-producing emotion stub, so the real
//! session and emotion post-processing run without model files.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mindsignal::{
    DepressionPipeline, EmotionResult, EncodedUtterance, LabelIndex, Model, PipelineError,
    SessionAggregator, SessionConfig, SessionError, Utterance, UtteranceEmbedder,
};
use ndarray::{Array1, Array2};
use session::lstm::{LinearHead, LstmDirection};

pub const DIM: usize = 8;
pub const HIDDEN: usize = 4;

pub const SAMPLE_TEXT: &str = "I feel okay. Today was fine! Nothing much happened.";

/// Hashes bytes into a fixed-width vector; identical text gives identical vectors.
pub struct ByteEmbedder {
    pub dim: usize,
}

impl UtteranceEmbedder for ByteEmbedder {
    fn embed(&self, utterances: &[Utterance]) -> Result<Vec<EncodedUtterance>, SessionError> {
        Ok(utterances
            .iter()
            .map(|u| {
                let mut v = vec![0.0f32; self.dim];
                for (i, b) in u.text().bytes().enumerate() {
                    v[(i * 31 + usize::from(b)) % self.dim] += f32::from(b) / 128.0 - 1.0;
                }
                EncodedUtterance::new(u.position(), v)
            })
            .collect())
    }
}

fn direction(input: usize, hidden: usize, seed: usize) -> LstmDirection {
    let gates = 4 * hidden;
    let wave = |k: usize| (((k * 37 + seed * 11) % 17) as f32 - 8.0) * 0.03;
    LstmDirection::new(
        Array2::from_shape_fn((gates, input), |(r, c)| wave(r * input + c)),
        Array2::from_shape_fn((gates, hidden), |(r, c)| wave(r * hidden + c + 101)),
        Array1::from_shape_fn(gates, |i| wave(i + 211)),
        Array1::from_shape_fn(gates, |i| wave(i + 307)),
    )
    .expect("fixture shapes are consistent")
}

/// Small aggregator with fixed pseudo-random weights.
pub fn aggregator(input: usize, hidden: usize) -> SessionAggregator {
    let head = |bias: f32, seed: usize| {
        LinearHead::new(
            Array1::from_shape_fn(2 * hidden, |i| (((i + seed) % 5) as f32 - 2.0) * 0.4),
            bias,
        )
    };
    SessionAggregator::new(
        direction(input, hidden, 1),
        direction(input, hidden, 2),
        head(6.0, 0),
        head(-0.1, 3),
    )
    .expect("fixture aggregator is consistent")
}

pub fn depression_pipeline() -> DepressionPipeline<ByteEmbedder> {
    DepressionPipeline::new(
        ByteEmbedder { dim: DIM },
        aggregator(DIM, HIDDEN),
        SessionConfig::default(),
    )
    .expect("default config is valid")
}

/// Emotion stub that derives logits from the text and runs the real
/// softmax/labelling path.
pub struct LogitEmotion {
    pub labels: LabelIndex,
}

impl LogitEmotion {
    pub fn new() -> Self {
        Self {
            labels: LabelIndex::from_names(["anger", "fear", "joy", "neutral", "sadness"]),
        }
    }
}

impl Model for LogitEmotion {
    type Output = EmotionResult;

    fn name(&self) -> &str {
        "logit_emotion"
    }

    fn predict(&self, text: &str) -> Result<EmotionResult, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        let n = self.labels.len();
        let mut logits = vec![0.0f32; n];
        for (i, b) in text.bytes().enumerate() {
            logits[i % n] += f32::from(b) / 255.0;
        }
        Ok(emotion::distribution(&logits, &self.labels)?)
    }
}

/// Returns a loader that counts its invocations before producing `model`.
pub fn counting_loader<M: Send + 'static>(
    counter: Arc<AtomicUsize>,
    model: M,
) -> impl FnOnce() -> Result<M, PipelineError> + Send + 'static {
    move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(model)
    }
}
