use serde::{Deserialize, Serialize};

/// One non-empty, trimmed span of the input text and its position in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    position: usize,
    text: String,
}

impl Utterance {
    pub(crate) fn new(position: usize, text: &str) -> Self {
        Self {
            position,
            text: text.to_string(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Embedding of one utterance. Created per request and consumed by one aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedUtterance {
    position: usize,
    vector: Vec<f32>,
}

impl EncodedUtterance {
    pub fn new(position: usize, vector: Vec<f32>) -> Self {
        Self { position, vector }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn dim(&self) -> usize {
        self.vector.len()
    }
}

/// Client-facing PHQ-8 estimate for one session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepressionResult {
    /// Regression score clamped to the configured bounds, 2 decimals.
    #[serde(rename = "phq8_score")]
    pub score: f64,
    /// `probability >= threshold`, decided on the unrounded probability.
    #[serde(rename = "phq8_binary")]
    pub binary: bool,
    /// Sigmoid of the classification logit, 4 decimals.
    #[serde(rename = "phq8_prob")]
    pub probability: f64,
    pub utterance_count: usize,
}
