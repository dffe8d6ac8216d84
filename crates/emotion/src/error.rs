use std::io;

use encoder::EncoderError;
use thiserror::Error;

/// Errors surfaced by the emotion classifier.
#[derive(Debug, Error)]
pub enum EmotionError {
    #[error("input text is empty")]
    EmptyInput,
    /// Artifact, tokenizer or ONNX failure in the shared model layer.
    #[error(transparent)]
    Encoder(#[from] EncoderError),
    /// `config.json` is unreadable or has no usable `id2label`.
    #[error("label index: {0}")]
    Labels(String),
    /// Logits and label index disagree, or the logits are not a single row.
    #[error("shape mismatch: {0}")]
    Shape(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
