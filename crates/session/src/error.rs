//! Error surface for the depression session pipeline.
//!
//! | Error | Category | Description |
//! |-------|----------|-------------|
//! | [`EmptyInput`](SessionError::EmptyInput) | Validation | Text empty or whitespace-only |
//! | [`Encoder`](SessionError::Encoder) | Runtime | Artifact, tokenizer or ONNX failure in the encoder |
//! | [`Weights`](SessionError::Weights) | Load | Aggregator weight file unreadable or incomplete |
//! | [`Shape`](SessionError::Shape) | Defect | Width/length bookkeeping disagrees |
//! | [`Computation`](SessionError::Computation) | Defect | Forward pass produced a non-finite value |

use std::io;

use encoder::EncoderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("input text is empty")]
    EmptyInput,
    #[error(transparent)]
    Encoder(#[from] EncoderError),
    #[error("aggregator weights: {0}")]
    Weights(String),
    #[error("shape mismatch: {0}")]
    Shape(String),
    #[error("computation failure: {0}")]
    Computation(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
