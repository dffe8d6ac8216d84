use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use emotion::EmotionError;
use encoder::{ArtifactKind, EncoderError};
use session::SessionError;

/// Errors surfaced at the orchestrator boundary.
///
/// Cloneable so a failed load can be cached by its [`ModelHandle`](crate::ModelHandle)
/// and reported again without a second attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Input text empty or whitespace-only. Rejected before any model runs.
    EmptyInput,
    /// A weight, tokenizer or label file is absent. Fatal; never retried.
    ModelArtifactMissing { kind: ArtifactKind, path: PathBuf },
    /// A predict call reached a model that was never loaded and the load policy
    /// forbids loading implicitly.
    ModelNotLoaded(String),
    /// Width, length or numeric bookkeeping failed. A configuration or programming
    /// defect, surfaced as is.
    ShapeOrComputation(String),
    /// Runtime, tokenizer or parse failure inside a model.
    Inference(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::EmptyInput => write!(f, "input text is empty"),
            PipelineError::ModelArtifactMissing { kind, path } => {
                write!(f, "model artifact missing: {kind} at {}", path.display())
            }
            PipelineError::ModelNotLoaded(model) => {
                write!(f, "model `{model}` is not loaded and implicit loading is disabled")
            }
            PipelineError::ShapeOrComputation(msg) => write!(f, "shape or computation failure: {msg}"),
            PipelineError::Inference(msg) => write!(f, "inference failure: {msg}"),
        }
    }
}

impl Error for PipelineError {}

impl From<EncoderError> for PipelineError {
    fn from(value: EncoderError) -> Self {
        match value {
            EncoderError::ArtifactMissing { kind, path } => {
                PipelineError::ModelArtifactMissing { kind, path }
            }
            EncoderError::Shape(msg) => PipelineError::ShapeOrComputation(msg),
            other => PipelineError::Inference(other.to_string()),
        }
    }
}

impl From<SessionError> for PipelineError {
    fn from(value: SessionError) -> Self {
        match value {
            SessionError::EmptyInput => PipelineError::EmptyInput,
            SessionError::Encoder(err) => err.into(),
            SessionError::Shape(msg) | SessionError::Computation(msg) => {
                PipelineError::ShapeOrComputation(msg)
            }
            other => PipelineError::Inference(other.to_string()),
        }
    }
}

impl From<EmotionError> for PipelineError {
    fn from(value: EmotionError) -> Self {
        match value {
            EmotionError::EmptyInput => PipelineError::EmptyInput,
            EmotionError::Encoder(err) => err.into(),
            EmotionError::Shape(msg) => PipelineError::ShapeOrComputation(msg),
            other => PipelineError::Inference(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_missing_keeps_kind_and_path() {
        let err: PipelineError = SessionError::Encoder(EncoderError::ArtifactMissing {
            kind: ArtifactKind::AggregatorWeights,
            path: PathBuf::from("/models/daic/aggregator.safetensors"),
        })
        .into();
        assert_eq!(
            err,
            PipelineError::ModelArtifactMissing {
                kind: ArtifactKind::AggregatorWeights,
                path: PathBuf::from("/models/daic/aggregator.safetensors"),
            }
        );
        assert!(err.to_string().contains("aggregator weights"));
    }

    #[test]
    fn empty_input_maps_from_both_stages() {
        assert_eq!(
            PipelineError::from(SessionError::EmptyInput),
            PipelineError::EmptyInput
        );
        assert_eq!(
            PipelineError::from(EmotionError::EmptyInput),
            PipelineError::EmptyInput
        );
    }

    #[test]
    fn numeric_defects_map_to_shape_or_computation() {
        assert!(matches!(
            PipelineError::from(SessionError::Computation("nan".into())),
            PipelineError::ShapeOrComputation(_)
        ));
        assert!(matches!(
            PipelineError::from(EmotionError::Shape("3 logits for 4 labels".into())),
            PipelineError::ShapeOrComputation(_)
        ));
        assert!(matches!(
            PipelineError::from(EncoderError::Shape("rank 2".into())),
            PipelineError::ShapeOrComputation(_)
        ));
    }

    #[test]
    fn runtime_failures_map_to_inference() {
        assert!(matches!(
            PipelineError::from(SessionError::Weights("truncated".into())),
            PipelineError::Inference(_)
        ));
        assert!(matches!(
            PipelineError::from(EmotionError::Labels("no id2label".into())),
            PipelineError::Inference(_)
        ));
    }
}
