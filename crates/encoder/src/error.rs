use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::assets::ArtifactKind;

/// Errors surfaced while loading or running an ONNX-backed text model.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// A required artifact (weights, tokenizer, label index) is absent on disk.
    #[error("{kind} not found: {}", path.display())]
    ArtifactMissing { kind: ArtifactKind, path: PathBuf },
    /// The tokenizer could not be parsed or failed to encode the input.
    #[error("tokenizer failure: {0}")]
    Tokenizer(String),
    /// ONNX Runtime failed to build a session or run it.
    #[error("inference failure: {0}")]
    Inference(String),
    /// Model output did not have the shape the caller expected.
    #[error("shape mismatch: {0}")]
    Shape(String),
    /// Low-level IO failures while touching the filesystem.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_missing_names_kind_and_path() {
        let err = EncoderError::ArtifactMissing {
            kind: ArtifactKind::Tokenizer,
            path: PathBuf::from("/models/tokenizer.json"),
        };
        let msg = err.to_string();
        assert!(msg.contains("tokenizer"));
        assert!(msg.contains("/models/tokenizer.json"));
    }

    #[test]
    fn error_shape() {
        let err = EncoderError::Shape("expected rank 3".into());
        assert!(err.to_string().contains("shape mismatch"));
        assert!(err.to_string().contains("expected rank 3"));
    }

    #[test]
    fn error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: EncoderError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }

    #[test]
    fn error_debug_formatting() {
        let err = EncoderError::Inference("session failed".into());
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("Inference"));
        assert!(debug_str.contains("session failed"));
    }
}
