use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::EncoderError;

/// Which on-disk artifact a path refers to. Surfaced in load errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    OnnxModel,
    Tokenizer,
    AggregatorWeights,
    LabelIndex,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::OnnxModel => "onnx model",
            ArtifactKind::Tokenizer => "tokenizer",
            ArtifactKind::AggregatorWeights => "aggregator weights",
            ArtifactKind::LabelIndex => "label index",
        };
        f.write_str(name)
    }
}

/// Verified local paths for an ONNX model and its tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAssets {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
}

/// Ensures both the model and the tokenizer exist locally.
///
/// Artifacts never appear without operator intervention, so absence is reported
/// immediately instead of falling back to anything.
pub fn resolve_model_assets(
    model_path: &Path,
    tokenizer_path: &Path,
) -> Result<ModelAssets, EncoderError> {
    Ok(ModelAssets {
        model_path: require_artifact(model_path, ArtifactKind::OnnxModel)?,
        tokenizer_path: require_artifact(tokenizer_path, ArtifactKind::Tokenizer)?,
    })
}

/// Returns `path` if it exists, otherwise an [`EncoderError::ArtifactMissing`] tagged with `kind`.
pub fn require_artifact(path: &Path, kind: ArtifactKind) -> Result<PathBuf, EncoderError> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    Err(EncoderError::ArtifactMissing {
        kind,
        path: path.to_path_buf(),
    })
}
