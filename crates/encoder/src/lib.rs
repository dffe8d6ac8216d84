//! Mindsignal utterance encoding
//!
//! Turns short text spans into fixed-width vectors with a pretrained transformer
//! exported to ONNX. Every utterance in a call is tokenized as one padded batch,
//! run through the encoder once, and pooled by taking the hidden state of the
//! first token. The vector width is the encoder's hidden size no matter how long
//! the utterance was.
//!
//! The [`OnnxModel`] building block (tokenizer + session) is shared with the
//! emotion classifier, which runs a classification head instead of pooling.
//!
//! ## Loading
//!
//! Nothing is downloaded. Missing artifacts fail with
//! [`EncoderError::ArtifactMissing`] so startup aborts loudly instead of
//! degrading.
//!
//! ```no_run
//! use encoder::{EncoderConfig, UtteranceEncoder};
//!
//! let encoder = UtteranceEncoder::load(&EncoderConfig::default()).unwrap();
//! let vectors = encoder.encode(&["I feel okay", "Today was fine"]).unwrap();
//! assert_eq!(vectors.len(), 2);
//! ```

pub mod assets;
pub mod config;
pub mod error;
pub mod types;

mod model;
mod onnx;
mod pooling;

pub use crate::assets::{require_artifact, resolve_model_assets, ArtifactKind, ModelAssets};
pub use crate::config::EncoderConfig;
pub use crate::error::EncoderError;
pub use crate::model::OnnxModel;
pub use crate::types::OutputTensor;

use std::time::Instant;

use tracing::debug;

use crate::pooling::first_token_pool;

/// Stable model name used in logs and load errors.
pub const ENCODER_MODEL_NAME: &str = "daic_encoder";

/// Pretrained text encoder with first-token pooling.
pub struct UtteranceEncoder {
    model: OnnxModel,
}

impl UtteranceEncoder {
    /// Resolves artifacts and loads the session. Inference mode only: the export
    /// carries no dropout and no gradients are ever tracked.
    pub fn load(cfg: &EncoderConfig) -> Result<Self, EncoderError> {
        let assets = resolve_model_assets(&cfg.model_path, &cfg.tokenizer_path)?;
        let model = OnnxModel::load(
            ENCODER_MODEL_NAME,
            &assets,
            cfg.max_sequence_length,
            cfg.intra_threads,
        )?;
        Ok(Self { model })
    }

    /// Encodes `utterances` in one forward pass. Output `i` belongs to input `i`.
    pub fn encode<T>(&self, utterances: &[T]) -> Result<Vec<Vec<f32>>, EncoderError>
    where
        T: AsRef<str>,
    {
        if utterances.is_empty() {
            return Ok(Vec::new());
        }
        let start = Instant::now();
        let output = self.model.run(utterances)?;
        let pooled = first_token_pool(&output, utterances.len())?;
        debug!(
            batch = utterances.len(),
            seq_len = output.shape.get(1).copied().unwrap_or_default(),
            hidden = pooled.first().map(Vec::len).unwrap_or_default(),
            elapsed_micros = start.elapsed().as_micros(),
            "utterances_encoded"
        );
        Ok(pooled)
    }

    pub fn model(&self) -> &OnnxModel {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn load_fails_fast_when_model_missing() {
        let cfg = EncoderConfig {
            model_path: PathBuf::from("./missing/encoder.onnx"),
            tokenizer_path: PathBuf::from("./missing/tokenizer.json"),
            ..EncoderConfig::default()
        };
        match UtteranceEncoder::load(&cfg) {
            Err(EncoderError::ArtifactMissing { kind, .. }) => {
                assert_eq!(kind, ArtifactKind::OnnxModel)
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("load must fail without artifacts"),
        }
    }

    #[test]
    #[ignore = "requires local ONNX + tokenizer assets under models/"]
    fn real_encoder_produces_fixed_width_vectors() {
        let workspace_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .and_then(|p| p.parent())
            .expect("workspace root")
            .to_path_buf();
        let cfg = EncoderConfig {
            model_path: workspace_root.join("models/daic/encoder.onnx"),
            tokenizer_path: workspace_root.join("models/emotion/goemotions/tokenizer.json"),
            ..EncoderConfig::default()
        };
        let encoder = UtteranceEncoder::load(&cfg).expect("encoder loads");
        let long = "word ".repeat(500);
        let vectors = encoder
            .encode(&["short", long.as_str()])
            .expect("encoding succeeds");
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].len(), vectors[1].len());
        assert!(!vectors[0].is_empty());
    }
}
