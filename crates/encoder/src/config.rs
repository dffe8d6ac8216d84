use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration for the utterance encoder.
///
/// Sizes here are fixed at load time; nothing is overridable per request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EncoderConfig {
    /// ONNX export of the fine-tuned encoder. First output must be `last_hidden_state`.
    pub model_path: PathBuf,
    /// HuggingFace `tokenizer.json` shared with the emotion model.
    pub tokenizer_path: PathBuf,
    /// Per-utterance token budget; longer utterances are truncated.
    pub max_sequence_length: usize,
    /// Intra-op threads handed to ONNX Runtime.
    pub intra_threads: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/daic/encoder.onnx"),
            tokenizer_path: PathBuf::from("./models/emotion/goemotions/tokenizer.json"),
            max_sequence_length: 128,
            intra_threads: 1,
        }
    }
}
