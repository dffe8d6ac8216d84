use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration for the emotion classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmotionConfig {
    /// ONNX export whose first output is `logits` shaped `[batch, num_labels]`.
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
    /// HuggingFace `config.json` carrying `id2label`.
    pub labels_path: PathBuf,
    /// Token budget for the whole (unsegmented) input.
    pub max_sequence_length: usize,
    /// Intra-op threads handed to ONNX Runtime.
    pub intra_threads: usize,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/emotion/goemotions/model.onnx"),
            tokenizer_path: PathBuf::from("./models/emotion/goemotions/tokenizer.json"),
            labels_path: PathBuf::from("./models/emotion/goemotions/config.json"),
            max_sequence_length: 512,
            intra_threads: 1,
        }
    }
}
