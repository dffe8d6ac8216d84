use std::sync::Mutex;
use std::time::Instant;

use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::info;

use crate::assets::ModelAssets;
use crate::onnx::{build_padded_arrays, encode_documents, execute_session, resolve_pad_id};
use crate::types::OutputTensor;
use crate::EncoderError;

/// A loaded ONNX session plus its tokenizer.
///
/// Read-only after construction. The session sits behind a mutex because ONNX Runtime
/// needs exclusive access for `run`; everything else is shared freely.
pub struct OnnxModel {
    name: String,
    tokenizer: Tokenizer,
    // One session per model: concurrent callers queue here. Requests are never
    // batched together, so there is nothing to gain from a session pool.
    session: Mutex<Session>,
    max_sequence_length: usize,
    pad_id: i64,
}

impl OnnxModel {
    /// Loads the tokenizer and builds an inference session. Blocks on disk IO.
    pub fn load(
        name: &str,
        assets: &ModelAssets,
        max_sequence_length: usize,
        intra_threads: usize,
    ) -> Result<Self, EncoderError> {
        if max_sequence_length == 0 {
            return Err(EncoderError::Tokenizer(
                "max_sequence_length must be >= 1".into(),
            ));
        }
        let start = Instant::now();

        let mut tokenizer = Tokenizer::from_file(&assets.tokenizer_path)
            .map_err(|e| EncoderError::Tokenizer(e.to_string()))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_sequence_length,
                ..Default::default()
            }))
            .map_err(|e| EncoderError::Tokenizer(e.to_string()))?;
        // Padding is applied per batch in `build_padded_arrays`.
        let pad_id = resolve_pad_id(&tokenizer);
        tokenizer.with_padding(None);

        let session = Session::builder()
            .map_err(|e| EncoderError::Inference(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| EncoderError::Inference(e.to_string()))?
            .with_intra_threads(intra_threads.max(1))
            .map_err(|e| EncoderError::Inference(e.to_string()))?
            .commit_from_file(&assets.model_path)
            .map_err(|e| EncoderError::Inference(e.to_string()))?;

        info!(
            model = name,
            model_path = %assets.model_path.display(),
            tokenizer_path = %assets.tokenizer_path.display(),
            max_sequence_length,
            elapsed_micros = start.elapsed().as_micros(),
            "onnx_model_loaded"
        );

        Ok(Self {
            name: name.to_string(),
            tokenizer,
            session: Mutex::new(session),
            max_sequence_length,
            pad_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_sequence_length(&self) -> usize {
        self.max_sequence_length
    }

    /// Tokenizes `texts` as one padded batch and returns the model's first output.
    /// Row `i` of the output belongs to `texts[i]`.
    pub fn run<T>(&self, texts: &[T]) -> Result<OutputTensor, EncoderError>
    where
        T: AsRef<str>,
    {
        if texts.is_empty() {
            return Err(EncoderError::Inference("empty batch".into()));
        }
        let (encoded, max_len) =
            encode_documents(&self.tokenizer, texts, self.max_sequence_length)?;
        let (input_ids, attn_mask) = build_padded_arrays(encoded, max_len, self.pad_id)?;
        execute_session(&self.session, input_ids, attn_mask)
    }
}
