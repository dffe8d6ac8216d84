use std::borrow::Cow;
use std::sync::Mutex;

use ndarray::Array2;
use ort::session::{Session, SessionInputValue};
use ort::value::Tensor;
use tokenizers::Tokenizer;

use crate::types::OutputTensor;
use crate::EncoderError;

pub(crate) struct EncodedDoc {
    ids: Vec<i64>,
    mask: Vec<i64>,
}

/// Tokenizes every text independently. Truncation is configured on the tokenizer at
/// load time, so each sequence already fits `max_sequence_length` with its special
/// tokens intact; the returned length is the longest sequence in the batch.
pub(crate) fn encode_documents<T>(
    tokenizer: &Tokenizer,
    texts: &[T],
    max_sequence_length: usize,
) -> Result<(Vec<EncodedDoc>, usize), EncoderError>
where
    T: AsRef<str>,
{
    let mut encoded = Vec::with_capacity(texts.len());
    let mut max_len = 0usize;

    for text in texts {
        let encoding = tokenizer
            .encode(text.as_ref(), true)
            .map_err(|e| EncoderError::Tokenizer(e.to_string()))?;
        let ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
        let mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&x| x as i64)
            .collect();
        if ids.len() > max_sequence_length {
            return Err(EncoderError::Tokenizer(format!(
                "tokenizer produced {} tokens with truncation at {max_sequence_length}",
                ids.len()
            )));
        }
        max_len = max_len.max(ids.len());
        encoded.push(EncodedDoc { ids, mask });
    }

    Ok((encoded, max_len))
}

/// Pad id for batch padding: the tokenizer's configured padding, else its
/// `[PAD]` or `<pad>` token, else 0.
pub(crate) fn resolve_pad_id(tokenizer: &Tokenizer) -> i64 {
    tokenizer
        .get_padding()
        .map(|p| p.pad_id)
        .or_else(|| tokenizer.token_to_id("[PAD]"))
        .or_else(|| tokenizer.token_to_id("<pad>"))
        .map_or(0, i64::from)
}

/// Right-pads every sequence to `max_len` with `pad_id` and mask 0.
pub(crate) fn build_padded_arrays(
    encoded: Vec<EncodedDoc>,
    max_len: usize,
    pad_id: i64,
) -> Result<(Array2<i64>, Array2<i64>), EncoderError> {
    let seq_len = max_len.max(1);
    let batch = encoded.len();
    let mut id_storage = Vec::with_capacity(batch * seq_len);
    let mut mask_storage = Vec::with_capacity(batch * seq_len);

    for EncodedDoc { ids, mask } in encoded {
        if ids.len() != mask.len() {
            return Err(EncoderError::Tokenizer(
                "tokenizer produced mismatched id/mask lengths".into(),
            ));
        }
        let pad = seq_len.saturating_sub(ids.len());
        id_storage.extend(ids);
        mask_storage.extend(mask);
        if pad > 0 {
            id_storage.extend(std::iter::repeat_n(pad_id, pad));
            mask_storage.extend(std::iter::repeat_n(0, pad));
        }
    }

    let input_ids = Array2::from_shape_vec((batch, seq_len), id_storage)
        .map_err(|e| EncoderError::Shape(e.to_string()))?;
    let attn_mask = Array2::from_shape_vec((batch, seq_len), mask_storage)
        .map_err(|e| EncoderError::Shape(e.to_string()))?;
    Ok((input_ids, attn_mask))
}

/// Runs one forward pass and copies the first output out of the session.
///
/// Inputs are matched by name so DistilBERT-style exports (no `token_type_ids`) and
/// BERT-style exports share one code path.
pub(crate) fn execute_session(
    session: &Mutex<Session>,
    input_ids: Array2<i64>,
    attn_mask: Array2<i64>,
) -> Result<OutputTensor, EncoderError> {
    let (batch, seq_len) = input_ids.dim();
    let mut guard = session
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let mut runtime_inputs: Vec<(Cow<'static, str>, SessionInputValue<'static>)> =
        Vec::with_capacity(guard.inputs.len());
    let mut input_ids_tensor = Some(input_ids);
    let mut attn_mask_tensor = Some(attn_mask);

    for input in &guard.inputs {
        let array = match input.name.as_str() {
            "input_ids" => input_ids_tensor.take().ok_or_else(|| {
                EncoderError::Inference("model requested `input_ids` multiple times".into())
            })?,
            "attention_mask" => attn_mask_tensor.take().ok_or_else(|| {
                EncoderError::Inference("model requested `attention_mask` multiple times".into())
            })?,
            "token_type_ids" => Array2::<i64>::zeros((batch, seq_len)),
            other => {
                return Err(EncoderError::Inference(format!(
                    "unsupported model input '{other}'"
                )))
            }
        };
        let tensor =
            Tensor::from_array(array).map_err(|e| EncoderError::Inference(e.to_string()))?;
        runtime_inputs.push((Cow::Owned(input.name.clone()), tensor.into()));
    }

    if runtime_inputs.is_empty() {
        return Err(EncoderError::Inference(
            "model did not declare any inputs".into(),
        ));
    }

    let outputs = guard
        .run(runtime_inputs)
        .map_err(|e| EncoderError::Inference(e.to_string()))?;
    if outputs.len() == 0 {
        return Err(EncoderError::Inference("model returned no outputs".into()));
    }
    let (shape, data) = outputs[0]
        .try_extract_tensor::<f32>()
        .map_err(|e| EncoderError::Inference(e.to_string()))?;

    let shape = shape
        .iter()
        .map(|&d| {
            usize::try_from(d)
                .map_err(|_| EncoderError::Shape(format!("negative output dimension {d}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if shape.first().copied() != Some(batch) {
        return Err(EncoderError::Shape(format!(
            "model output shape {shape:?} does not match batch of {batch}"
        )));
    }

    OutputTensor::new(shape, data.to_vec())
}
