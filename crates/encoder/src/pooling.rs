use crate::types::OutputTensor;
use crate::EncoderError;

/// Takes the hidden state at token position 0 for every row of a
/// `[batch, seq, hidden]` tensor. Output order matches batch order.
pub(crate) fn first_token_pool(
    output: &OutputTensor,
    expected_batch: usize,
) -> Result<Vec<Vec<f32>>, EncoderError> {
    let (batch, seq_len, hidden) = output.dims3()?;
    if batch != expected_batch {
        return Err(EncoderError::Shape(format!(
            "model returned {batch} rows for {expected_batch} inputs"
        )));
    }
    if seq_len == 0 || hidden == 0 {
        return Err(EncoderError::Shape(format!(
            "degenerate hidden state shape {:?}",
            output.shape
        )));
    }

    let stride = seq_len * hidden;
    Ok(output
        .data
        .chunks(stride)
        .map(|row| row[..hidden].to_vec())
        .collect())
}
