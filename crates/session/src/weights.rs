use std::fs;
use std::path::Path;

use ndarray::{Array1, Array2};
use safetensors::{Dtype, SafeTensors};
use tracing::{debug, info};

use crate::aggregator::SessionAggregator;
use crate::lstm::{LinearHead, LstmDirection};
use crate::SessionError;

const LSTM_PREFIX: &str = "aggr_lstm";
const REG_HEAD_PREFIX: &str = "session_phq_reg.1";
const BIN_HEAD_PREFIX: &str = "session_phq_bin.1";

/// Reads the aggregator from a `safetensors` file using the training-time tensor names
/// and checks every tensor against the configured `input_size` and `hidden`.
pub(crate) fn load_aggregator(
    path: &Path,
    input_size: usize,
    hidden: usize,
) -> Result<SessionAggregator, SessionError> {
    info!("Loading session aggregator from {:?}", path);
    let data = fs::read(path)?;
    let tensors = SafeTensors::deserialize(&data).map_err(|e| {
        SessionError::Weights(format!("failed to parse {}: {e}", path.display()))
    })?;

    let forward = load_direction(&tensors, "", input_size, hidden)?;
    let backward = load_direction(&tensors, "_reverse", input_size, hidden)?;
    let regression = load_head(&tensors, REG_HEAD_PREFIX, 2 * hidden)?;
    let classification = load_head(&tensors, BIN_HEAD_PREFIX, 2 * hidden)?;

    debug!(
        input_size,
        hidden,
        tensors = tensors.names().len(),
        "aggregator weights validated"
    );
    SessionAggregator::new(forward, backward, regression, classification)
}

fn load_direction(
    tensors: &SafeTensors<'_>,
    suffix: &str,
    input_size: usize,
    hidden: usize,
) -> Result<LstmDirection, SessionError> {
    let gates = 4 * hidden;
    let weight_ih = matrix(
        tensors,
        &format!("{LSTM_PREFIX}.weight_ih_l0{suffix}"),
        gates,
        input_size,
    )?;
    let weight_hh = matrix(
        tensors,
        &format!("{LSTM_PREFIX}.weight_hh_l0{suffix}"),
        gates,
        hidden,
    )?;
    let bias_ih = vector(tensors, &format!("{LSTM_PREFIX}.bias_ih_l0{suffix}"), gates)?;
    let bias_hh = vector(tensors, &format!("{LSTM_PREFIX}.bias_hh_l0{suffix}"), gates)?;
    LstmDirection::new(weight_ih, weight_hh, bias_ih, bias_hh)
}

fn load_head(
    tensors: &SafeTensors<'_>,
    prefix: &str,
    input_size: usize,
) -> Result<LinearHead, SessionError> {
    let weight = matrix(tensors, &format!("{prefix}.weight"), 1, input_size)?;
    let bias = vector(tensors, &format!("{prefix}.bias"), 1)?;
    Ok(LinearHead::new(weight.row(0).to_owned(), bias[0]))
}

fn matrix(
    tensors: &SafeTensors<'_>,
    name: &str,
    rows: usize,
    cols: usize,
) -> Result<Array2<f32>, SessionError> {
    let values = tensor_f32(tensors, name, &[rows, cols])?;
    Array2::from_shape_vec((rows, cols), values).map_err(|e| SessionError::Shape(e.to_string()))
}

fn vector(tensors: &SafeTensors<'_>, name: &str, len: usize) -> Result<Array1<f32>, SessionError> {
    Ok(Array1::from(tensor_f32(tensors, name, &[len])?))
}

fn tensor_f32(
    tensors: &SafeTensors<'_>,
    name: &str,
    expected_shape: &[usize],
) -> Result<Vec<f32>, SessionError> {
    let view = tensors
        .tensor(name)
        .map_err(|e| SessionError::Weights(format!("missing tensor `{name}`: {e}")))?;
    if view.dtype() != Dtype::F32 {
        return Err(SessionError::Weights(format!(
            "tensor `{name}` has dtype {:?}, expected F32",
            view.dtype()
        )));
    }
    if view.shape() != expected_shape {
        return Err(SessionError::Shape(format!(
            "tensor `{name}` is {:?}, expected {expected_shape:?}",
            view.shape()
        )));
    }
    Ok(view
        .data()
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Writes minimal `safetensors` files for tests.

    use std::collections::BTreeMap;
    use std::path::Path;

    /// Serializes `(name, shape, values)` triples as little-endian f32 tensors.
    pub(crate) fn write_f32_safetensors(path: &Path, tensors: &[(String, Vec<usize>, Vec<f32>)]) {
        let mut header = BTreeMap::new();
        let mut payload = Vec::new();
        for (name, shape, values) in tensors {
            let start = payload.len();
            for v in values {
                payload.extend_from_slice(&v.to_le_bytes());
            }
            header.insert(
                name.clone(),
                serde_json::json!({
                    "dtype": "F32",
                    "shape": shape,
                    "data_offsets": [start, payload.len()],
                }),
            );
        }
        let header = serde_json::to_vec(&header).unwrap();
        let mut bytes = (header.len() as u64).to_le_bytes().to_vec();
        bytes.extend_from_slice(&header);
        bytes.extend_from_slice(&payload);
        std::fs::write(path, bytes).unwrap();
    }

    /// Full aggregator tensor set with small deterministic values.
    pub(crate) fn aggregator_tensors(
        input: usize,
        hidden: usize,
    ) -> Vec<(String, Vec<usize>, Vec<f32>)> {
        let ramp = |n: usize, scale: f32| -> Vec<f32> {
            (0..n).map(|i| ((i % 7) as f32 - 3.0) * scale).collect()
        };
        let gates = 4 * hidden;
        let mut out = Vec::new();
        for suffix in ["", "_reverse"] {
            out.push((
                format!("aggr_lstm.weight_ih_l0{suffix}"),
                vec![gates, input],
                ramp(gates * input, 0.05),
            ));
            out.push((
                format!("aggr_lstm.weight_hh_l0{suffix}"),
                vec![gates, hidden],
                ramp(gates * hidden, 0.03),
            ));
            out.push((
                format!("aggr_lstm.bias_ih_l0{suffix}"),
                vec![gates],
                ramp(gates, 0.01),
            ));
            out.push((
                format!("aggr_lstm.bias_hh_l0{suffix}"),
                vec![gates],
                ramp(gates, 0.02),
            ));
        }
        for head in ["session_phq_reg.1", "session_phq_bin.1"] {
            out.push((
                format!("{head}.weight"),
                vec![1, 2 * hidden],
                ramp(2 * hidden, 0.5),
            ));
            out.push((format!("{head}.bias"), vec![1], vec![0.25]));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{aggregator_tensors, write_f32_safetensors};
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_complete_weight_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aggregator.safetensors");
        write_f32_safetensors(&path, &aggregator_tensors(6, 3));

        let aggregator = load_aggregator(&path, 6, 3).expect("weights load");
        assert_eq!(aggregator.input_size(), 6);
        assert_eq!(aggregator.hidden_size(), 3);
    }

    #[test]
    fn missing_tensor_is_a_weights_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aggregator.safetensors");
        let tensors: Vec<_> = aggregator_tensors(4, 2)
            .into_iter()
            .filter(|(name, _, _)| name != "aggr_lstm.bias_hh_l0_reverse")
            .collect();
        write_f32_safetensors(&path, &tensors);

        let err = load_aggregator(&path, 4, 2).unwrap_err();
        assert!(err.to_string().contains("aggr_lstm.bias_hh_l0_reverse"));
    }

    #[test]
    fn width_mismatch_is_a_shape_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aggregator.safetensors");
        write_f32_safetensors(&path, &aggregator_tensors(4, 2));

        let err = load_aggregator(&path, 8, 2).unwrap_err();
        assert!(matches!(err, SessionError::Shape(_)));
    }

    #[test]
    fn garbage_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aggregator.safetensors");
        std::fs::write(&path, b"not a tensor file").unwrap();
        assert!(matches!(
            load_aggregator(&path, 4, 2),
            Err(SessionError::Weights(_))
        ));
    }
}
