use crate::EncoderError;

/// Dense f32 output copied out of an ONNX session, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl OutputTensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self, EncoderError> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(EncoderError::Shape(format!(
                "shape {shape:?} implies {expected} values but tensor holds {}",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// Returns `(batch, seq, hidden)` for a rank-3 tensor.
    pub fn dims3(&self) -> Result<(usize, usize, usize), EncoderError> {
        match self.shape.as_slice() {
            &[batch, seq, hidden] => Ok((batch, seq, hidden)),
            other => Err(EncoderError::Shape(format!(
                "expected rank-3 output, got {other:?}"
            ))),
        }
    }

    /// Returns `(rows, cols)` for a rank-2 tensor.
    pub fn dims2(&self) -> Result<(usize, usize), EncoderError> {
        match self.shape.as_slice() {
            &[rows, cols] => Ok((rows, cols)),
            other => Err(EncoderError::Shape(format!(
                "expected rank-2 output, got {other:?}"
            ))),
        }
    }

    /// Borrow row `idx` of a rank-2 tensor.
    pub fn row(&self, idx: usize) -> Result<&[f32], EncoderError> {
        let (rows, cols) = self.dims2()?;
        if idx >= rows {
            return Err(EncoderError::Shape(format!(
                "row {idx} out of range for {rows} rows"
            )));
        }
        Ok(&self.data[idx * cols..(idx + 1) * cols])
    }
}
