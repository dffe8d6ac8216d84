//! Inference-only LSTM pieces.
//!
//! Weights use the conventional packed layout: the first axis of the input and
//! recurrent matrices stacks the input, forget, cell and output gates, each
//! `hidden` rows tall.

use ndarray::{s, Array1, Array2, ArrayView1};

use crate::SessionError;

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// One direction of a single-layer LSTM.
#[derive(Debug, Clone)]
pub struct LstmDirection {
    weight_ih: Array2<f32>,
    weight_hh: Array2<f32>,
    /// `bias_ih + bias_hh`; the two are only ever added together.
    bias: Array1<f32>,
    hidden: usize,
}

impl LstmDirection {
    pub fn new(
        weight_ih: Array2<f32>,
        weight_hh: Array2<f32>,
        bias_ih: Array1<f32>,
        bias_hh: Array1<f32>,
    ) -> Result<Self, SessionError> {
        let (gates, _input) = weight_ih.dim();
        if gates == 0 || gates % 4 != 0 {
            return Err(SessionError::Shape(format!(
                "weight_ih has {gates} rows, expected a non-zero multiple of 4"
            )));
        }
        let hidden = gates / 4;
        if weight_hh.dim() != (gates, hidden) {
            return Err(SessionError::Shape(format!(
                "weight_hh is {:?}, expected ({gates}, {hidden})",
                weight_hh.dim()
            )));
        }
        if bias_ih.len() != gates || bias_hh.len() != gates {
            return Err(SessionError::Shape(format!(
                "biases are {}/{}, expected {gates}",
                bias_ih.len(),
                bias_hh.len()
            )));
        }
        Ok(Self {
            weight_ih,
            weight_hh,
            bias: bias_ih + bias_hh,
            hidden,
        })
    }

    pub fn input_size(&self) -> usize {
        self.weight_ih.ncols()
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden
    }

    /// Feeds `steps` in the order given, starting from zero state, and returns the
    /// hidden state after the last step. Callers validate step widths.
    pub fn final_hidden<'a, I>(&self, steps: I) -> Array1<f32>
    where
        I: IntoIterator<Item = &'a [f32]>,
    {
        let h_dim = self.hidden;
        let mut h = Array1::<f32>::zeros(h_dim);
        let mut c = Array1::<f32>::zeros(h_dim);

        for x in steps {
            let x = ArrayView1::from(x);
            let gates = self.weight_ih.dot(&x) + self.weight_hh.dot(&h) + &self.bias;
            let i = gates.slice(s![0..h_dim]).mapv(sigmoid);
            let f = gates.slice(s![h_dim..2 * h_dim]).mapv(sigmoid);
            let g = gates.slice(s![2 * h_dim..3 * h_dim]).mapv(f32::tanh);
            let o = gates.slice(s![3 * h_dim..4 * h_dim]).mapv(sigmoid);
            c = &f * &c + &i * &g;
            h = &o * &c.mapv(f32::tanh);
        }
        h
    }
}

/// `y = w · x + b` with a single output unit.
#[derive(Debug, Clone)]
pub struct LinearHead {
    weight: Array1<f32>,
    bias: f32,
}

impl LinearHead {
    pub fn new(weight: Array1<f32>, bias: f32) -> Self {
        Self { weight, bias }
    }

    pub fn input_size(&self) -> usize {
        self.weight.len()
    }

    pub fn apply(&self, x: &Array1<f32>) -> f32 {
        self.weight.dot(x) + self.bias
    }
}
