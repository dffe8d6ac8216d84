use std::path::Path;

use encoder::{require_artifact, ArtifactKind};
use ndarray::{concatenate, Array1, Axis};

use crate::lstm::{LinearHead, LstmDirection};
use crate::types::EncodedUtterance;
use crate::weights::load_aggregator;
use crate::SessionError;

/// Raw outputs of the two session heads, before clamping and thresholding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateOutput {
    pub score: f32,
    pub logit: f32,
}

/// Bidirectional LSTM over the ordered utterance embeddings of one session,
/// followed by a regression head and a binary-classification head.
///
/// The session representation is the forward direction's final state concatenated
/// with the backward direction's final state (the one reached after walking back
/// to the first utterance).
#[derive(Debug, Clone)]
pub struct SessionAggregator {
    forward: LstmDirection,
    backward: LstmDirection,
    regression: LinearHead,
    classification: LinearHead,
}

impl SessionAggregator {
    pub fn new(
        forward: LstmDirection,
        backward: LstmDirection,
        regression: LinearHead,
        classification: LinearHead,
    ) -> Result<Self, SessionError> {
        if forward.input_size() != backward.input_size()
            || forward.hidden_size() != backward.hidden_size()
        {
            return Err(SessionError::Shape(format!(
                "forward ({}x{}) and backward ({}x{}) directions disagree",
                forward.input_size(),
                forward.hidden_size(),
                backward.input_size(),
                backward.hidden_size()
            )));
        }
        let repr_width = 2 * forward.hidden_size();
        for (name, head) in [("regression", &regression), ("classification", &classification)] {
            if head.input_size() != repr_width {
                return Err(SessionError::Shape(format!(
                    "{name} head expects {} inputs, session representation has {repr_width}",
                    head.input_size()
                )));
            }
        }
        Ok(Self {
            forward,
            backward,
            regression,
            classification,
        })
    }

    /// Loads trained weights; `input_size` and `hidden` must match the file exactly.
    pub fn load(path: &Path, input_size: usize, hidden: usize) -> Result<Self, SessionError> {
        let path = require_artifact(path, ArtifactKind::AggregatorWeights)?;
        load_aggregator(&path, input_size, hidden)
    }

    /// Width every embedding must have.
    pub fn input_size(&self) -> usize {
        self.forward.input_size()
    }

    pub fn hidden_size(&self) -> usize {
        self.forward.hidden_size()
    }

    /// Reduces one session (batch size 1) to its two raw scalars.
    ///
    /// Embeddings must arrive in session order; a single utterance is a valid
    /// session of length one.
    pub fn aggregate(
        &self,
        embeddings: &[EncodedUtterance],
    ) -> Result<AggregateOutput, SessionError> {
        if embeddings.is_empty() {
            return Err(SessionError::Shape("session has no utterances".into()));
        }
        let width = self.input_size();
        if let Some(bad) = embeddings.iter().find(|e| e.dim() != width) {
            return Err(SessionError::Shape(format!(
                "utterance {} has width {}, aggregator expects {width}",
                bad.position(),
                bad.dim()
            )));
        }
        if !embeddings
            .windows(2)
            .all(|pair| pair[0].position() < pair[1].position())
        {
            return Err(SessionError::Shape(
                "utterance embeddings are out of session order".into(),
            ));
        }

        let last_forward = self
            .forward
            .final_hidden(embeddings.iter().map(EncodedUtterance::vector));
        let last_backward = self
            .backward
            .final_hidden(embeddings.iter().rev().map(EncodedUtterance::vector));
        let session_repr: Array1<f32> =
            concatenate(Axis(0), &[last_forward.view(), last_backward.view()])
                .map_err(|e| SessionError::Shape(e.to_string()))?;

        let score = self.regression.apply(&session_repr);
        let logit = self.classification.apply(&session_repr);
        if !score.is_finite() || !logit.is_finite() {
            return Err(SessionError::Computation(format!(
                "non-finite session output (score {score}, logit {logit})"
            )));
        }
        Ok(AggregateOutput { score, logit })
    }
}
