use crate::config::SessionConfig;
use crate::types::DepressionResult;

/// Exact halves go to the even neighbour.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Turns the raw head outputs into the client-facing result.
///
/// The score is clamped to `[phq_min, phq_max]` and rounded to 2 decimals. The
/// probability is `sigmoid(raw_logit)` rounded to 4 decimals; `binary` compares the
/// unrounded probability against the threshold.
pub fn postprocess(
    raw_score: f32,
    raw_logit: f32,
    utterance_count: usize,
    cfg: &SessionConfig,
) -> DepressionResult {
    let score = f64::from(raw_score).clamp(cfg.phq_min, cfg.phq_max);
    let probability = sigmoid(f64::from(raw_logit));
    DepressionResult {
        score: round_to(score, 2),
        binary: probability >= cfg.threshold,
        probability: round_to(probability, 4),
        utterance_count,
    }
}
