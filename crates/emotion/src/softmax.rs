use crate::EmotionError;

/// Numerically stable softmax over one row of logits.
///
/// Subtracts the row maximum before exponentiating. Fails if the logits contain
/// NaN/Inf or the row is empty.
pub fn softmax(logits: &[f32]) -> Result<Vec<f32>, EmotionError> {
    if logits.is_empty() {
        return Err(EmotionError::Shape("no logits".into()));
    }
    if logits.iter().any(|x| !x.is_finite()) {
        return Err(EmotionError::Shape("non-finite logit".into()));
    }
    let max_logit = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp_values: Vec<f32> = logits.iter().map(|&x| (x - max_logit).exp()).collect();
    let sum_exp: f32 = exp_values.iter().sum();
    // The max element contributes exp(0) = 1, so the sum is >= 1.
    Ok(exp_values.into_iter().map(|e| e / sum_exp).collect())
}
