use crate::types::Utterance;
use crate::SessionError;

fn is_delimiter(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '\n')
}

/// Splits `text` into ordered utterances.
///
/// Runs of `.`, `!`, `?` and newlines act as one delimiter. Spans are trimmed, empty
/// spans dropped, and only the first `max_utterances` kept. When no span survives
/// (e.g. the input is only punctuation) the trimmed input becomes the single utterance.
pub fn segment(text: &str, max_utterances: usize) -> Result<Vec<Utterance>, SessionError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SessionError::EmptyInput);
    }

    let mut utterances: Vec<Utterance> = trimmed
        .split(is_delimiter)
        .map(str::trim)
        .filter(|span| !span.is_empty())
        .take(max_utterances.max(1))
        .enumerate()
        .map(|(position, span)| Utterance::new(position, span))
        .collect();

    if utterances.is_empty() {
        utterances.push(Utterance::new(0, trimmed));
    }
    Ok(utterances)
}
