mod common;

use common::{LogitEmotion, SAMPLE_TEXT, depression_pipeline};
use mindsignal::{LoadPolicy, Model, ModelHandle, ModelOrchestrator, segment};

fn orchestrator() -> ModelOrchestrator<LogitEmotion, mindsignal::DepressionPipeline<common::ByteEmbedder>> {
    ModelOrchestrator::new(
        ModelHandle::preloaded("emotion", LogitEmotion::new()),
        ModelHandle::preloaded("depression", depression_pipeline()),
        LoadPolicy::Explicit,
    )
    .unwrap()
}

const CORPUS: &[&str] = &[
    SAMPLE_TEXT,
    "nothingnospaceordelimiterhere",
    "Short.",
    "I haven't been sleeping well!! Work keeps piling up? I don't know.\n\nMaybe next week",
    "?!...",
    "   leading and trailing whitespace   ",
];

#[test]
fn repeated_runs_are_bit_identical() {
    let orchestrator = orchestrator();
    for text in CORPUS {
        let a = orchestrator.run(text).unwrap();
        let b = orchestrator.run(text).unwrap();
        assert_eq!(a.score.to_bits(), b.score.to_bits(), "score differs for {text:?}");
        assert_eq!(a, b);
        let a_json = serde_json::to_string(&a).unwrap();
        let b_json = serde_json::to_string(&b).unwrap();
        assert_eq!(a_json, b_json);
    }
}

#[test]
fn results_respect_documented_bounds() {
    let pipeline = depression_pipeline();
    let emotion = LogitEmotion::new();
    for text in CORPUS {
        let depression = pipeline.predict(text).unwrap();
        assert!((0.0..=24.0).contains(&depression.score));
        assert!((0.0..=1.0).contains(&depression.probability));
        assert!(depression.utterance_count >= 1);

        let classified = emotion.predict(text).unwrap();
        assert!((classified.probabilities.total() - 1.0).abs() < 1e-4);
        let probs: Vec<f32> = classified.probabilities.iter().map(|(_, p)| p).collect();
        assert!(probs.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(
            classified.probabilities.top().map(|(label, _)| label),
            Some(classified.top_label.as_str())
        );
    }
}

#[test]
fn binary_flag_tracks_probability_at_default_threshold() {
    let pipeline = depression_pipeline();
    for text in CORPUS {
        let result = pipeline.predict(text).unwrap();
        // The rounded probability can only cross 0.5 when it rounds to exactly 0.5.
        if result.probability != 0.5 {
            assert_eq!(result.binary, result.probability >= 0.5, "{text:?}");
        }
    }
}

#[test]
fn utterance_count_is_capped() {
    let pipeline = depression_pipeline();
    let text = (0..250).map(|i| format!("sentence number {i}")).collect::<Vec<_>>().join("! ");
    let result = pipeline.predict(&text).unwrap();
    assert_eq!(result.utterance_count, 40);
}

#[test]
fn sample_session_has_three_utterances() {
    let result = orchestrator().run(SAMPLE_TEXT).unwrap();
    assert_eq!(result.utterance_count, 3);

    let single = orchestrator().run("nothingnospaceordelimiterhere").unwrap();
    assert_eq!(single.utterance_count, 1);
}

#[test]
fn resegmenting_rejoined_utterances_is_stable() {
    for text in CORPUS {
        let first = segment(text, 40).unwrap();
        let rejoined = first.iter().map(|u| u.text()).collect::<Vec<_>>().join(". ");
        let second = segment(&rejoined, 40).unwrap();
        assert_eq!(first.len(), second.len(), "{text:?}");
    }
}
