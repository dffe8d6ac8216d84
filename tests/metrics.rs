//! Metrics observer wiring. Kept in its own test binary because the recorder
//! is process-wide.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{LogitEmotion, SAMPLE_TEXT, depression_pipeline};
use mindsignal::{
    LoadPolicy, ModelHandle, ModelOrchestrator, PipelineError, PipelineMetrics,
    set_pipeline_metrics,
};

#[derive(Default)]
struct RecordingMetrics {
    events: Mutex<Vec<String>>,
}

impl RecordingMetrics {
    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl PipelineMetrics for RecordingMetrics {
    fn record_load(&self, model: &str, _latency: Duration, result: Result<(), PipelineError>) {
        self.push(format!("load:{model}:{}", result.is_ok()));
    }

    fn record_emotion(&self, _latency: Duration, result: Result<(), PipelineError>) {
        self.push(format!("emotion:{}", result.is_ok()));
    }

    fn record_depression(&self, _latency: Duration, result: Result<(), PipelineError>) {
        self.push(format!("depression:{}", result.is_ok()));
    }
}

#[test]
fn recorder_sees_loads_and_stages() {
    let recorder = Arc::new(RecordingMetrics::default());
    set_pipeline_metrics(Some(recorder.clone()));

    let orchestrator = ModelOrchestrator::new(
        ModelHandle::new("emotion", || Ok(LogitEmotion::new())),
        ModelHandle::new("depression", || Ok(depression_pipeline())),
        LoadPolicy::Lazy,
    )
    .unwrap();
    orchestrator.run(SAMPLE_TEXT).unwrap();
    orchestrator.run(SAMPLE_TEXT).unwrap();

    set_pipeline_metrics(None);
    orchestrator.run(SAMPLE_TEXT).unwrap();

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "load:emotion:true",
            "load:depression:true",
            "emotion:true",
            "depression:true",
            "emotion:true",
            "depression:true",
        ]
    );
}
