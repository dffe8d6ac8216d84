//! Model lifecycle and the combined `run` entry point.
//!
//! Each model lives in a [`ModelHandle`]: a once-only cell plus the loader that
//! fills it. The cell is only published after the loader returns, so readers never
//! observe a half-built model, and concurrent first callers block on the single
//! in-flight load instead of starting their own. A failed load is cached too, so
//! the loader runs at most once per handle.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use emotion::{EmotionClassifier, EmotionResult, LabelDistribution};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use session::{DepressionPipeline, DepressionResult};
use tracing::{info, warn, Level};

use crate::metrics::{outcome, MetricsSpan};
use crate::PipelineError;

/// Capability shared by every model the orchestrator drives.
pub trait Model: Send + Sync {
    type Output;

    /// Stable identifier used in logs, metrics and load errors.
    fn name(&self) -> &str;

    fn predict(&self, text: &str) -> Result<Self::Output, PipelineError>;
}

/// When handles are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Load both models while constructing the orchestrator.
    Eager,
    /// Load each model on the first `run` that needs it.
    #[default]
    Lazy,
    /// Only [`ModelOrchestrator::load_all`] or [`ModelHandle::load`] load; `run`
    /// against an empty handle fails with [`PipelineError::ModelNotLoaded`].
    Explicit,
}

type Loader<M> = Box<dyn FnOnce() -> Result<M, PipelineError> + Send>;

/// A model that is loaded at most once.
pub struct ModelHandle<M> {
    name: String,
    cell: OnceCell<Result<Arc<M>, PipelineError>>,
    loader: Mutex<Option<Loader<M>>>,
}

impl<M> ModelHandle<M> {
    pub fn new<F>(name: impl Into<String>, loader: F) -> Self
    where
        F: FnOnce() -> Result<M, PipelineError> + Send + 'static,
    {
        Self {
            name: name.into(),
            cell: OnceCell::new(),
            loader: Mutex::new(Some(Box::new(loader))),
        }
    }

    /// Wraps an already constructed model.
    pub fn preloaded(name: impl Into<String>, model: M) -> Self {
        Self {
            name: name.into(),
            cell: OnceCell::with_value(Ok(Arc::new(model))),
            loader: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.cell.get(), Some(Ok(_)))
    }

    /// Returns the model if a load already succeeded. Never triggers a load.
    pub fn get(&self) -> Option<Arc<M>> {
        match self.cell.get() {
            Some(Ok(model)) => Some(Arc::clone(model)),
            _ => None,
        }
    }

    /// Returns the model, running the loader on first use.
    ///
    /// Later calls, including ones racing the first, observe the same outcome.
    pub fn load(&self) -> Result<Arc<M>, PipelineError> {
        self.cell
            .get_or_init(|| self.run_loader())
            .as_ref()
            .map(Arc::clone)
            .map_err(Clone::clone)
    }

    fn run_loader(&self) -> Result<Arc<M>, PipelineError> {
        let loader = self
            .loader
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        let Some(loader) = loader else {
            return Err(PipelineError::Inference(format!(
                "loader for `{}` already consumed",
                self.name
            )));
        };

        let start = Instant::now();
        let metrics = MetricsSpan::start();
        let result = loader().map(Arc::new);
        match &result {
            Ok(_) => info!(
                model = %self.name,
                elapsed_micros = start.elapsed().as_micros(),
                "model_load_success"
            ),
            Err(err) => warn!(model = %self.name, error = %err, "model_load_failure"),
        }
        if let Some(span) = metrics {
            span.record_load(&self.name, outcome(&result));
        }
        result
    }
}

/// Emotion and depression outputs merged into one payload.
///
/// The depression probability is not part of the merged payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedResult {
    #[serde(rename = "emotion")]
    pub top_label: String,
    #[serde(rename = "emotion_probs")]
    pub probabilities: LabelDistribution,
    #[serde(rename = "phq8_score")]
    pub score: f64,
    #[serde(rename = "phq8_binary")]
    pub binary: bool,
    pub utterance_count: usize,
}

impl CombinedResult {
    pub fn merge(emotion: EmotionResult, depression: DepressionResult) -> Self {
        Self {
            top_label: emotion.top_label,
            probabilities: emotion.probabilities,
            score: depression.score,
            binary: depression.binary,
            utterance_count: depression.utterance_count,
        }
    }
}

/// Owns both model handles and produces [`CombinedResult`]s.
pub struct ModelOrchestrator<E = EmotionClassifier, D = DepressionPipeline> {
    emotion: ModelHandle<E>,
    depression: ModelHandle<D>,
    policy: LoadPolicy,
}

impl<E, D> ModelOrchestrator<E, D>
where
    E: Model<Output = EmotionResult>,
    D: Model<Output = DepressionResult>,
{
    /// Builds the orchestrator. Under [`LoadPolicy::Eager`] both models are loaded
    /// here and the first failure is returned.
    pub fn new(
        emotion: ModelHandle<E>,
        depression: ModelHandle<D>,
        policy: LoadPolicy,
    ) -> Result<Self, PipelineError> {
        let orchestrator = Self {
            emotion,
            depression,
            policy,
        };
        if policy == LoadPolicy::Eager {
            orchestrator.load_all()?;
        }
        Ok(orchestrator)
    }

    /// Loads both models (no-op for ones already loaded).
    pub fn load_all(&self) -> Result<(), PipelineError> {
        self.emotion.load()?;
        self.depression.load()?;
        Ok(())
    }

    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    pub fn emotion(&self) -> &ModelHandle<E> {
        &self.emotion
    }

    pub fn depression(&self) -> &ModelHandle<D> {
        &self.depression
    }

    /// Classifies emotion over the whole text and scores the segmented session,
    /// then merges both results.
    pub fn run(&self, text: &str) -> Result<CombinedResult, PipelineError> {
        let span = tracing::span!(
            Level::INFO,
            "mindsignal.run",
            text_len = text.len(),
            policy = ?self.policy
        );
        let _guard = span.enter();

        if text.trim().is_empty() {
            warn!(error = %PipelineError::EmptyInput, "run_failure");
            return Err(PipelineError::EmptyInput);
        }

        let emotion = self.resolve(&self.emotion)?;
        let depression = self.resolve(&self.depression)?;

        let metrics = MetricsSpan::start();
        let emotion_result = emotion.predict(text);
        if let Some(span) = metrics {
            span.record_emotion(outcome(&emotion_result));
        }
        let emotion_result = emotion_result?;

        let metrics = MetricsSpan::start();
        let depression_result = depression.predict(text);
        if let Some(span) = metrics {
            span.record_depression(outcome(&depression_result));
        }
        let depression_result = depression_result?;

        Ok(CombinedResult::merge(emotion_result, depression_result))
    }

    fn resolve<M>(&self, handle: &ModelHandle<M>) -> Result<Arc<M>, PipelineError> {
        match self.policy {
            LoadPolicy::Explicit => handle
                .get()
                .ok_or_else(|| PipelineError::ModelNotLoaded(handle.name().to_string())),
            LoadPolicy::Eager | LoadPolicy::Lazy => handle.load(),
        }
    }
}
