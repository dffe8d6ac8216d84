//! [`Model`] implementations for the two production models and the loaders that
//! build them from configuration.

use emotion::{EmotionClassifier, EmotionResult, EMOTION_MODEL_NAME};
use session::{DepressionPipeline, DepressionResult, UtteranceEmbedder, DEPRESSION_MODEL_NAME};

use crate::config::MindsignalConfig;
use crate::orchestrator::{ModelHandle, ModelOrchestrator};
use crate::{Model, PipelineError};

impl Model for EmotionClassifier {
    type Output = EmotionResult;

    fn name(&self) -> &str {
        EMOTION_MODEL_NAME
    }

    fn predict(&self, text: &str) -> Result<EmotionResult, PipelineError> {
        Ok(self.classify(text)?)
    }
}

impl<E: UtteranceEmbedder> Model for DepressionPipeline<E> {
    type Output = DepressionResult;

    fn name(&self) -> &str {
        DEPRESSION_MODEL_NAME
    }

    fn predict(&self, text: &str) -> Result<DepressionResult, PipelineError> {
        Ok(self.assess(text)?)
    }
}

impl ModelOrchestrator<EmotionClassifier, DepressionPipeline> {
    /// Builds handles whose loaders read artifacts from the paths in `cfg`
    /// (already resolved against `models_dir`) and applies the configured policy.
    pub fn from_config(cfg: &MindsignalConfig) -> Result<Self, PipelineError> {
        let resolved = cfg.resolved();

        let emotion_cfg = resolved.emotion.clone();
        let emotion = ModelHandle::new(EMOTION_MODEL_NAME, move || {
            Ok(EmotionClassifier::load(&emotion_cfg)?)
        });

        let encoder_cfg = resolved.encoder.clone();
        let session_cfg = resolved.session.clone();
        let depression = ModelHandle::new(DEPRESSION_MODEL_NAME, move || {
            Ok(DepressionPipeline::load(&encoder_cfg, &session_cfg)?)
        });

        Self::new(emotion, depression, resolved.orchestrator.load_policy)
    }
}
