//! YAML configuration file support for Mindsignal
//!
//! All stage configurations (encoder, session, emotion) and the orchestrator's
//! load policy live in one YAML document loaded at startup. Every value is fixed
//! for the lifetime of the process; nothing here can be overridden per request.
//!
//! ## Example YAML configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "clinic-deployment"
//! models_dir: "/srv/mindsignal/models"
//!
//! encoder:
//!   model_path: "daic/encoder.onnx"
//!   tokenizer_path: "emotion/goemotions/tokenizer.json"
//!   max_sequence_length: 128
//!
//! session:
//!   max_utterances: 40
//!   aggregator_path: "daic/aggregator.safetensors"
//!   encoder_hidden: 768
//!   aggregator_hidden: 256
//!   phq_min: 0.0
//!   phq_max: 24.0
//!   threshold: 0.5
//!
//! emotion:
//!   model_path: "emotion/goemotions/model.onnx"
//!   tokenizer_path: "emotion/goemotions/tokenizer.json"
//!   labels_path: "emotion/goemotions/config.json"
//!   max_sequence_length: 512
//!
//! orchestrator:
//!   load_policy: "eager"
//! ```
//!
//! With `models_dir` set, relative artifact paths resolve against it. A leading
//! `models/` component (as in the built-in defaults) is replaced by `models_dir`.

use std::fs;
use std::path::{Path, PathBuf};

use emotion::EmotionConfig;
use encoder::EncoderConfig;
use serde::{Deserialize, Serialize};
use session::SessionConfig;
use thiserror::Error;

use crate::LoadPolicy;

/// Environment variable that overrides `models_dir`.
pub const ENV_MODELS_DIR: &str = "MINDSIGNAL_MODELS_DIR";
/// Environment variable that overrides `orchestrator.load_policy`.
pub const ENV_LOAD_POLICY: &str = "MINDSIGNAL_LOAD_POLICY";

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for the whole inference core
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct MindsignalConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Root for relative artifact paths
    #[serde(default)]
    pub models_dir: Option<PathBuf>,

    #[serde(default)]
    pub encoder: EncoderConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub emotion: EmotionConfig,

    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// Orchestrator section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrchestratorConfig {
    #[serde(default)]
    pub load_policy: LoadPolicy,
}

impl MindsignalConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: MindsignalConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `MINDSIGNAL_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigLoadError> {
        self.with_overrides(
            std::env::vars().filter(|(key, _)| key == ENV_MODELS_DIR || key == ENV_LOAD_POLICY),
        )
    }

    /// Applies overrides given as `(variable, value)` pairs and re-validates.
    pub fn with_overrides<I>(mut self, vars: I) -> Result<Self, ConfigLoadError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                ENV_MODELS_DIR => self.models_dir = Some(PathBuf::from(value)),
                ENV_LOAD_POLICY => {
                    self.orchestrator.load_policy = match value.trim() {
                        "eager" => LoadPolicy::Eager,
                        "lazy" => LoadPolicy::Lazy,
                        "explicit" => LoadPolicy::Explicit,
                        other => {
                            return Err(ConfigLoadError::Validation(format!(
                                "{ENV_LOAD_POLICY} must be one of eager|lazy|explicit, got `{other}`"
                            )));
                        }
                    }
                }
                _ => {}
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// Copy of this configuration with every artifact path resolved against
    /// `models_dir`. Without `models_dir` the paths are returned unchanged.
    pub fn resolved(&self) -> Self {
        let mut out = self.clone();
        let Some(dir) = self.models_dir.as_deref() else {
            return out;
        };
        out.encoder.model_path = rebase(&self.encoder.model_path, dir);
        out.encoder.tokenizer_path = rebase(&self.encoder.tokenizer_path, dir);
        out.session.aggregator_path = rebase(&self.session.aggregator_path, dir);
        out.emotion.model_path = rebase(&self.emotion.model_path, dir);
        out.emotion.tokenizer_path = rebase(&self.emotion.tokenizer_path, dir);
        out.emotion.labels_path = rebase(&self.emotion.labels_path, dir);
        out
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        validate_encoder(&self.encoder)?;
        validate_session(&self.session)?;
        validate_emotion(&self.emotion)?;
        Ok(())
    }
}

impl Default for MindsignalConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            models_dir: None,
            encoder: EncoderConfig::default(),
            session: SessionConfig::default(),
            emotion: EmotionConfig::default(),
            orchestrator: OrchestratorConfig::default(),
        }
    }
}

fn rebase(path: &Path, models_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let relative = path
        .strip_prefix("./models")
        .or_else(|_| path.strip_prefix("models"))
        .unwrap_or(path);
    models_dir.join(relative)
}

fn validate_encoder(cfg: &EncoderConfig) -> Result<(), ConfigLoadError> {
    if cfg.max_sequence_length == 0 {
        return Err(ConfigLoadError::Validation(
            "encoder.max_sequence_length must be >= 1".to_string(),
        ));
    }
    if cfg.intra_threads == 0 {
        return Err(ConfigLoadError::Validation(
            "encoder.intra_threads must be >= 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_session(cfg: &SessionConfig) -> Result<(), ConfigLoadError> {
    if cfg.max_utterances == 0 {
        return Err(ConfigLoadError::Validation(
            "session.max_utterances must be >= 1".to_string(),
        ));
    }
    if cfg.encoder_hidden == 0 || cfg.aggregator_hidden == 0 {
        return Err(ConfigLoadError::Validation(
            "session.encoder_hidden and session.aggregator_hidden must be >= 1".to_string(),
        ));
    }
    if !cfg.phq_min.is_finite() || !cfg.phq_max.is_finite() || cfg.phq_min >= cfg.phq_max {
        return Err(ConfigLoadError::Validation(format!(
            "session.phq_min ({}) must be below session.phq_max ({})",
            cfg.phq_min, cfg.phq_max
        )));
    }
    if !(cfg.threshold > 0.0 && cfg.threshold < 1.0) {
        return Err(ConfigLoadError::Validation(format!(
            "session.threshold must be in (0, 1), got {}",
            cfg.threshold
        )));
    }
    Ok(())
}

fn validate_emotion(cfg: &EmotionConfig) -> Result<(), ConfigLoadError> {
    if cfg.max_sequence_length == 0 {
        return Err(ConfigLoadError::Validation(
            "emotion.max_sequence_length must be >= 1".to_string(),
        ));
    }
    if cfg.intra_threads == 0 {
        return Err(ConfigLoadError::Validation(
            "emotion.intra_threads must be >= 1".to_string(),
        ));
    }
    Ok(())
}
