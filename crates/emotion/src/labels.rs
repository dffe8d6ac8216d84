use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use encoder::{require_artifact, ArtifactKind};
use serde::Deserialize;
use serde_json::Value;

use crate::EmotionError;

#[derive(Deserialize)]
struct ModelConfigFile {
    #[serde(default)]
    id2label: BTreeMap<String, Value>,
}

/// Index → label name mapping taken from a classifier's `config.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelIndex {
    names: BTreeMap<usize, String>,
}

impl LabelIndex {
    pub fn load(path: &Path) -> Result<Self, EmotionError> {
        let path = require_artifact(path, ArtifactKind::LabelIndex)?;
        let raw = fs::read_to_string(&path)?;
        Self::from_json(&raw)
    }

    /// Parses the `id2label` object. Keys must be stringified indices; values that
    /// are not strings are rendered as JSON.
    pub fn from_json(raw: &str) -> Result<Self, EmotionError> {
        let file: ModelConfigFile =
            serde_json::from_str(raw).map_err(|e| EmotionError::Labels(e.to_string()))?;
        if file.id2label.is_empty() {
            return Err(EmotionError::Labels("id2label is missing or empty".into()));
        }
        let mut names = BTreeMap::new();
        for (key, value) in file.id2label {
            let index: usize = key
                .trim()
                .parse()
                .map_err(|_| EmotionError::Labels(format!("id2label key `{key}` is not an index")))?;
            let name = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            names.insert(index, name);
        }
        Ok(Self { names })
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).enumerate().collect(),
        }
    }

    /// Number of labelled classes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name for class `index`, or `label_{index}` when the index has no entry.
    pub fn name(&self, index: usize) -> String {
        self.names
            .get(&index)
            .cloned()
            .unwrap_or_else(|| format!("label_{index}"))
    }
}
