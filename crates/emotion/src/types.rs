use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Label → probability pairs sorted by descending probability.
///
/// Serializes as a JSON object whose key order is the sort order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelDistribution(Vec<(String, f32)>);

impl LabelDistribution {
    /// Sorts `pairs` descending by probability. The sort is stable, so equal
    /// probabilities keep the order they were given in.
    pub fn from_unsorted(mut pairs: Vec<(String, f32)>) -> Self {
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        Self(pairs)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(label, p)| (label.as_str(), *p))
    }

    pub fn get(&self, label: &str) -> Option<f32> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, p)| *p)
    }

    /// Highest-probability entry.
    pub fn top(&self) -> Option<(&str, f32)> {
        self.iter().next()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f32 {
        self.0.iter().map(|(_, p)| p).sum()
    }
}

impl Serialize for LabelDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, p) in &self.0 {
            map.serialize_entry(label, p)?;
        }
        map.end()
    }
}

struct DistributionVisitor;

impl<'de> Visitor<'de> for DistributionVisitor {
    type Value = LabelDistribution;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of label to probability")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((label, p)) = access.next_entry::<String, f32>()? {
            pairs.push((label, p));
        }
        Ok(LabelDistribution::from_unsorted(pairs))
    }
}

impl<'de> Deserialize<'de> for LabelDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DistributionVisitor)
    }
}

/// Emotion estimate for one input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    /// Label with the highest probability (first in label order on ties).
    pub top_label: String,
    pub probabilities: LabelDistribution,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, f32)]) -> Vec<(String, f32)> {
        items.iter().map(|(l, p)| (l.to_string(), *p)).collect()
    }

    #[test]
    fn sorts_descending_and_keeps_tie_order() {
        let dist =
            LabelDistribution::from_unsorted(pairs(&[("a", 0.2), ("b", 0.4), ("c", 0.4)]));
        let labels: Vec<&str> = dist.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["b", "c", "a"]);
        assert_eq!(dist.top(), Some(("b", 0.4)));
    }

    #[test]
    fn serializes_as_ordered_object() {
        let dist = LabelDistribution::from_unsorted(pairs(&[
            ("neutral", 0.1),
            ("joy", 0.7),
            ("sadness", 0.2),
        ]));
        let json = serde_json::to_string(&dist).unwrap();
        assert_eq!(json, r#"{"joy":0.7,"sadness":0.2,"neutral":0.1}"#);
    }

    #[test]
    fn deserializes_and_resorts() {
        let dist: LabelDistribution =
            serde_json::from_str(r#"{"fear":0.25,"joy":0.75}"#).unwrap();
        assert_eq!(dist.top(), Some(("joy", 0.75)));
        assert_eq!(dist.get("fear"), Some(0.25));
    }
}
