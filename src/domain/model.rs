use serde::{Deserialize, Serialize};

/// Untyped item as returned by the keyword-data API. Field names and nesting
/// vary by endpoint, so it stays a plain JSON value until normalized.
pub type RawApiItem = serde_json::Value;

pub const UNKNOWN_KEYWORD: &str = "Unknown keyword";

/// Used when no difficulty-like field can be found anywhere in an item.
pub const DEFAULT_KEYWORD_DIFFICULTY: f64 = 0.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedKeywordRecord {
    pub keyword: String,
    #[serde(default)]
    pub search_volume: f64,
    #[serde(default)]
    pub keyword_difficulty: f64,
    #[serde(default)]
    pub cpc: f64,
    #[serde(default = "default_competition")]
    pub competition: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition_level: Option<String>,
    #[serde(default)]
    pub categories: Vec<serde_json::Value>,
    #[serde(default)]
    pub trend: Vec<serde_json::Value>,
}

fn default_competition() -> Option<f64> {
    Some(0.0)
}

impl NormalizedKeywordRecord {
    /// Record with every metric at its default.
    pub fn minimal(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            search_volume: 0.0,
            keyword_difficulty: DEFAULT_KEYWORD_DIFFICULTY,
            cpc: 0.0,
            competition: default_competition(),
            competition_level: None,
            categories: Vec::new(),
            trend: Vec::new(),
        }
    }
}

impl Default for NormalizedKeywordRecord {
    fn default() -> Self {
        Self::minimal(UNKNOWN_KEYWORD)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub records: Vec<NormalizedKeywordRecord>,
    /// Records produced by the degrade path rather than a full extraction.
    pub degraded: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let record: NormalizedKeywordRecord =
            serde_json::from_value(json!({"keyword": "seo tools"})).unwrap();
        assert_eq!(record, NormalizedKeywordRecord::minimal("seo tools"));
    }

    #[test]
    fn test_serialize_omits_absent_competition_level() {
        let value = serde_json::to_value(NormalizedKeywordRecord::minimal("a")).unwrap();
        assert!(value.get("competition_level").is_none());
        assert_eq!(value["competition"], json!(0.0));
        assert_eq!(value["categories"], json!([]));
    }
}
