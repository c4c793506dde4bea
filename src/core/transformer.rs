use crate::core::resolver::{get_path, resolve, resolve_any};
use crate::domain::model::{
    NormalizedKeywordRecord, RawApiItem, DEFAULT_KEYWORD_DIFFICULTY, UNKNOWN_KEYWORD,
};
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

const DIFFICULTY_PATHS: [&[&str]; 6] = [
    &["keyword_properties", "keyword_difficulty"],
    &["keyword_info", "keyword_difficulty"],
    &["keyword_data", "keyword_difficulty"],
    &["difficulty"],
    &["keyword_difficulty"],
    &["seo_difficulty"],
];

const DIFFICULTY_KEYS: [&str; 4] = ["keyword_difficulty", "difficulty", "kd", "seo_difficulty"];
const CATEGORY_KEYS: [&str; 3] = ["categories", "category", "tags"];
const TREND_KEYS: [&str; 3] = ["trend", "monthly_searches", "historical_data"];

/// Non-finite numbers count as absent.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn coerce_list(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.iter().filter(|v| is_truthy(v)).cloned().collect(),
        Some(scalar) if is_truthy(scalar) => vec![scalar.clone()],
        _ => Vec::new(),
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn resolve_difficulty(item: &Value) -> f64 {
    DIFFICULTY_PATHS
        .iter()
        .filter_map(|path| get_path(item, path))
        .chain(DIFFICULTY_KEYS.iter().filter_map(|key| resolve(item, key)))
        .find_map(coerce_number)
        .unwrap_or(DEFAULT_KEYWORD_DIFFICULTY)
}

fn resolve_number(item: &Value, key: &str) -> Option<f64> {
    resolve(item, key).and_then(coerce_number)
}

/// Full extraction. Errors only when the item is not a JSON object.
pub fn try_transform(item: &RawApiItem) -> Result<NormalizedKeywordRecord> {
    if !item.is_object() {
        return Err(EtlError::TransformFailure {
            reason: format!("expected a JSON object, got {}", json_kind(item)),
        });
    }

    let keyword = resolve(item, "keyword")
        .and_then(coerce_text)
        .unwrap_or_else(|| UNKNOWN_KEYWORD.to_string());

    let mut competition_level = resolve(item, "competition_level").and_then(coerce_text);
    let competition = match resolve(item, "competition") {
        None => Some(0.0),
        Some(raw) => match coerce_number(raw) {
            Some(n) => Some(n),
            None => {
                // Google Ads reports competition as "LOW" / "MEDIUM" / "HIGH".
                if competition_level.is_none() {
                    competition_level = coerce_text(raw);
                }
                None
            }
        },
    };

    let record = NormalizedKeywordRecord {
        keyword,
        search_volume: resolve_number(item, "search_volume").unwrap_or(0.0),
        keyword_difficulty: resolve_difficulty(item),
        cpc: resolve_number(item, "cpc").unwrap_or(0.0),
        competition,
        competition_level,
        categories: coerce_list(resolve_any(item, &CATEGORY_KEYS)),
        trend: coerce_list(resolve_any(item, &TREND_KEYS)),
    };

    Ok(conform(record))
}

fn conform(mut record: NormalizedKeywordRecord) -> NormalizedKeywordRecord {
    if record.keyword.trim().is_empty() {
        record.keyword = UNKNOWN_KEYWORD.to_string();
    }
    record.search_volume = non_negative(record.search_volume);
    record.cpc = non_negative(record.cpc);
    record.keyword_difficulty = if record.keyword_difficulty.is_finite() {
        record.keyword_difficulty.clamp(0.0, 100.0)
    } else {
        DEFAULT_KEYWORD_DIFFICULTY
    };
    record.competition = record.competition.map(|c| if c.is_finite() { c } else { 0.0 });
    record
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalize `item`, degrading to a keyword-only record instead of failing.
pub fn transform(item: &RawApiItem) -> NormalizedKeywordRecord {
    transform_reporting(item).0
}

pub(crate) fn transform_reporting(item: &RawApiItem) -> (NormalizedKeywordRecord, bool) {
    match try_transform(item) {
        Ok(record) => (record, false),
        Err(e) => {
            tracing::warn!("Degrading keyword record: {}", e);
            let keyword = item
                .as_str()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_KEYWORD);
            (NormalizedKeywordRecord::minimal(keyword), true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_labs_item_with_nested_metrics() {
        let item = json!({
            "keyword": "seo tools",
            "keyword_properties": {"keyword_difficulty": 72},
            "keyword_info": {"search_volume": 1000}
        });

        let record = transform(&item);

        assert_eq!(record.keyword, "seo tools");
        assert_eq!(record.keyword_difficulty, 72.0);
        assert_eq!(record.search_volume, 1000.0);
        assert_eq!(record.cpc, 0.0);
        assert_eq!(record.competition, Some(0.0));
        assert!(record.categories.is_empty());
        assert!(record.trend.is_empty());
    }

    #[test]
    fn test_keyword_properties_difficulty_beats_top_level() {
        let item = json!({
            "keyword": "crm",
            "keyword_difficulty": 10,
            "keyword_properties": {"keyword_difficulty": 55}
        });
        assert_eq!(transform(&item).keyword_difficulty, 55.0);
    }

    #[test]
    fn test_difficulty_priority_skips_unusable_values() {
        let item = json!({
            "keyword": "crm",
            "keyword_properties": {"keyword_difficulty": null},
            "keyword_info": {"keyword_difficulty": "n/a"},
            "seo_difficulty": "33"
        });
        assert_eq!(transform(&item).keyword_difficulty, 33.0);
    }

    #[test]
    fn test_difficulty_falls_back_to_resolver_then_default() {
        let nested = json!({"keyword": "a", "metrics": {"kd": 41}});
        assert_eq!(transform(&nested).keyword_difficulty, 41.0);

        let camel = json!({"keyword": "a", "stats": {"keywordDifficulty": 12.5}});
        assert_eq!(transform(&camel).keyword_difficulty, 12.5);

        let none = json!({"keyword": "a"});
        assert_eq!(transform(&none).keyword_difficulty, DEFAULT_KEYWORD_DIFFICULTY);
    }

    #[test]
    fn test_difficulty_is_clamped() {
        let item = json!({"keyword": "a", "difficulty": 140});
        assert_eq!(transform(&item).keyword_difficulty, 100.0);
    }

    #[test]
    fn test_numeric_coercion_applies_defaults_after_coercion() {
        let item = json!({
            "keyword": "a",
            "search_volume": "2400",
            "cpc": "not a number",
            "competition": 0.37
        });
        let record = transform(&item);
        assert_eq!(record.search_volume, 2400.0);
        assert_eq!(record.cpc, 0.0);
        assert_eq!(record.competition, Some(0.37));
    }

    #[test]
    fn test_textual_competition_becomes_level() {
        let item = json!({"keyword": "a", "competition": "HIGH", "competition_index": 88});
        let record = transform(&item);
        assert_eq!(record.competition, None);
        assert_eq!(record.competition_level.as_deref(), Some("HIGH"));

        let explicit = json!({"keyword": "a", "competition": "HIGH", "competition_level": "MEDIUM"});
        assert_eq!(
            transform(&explicit).competition_level.as_deref(),
            Some("MEDIUM")
        );
    }

    #[test]
    fn test_list_fields_use_alternate_keys() {
        let item = json!({
            "keyword": "a",
            "category": 10021,
            "keyword_info": {
                "monthly_searches": [
                    {"year": 2024, "month": 1, "search_volume": 90},
                    null
                ]
            }
        });
        let record = transform(&item);
        assert_eq!(record.categories, vec![json!(10021)]);
        assert_eq!(record.trend.len(), 1);
        assert_eq!(record.trend[0]["search_volume"], json!(90));
    }

    #[test]
    fn test_coerce_list_filters_falsy() {
        let list = json!([0, "", null, false, "tools", 3]);
        assert_eq!(coerce_list(Some(&list)), vec![json!("tools"), json!(3)]);
        assert!(coerce_list(Some(&json!(""))).is_empty());
        assert!(coerce_list(None).is_empty());
    }

    #[test]
    fn test_empty_object_gets_all_defaults() {
        assert_eq!(transform(&json!({})), NormalizedKeywordRecord::default());
    }

    #[test]
    fn test_non_object_input_degrades() {
        assert_eq!(transform(&json!(null)).keyword, UNKNOWN_KEYWORD);
        assert_eq!(transform(&json!([1, 2, 3])).keyword, UNKNOWN_KEYWORD);
        assert_eq!(transform(&json!(42)).keyword, UNKNOWN_KEYWORD);

        let (record, degraded) = transform_reporting(&json!("  seo audit "));
        assert!(degraded);
        assert_eq!(record, NormalizedKeywordRecord::minimal("seo audit"));

        assert!(matches!(
            try_transform(&json!(null)),
            Err(EtlError::TransformFailure { .. })
        ));
    }

    #[test]
    fn test_negative_metrics_are_zeroed() {
        let item = json!({"keyword": "a", "search_volume": -5, "cpc": -0.2});
        let record = transform(&item);
        assert_eq!(record.search_volume, 0.0);
        assert_eq!(record.cpc, 0.0);
    }
}
