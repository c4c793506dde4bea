use crate::core::transformer::{transform, transform_reporting};
use crate::domain::model::{NormalizedKeywordRecord, RawApiItem, TransformResult};
use serde_json::Value;

/// Normalize every element of a JSON array. Anything else yields no records.
pub fn transform_all(items: &Value) -> Vec<NormalizedKeywordRecord> {
    match items.as_array() {
        Some(items) => items.iter().map(transform).collect(),
        None => {
            tracing::warn!("Expected an array of keyword items, nothing to transform");
            Vec::new()
        }
    }
}

/// Normalize a slice of raw items, one record per item, counting degraded ones.
pub fn transform_batch(items: &[RawApiItem]) -> TransformResult {
    let mut result = TransformResult {
        records: Vec::with_capacity(items.len()),
        degraded: 0,
    };

    for item in items {
        let (record, degraded) = transform_reporting(item);
        if degraded {
            result.degraded += 1;
        }
        result.records.push(record);
    }

    if result.degraded > 0 {
        tracing::warn!(
            "{} of {} keyword items degraded to defaults",
            result.degraded,
            items.len()
        );
    }
    result
}
