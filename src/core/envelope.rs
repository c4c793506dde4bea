//! Flattens the vendor's `{tasks: [{result: [{items: [...]}]}]}` envelope into
//! the raw item array. Malformed envelopes are logged and yield no items.

use crate::domain::model::RawApiItem;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

/// `status_code` the vendor uses for a successful envelope or task.
pub const STATUS_OK: i64 = 20000;

fn malformed(reason: impl Into<String>) -> EtlError {
    EtlError::MalformedEnvelope {
        reason: reason.into(),
    }
}

fn warn_on_status(scope: &str, node: &Value) {
    if let Some(code) = node.get("status_code").and_then(Value::as_i64) {
        if code != STATUS_OK {
            let message = node
                .get("status_message")
                .and_then(Value::as_str)
                .unwrap_or("no status message");
            tracing::warn!("{} reported status {}: {}", scope, code, message);
        }
    }
}

fn tasks_of(envelope: &Value) -> Result<&Vec<Value>> {
    warn_on_status("Envelope", envelope);
    match envelope.get("tasks") {
        Some(Value::Array(tasks)) if !tasks.is_empty() => Ok(tasks),
        Some(Value::Array(_)) => Err(malformed("tasks is empty")),
        Some(_) => Err(malformed("tasks is not an array")),
        None => Err(malformed("tasks is missing")),
    }
}

fn items_of_task(task: &Value) -> Result<Vec<RawApiItem>> {
    warn_on_status("Task", task);
    let results = match task.get("result") {
        Some(Value::Array(results)) if !results.is_empty() => results,
        _ => return Err(malformed("task result is missing or empty")),
    };

    let first = &results[0];
    match first.get("items") {
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(_) => Err(malformed("result items is not an array")),
        None if first.is_object() => Ok(results.clone()),
        None => Err(malformed("result holds neither items nor records")),
    }
}

/// Raw items of the first task only.
pub fn unwrap_envelope(envelope: &Value) -> Vec<RawApiItem> {
    let unwrapped = tasks_of(envelope).and_then(|tasks| items_of_task(&tasks[0]));
    match unwrapped {
        Ok(items) => {
            tracing::debug!("Unwrapped {} raw items from envelope", items.len());
            items
        }
        Err(e) => {
            tracing::warn!("{}", e);
            Vec::new()
        }
    }
}

/// Raw items of every task, in task order. Malformed tasks are skipped.
pub fn unwrap_all_tasks(envelope: &Value) -> Vec<RawApiItem> {
    let tasks = match tasks_of(envelope) {
        Ok(tasks) => tasks,
        Err(e) => {
            tracing::warn!("{}", e);
            return Vec::new();
        }
    };

    let mut items = Vec::new();
    for (index, task) in tasks.iter().enumerate() {
        match items_of_task(task) {
            Ok(task_items) => items.extend(task_items),
            Err(e) => tracing::warn!("Skipping task {}: {}", index, e),
        }
    }
    items
}
