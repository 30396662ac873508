use serde_json::{Map, Value, json};

use crate::diff::{Change, DiffReport, ModelChange};
use crate::snapshot::SnapshotEntry;

fn change_value<T: serde::Serialize>(change: &Change<T>) -> Value {
    json!({ "old": change.old, "new": change.new })
}

/// Only the fields that changed; pricing is reported as whole objects
fn modified_details(change: &ModelChange) -> Value {
    let mut details = Map::new();
    let fields = &change.fields;
    if let Some(c) = &fields.deprecated {
        details.insert("deprecated".to_string(), change_value(c));
    }
    if let Some(c) = &fields.replaced_by {
        details.insert("replaced_by".to_string(), change_value(c));
    }
    if let Some(c) = &fields.quantization {
        details.insert("quantization".to_string(), change_value(c));
    }
    if change.pricing_changed() {
        details.insert(
            "pricing".to_string(),
            json!({ "old": change.old.pricing, "new": change.new.pricing }),
        );
    }
    Value::Object(details)
}

/// One JSON object per line: added, then removed, then modified models
pub(crate) fn diff_json_lines(report: &DiffReport) -> Vec<String> {
    let added = report
        .added
        .iter()
        .map(|m| json!({ "event": "added", "model": m.name, "details": m }));
    let removed = report
        .removed
        .iter()
        .map(|m| json!({ "event": "removed", "model": m.name }));
    let modified = report.modified.iter().map(|c| {
        json!({ "event": "modified", "model": c.name, "details": modified_details(c) })
    });

    added
        .chain(removed)
        .chain(modified)
        .map(|v| v.to_string())
        .collect()
}

pub(crate) fn snapshot_list_json(entries: &[SnapshotEntry]) -> String {
    let output: Vec<Value> = entries
        .iter()
        .map(|e| {
            json!({
                "hash": e.hash,
                "timestamp": e.timestamp,
                "models": e.models,
                "path": e.path.display().to_string(),
            })
        })
        .collect();
    Value::Array(output).to_string()
}
