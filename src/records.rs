//! Per-record messages for generated documents.

use anyhow::Context;
use serde_json::Value;

/// Collect `field` from every record in `document`.
///
/// A top-level array is treated as a list of records, anything else as a
/// single record. Records without the field are skipped. String values are
/// returned as-is, other values in their JSON form.
pub fn record_messages(document: &str, field: &str) -> anyhow::Result<Vec<String>> {
    let document: Value =
        serde_json::from_str(document).context("Generated document is not valid JSON")?;

    let records = match &document {
        Value::Array(items) => items.iter().collect::<Vec<_>>(),
        other => vec![other],
    };

    Ok(records
        .into_iter()
        .filter_map(|record| record.get(field))
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect())
}
