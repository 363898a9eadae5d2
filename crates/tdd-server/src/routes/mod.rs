pub mod checklist;
pub mod health;
pub mod tasks;
pub mod tdd;

use serde::Serialize;

/// Serialize a report and make sure it carries `"ok": true` when the report
/// itself has no `ok` field.
pub(crate) fn ok_json<T: Serialize>(report: &T) -> serde_json::Result<serde_json::Value> {
    let mut value = serde_json::to_value(report)?;
    if let Some(map) = value.as_object_mut() {
        map.entry("ok").or_insert(serde_json::Value::Bool(true));
    }
    Ok(value)
}
