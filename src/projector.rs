use serde_json::Value;
use tracing::debug;

use crate::lookup::Lookup;
use crate::models::{ComponentRow, ComponentTable};

/// Flatten `components[]` into one row per entry, preserving source order.
pub fn project(doc: &Value) -> ComponentTable {
    let rows: Vec<ComponentRow> = doc.list(&["components"]).iter().map(project_row).collect();
    debug!(rows = rows.len(), "projected component table");
    ComponentTable { rows }
}

fn project_row(component: &Value) -> ComponentRow {
    let license = component
        .list(&["licenses"])
        .iter()
        .map(|entry| entry.text_or(&["license", "name"], ""))
        .collect::<Vec<_>>()
        .join(", ");

    ComponentRow {
        name: component.text_or(&["name"], ""),
        version: component.text_or(&["version"], ""),
        kind: component.text_or(&["type"], ""),
        license,
    }
}
