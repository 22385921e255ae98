//! List output rendering

use crate::resource::{Listed, ResourceType};
use clap::ValueEnum;
use serde_json::{json, Value};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Probe an item record for a human-readable name.
fn display_name(item: &Value) -> Option<&str> {
    item.get("name")
        .or_else(|| item.get("title"))
        .or_else(|| item.get("attributes").and_then(|a| a.get("name")))
        .or_else(|| item.get("attributes").and_then(|a| a.get("table_name")))
        .and_then(Value::as_str)
}

/// Render one type's listing to stdout.
pub fn render(rt: &dyn ResourceType, listed: Listed, format: OutputFormat) {
    match format {
        OutputFormat::Json => render_json(rt, listed),
        OutputFormat::Table => render_table(rt, listed),
    }
}

fn render_json(rt: &dyn ResourceType, listed: Listed) {
    let items = listed.into_items();
    let output = json!({
        "resource_type": rt.rest_path(None),
        "items": items,
        "count": items.len(),
    });
    // count/items/resource_type come out sorted, same as the snapshots.
    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{text}"),
        Err(e) => tracing::error!("failed to serialize listing: {e}"),
    }
}

fn render_table(rt: &dyn ResourceType, listed: Listed) {
    let items = listed.into_items();
    println!("{} ({} resources)", rt.rest_path(None), items.len());
    for item in &items {
        let id = item
            .get("id")
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| "N/A".to_string());
        match display_name(item) {
            Some(name) => println!("{id} {name}"),
            None => println!("{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_probes_fields() {
        assert_eq!(display_name(&json!({"name": "cpu check"})), Some("cpu check"));
        assert_eq!(display_name(&json!({"title": "My Board"})), Some("My Board"));
        assert_eq!(
            display_name(&json!({"attributes": {"table_name": "owners"}})),
            Some("owners")
        );
        assert_eq!(display_name(&json!({"id": 3})), None);
    }
}
