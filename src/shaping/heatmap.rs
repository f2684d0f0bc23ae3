use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::models::RawRecord;
use crate::models::frame::{DataFrame, Field, FieldType, HeatmapRow};
use crate::status::{STATUS_DEFINITIONS, priority_of, status_field_config};

pub const UNGROUPED: &str = "Ungrouped";

/// Count records per (group, status priority).
///
/// Groups come out in the order they were first seen. Within a group, known
/// statuses follow the severity table; anything else (priority 98) trails in
/// ascending priority. Zero counts are never emitted.
pub fn shape_heatmap(records: &[RawRecord]) -> Vec<HeatmapRow> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, BTreeMap<u32, u64>> = HashMap::new();

    for record in records {
        let group = group_name(record.get("group"));
        let priority = priority_of(record.get("status"));

        let per_group = counts.entry(group.clone()).or_insert_with(|| {
            order.push(group);
            BTreeMap::new()
        });
        *per_group.entry(priority).or_insert(0) += 1;
    }

    let mut rows = Vec::new();
    for group in order {
        let Some(mut statuses) = counts.remove(&group) else {
            continue;
        };

        for def in &STATUS_DEFINITIONS {
            if let Some(count) = statuses.remove(&def.priority).filter(|c| *c > 0) {
                rows.push(HeatmapRow {
                    group: group.clone(),
                    status_priority: def.priority,
                    count,
                });
            }
        }

        for (priority, count) in statuses.into_iter().filter(|(_, c)| *c > 0) {
            rows.push(HeatmapRow {
                group: group.clone(),
                status_priority: priority,
                count,
            });
        }
    }

    rows
}

/// Non-empty strings and truthy scalars name a group; everything else is ungrouped.
fn group_name(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => UNGROUPED.to_string(),
    }
}

/// Group / Status / Count frame for the heatmap panel.
pub fn heatmap_frame(ref_id: &str, rows: &[HeatmapRow]) -> DataFrame {
    let mut frame = DataFrame::new(
        ref_id,
        vec![
            Field::new("Group", FieldType::String),
            Field::new("Status", FieldType::Number).with_config(status_field_config()),
            Field::new("Count", FieldType::Number),
        ],
    );

    for row in rows {
        let mut values = Map::new();
        values.insert("Group".to_string(), Value::from(row.group.as_str()));
        values.insert("Status".to_string(), Value::from(row.status_priority));
        values.insert("Count".to_string(), Value::from(row.count));
        frame.add(&values);
    }

    frame
}
