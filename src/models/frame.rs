use serde::Serialize;
use serde_json::{Map, Value};

/// Semantic type of a frame column, as understood by the dashboard host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    Boolean,
    Time,
    String,
}

/// One value→display entry of a value mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingResult {
    pub text: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueMapping {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub options: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomFieldConfig {
    #[serde(rename = "displayMode")]
    pub display_mode: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldConfig {
    #[serde(rename = "displayName")]
    pub display_name: &'static str,
    pub custom: CustomFieldConfig,
    pub mappings: Vec<ValueMapping>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<FieldConfig>,
    pub values: Vec<Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            config: None,
            values: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Column-oriented result for one query target. Rows are appended as
/// name→value maps and land in field order; missing names become null.
#[derive(Debug, Clone, Serialize)]
pub struct DataFrame {
    #[serde(rename = "refId")]
    pub ref_id: String,
    pub fields: Vec<Field>,
}

impl DataFrame {
    pub fn new(ref_id: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            ref_id: ref_id.into(),
            fields,
        }
    }

    pub fn add(&mut self, row: &Map<String, Value>) {
        for field in &mut self.fields {
            field
                .values
                .push(row.get(&field.name).cloned().unwrap_or(Value::Null));
        }
    }

    pub fn len(&self) -> usize {
        self.fields.first().map_or(0, |f| f.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Single-cell frame reporting a failed target.
    pub fn error(ref_id: impl Into<String>, message: impl Into<String>) -> Self {
        let mut frame = Self::new(ref_id, vec![Field::new("Error", FieldType::String)]);
        let mut row = Map::new();
        row.insert("Error".to_string(), Value::String(message.into()));
        frame.add(&row);
        frame
    }
}

/// Record count for one (group, status priority) cell of the heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapRow {
    pub group: String,
    #[serde(rename = "statusPriority")]
    pub status_priority: u32,
    pub count: u64,
}
