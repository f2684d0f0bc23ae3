use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::models::RawRecord;
use crate::models::frame::{DataFrame, Field, FieldType};
use crate::status::{priority_of, status_field_config};

static DATE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-/:]").expect("date separator regex"));
static TIME_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"T|Z|\s\d{2}:").expect("time marker regex"));

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%d.%m.%Y %H:%M:%S",
];

const DATETIME_TZ_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%dT%H:%M:%S%.f%z"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Build a row-per-record frame. Without requested columns, the keys of the
/// first record define the layout.
pub fn shape_table(ref_id: &str, records: &[RawRecord], requested: &[String]) -> DataFrame {
    let columns = display_columns(records, requested);
    let sample = records.first();

    let fields = columns
        .iter()
        .map(|col| create_field(col, sample))
        .collect();
    let mut frame = DataFrame::new(ref_id, fields);

    for record in records {
        frame.add(&transform_record(record, &columns));
    }

    frame
}

fn display_columns(records: &[RawRecord], requested: &[String]) -> Vec<String> {
    if !requested.is_empty() {
        return requested.to_vec();
    }
    records
        .first()
        .map(|r| r.keys().cloned().collect())
        .unwrap_or_default()
}

fn create_field(column: &str, sample: Option<&RawRecord>) -> Field {
    let name = format_field_name(column);
    if column == "status" {
        return Field::new(name, FieldType::Number).with_config(status_field_config());
    }
    let value = sample.map(|r| lookup(r, column)).unwrap_or(Value::Null);
    Field::new(name, field_type(&value))
}

fn transform_record(record: &RawRecord, columns: &[String]) -> Map<String, Value> {
    columns
        .iter()
        .map(|col| (format_field_name(col), resolve_cell(record, col)))
        .collect()
}

/// Cell value for one column. `status` carries the classified priority, never
/// the raw label; dotted names reach one level into a child object.
pub fn resolve_cell(record: &RawRecord, column: &str) -> Value {
    if column == "status" {
        return Value::from(priority_of(record.get("status")));
    }
    lookup(record, column)
}

fn lookup(record: &RawRecord, column: &str) -> Value {
    let value = match column.split_once('.') {
        Some((parent, child)) => record.get(parent).and_then(|p| p.get(child)),
        None => record.get(column),
    };
    value.cloned().unwrap_or(Value::Null)
}

/// `kind_name` → `Kind Name`, `parent.name` → `Parent.Name`.
pub fn format_field_name(column: &str) -> String {
    let mut out = String::with_capacity(column.len());
    let mut prev_is_word = false;
    for ch in column.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        let is_word = ch.is_ascii_alphanumeric();
        if is_word && !prev_is_word {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
        prev_is_word = is_word;
    }
    out
}

/// Type of a column judged from one sample value.
pub fn field_type(value: &Value) -> FieldType {
    match value {
        Value::Number(_) => FieldType::Number,
        Value::Bool(_) => FieldType::Boolean,
        Value::String(s) if looks_like_date(s) => FieldType::Time,
        _ => FieldType::String,
    }
}

/// Date-ish strings need a separator or time marker and must also parse, so
/// bare IDs like "1002" stay strings.
pub fn looks_like_date(value: &str) -> bool {
    let has_separator = DATE_SEPARATORS.is_match(value);
    let has_time_marker = TIME_MARKERS.is_match(value);
    (has_separator || has_time_marker) && parses_as_date(value)
}

fn parses_as_date(value: &str) -> bool {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value).is_ok()
        || DateTime::parse_from_rfc2822(value).is_ok()
        || DATETIME_TZ_FORMATS
            .iter()
            .any(|f| DateTime::parse_from_str(value, f).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|f| NaiveDateTime::parse_from_str(value, f).is_ok())
        || DATE_FORMATS
            .iter()
            .any(|f| NaiveDate::parse_from_str(value, f).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    fn cols(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_format_field_name() {
        assert_eq!(format_field_name("kind_name"), "Kind Name");
        assert_eq!(format_field_name("parent.name"), "Parent.Name");
        assert_eq!(format_field_name("lastup"), "Lastup");
        assert_eq!(format_field_name("status_raw"), "Status Raw");
    }

    #[test]
    fn test_field_type_detection() {
        assert_eq!(field_type(&json!(1002)), FieldType::Number);
        assert_eq!(field_type(&json!(true)), FieldType::Boolean);
        assert_eq!(field_type(&json!("2024-03-01T10:15:00Z")), FieldType::Time);
        assert_eq!(field_type(&json!("2024-03-01 10:15:00")), FieldType::Time);
        assert_eq!(field_type(&json!("2024-03-01")), FieldType::Time);
        assert_eq!(field_type(&json!("Ping")), FieldType::String);
        assert_eq!(field_type(&Value::Null), FieldType::String);
        assert_eq!(field_type(&json!(["a"])), FieldType::String);
    }

    #[test]
    fn test_utc_minutes_without_seconds_is_a_date() {
        assert!(looks_like_date("2024-03-01T10:15Z"));
        assert_eq!(field_type(&json!("2024-03-01T10:15Z")), FieldType::Time);
    }

    #[test]
    fn test_numeric_id_string_is_not_a_date() {
        assert!(!looks_like_date("1002"));
        assert_eq!(field_type(&json!("1002")), FieldType::String);
    }

    #[test]
    fn test_separator_without_valid_date_is_string() {
        assert!(!looks_like_date("10-20-30-40"));
        assert!(!looks_like_date("OK: 12 ms"));
        assert!(!looks_like_date("Total"));
    }

    #[test]
    fn test_requested_columns_and_status_priority() {
        let records = vec![
            record(json!({ "name": "Ping", "status": "Down", "objid": 1002 })),
            record(json!({ "name": "HTTP", "status": "up" })),
        ];
        let frame = shape_table("A", &records, &cols(&["name", "status", "objid"]));

        assert_eq!(frame.ref_id, "A");
        let names: Vec<&str> = frame.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Status", "Objid"]);

        let status = frame.field("Status").unwrap();
        assert_eq!(status.field_type, FieldType::Number);
        assert!(status.config.is_some());
        assert_eq!(status.values, vec![json!(1), json!(13)]);

        let objid = frame.field("Objid").unwrap();
        assert_eq!(objid.field_type, FieldType::Number);
        assert_eq!(objid.values, vec![json!(1002), Value::Null]);
    }

    #[test]
    fn test_status_is_numeric_even_when_missing_from_sample() {
        let records = vec![record(json!({ "name": "Ping" }))];
        let frame = shape_table("A", &records, &cols(&["status"]));
        let status = frame.field("Status").unwrap();
        assert_eq!(status.field_type, FieldType::Number);
        assert_eq!(status.values, vec![json!(98)]);
    }

    #[test]
    fn test_dotted_column_resolution() {
        let records = vec![
            record(json!({ "parent": { "name": "X", "objid": 40 } })),
            record(json!({ "name": "orphan" })),
            record(json!({ "parent": "not-an-object" })),
        ];
        let frame = shape_table("A", &records, &cols(&["parent.name"]));
        let field = frame.field("Parent.Name").unwrap();
        assert_eq!(field.field_type, FieldType::String);
        assert_eq!(field.values, vec![json!("X"), Value::Null, Value::Null]);
    }

    #[test]
    fn test_dotted_column_typed_from_child_value() {
        let records = vec![
            record(json!({ "parent": { "objid": 40 } })),
            record(json!({ "parent": { "objid": 41 } })),
        ];
        let frame = shape_table("A", &records, &cols(&["parent.objid"]));
        let field = frame.field("Parent.Objid").unwrap();
        assert_eq!(field.field_type, FieldType::Number);
        assert_eq!(field.values, vec![json!(40), json!(41)]);
    }

    #[test]
    fn test_columns_from_first_record() {
        let records = vec![
            record(json!({ "objid": 1, "kind_name": "Ping", "active": true })),
            record(json!({ "objid": 2, "extra": "ignored" })),
        ];
        let frame = shape_table("A", &records, &[]);
        let mut names: Vec<&str> = frame.fields.iter().map(|f| f.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["Active", "Kind Name", "Objid"]);
        assert_eq!(frame.field("Active").unwrap().field_type, FieldType::Boolean);
        assert_eq!(frame.field("Kind Name").unwrap().values, vec![json!("Ping"), Value::Null]);
        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn test_no_records_no_columns() {
        let frame = shape_table("A", &[], &[]);
        assert!(frame.fields.is_empty());
        assert!(frame.is_empty());
    }

    #[test]
    fn test_requested_columns_without_records() {
        let frame = shape_table("A", &[], &cols(&["name", "lastup"]));
        assert_eq!(frame.fields.len(), 2);
        assert_eq!(frame.fields[1].field_type, FieldType::String);
        assert!(frame.is_empty());
    }

    #[test]
    fn test_time_field_from_sample() {
        let records = vec![record(json!({ "lastup": "2024-05-02 08:00:11" }))];
        let frame = shape_table("A", &records, &cols(&["lastup"]));
        assert_eq!(frame.fields[0].field_type, FieldType::Time);
        assert_eq!(frame.fields[0].values, vec![json!("2024-05-02 08:00:11")]);
    }
}
