//! PRTG status labels and their severity ranking.
//!
//! Every status is encoded downstream as its priority (lower = more severe).
//! Labels PRTG reports in several spellings share one definition through the
//! alias lookup.

use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::frame::{CustomFieldConfig, FieldConfig, MappingResult, ValueMapping};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDefinition {
    pub keys: &'static [&'static str],
    pub label: Cow<'static, str>,
    pub priority: u32,
    pub color: &'static str,
}

const fn def(
    keys: &'static [&'static str],
    label: &'static str,
    priority: u32,
    color: &'static str,
) -> StatusDefinition {
    StatusDefinition {
        keys,
        label: Cow::Borrowed(label),
        priority,
        color,
    }
}

/// Known statuses in severity order.
pub static STATUS_DEFINITIONS: [StatusDefinition; 14] = [
    def(&["down"], "Down", 1, "#e02f44"),
    def(&["down (acknowledged)", "down (ack)"], "Down (Acknowledged)", 2, "#ff941f"),
    def(&["down (partial)"], "Down (Partial)", 3, "#f2cc0c"),
    def(&["warning"], "Warning", 4, "#f2c96d"),
    def(&["unusual"], "Unusual", 5, "#ffcb7d"),
    def(&["paused"], "Paused", 6, "#a8a8a8"),
    def(&["paused (by user)"], "Paused (by User)", 7, "#c8c8c8"),
    def(&["paused (by dependency)"], "Paused (by Dependency)", 8, "#c8c8c8"),
    def(&["paused (because of license)"], "Paused (License)", 9, "#c8c8c8"),
    def(&["paused (until)"], "Paused (Until)", 10, "#c8c8c8"),
    def(&["collecting"], "Collecting", 11, "#5794f2"),
    def(&["no monitoring"], "No Monitoring", 12, "#b877d9"),
    def(&["up"], "Up", 13, "#56a64b"),
    def(&["unknown"], "Unknown", 14, "#888888"),
];

pub const UNKNOWN_PRIORITY: u32 = 98;
const UNKNOWN_COLOR: &str = "#888888";

/// Returned for empty or absent labels.
pub static DEFAULT_STATUS_DEFINITION: StatusDefinition =
    def(&["unknown"], "Unknown", UNKNOWN_PRIORITY, UNKNOWN_COLOR);

static STATUS_LOOKUP: LazyLock<HashMap<&'static str, &'static StatusDefinition>> =
    LazyLock::new(|| {
        STATUS_DEFINITIONS
            .iter()
            .flat_map(|def| def.keys.iter().map(move |key| (*key, def)))
            .collect()
    });

static STATUS_FIELD_CONFIG: LazyLock<FieldConfig> = LazyLock::new(|| {
    let mut options = Map::new();
    let entries = STATUS_DEFINITIONS
        .iter()
        .map(|d| (d.priority, &*d.label, d.color))
        .chain(std::iter::once((UNKNOWN_PRIORITY, "Unknown", UNKNOWN_COLOR)));
    for (priority, text, color) in entries {
        options.insert(
            priority.to_string(),
            serde_json::to_value(MappingResult { text, color }).unwrap_or(Value::Null),
        );
    }

    FieldConfig {
        display_name: "Status",
        custom: CustomFieldConfig {
            display_mode: "color-text",
        },
        mappings: vec![ValueMapping {
            kind: "value",
            options,
        }],
    }
});

/// Map a raw PRTG status label to its definition. Matching ignores case and
/// surrounding whitespace; anything unrecognized ranks as priority 98 and keeps
/// its original text as the label.
pub fn classify(raw: &str) -> Cow<'static, StatusDefinition> {
    if raw.is_empty() {
        return Cow::Borrowed(&DEFAULT_STATUS_DEFINITION);
    }

    let normalized = raw.trim().to_lowercase();
    match STATUS_LOOKUP.get(normalized.as_str()) {
        Some(def) => Cow::Borrowed(*def),
        None => Cow::Owned(StatusDefinition {
            keys: &[],
            label: Cow::Owned(raw.to_string()),
            priority: UNKNOWN_PRIORITY,
            color: UNKNOWN_COLOR,
        }),
    }
}

/// Priority for a JSON status cell; non-string values count as absent.
pub fn priority_of(value: Option<&Value>) -> u32 {
    classify(value.and_then(Value::as_str).unwrap_or_default()).priority
}

/// Field config shared by every status column: priority → label/color.
pub fn status_field_config() -> FieldConfig {
    STATUS_FIELD_CONFIG.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_known_labels() {
        assert_eq!(classify("down").priority, 1);
        assert_eq!(classify("Down (Acknowledged)").priority, 2);
        assert_eq!(classify("down (ack)").priority, 2);
        assert_eq!(classify("  UP  ").priority, 13);
        assert_eq!(classify("Paused (because of license)").label, "Paused (License)");
    }

    #[test]
    fn test_aliases_share_one_definition() {
        let a = classify("down (ack)");
        let b = classify("down (acknowledged)");
        match (a, b) {
            (Cow::Borrowed(a), Cow::Borrowed(b)) => assert!(std::ptr::eq(a, b)),
            _ => panic!("known labels should borrow the static table"),
        }
    }

    #[test]
    fn test_classify_empty_is_sentinel() {
        let def = classify("");
        assert_eq!(def.priority, UNKNOWN_PRIORITY);
        assert_eq!(def.label, "Unknown");
    }

    #[test]
    fn test_classify_unrecognized_keeps_text() {
        let def = classify("Degraded Mode");
        assert_eq!(def.priority, 98);
        assert_eq!(def.label, "Degraded Mode");
        assert_eq!(def.color, "#888888");
    }

    #[test]
    fn test_explicit_unknown_label_is_14() {
        assert_eq!(classify("Unknown").priority, 14);
    }

    #[test]
    fn test_priority_of_json() {
        assert_eq!(priority_of(Some(&json!("Warning"))), 4);
        assert_eq!(priority_of(Some(&json!(5))), 98);
        assert_eq!(priority_of(None), 98);
    }

    #[test]
    fn test_field_config_covers_all_priorities() {
        let config = status_field_config();
        assert_eq!(config.display_name, "Status");
        assert_eq!(config.custom.display_mode, "color-text");
        let options = &config.mappings[0].options;
        assert_eq!(options.len(), STATUS_DEFINITIONS.len() + 1);
        assert_eq!(options["1"], json!({ "text": "Down", "color": "#e02f44" }));
        assert_eq!(options["98"], json!({ "text": "Unknown", "color": "#888888" }));
    }
}
