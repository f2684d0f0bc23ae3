use serde::{Deserialize, Serialize};

use super::frame::DataFrame;

/// One query target as produced by the editor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    #[serde(default)]
    pub ref_id: String,
    #[serde(default)]
    pub hide: bool,
    #[serde(default)]
    pub query_name: Option<String>,
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default)]
    pub column_preset: Option<ColumnPreset>,
    #[serde(default)]
    pub object_types: Vec<String>,
    /// Sensor type filter, matched against `kind_name`.
    #[serde(default)]
    pub sensor_types: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub devices: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub statuses: Vec<String>,
    /// Custom clause in PRTG API v2 filter syntax, passed through as-is.
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Heatmap,
}

/// Named column sets offered by the editor as a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnPreset {
    Essential,
    Network,
    Full,
    Troubleshooting,
    Custom,
}

impl ColumnPreset {
    /// The preset's columns, or `None` for `Custom`.
    pub fn columns(self) -> Option<&'static [&'static str]> {
        match self {
            ColumnPreset::Essential => Some(&["name", "status", "message", "parent.name", "lastup"]),
            ColumnPreset::Network => Some(&["name", "status", "host", "device", "group", "probe"]),
            ColumnPreset::Full => Some(&[
                "name",
                "status",
                "message",
                "parent.name",
                "lastup",
                "lastdown",
                "kind_name",
                "objid",
                "device",
                "group",
                "probe",
            ]),
            ColumnPreset::Troubleshooting => Some(&[
                "name",
                "status",
                "message",
                "lastcheck",
                "lastup",
                "lastdown",
                "device",
                "group",
            ]),
            ColumnPreset::Custom => None,
        }
    }
}

impl StructuredQuery {
    /// Columns the user asked for: explicit `columns` first, then the preset.
    /// Empty means "whatever the first record carries".
    pub fn requested_columns(&self) -> Vec<String> {
        if let Some(cols) = self.columns.as_ref().filter(|c| !c.is_empty()) {
            return cols.clone();
        }
        self.column_preset
            .and_then(ColumnPreset::columns)
            .map(|cols| cols.iter().map(|c| c.to_string()).collect())
            .unwrap_or_default()
    }

    /// Columns to request from the upstream API. Heatmaps only need the two
    /// aggregation inputs; tables send the requested columns once each.
    pub fn columns_for_fetch(&self) -> Option<Vec<String>> {
        if self.view_mode == ViewMode::Heatmap {
            return Some(vec!["group".to_string(), "status".to_string()]);
        }

        let requested = self.requested_columns();
        if requested.is_empty() {
            return None;
        }

        let mut unique: Vec<String> = Vec::with_capacity(requested.len());
        for col in requested {
            if !unique.contains(&col) {
                unique.push(col);
            }
        }
        Some(unique)
    }
}

/// A batch of targets from the dashboard host.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub targets: Vec<StructuredQuery>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub data: Vec<DataFrame>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_editor_payload() {
        let query: StructuredQuery = serde_json::from_str(
            r#"{
                "refId": "A",
                "viewMode": "heatmap",
                "columnPreset": "essential",
                "objectTypes": ["sensor"],
                "sensorTypes": ["Ping"],
                "filter": "name contains 'x'",
                "limit": 50
            }"#,
        )
        .unwrap();
        assert_eq!(query.ref_id, "A");
        assert_eq!(query.view_mode, ViewMode::Heatmap);
        assert_eq!(query.column_preset, Some(ColumnPreset::Essential));
        assert_eq!(query.sensor_types, vec!["Ping"]);
        assert_eq!(query.limit, Some(50));
        assert!(query.statuses.is_empty());
        assert!(!query.hide);
    }

    #[test]
    fn test_view_mode_defaults_to_table() {
        let query: StructuredQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.view_mode, ViewMode::Table);
        assert_eq!(query.columns_for_fetch(), None);
    }

    #[test]
    fn test_heatmap_fetches_group_and_status_only() {
        let query = StructuredQuery {
            view_mode: ViewMode::Heatmap,
            columns: Some(vec!["name".into(), "message".into()]),
            ..Default::default()
        };
        assert_eq!(
            query.columns_for_fetch(),
            Some(vec!["group".to_string(), "status".to_string()])
        );
    }

    #[test]
    fn test_fetch_columns_are_deduplicated_in_order() {
        let query = StructuredQuery {
            columns: Some(vec!["name".into(), "status".into(), "name".into(), "group".into()]),
            ..Default::default()
        };
        assert_eq!(
            query.columns_for_fetch(),
            Some(vec!["name".to_string(), "status".to_string(), "group".to_string()])
        );
    }

    #[test]
    fn test_explicit_columns_win_over_preset() {
        let query = StructuredQuery {
            columns: Some(vec!["objid".into()]),
            column_preset: Some(ColumnPreset::Full),
            ..Default::default()
        };
        assert_eq!(query.requested_columns(), vec!["objid"]);
    }

    #[test]
    fn test_preset_used_when_columns_empty() {
        let query = StructuredQuery {
            columns: Some(vec![]),
            column_preset: Some(ColumnPreset::Essential),
            ..Default::default()
        };
        assert_eq!(
            query.requested_columns(),
            vec!["name", "status", "message", "parent.name", "lastup"]
        );

        let custom = StructuredQuery {
            column_preset: Some(ColumnPreset::Custom),
            ..Default::default()
        };
        assert!(custom.requested_columns().is_empty());
    }
}
