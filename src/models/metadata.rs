use serde::Serialize;

/// Distinct filter values offered to the editor's pickers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub groups: Vec<String>,
    pub devices: Vec<String>,
    pub tags: Vec<String>,
    pub sensor_types: Vec<String>,
    /// Epoch milliseconds.
    pub fetched_at: i64,
}

/// Outcome of the connection test, shaped for the host's settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    pub status: TestStatus,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Success,
    Error,
}
