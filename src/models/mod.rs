pub mod frame;
pub mod metadata;
pub mod query;

/// An object as returned by the PRTG API: arbitrary keys, possibly nested.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;
