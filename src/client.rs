use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::PrtgConfig;
use crate::error::{Error, Result};
use crate::models::RawRecord;
use crate::models::metadata::Metadata;

pub const OBJECTS_ENDPOINT: &str = "experimental/objects";

const METADATA_COLUMNS: [&str; 4] = ["group", "device", "kind_name", "tags"];

/// GET-and-decode seam between the datasource and the network.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str, headers: &[(&str, String)]) -> Result<Value>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(allow_insecure: bool) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(allow_insecure)
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str, headers: &[(&str, String)]) -> Result<Value> {
        let mut req = self.http.get(url);
        for (name, value) in headers {
            req = req.header(*name, value);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Transport(format!("{status}: {body}")));
        }
        Ok(resp.json::<Value>().await?)
    }
}

/// Parameters of one object listing.
#[derive(Debug, Clone, Default)]
pub struct ObjectQuery {
    pub filter: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub columns: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub data: Vec<RawRecord>,
    pub total: usize,
    pub offset: u64,
    pub limit: u64,
}

/// Client for the PRTG API v2 object endpoints.
#[derive(Clone)]
pub struct PrtgClient {
    url: String,
    base_url: String,
    api_key: String,
    transport: Arc<dyn Transport>,
}

impl PrtgClient {
    pub fn new(config: &PrtgConfig, transport: Arc<dyn Transport>) -> Self {
        let base_url = format!("{}:{}/api/v2", config.url.trim_end_matches('/'), config.port);
        if config.url.is_empty() {
            tracing::warn!("PRTG API: URL is not configured");
        }
        if config.api_key.is_empty() {
            tracing::warn!("PRTG API: API key is not configured");
        }
        tracing::info!(
            base_url = %base_url,
            has_api_key = !config.api_key.is_empty(),
            allow_insecure = config.allow_insecure,
            "PRTG API client initialized"
        );

        Self {
            url: config.url.clone(),
            base_url,
            api_key: config.api_key.clone(),
            transport,
        }
    }

    /// Build an endpoint URL, skipping empty parameters.
    pub fn build_url(&self, endpoint: &str, params: &[(&str, String)]) -> String {
        let query: Vec<String> = params
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect();

        if query.is_empty() {
            format!("{}/{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}?{}", self.base_url, query.join("&"))
        }
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Authorization", format!("Bearer {}", self.api_key)),
            ("Content-Type", "application/json".to_string()),
            ("Accept", "application/json".to_string()),
        ]
    }

    pub async fn query(&self, options: &ObjectQuery) -> Result<ApiResponse> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(filter) = &options.filter {
            params.push(("filter", filter.clone()));
        }
        if let Some(limit) = options.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = options.offset {
            params.push(("offset", offset.to_string()));
        }
        if let Some(columns) = options.columns.as_ref().filter(|c| !c.is_empty()) {
            params.push(("columns", columns.join(",")));
        }

        let url = self.build_url(OBJECTS_ENDPOINT, &params);
        tracing::debug!(%url, "PRTG API query");

        let body = self.transport.get_json(&url, &self.headers()).await?;
        let data = records_from_body(body)?;

        Ok(ApiResponse {
            total: data.len(),
            data,
            offset: options.offset.unwrap_or(0),
            limit: options.limit.unwrap_or(0),
        })
    }

    /// Check configuration, then fetch a single object.
    pub async fn test_connection(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::Configuration(
                "API Key is not configured. Please configure the API Key in the datasource settings."
                    .to_string(),
            ));
        }
        if self.url.is_empty() {
            return Err(Error::Configuration(
                "Server URL is not configured. Please configure the PRTG server URL in the datasource settings."
                    .to_string(),
            ));
        }

        let url = self.build_url(OBJECTS_ENDPOINT, &[("limit", "1".to_string())]);
        self.transport
            .get_json(&url, &self.headers())
            .await
            .map_err(|e| Error::ConnectionTest(e.detail().to_string()))?;
        Ok(())
    }

    /// Distinct groups, devices, tags and sensor types across up to `limit` objects.
    pub async fn get_metadata(&self, limit: u64) -> Result<Metadata> {
        let response = self
            .query(&ObjectQuery {
                limit: Some(limit),
                columns: Some(METADATA_COLUMNS.iter().map(|c| c.to_string()).collect()),
                ..Default::default()
            })
            .await?;

        let metadata = collect_metadata(&response.data, chrono::Utc::now().timestamp_millis());
        tracing::info!(
            groups = metadata.groups.len(),
            devices = metadata.devices.len(),
            tags = metadata.tags.len(),
            sensor_types = metadata.sensor_types.len(),
            limit,
            "PRTG metadata fetched"
        );
        Ok(metadata)
    }
}

/// Accept either a bare array or an envelope with a `data` array.
fn records_from_body(body: Value) -> Result<Vec<RawRecord>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => items,
            _ => return Err(Error::UnexpectedBody("object without a data array".to_string())),
        },
        other => return Err(Error::UnexpectedBody(format!("expected array, got {other}"))),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect())
}

fn collect_metadata(records: &[RawRecord], fetched_at: i64) -> Metadata {
    let mut groups = BTreeSet::new();
    let mut devices = BTreeSet::new();
    let mut tags = BTreeSet::new();
    let mut sensor_types = BTreeSet::new();

    let non_empty = |v: Option<&Value>| v.and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_string);

    for record in records {
        groups.extend(non_empty(record.get("group")));
        devices.extend(non_empty(record.get("device")));
        sensor_types.extend(non_empty(record.get("kind_name")));
        if let Some(Value::Array(items)) = record.get("tags") {
            tags.extend(items.iter().filter_map(|t| non_empty(Some(t))));
        }
    }

    Metadata {
        groups: groups.into_iter().collect(),
        devices: devices.into_iter().collect(),
        tags: tags.into_iter().collect(),
        sensor_types: sensor_types.into_iter().collect(),
        fetched_at,
    }
}
