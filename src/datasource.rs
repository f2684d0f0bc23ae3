use std::sync::Arc;

use crate::client::{HttpTransport, ObjectQuery, PrtgClient, Transport};
use crate::config::PrtgConfig;
use crate::error::Result;
use crate::metadata::MetadataCache;
use crate::models::frame::DataFrame;
use crate::models::metadata::{Metadata, TestResult, TestStatus};
use crate::models::query::{QueryRequest, QueryResponse, StructuredQuery, ViewMode};
use crate::query_builder::build_filter;
use crate::shaping::{heatmap_frame, shape_heatmap, shape_table};

/// A configured PRTG datasource: runs query targets and serves editor metadata.
pub struct Datasource {
    client: PrtgClient,
    metadata: MetadataCache,
}

impl Datasource {
    pub fn new(config: &PrtgConfig, transport: Arc<dyn Transport>) -> Self {
        let client = PrtgClient::new(config, transport);
        let metadata = MetadataCache::new(client.clone(), config.metadata_limit);
        Self { client, metadata }
    }

    pub fn from_config(config: &PrtgConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.allow_insecure)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Run every visible target in order. A failing target yields an error
    /// frame in its slot; the others still run.
    pub async fn query(&self, request: &QueryRequest) -> QueryResponse {
        let mut data = Vec::with_capacity(request.targets.len());

        for target in request.targets.iter().filter(|t| !t.hide) {
            match self.run_target(target).await {
                Ok(frame) => data.push(frame),
                Err(e) => {
                    tracing::error!(ref_id = %target.ref_id, "PRTG API error: {e}");
                    data.push(DataFrame::error(
                        target.ref_id.as_str(),
                        format!("Failed to fetch data: {e}"),
                    ));
                }
            }
        }

        QueryResponse { data }
    }

    async fn run_target(&self, target: &StructuredQuery) -> Result<DataFrame> {
        let filter = build_filter(target);
        tracing::debug!(ref_id = %target.ref_id, view_mode = ?target.view_mode, %filter, "running target");

        let response = self
            .client
            .query(&ObjectQuery {
                filter: (!filter.is_empty()).then_some(filter),
                limit: target.limit,
                offset: target.offset,
                columns: target.columns_for_fetch(),
            })
            .await?;

        let frame = match target.view_mode {
            ViewMode::Heatmap => heatmap_frame(&target.ref_id, &shape_heatmap(&response.data)),
            ViewMode::Table => {
                shape_table(&target.ref_id, &response.data, &target.requested_columns())
            }
        };
        Ok(frame)
    }

    pub async fn test_datasource(&self) -> TestResult {
        match self.client.test_connection().await {
            Ok(()) => TestResult {
                status: TestStatus::Success,
                message: "Successfully connected to PRTG API v2".to_string(),
            },
            Err(e) => {
                tracing::warn!("PRTG connection test failed: {e}");
                TestResult {
                    status: TestStatus::Error,
                    message: format!("Failed to connect to PRTG API: {e}"),
                }
            }
        }
    }

    pub async fn metadata(&self, force_refresh: bool) -> Result<Arc<Metadata>> {
        self.metadata.get(force_refresh).await
    }
}
