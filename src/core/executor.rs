use crate::domain::model::{QueryResult, SpatialQuery};
use crate::domain::ports::FeatureService;
use crate::utils::error::QueryExecutionError;
use async_trait::async_trait;
use reqwest::Client;

/// Sends GetFeature requests over HTTP. No retry and no timeout of its own;
/// both are left to the client it was built with.
#[derive(Debug, Clone, Default)]
pub struct WfsExecutor {
    client: Client,
}

impl WfsExecutor {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Uses a preconfigured client, e.g. one with a request timeout.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeatureService for WfsExecutor {
    async fn execute(
        &self,
        query: &SpatialQuery,
        endpoint: &str,
    ) -> Result<QueryResult, QueryExecutionError> {
        let url = query.to_request_url(endpoint);
        tracing::debug!("Making GetFeature request to: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        tracing::debug!("Feature service response status: {}", status);

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("Could not read error body ({}): {}", status, e);
                    String::new()
                }
            };
            return Err(QueryExecutionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let document: serde_json::Value = serde_json::from_slice(&bytes)?;
        Ok(QueryResult(document))
    }
}
