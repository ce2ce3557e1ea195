use crate::domain::model::{LoadableLayerRecord, QueryResult, SpatialQuery};
use crate::utils::error::{QueryExecutionError, Result};
use async_trait::async_trait;

pub trait ConfigProvider: Send + Sync {
    fn service_endpoint(&self) -> &str;
    fn layer_name(&self) -> &str;
}

/// Remote feature service the built query is sent to.
#[async_trait]
pub trait FeatureService: Send + Sync {
    async fn execute(
        &self,
        query: &SpatialQuery,
        endpoint: &str,
    ) -> std::result::Result<QueryResult, QueryExecutionError>;
}

/// Host data catalog receiving loaded layers (`addModel`).
#[async_trait]
pub trait LayerCatalog: Send + Sync {
    async fn add_layer(&self, record: LoadableLayerRecord) -> Result<()>;
}

/// Map drawing interaction. The controller starts it and must end it.
pub trait DrawingSession {
    fn start(&mut self);
    fn end(&mut self);
    fn is_active(&self) -> bool;
}
