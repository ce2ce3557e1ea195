use crate::domain::model::{LayerKind, LoadableLayerRecord, QueryResult, DEFAULT_LAYER_NAME};

/// Wraps a query result as a GeoJSON layer for the host catalog.
#[derive(Debug, Clone)]
pub struct ResultAdapter {
    layer_name: String,
}

impl ResultAdapter {
    pub fn new(layer_name: impl Into<String>) -> Self {
        Self {
            layer_name: layer_name.into(),
        }
    }

    pub fn adapt(&self, result: QueryResult) -> LoadableLayerRecord {
        LoadableLayerRecord {
            name: self.layer_name.clone(),
            kind: LayerKind::Geojson,
            payload: result,
            enabled: true,
        }
    }
}

impl Default for ResultAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_LAYER_NAME)
    }
}
