use crate::domain::model::LoadableLayerRecord;
use crate::domain::ports::LayerCatalog;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Keeps loaded layers in memory, in load order.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    layers: Arc<Mutex<Vec<LoadableLayerRecord>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn layers(&self) -> Vec<LoadableLayerRecord> {
        self.layers.lock().await.clone()
    }
}

#[async_trait]
impl LayerCatalog for MemoryCatalog {
    async fn add_layer(&self, record: LoadableLayerRecord) -> Result<()> {
        self.layers.lock().await.push(record);
        Ok(())
    }
}

/// Writes each loaded layer as `<slug>.geojson` plus a `<slug>.layer.json`
/// record under a base directory. A later layer with the same name overwrites.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    base_path: PathBuf,
}

impl FileCatalog {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn geojson_path(&self, layer_name: &str) -> PathBuf {
        self.base_path.join(format!("{}.geojson", slug(layer_name)))
    }

    fn record_path(&self, layer_name: &str) -> PathBuf {
        self.base_path.join(format!("{}.layer.json", slug(layer_name)))
    }
}

#[async_trait]
impl LayerCatalog for FileCatalog {
    async fn add_layer(&self, record: LoadableLayerRecord) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_path).await?;

        let geojson_path = self.geojson_path(&record.name);
        let document = serde_json::to_vec_pretty(record.payload.as_json())?;
        tokio::fs::write(&geojson_path, document).await?;

        let record_json = serde_json::to_vec_pretty(&record)?;
        tokio::fs::write(self.record_path(&record.name), record_json).await?;

        tracing::info!("📁 Layer '{}' saved to: {}", record.name, geojson_path.display());
        Ok(())
    }
}

fn slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if slug.is_empty() {
        "layer".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{LayerKind, QueryResult};
    use tempfile::TempDir;

    fn record(name: &str) -> LoadableLayerRecord {
        LoadableLayerRecord {
            name: name.to_string(),
            kind: LayerKind::Geojson,
            payload: QueryResult(serde_json::json!({"type": "FeatureCollection", "features": []})),
            enabled: true,
        }
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Filtered Data"), "filtered_data");
        assert_eq!(slug("  "), "layer");
    }

    #[tokio::test]
    async fn test_memory_catalog_keeps_order() {
        let catalog = MemoryCatalog::new();
        catalog.add_layer(record("a")).await.unwrap();
        catalog.add_layer(record("b")).await.unwrap();

        let names: Vec<String> = catalog.layers().await.into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_file_catalog_writes_documents() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = FileCatalog::new(temp_dir.path().join("layers"));

        catalog.add_layer(record("Filtered Data")).await.unwrap();

        let geojson = std::fs::read(temp_dir.path().join("layers/filtered_data.geojson")).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&geojson).unwrap();
        assert_eq!(value["type"], "FeatureCollection");

        let layer = std::fs::read(temp_dir.path().join("layers/filtered_data.layer.json")).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&layer).unwrap();
        assert_eq!(value["kind"], "geojson");
        assert_eq!(value["enabled"], true);
    }
}
