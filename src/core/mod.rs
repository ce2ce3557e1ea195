pub mod adapter;
pub mod controller;
pub mod executor;
pub mod filter_state;
pub mod query_builder;
pub mod reducer;

pub use crate::domain::model::{BoundingBox, LoadableLayerRecord, Point2D, QueryResult, SpatialQuery};
pub use crate::domain::ports::{ConfigProvider, DrawingSession, FeatureService, LayerCatalog};
pub use crate::utils::error::Result;
