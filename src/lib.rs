pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::ServiceConfig;

pub use adapters::catalog::{FileCatalog, MemoryCatalog};
pub use adapters::drawing::HeadlessDrawingSession;
pub use core::adapter::ResultAdapter;
pub use core::controller::{AoiQueryController, QueryOutcome};
pub use core::executor::WfsExecutor;
pub use core::filter_state::FilterStateStore;
pub use core::query_builder::QueryBuilder;
pub use core::reducer::GeometryReducer;
pub use domain::model::{
    BoundingBox, Cartesian3, CoordField, LayerKind, LoadableLayerRecord, Point2D, Product,
    QueryResult, RequestToken, SpatialQuery,
};
pub use utils::error::{AoiError, QueryExecutionError, Result, ValidationError};
