use crate::core::adapter::ResultAdapter;
use crate::core::filter_state::FilterStateStore;
use crate::core::query_builder::QueryBuilder;
use crate::core::reducer::GeometryReducer;
use crate::domain::model::{
    BoundingBox, Cartesian3, CoordField, LoadableLayerRecord, Point2D, Product, RequestToken,
};
use crate::domain::ports::{ConfigProvider, DrawingSession, FeatureService, LayerCatalog};
use crate::utils::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The result was handed to the catalog.
    Loaded {
        token: RequestToken,
        record: LoadableLayerRecord,
    },
    /// A newer query was dispatched before this one completed; its result was dropped.
    Stale {
        token: RequestToken,
        latest: RequestToken,
    },
}

/// Ties the filter form, the drawing tool and the feature service together.
///
/// Every method takes `&self`, so a query can be awaited while the form keeps
/// being edited. Locks are never held across an `.await`.
pub struct AoiQueryController<F, C, D>
where
    F: FeatureService,
    C: LayerCatalog,
    D: DrawingSession,
{
    state: Mutex<FilterStateStore>,
    drawing: Mutex<D>,
    reducer: GeometryReducer,
    builder: QueryBuilder,
    adapter: ResultAdapter,
    service: F,
    catalog: C,
    endpoint: String,
    latest: AtomicU64,
}

impl<F, C, D> AoiQueryController<F, C, D>
where
    F: FeatureService,
    C: LayerCatalog,
    D: DrawingSession,
{
    pub fn new<P: ConfigProvider>(service: F, catalog: C, drawing: D, config: &P) -> Self {
        Self {
            state: Mutex::new(FilterStateStore::new()),
            drawing: Mutex::new(drawing),
            reducer: GeometryReducer::new(),
            builder: QueryBuilder::new(),
            adapter: ResultAdapter::new(config.layer_name()),
            service,
            catalog,
            endpoint: config.service_endpoint().to_string(),
            latest: AtomicU64::new(0),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, FilterStateStore> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_drawing(&self) -> MutexGuard<'_, D> {
        self.drawing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_field(&self, field: CoordField, value: impl Into<String>) {
        self.lock_state().set_field(field, value);
    }

    pub fn set_product(&self, product: Product, selected: bool) {
        self.lock_state().set_product(product, selected);
    }

    pub fn set_product_id(&self, id: &str, selected: bool) -> Result<()> {
        self.lock_state().set_product_id(id, selected)
    }

    /// Copy of the current form state.
    pub fn snapshot(&self) -> FilterStateStore {
        self.lock_state().clone()
    }

    pub fn latest_token(&self) -> RequestToken {
        RequestToken(self.latest.load(Ordering::SeqCst))
    }

    /// Starts the drawing tool. The returned guard ends it when dropped.
    pub fn begin_drawing(&self) -> DrawingGuard<'_, F, C, D> {
        self.lock_drawing().start();
        tracing::debug!("Drawing session started");
        DrawingGuard { controller: self }
    }

    pub fn end_drawing(&self) {
        let mut drawing = self.lock_drawing();
        if drawing.is_active() {
            drawing.end();
            tracing::debug!("Drawing session ended");
        }
    }

    /// Point added or moved. Once the polygon has three vertices its extent
    /// replaces the AOI fields and the drawing session is ended.
    pub fn on_points_changed(&self, points: &[Point2D]) -> Option<BoundingBox> {
        let bbox = self.reducer.reduce(points)?;
        self.accept_drawn_box(&bbox);
        Some(bbox)
    }

    /// Same as [`on_points_changed`](Self::on_points_changed) for raw globe positions.
    pub fn on_positions_changed(&self, positions: &[Cartesian3]) -> Option<BoundingBox> {
        let bbox = self.reducer.reduce_cartesian(positions)?;
        self.accept_drawn_box(&bbox);
        Some(bbox)
    }

    /// The user closed the polygon. Whatever box the points produced stays.
    pub fn on_drawing_complete(&self) {
        tracing::debug!("Drawing completed");
        self.end_drawing();
    }

    pub fn on_clean_up(&self) {
        self.end_drawing();
    }

    fn accept_drawn_box(&self, bbox: &BoundingBox) {
        self.lock_state().apply_bounding_box(bbox);
        self.end_drawing();
    }

    /// Builds, sends and loads one query.
    ///
    /// Validation failures return before any request is made. A result that
    /// arrives after a newer query was dispatched is discarded.
    pub async fn run_query(&self) -> Result<QueryOutcome> {
        let built = {
            let state = self.lock_state();
            if state.bounding_box().is_some_and(|b| b.crosses_antimeridian()) {
                tracing::warn!("AOI has left > right; it is sent as-is without wrapping");
            }
            self.builder.build(&state)
        };
        let query = match built {
            Ok(query) => query,
            Err(e) => {
                tracing::warn!("Query not sent: {}", e);
                return Err(e.into());
            }
        };

        let token = RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
        tracing::info!(
            "📡 Query {}: {} against {}",
            token,
            query.type_name_list(),
            self.endpoint
        );

        let result = match self.service.execute(&query, &self.endpoint).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("❌ Query {} failed: {}", token, e);
                return Err(e.into());
            }
        };

        let latest = self.latest_token();
        if latest != token {
            tracing::warn!(
                "Discarding result of query {}; query {} is newer",
                token,
                latest
            );
            return Ok(QueryOutcome::Stale { token, latest });
        }

        if let Some(count) = result.feature_count() {
            tracing::info!("✅ Query {} returned {} feature(s)", token, count);
        }
        let record = self.adapter.adapt(result);
        self.catalog.add_layer(record.clone()).await?;

        Ok(QueryOutcome::Loaded { token, record })
    }
}

/// Scoped drawing session. Ends the session on drop if it is still active.
pub struct DrawingGuard<'a, F, C, D>
where
    F: FeatureService,
    C: LayerCatalog,
    D: DrawingSession,
{
    controller: &'a AoiQueryController<F, C, D>,
}

impl<F, C, D> DrawingGuard<'_, F, C, D>
where
    F: FeatureService,
    C: LayerCatalog,
    D: DrawingSession,
{
    pub fn points_changed(&self, points: &[Point2D]) -> Option<BoundingBox> {
        self.controller.on_points_changed(points)
    }

    pub fn positions_changed(&self, positions: &[Cartesian3]) -> Option<BoundingBox> {
        self.controller.on_positions_changed(positions)
    }

    /// Ends the session now instead of on drop.
    pub fn complete(self) {
        self.controller.on_drawing_complete();
    }
}

impl<F, C, D> Drop for DrawingGuard<'_, F, C, D>
where
    F: FeatureService,
    C: LayerCatalog,
    D: DrawingSession,
{
    fn drop(&mut self) {
        self.controller.end_drawing();
    }
}
