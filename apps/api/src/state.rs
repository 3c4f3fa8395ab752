use std::sync::Arc;

use sqlx::PgPool;

use crate::assessment::pipeline::AssessmentPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Scoring, matching and enrichment for quiz submissions. Catalog reads go through its own handle on `db`.
    pub assessment: Arc<AssessmentPipeline>,
}
