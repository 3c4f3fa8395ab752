//! Career catalog — read access to the `careers` table.
//!
//! The recommendation pipeline depends on the `CareerCatalog` trait only, so it can
//! run against an in-memory catalog in tests. `PgCareerCatalog` is the production backend.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::assessment::interest::InterestCategory;
use crate::models::career::{CareerRecord, CareerRow};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog query failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read-only query interface over the career catalog.
///
/// Carried by the assessment pipeline as `Arc<dyn CareerCatalog>`.
#[async_trait]
pub trait CareerCatalog: Send + Sync {
    /// Returns every career with at least one interest tag in `categories`,
    /// in catalog order.
    async fn find_by_categories(
        &self,
        categories: &[InterestCategory],
    ) -> Result<Vec<CareerRecord>, CatalogError>;
}

pub struct PgCareerCatalog {
    pool: PgPool,
}

impl PgCareerCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CareerCatalog for PgCareerCatalog {
    async fn find_by_categories(
        &self,
        categories: &[InterestCategory],
    ) -> Result<Vec<CareerRecord>, CatalogError> {
        let labels: Vec<String> = categories.iter().map(|c| c.as_str().to_string()).collect();

        let rows = sqlx::query_as::<_, CareerRow>(
            r#"
            SELECT id, title, description, core_skills, salary_min, salary_max,
                   interest_tags
            FROM careers
            WHERE EXISTS (
                SELECT 1 FROM jsonb_array_elements(interest_tags) AS tag
                WHERE tag->>'category' = ANY($1)
            )
            ORDER BY created_at, id
            "#,
        )
        .bind(&labels)
        .fetch_all(&self.pool)
        .await?;

        debug!("Catalog returned {} careers for {:?}", rows.len(), labels);

        Ok(rows.into_iter().map(CareerRecord::from).collect())
    }
}

/// Fetches a single career by id.
pub async fn get_career(pool: &PgPool, career_id: Uuid) -> Result<Option<CareerRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, CareerRow>(
        r#"
        SELECT id, title, description, core_skills, salary_min, salary_max,
               interest_tags
        FROM careers
        WHERE id = $1
        "#,
    )
    .bind(career_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(CareerRecord::from))
}
