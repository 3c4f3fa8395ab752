//! Catalog seeding — replaces the `careers` table with the contents of a JSON file.
//!
//! Entries either carry explicit `interest_tags` or an ordered `interest_ranking`
//! (strongest interest first), which is converted to weights 100, 80, 60, 40, 20, 10.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::assessment::interest::InterestCategory;
use crate::models::career::{InterestTag, SalaryRange};

const MAX_TAG_WEIGHT: f64 = 100.0;
const MIN_RANKED_WEIGHT: f64 = 10.0;
const RANK_STEP: f64 = 20.0;

#[derive(Debug, Clone, Deserialize)]
pub struct CareerSeed {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub core_skills: Vec<String>,
    #[serde(default)]
    pub average_salary: Option<SalaryRange>,
    #[serde(default)]
    pub interest_tags: Vec<InterestTag>,
    #[serde(default)]
    pub interest_ranking: Vec<InterestCategory>,
}

/// Weight for the interest at position `rank` (0 = strongest).
pub fn rank_weight(rank: usize) -> f64 {
    (MAX_TAG_WEIGHT - RANK_STEP * rank as f64).max(MIN_RANKED_WEIGHT)
}

impl CareerSeed {
    /// Explicit tags win; otherwise the ranking is converted, skipping repeats.
    pub fn resolved_tags(&self) -> Vec<InterestTag> {
        if !self.interest_tags.is_empty() {
            return self.interest_tags.clone();
        }

        let mut tags: Vec<InterestTag> = Vec::with_capacity(self.interest_ranking.len());
        for &category in &self.interest_ranking {
            if tags.iter().any(|t| t.category == category) {
                continue;
            }
            tags.push(InterestTag {
                category,
                weight: rank_weight(tags.len()),
            });
        }
        tags
    }
}

/// Parses and validates a seed document.
pub fn parse_seed(contents: &str) -> Result<Vec<CareerSeed>> {
    let seeds: Vec<CareerSeed> =
        serde_json::from_str(contents).context("Career seed file is not a valid JSON array")?;

    for (i, seed) in seeds.iter().enumerate() {
        if seed.title.trim().is_empty() {
            bail!("Career seed #{i} has an empty title");
        }
        if let Some(tag) = seed
            .interest_tags
            .iter()
            .find(|t| !(0.0..=MAX_TAG_WEIGHT).contains(&t.weight))
        {
            bail!(
                "Career seed '{}' has {} weight {} outside 0..=100",
                seed.title,
                tag.category,
                tag.weight
            );
        }
        if let Some(salary) = seed.average_salary {
            if salary.min > salary.max {
                bail!("Career seed '{}' has salary min above max", seed.title);
            }
        }
    }

    Ok(seeds)
}

pub async fn load_seed_file(path: &Path) -> Result<Vec<CareerSeed>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read career seed file {}", path.display()))?;
    parse_seed(&contents)
}

/// Replaces the whole catalog in one transaction. Returns the number of careers stored.
pub async fn replace_catalog(pool: &PgPool, seeds: &[CareerSeed]) -> Result<usize> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM careers").execute(&mut *tx).await?;

    // Catalog order is (created_at, id); stagger timestamps to keep file order.
    let base = Utc::now();
    for (i, seed) in seeds.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO careers
                (id, title, description, core_skills, salary_min, salary_max, interest_tags,
                 created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(seed.title.trim())
        .bind(&seed.description)
        .bind(&seed.core_skills)
        .bind(seed.average_salary.map(|s| s.min))
        .bind(seed.average_salary.map(|s| s.max))
        .bind(Json(seed.resolved_tags()))
        .bind(base + Duration::milliseconds(i as i64))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!("Career catalog replaced with {} entries", seeds.len());
    Ok(seeds.len())
}
