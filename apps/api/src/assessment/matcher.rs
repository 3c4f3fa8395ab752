//! Career Matcher — ranks catalog careers by their overlap with the classified interest codes.
//!
//! compatibility = Σ weight of the career's tags whose category was classified.
//! Ranking is a stable descending sort, so ties keep catalog order.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::assessment::interest::InterestCategory;
use crate::assessment::AssessmentError;
use crate::careers::catalog::CareerCatalog;
use crate::models::career::{CareerRecord, InterestTag};

pub const DEFAULT_MATCH_LIMIT: usize = 10;

/// A catalog career together with the tags that earned its compatibility score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCareer {
    pub record: CareerRecord,
    pub compatibility_score: f64,
    pub matched_tags: Vec<InterestTag>,
}

/// Queries the catalog and returns at most `limit` ranked careers.
///
/// An empty category set short-circuits to an empty list: no career can match it.
/// Catalog failures propagate as `CatalogUnavailable`.
pub async fn match_careers(
    catalog: &dyn CareerCatalog,
    categories: &[InterestCategory],
    limit: usize,
) -> Result<Vec<RankedCareer>, AssessmentError> {
    if categories.is_empty() || limit == 0 {
        return Ok(vec![]);
    }

    let records = catalog.find_by_categories(categories).await?;
    let ranked = rank_candidates(records, categories, limit);

    debug!(
        "Ranked {} careers for {:?} (limit {limit})",
        ranked.len(),
        categories
    );
    Ok(ranked)
}

/// Scores, deduplicates, sorts and truncates catalog records.
pub fn rank_candidates(
    records: Vec<CareerRecord>,
    categories: &[InterestCategory],
    limit: usize,
) -> Vec<RankedCareer> {
    let mut seen = HashSet::new();

    let mut ranked: Vec<RankedCareer> = records
        .into_iter()
        .filter(|record| seen.insert(record.id))
        .filter_map(|record| {
            let matched_tags: Vec<InterestTag> = record
                .interest_tags
                .iter()
                .filter(|tag| categories.contains(&tag.category))
                .cloned()
                .collect();

            if matched_tags.is_empty() {
                return None;
            }

            let compatibility_score = matched_tags.iter().map(|tag| tag.weight).sum();
            Some(RankedCareer {
                record,
                compatibility_score,
                matched_tags,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.compatibility_score.total_cmp(&a.compatibility_score));
    ranked.truncate(limit);
    ranked
}
