use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::assessment::enricher::Recommendation;
use crate::assessment::trait_scorer::TraitScores;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PersonalityReportRow {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub user_id: Uuid,
    pub big_five_scores: Json<TraitScores>,
    pub inferred_holland_codes: Vec<String>,
    pub recommendations: Json<Vec<Recommendation>>,
    pub ai_service_used: bool,
    pub created_at: DateTime<Utc>,
}
