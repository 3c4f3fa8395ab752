use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::careers::catalog::get_career;
use crate::errors::AppError;
use crate::models::career::{InterestTag, SalaryRange};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CareerDetailResponse {
    pub career_id: Uuid,
    pub title: String,
    pub description: String,
    pub core_skills: Vec<String>,
    pub average_salary: Option<SalaryRange>,
    pub interest_tags: Vec<InterestTag>,
}

/// GET /api/v1/careers/:career_id/roadmap
pub async fn handle_career_roadmap(
    State(state): State<AppState>,
    Path(career_id): Path<Uuid>,
) -> Result<Json<CareerDetailResponse>, AppError> {
    let career = get_career(&state.db, career_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Career {career_id} not found")))?;

    Ok(Json(CareerDetailResponse {
        career_id: career.id,
        title: career.title,
        description: career.description,
        core_skills: career.core_skills,
        average_salary: career.average_salary,
        interest_tags: career.interest_tags,
    }))
}
