//! Axum route handlers for the quiz and report APIs.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::assessment::enricher::Recommendation;
use crate::assessment::interest::InterestCategory;
use crate::assessment::questionnaire::{Question, QUESTIONS};
use crate::assessment::store::{latest_report, persist_assessment};
use crate::assessment::trait_scorer::{Answer, TraitScores};
use crate::errors::AppError;
use crate::models::report::PersonalityReportRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub user_id: Uuid,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub submission_id: Uuid,
    pub report_id: Uuid,
    pub big_five_scores: TraitScores,
    pub holland_codes: Vec<InterestCategory>,
    pub recommendations: Vec<Recommendation>,
    pub ai_service_used: bool,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: &'static [Question],
}

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report_id: Uuid,
    pub submission_id: Uuid,
    pub big_five_scores: TraitScores,
    pub holland_codes: Vec<InterestCategory>,
    pub recommendations: Vec<Recommendation>,
    pub ai_service_used: bool,
    pub generated_at: DateTime<Utc>,
}

impl From<PersonalityReportRow> for ReportResponse {
    fn from(report: PersonalityReportRow) -> Self {
        let holland_codes = report
            .inferred_holland_codes
            .iter()
            .filter_map(|code| match code.parse::<InterestCategory>() {
                Ok(category) => Some(category),
                Err(e) => {
                    warn!("Skipping stored interest code for report {}: {e}", report.id);
                    None
                }
            })
            .collect();

        Self {
            report_id: report.id,
            submission_id: report.submission_id,
            big_five_scores: report.big_five_scores.0,
            holland_codes,
            recommendations: report.recommendations.0,
            ai_service_used: report.ai_service_used,
            generated_at: report.created_at,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/quiz/questions
pub async fn handle_list_questions() -> Json<QuestionsResponse> {
    Json(QuestionsResponse {
        questions: &QUESTIONS,
    })
}

/// POST /api/v1/quiz/submit
///
/// Runs the assessment pipeline, then stores the submission and its report.
/// Nothing is stored when the answers are invalid or the catalog is unreachable.
pub async fn handle_submit_quiz(
    State(state): State<AppState>,
    Json(request): Json<SubmitQuizRequest>,
) -> Result<(StatusCode, Json<SubmitQuizResponse>), AppError> {
    let outcome = state.assessment.submit(&request.answers).await?;

    let persisted =
        persist_assessment(&state.db, request.user_id, &request.answers, &outcome).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitQuizResponse {
            submission_id: persisted.submission_id,
            report_id: persisted.report_id,
            big_five_scores: outcome.big_five_scores,
            holland_codes: outcome.holland_codes,
            recommendations: outcome.recommendations,
            ai_service_used: outcome.ai_service_used,
        }),
    ))
}

/// GET /api/v1/report/latest
pub async fn handle_latest_report(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ReportResponse>, AppError> {
    let report = latest_report(&state.db, params.user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No personality report found for user {}",
                params.user_id
            ))
        })?;

    Ok(Json(ReportResponse::from(report)))
}

#[cfg(test)]
mod tests {
    use sqlx::types::Json as DbJson;

    use super::*;

    #[test]
    fn test_report_response_uses_submit_field_names() {
        let report = PersonalityReportRow {
            id: Uuid::new_v4(),
            submission_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            big_five_scores: DbJson(TraitScores {
                openness: 0.4,
                conscientiousness: 0.5,
                extraversion: 0.5,
                agreeableness: 0.6,
                neuroticism: 0.5,
            }),
            inferred_holland_codes: vec![
                "Social".to_string(),
                "Culinary".to_string(),
                "Investigative".to_string(),
            ],
            recommendations: DbJson(vec![]),
            ai_service_used: false,
            created_at: Utc::now(),
        };

        let response = ReportResponse::from(report);
        assert_eq!(
            response.holland_codes,
            vec![InterestCategory::Social, InterestCategory::Investigative]
        );

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["holland_codes"], serde_json::json!(["Social", "Investigative"]));
        assert!(body.get("inferred_holland_codes").is_none());
    }
}
