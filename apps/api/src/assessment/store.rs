//! Report store — persists quiz submissions and the personality reports derived from them.

use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::assessment::pipeline::AssessmentOutcome;
use crate::assessment::trait_scorer::Answer;
use crate::models::report::PersonalityReportRow;

pub struct PersistedAssessment {
    pub submission_id: Uuid,
    pub report_id: Uuid,
}

/// Stores the submission and its report in one transaction.
pub async fn persist_assessment(
    pool: &PgPool,
    user_id: Uuid,
    answers: &[Answer],
    outcome: &AssessmentOutcome,
) -> Result<PersistedAssessment, sqlx::Error> {
    let submission_id = Uuid::new_v4();
    let report_id = Uuid::new_v4();
    let holland_codes: Vec<String> = outcome
        .holland_codes
        .iter()
        .map(|c| c.as_str().to_string())
        .collect();

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO quiz_submissions (id, user_id, answers)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(submission_id)
    .bind(user_id)
    .bind(Json(answers))
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO personality_reports
            (id, submission_id, user_id, big_five_scores, inferred_holland_codes,
             recommendations, ai_service_used)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(report_id)
    .bind(submission_id)
    .bind(user_id)
    .bind(Json(&outcome.big_five_scores))
    .bind(&holland_codes)
    .bind(Json(&outcome.recommendations))
    .bind(outcome.ai_service_used)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "Stored submission {} and report {} for user {} (ai_service_used={})",
        submission_id, report_id, user_id, outcome.ai_service_used
    );

    Ok(PersistedAssessment {
        submission_id,
        report_id,
    })
}

/// Returns the user's most recent report, if any.
pub async fn latest_report(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<PersonalityReportRow>, sqlx::Error> {
    sqlx::query_as::<_, PersonalityReportRow>(
        r#"
        SELECT id, submission_id, user_id, big_five_scores, inferred_holland_codes,
               recommendations, ai_service_used, created_at
        FROM personality_reports
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
