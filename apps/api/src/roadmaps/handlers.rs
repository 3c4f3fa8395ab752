//! Axum route handlers for saved roadmaps. Every query is scoped to `user_id`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::roadmap::RoadmapRow;
use crate::state::AppState;

const MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct CreateRoadmapRequest {
    pub user_id: Uuid,
    pub title: String,
    pub content: Value,
}

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// Trims the title and rejects empty or oversized titles and null content.
fn validate_roadmap(request: &CreateRoadmapRequest) -> Result<String, AppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::Validation(format!(
            "title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }
    if request.content.is_null() {
        return Err(AppError::Validation("content is required".to_string()));
    }
    Ok(title.to_string())
}

/// POST /api/v1/roadmaps
pub async fn handle_create_roadmap(
    State(state): State<AppState>,
    Json(request): Json<CreateRoadmapRequest>,
) -> Result<(StatusCode, Json<RoadmapRow>), AppError> {
    let title = validate_roadmap(&request)?;

    let roadmap = sqlx::query_as::<_, RoadmapRow>(
        r#"
        INSERT INTO roadmaps (id, user_id, title, content)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, title, content, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.user_id)
    .bind(&title)
    .bind(&request.content)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(roadmap)))
}

/// GET /api/v1/roadmaps
pub async fn handle_list_roadmaps(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<RoadmapRow>>, AppError> {
    let roadmaps = sqlx::query_as::<_, RoadmapRow>(
        r#"
        SELECT id, user_id, title, content, created_at, updated_at
        FROM roadmaps
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(params.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(roadmaps))
}

/// GET /api/v1/roadmaps/:id
pub async fn handle_get_roadmap(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<RoadmapRow>, AppError> {
    let roadmap = sqlx::query_as::<_, RoadmapRow>(
        r#"
        SELECT id, user_id, title, content, created_at, updated_at
        FROM roadmaps
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(params.user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Roadmap {id} not found")))?;

    Ok(Json(roadmap))
}

/// DELETE /api/v1/roadmaps/:id
pub async fn handle_delete_roadmap(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM roadmaps WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(params.user_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Roadmap {id} not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}
