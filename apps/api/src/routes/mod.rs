pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::careers::handlers as careers;
use crate::roadmaps::handlers as roadmaps;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Quiz + report API
        .route(
            "/api/v1/quiz/questions",
            get(assessment::handle_list_questions),
        )
        .route("/api/v1/quiz/submit", post(assessment::handle_submit_quiz))
        .route(
            "/api/v1/report/latest",
            get(assessment::handle_latest_report),
        )
        // Career catalog
        .route(
            "/api/v1/careers/:career_id/roadmap",
            get(careers::handle_career_roadmap),
        )
        // Saved roadmaps
        .route(
            "/api/v1/roadmaps",
            post(roadmaps::handle_create_roadmap).get(roadmaps::handle_list_roadmaps),
        )
        .route(
            "/api/v1/roadmaps/:id",
            get(roadmaps::handle_get_roadmap).delete(roadmaps::handle_delete_roadmap),
        )
        .with_state(state)
}
