// Assessment: questionnaire → trait scores → interest codes → career matches → recommendations.
// All text-generation calls go through llm_client; catalog reads go through careers::catalog.

pub mod enricher;
pub mod handlers;
pub mod interest;
pub mod matcher;
pub mod pipeline;
pub mod prompts;
pub mod questionnaire;
pub mod store;
pub mod trait_scorer;

use thiserror::Error;

use crate::careers::catalog::CatalogError;

/// Errors the assessment pipeline surfaces to its caller.
/// Enrichment failures never appear here; they downgrade to the fallback path.
#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("Invalid answers: {0}")]
    InvalidInput(String),

    #[error("Career catalog unavailable: {0}")]
    CatalogUnavailable(#[from] CatalogError),
}
