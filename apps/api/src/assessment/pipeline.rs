//! Assessment pipeline — orchestrates one quiz submission end to end.
//!
//! Flow: score answers → classify interests → match careers → enrich → outcome.
//!
//! The pipeline does not persist anything; the quiz handler stores the outcome.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::assessment::enricher::{Recommendation, RecommendationEnricher};
use crate::assessment::interest::{classify, InterestCategory};
use crate::assessment::matcher::match_careers;
use crate::assessment::trait_scorer::{score, Answer, TraitScores};
use crate::assessment::AssessmentError;
use crate::careers::catalog::CareerCatalog;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentOutcome {
    pub big_five_scores: TraitScores,
    pub holland_codes: Vec<InterestCategory>,
    pub recommendations: Vec<Recommendation>,
    pub ai_service_used: bool,
}

pub struct AssessmentPipeline {
    catalog: Arc<dyn CareerCatalog>,
    enricher: RecommendationEnricher,
    match_limit: usize,
}

impl AssessmentPipeline {
    pub fn new(
        catalog: Arc<dyn CareerCatalog>,
        enricher: RecommendationEnricher,
        match_limit: usize,
    ) -> Self {
        Self {
            catalog,
            enricher,
            match_limit,
        }
    }

    pub fn enrichment_configured(&self) -> bool {
        self.enricher.is_configured()
    }

    /// Runs the full pipeline for one answer set.
    ///
    /// Errors: `InvalidInput` for a malformed answer set, `CatalogUnavailable`
    /// when the catalog read fails. Enrichment failures are absorbed.
    pub async fn submit(&self, answers: &[Answer]) -> Result<AssessmentOutcome, AssessmentError> {
        let big_five_scores = score(answers)?;

        let holland_codes = classify(&big_five_scores);
        info!("Classified interest codes: {:?}", holland_codes);

        let candidates =
            match_careers(self.catalog.as_ref(), &holland_codes, self.match_limit).await?;
        info!("Matched {} candidate careers", candidates.len());

        let enrichment = self.enricher.enrich(&big_five_scores, &candidates).await;

        Ok(AssessmentOutcome {
            big_five_scores,
            holland_codes,
            recommendations: enrichment.recommendations,
            ai_service_used: enrichment.ai_service_used,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::assessment::enricher::fallback_recommendations;
    use crate::assessment::enricher::tests::ScriptedGenerator;
    use crate::assessment::matcher::rank_candidates;
    use crate::assessment::matcher::tests::{career, InMemoryCatalog, UnavailableCatalog};
    use crate::assessment::trait_scorer::tests::uniform_answers;
    use crate::models::career::CareerRecord;

    pub(crate) fn sample_catalog() -> Vec<CareerRecord> {
        vec![
            career("Counselor", &[(InterestCategory::Social, 100.0)]),
            career(
                "Data Scientist",
                &[
                    (InterestCategory::Investigative, 100.0),
                    (InterestCategory::Conventional, 60.0),
                ],
            ),
            career(
                "Teacher",
                &[
                    (InterestCategory::Social, 80.0),
                    (InterestCategory::Investigative, 40.0),
                ],
            ),
            career("Electrician", &[(InterestCategory::Realistic, 100.0)]),
        ]
    }

    #[tokio::test]
    async fn test_default_codes_feed_fallback_ranking() {
        let catalog = Arc::new(InMemoryCatalog::new(sample_catalog()));
        let pipeline =
            AssessmentPipeline::new(catalog.clone(), RecommendationEnricher::new(None), 10);

        let outcome = pipeline.submit(&uniform_answers(2)).await.unwrap();

        assert_eq!(outcome.big_five_scores.openness, 0.4);
        assert_eq!(
            outcome.holland_codes,
            vec![InterestCategory::Social, InterestCategory::Investigative]
        );
        assert!(!outcome.ai_service_used);

        let titles: Vec<&str> = outcome
            .recommendations
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Teacher", "Counselor", "Data Scientist"]);
        assert_eq!(outcome.recommendations[0].compatibility_score, 120.0);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_threes_match_every_tagged_career() {
        let pipeline = AssessmentPipeline::new(
            Arc::new(InMemoryCatalog::new(sample_catalog())),
            RecommendationEnricher::new(None),
            10,
        );

        let outcome = pipeline.submit(&uniform_answers(3)).await.unwrap();

        assert_eq!(outcome.big_five_scores.neuroticism, 0.6);
        assert_eq!(
            outcome.holland_codes,
            vec![
                InterestCategory::Social,
                InterestCategory::Enterprising,
                InterestCategory::Investigative,
                InterestCategory::Artistic,
                InterestCategory::Realistic,
            ]
        );

        let ranked: Vec<(&str, f64)> = outcome
            .recommendations
            .iter()
            .map(|r| (r.title.as_str(), r.compatibility_score))
            .collect();
        // Conventional is not among the codes, so Data Scientist keeps only its Investigative weight
        assert_eq!(
            ranked,
            vec![
                ("Teacher", 120.0),
                ("Counselor", 100.0),
                ("Data Scientist", 100.0),
                ("Electrician", 100.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_generator_failure_equals_deterministic_fallback() {
        let records = sample_catalog();
        let pipeline = AssessmentPipeline::new(
            Arc::new(InMemoryCatalog::new(records.clone())),
            RecommendationEnricher::new(Some(Arc::new(ScriptedGenerator::failing(500)))),
            10,
        );

        let outcome = pipeline.submit(&uniform_answers(2)).await.unwrap();

        let expected = fallback_recommendations(&rank_candidates(
            records,
            &[InterestCategory::Social, InterestCategory::Investigative],
            10,
        ));
        assert!(!outcome.ai_service_used);
        assert_eq!(outcome.recommendations, expected);
    }

    #[tokio::test]
    async fn test_generator_success_marks_ai_used() {
        let pipeline = AssessmentPipeline::new(
            Arc::new(InMemoryCatalog::new(sample_catalog())),
            RecommendationEnricher::new(Some(Arc::new(ScriptedGenerator::replying(
                r#"[{"title": "Counselor", "reason": "You listen well", "skillGaps": ["Licensure"]}]"#,
            )))),
            10,
        );

        let outcome = pipeline.submit(&uniform_answers(3)).await.unwrap();

        assert!(outcome.ai_service_used);
        assert_eq!(outcome.recommendations.len(), 1);
        assert_eq!(outcome.recommendations[0].reason, "You listen well");
    }

    #[tokio::test]
    async fn test_match_limit_is_applied() {
        let pipeline = AssessmentPipeline::new(
            Arc::new(InMemoryCatalog::new(sample_catalog())),
            RecommendationEnricher::new(None),
            2,
        );
        let outcome = pipeline.submit(&uniform_answers(3)).await.unwrap();
        assert_eq!(outcome.recommendations.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_catalog_gives_empty_recommendations() {
        let pipeline = AssessmentPipeline::new(
            Arc::new(InMemoryCatalog::new(vec![])),
            RecommendationEnricher::new(Some(Arc::new(ScriptedGenerator::replying("[]")))),
            10,
        );
        let outcome = pipeline.submit(&uniform_answers(3)).await.unwrap();
        assert!(outcome.recommendations.is_empty());
        assert!(!outcome.ai_service_used);
    }

    #[tokio::test]
    async fn test_invalid_answers_never_reach_catalog() {
        let catalog = Arc::new(InMemoryCatalog::new(sample_catalog()));
        let pipeline =
            AssessmentPipeline::new(catalog.clone(), RecommendationEnricher::new(None), 10);

        let err = pipeline.submit(&uniform_answers(3)[..19]).await.unwrap_err();

        assert!(matches!(err, AssessmentError::InvalidInput(_)));
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_catalog_failure_is_surfaced() {
        let pipeline = AssessmentPipeline::new(
            Arc::new(UnavailableCatalog),
            RecommendationEnricher::new(None),
            10,
        );
        let err = pipeline.submit(&uniform_answers(3)).await.unwrap_err();
        assert!(matches!(err, AssessmentError::CatalogUnavailable(_)));
    }
}
