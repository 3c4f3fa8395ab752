//! Recommendation Enricher — refines ranked careers through the text generator,
//! falling back to a deterministic list built from the ranking itself.
//!
//! Exactly one generator call per enrichment. Any failure on that path
//! (unconfigured, transport, empty reply, unparseable reply) is logged and
//! replaced by `fallback_recommendations`; it never reaches the caller.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::assessment::matcher::RankedCareer;
use crate::assessment::prompts::ENRICHMENT_PROMPT_TEMPLATE;
use crate::assessment::trait_scorer::TraitScores;
use crate::llm_client::prompts::JSON_ARRAY_ONLY;
use crate::llm_client::{LlmError, TextGenerator};

/// Number of core skills reported as gaps on the fallback path.
const FALLBACK_SKILL_GAPS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub career_id: Uuid,
    pub title: String,
    pub reason: String,
    pub skill_gaps: Vec<String>,
    pub compatibility_score: f64,
}

/// Result of an enrichment, with provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub recommendations: Vec<Recommendation>,
    pub ai_service_used: bool,
}

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("text generation service is not configured")]
    Unconfigured,

    #[error("text generation failed: {0}")]
    Service(#[from] LlmError),

    #[error("could not parse a recommendation list: {0}")]
    Parse(String),

    #[error("no suggested career matched a candidate")]
    NoMatchingSuggestions,
}

/// One entry of the generator's JSON reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuggestedCareer {
    #[serde(default, rename = "careerId", alias = "career_id")]
    pub career_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    #[serde(
        default,
        rename = "skillGaps",
        alias = "skill_gaps",
        deserialize_with = "null_as_default"
    )]
    pub skill_gaps: Vec<String>,
}

pub struct RecommendationEnricher {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl RecommendationEnricher {
    /// `None` means no generator is configured; every enrichment takes the fallback path.
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn enrich(&self, scores: &TraitScores, candidates: &[RankedCareer]) -> Enrichment {
        if candidates.is_empty() {
            return Enrichment {
                recommendations: vec![],
                ai_service_used: false,
            };
        }

        match self.try_enrich(scores, candidates).await {
            Ok(recommendations) => {
                info!(
                    "AI enrichment produced {} recommendations from {} candidates",
                    recommendations.len(),
                    candidates.len()
                );
                Enrichment {
                    recommendations,
                    ai_service_used: true,
                }
            }
            Err(e) => {
                warn!("AI enrichment failed, using fallback recommendations: {e}");
                Enrichment {
                    recommendations: fallback_recommendations(candidates),
                    ai_service_used: false,
                }
            }
        }
    }

    async fn try_enrich(
        &self,
        scores: &TraitScores,
        candidates: &[RankedCareer],
    ) -> Result<Vec<Recommendation>, EnrichmentError> {
        let generator = self
            .generator
            .as_ref()
            .ok_or(EnrichmentError::Unconfigured)?;

        let prompt = build_enrichment_prompt(scores, candidates);
        let text = generator.generate(&prompt).await?;
        let suggestions = try_parse_structured_list(&text)?;
        resolve_suggestions(suggestions, candidates)
    }
}

/// Fills the enrichment template with two-decimal scores and the candidate list.
pub fn build_enrichment_prompt(scores: &TraitScores, candidates: &[RankedCareer]) -> String {
    let candidate_lines = candidates
        .iter()
        .map(|c| format!("- {} [{}]", c.record.title, c.record.id))
        .collect::<Vec<_>>()
        .join("\n");

    ENRICHMENT_PROMPT_TEMPLATE
        .replace("{openness}", &format!("{:.2}", scores.openness))
        .replace("{conscientiousness}", &format!("{:.2}", scores.conscientiousness))
        .replace("{extraversion}", &format!("{:.2}", scores.extraversion))
        .replace("{agreeableness}", &format!("{:.2}", scores.agreeableness))
        .replace("{neuroticism}", &format!("{:.2}", scores.neuroticism))
        .replace("{candidates}", &candidate_lines)
        .replace("{output_instruction}", JSON_ARRAY_ONLY)
}

/// Best-effort extraction of a JSON array from free text.
///
/// Tries a ```json fenced block first, then the first complete array starting at a `[`
/// (text after it is ignored), then the whole text.
pub fn try_parse_structured_list(text: &str) -> Result<Vec<SuggestedCareer>, EnrichmentError> {
    if let Some(body) = fenced_json_block(text) {
        match serde_json::from_str::<Vec<SuggestedCareer>>(body) {
            Ok(suggestions) => return Ok(suggestions),
            Err(e) => debug!("Fenced JSON block did not parse, scanning for an array: {e}"),
        }
    }

    if let Some(suggestions) = first_array(text) {
        return Ok(suggestions);
    }

    serde_json::from_str::<Vec<SuggestedCareer>>(text.trim())
        .map_err(|e| EnrichmentError::Parse(e.to_string()))
}

fn fenced_json_block(text: &str) -> Option<&str> {
    const FENCE: &str = "```json";

    let start = text.find(FENCE)?;
    let body = &text[start + FENCE.len()..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Reads exactly one array value at each `[` in turn; the first that parses wins.
fn first_array(text: &str) -> Option<Vec<SuggestedCareer>> {
    text.match_indices('[').find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<Vec<SuggestedCareer>>()
            .next()
            .and_then(Result::ok)
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Maps suggestions onto candidates by `careerId`, else by case-insensitive title.
/// Suggestions naming no candidate are dropped; if none survive, the reply is unusable.
fn resolve_suggestions(
    suggestions: Vec<SuggestedCareer>,
    candidates: &[RankedCareer],
) -> Result<Vec<Recommendation>, EnrichmentError> {
    let mut used = HashSet::new();
    let mut recommendations = Vec::with_capacity(suggestions.len());

    for suggestion in suggestions {
        let by_id = suggestion
            .career_id
            .as_deref()
            .and_then(|id| Uuid::parse_str(id.trim()).ok())
            .and_then(|id| candidates.iter().find(|c| c.record.id == id));

        let by_title = || {
            let title = suggestion.title.as_deref()?.trim();
            candidates
                .iter()
                .find(|c| c.record.title.eq_ignore_ascii_case(title))
        };

        let Some(candidate) = by_id.or_else(by_title) else {
            warn!(
                "Dropping AI suggestion that matches no candidate: {:?}",
                suggestion.title.as_deref().or(suggestion.career_id.as_deref())
            );
            continue;
        };

        if !used.insert(candidate.record.id) {
            continue;
        }

        recommendations.push(Recommendation {
            career_id: candidate.record.id,
            title: candidate.record.title.clone(),
            reason: suggestion.reason,
            skill_gaps: suggestion.skill_gaps,
            compatibility_score: candidate.compatibility_score,
        });
    }

    if recommendations.is_empty() {
        return Err(EnrichmentError::NoMatchingSuggestions);
    }
    Ok(recommendations)
}

/// One recommendation per candidate, in rank order. Cannot fail.
pub fn fallback_recommendations(candidates: &[RankedCareer]) -> Vec<Recommendation> {
    candidates
        .iter()
        .map(|candidate| Recommendation {
            career_id: candidate.record.id,
            title: candidate.record.title.clone(),
            reason: fallback_reason(candidate),
            skill_gaps: candidate
                .record
                .core_skills
                .iter()
                .take(FALLBACK_SKILL_GAPS)
                .cloned()
                .collect(),
            compatibility_score: candidate.compatibility_score,
        })
        .collect()
}

fn fallback_reason(candidate: &RankedCareer) -> String {
    let codes = candidate
        .matched_tags
        .iter()
        .map(|tag| format!("{} ({})", tag.category, tag.weight))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Your personality traits align with the following interest codes: {codes}.")
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::assessment::interest::InterestCategory;
    use crate::assessment::matcher::rank_candidates;
    use crate::assessment::matcher::tests::career;

    /// Generator that replays a canned reply and records the prompts it saw.
    pub(crate) struct ScriptedGenerator {
        reply: Result<String, u16>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub(crate) fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(vec![]),
            }
        }

        pub(crate) fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                prompts: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "scripted failure".to_string(),
                }),
            }
        }
    }

    fn neutral_scores() -> TraitScores {
        TraitScores {
            openness: 0.5,
            conscientiousness: 0.5,
            extraversion: 0.5,
            agreeableness: 0.5,
            neuroticism: 0.5,
        }
    }

    fn candidates() -> Vec<RankedCareer> {
        rank_candidates(
            vec![
                career("Counselor", &[(InterestCategory::Social, 80.0)]),
                career(
                    "Art Therapist",
                    &[
                        (InterestCategory::Social, 40.0),
                        (InterestCategory::Artistic, 90.0),
                    ],
                ),
            ],
            &[InterestCategory::Social, InterestCategory::Artistic],
            10,
        )
    }

    #[test]
    fn test_parse_fenced_block() {
        let text = "Here you go:\n```json\n[{\"title\": \"Counselor\", \"reason\": \"Warm\", \"skillGaps\": [\"CBT\"]}]\n```\nGood luck!";
        let parsed = try_parse_structured_list(text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title.as_deref(), Some("Counselor"));
        assert_eq!(parsed[0].skill_gaps, vec!["CBT".to_string()]);
    }

    #[test]
    fn test_parse_bare_array_inside_prose() {
        let text = "Sure! [{\"careerId\": \"abc\", \"reason\": \"Fits\"}] Hope this helps.";
        let parsed = try_parse_structured_list(text).unwrap();
        assert_eq!(parsed[0].career_id.as_deref(), Some("abc"));
        assert!(parsed[0].skill_gaps.is_empty());
    }

    #[test]
    fn test_parse_stops_at_end_of_first_array() {
        let text = "[{\"title\":\"Counselor\",\"reason\":\"x\",\"skillGaps\":[]}]\nSee note [1].";
        let parsed = try_parse_structured_list(text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title.as_deref(), Some("Counselor"));
    }

    #[test]
    fn test_parse_skips_bracketed_prose_before_array() {
        let text = "Top [2] picks: [{\"title\": \"Counselor\", \"reason\": \"Warm\"}]";
        let parsed = try_parse_structured_list(text).unwrap();
        assert_eq!(parsed[0].reason, "Warm");
    }

    #[test]
    fn test_broken_fence_falls_through_to_array_scan() {
        let text = "```json\n[{\"title\": \"Counselor\",}]\n```\nCorrected: [{\"title\": \"Counselor\", \"reason\": \"Fixed\"}]";
        let parsed = try_parse_structured_list(text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].reason, "Fixed");
    }

    #[test]
    fn test_null_fields_become_empty() {
        let parsed = try_parse_structured_list(
            r#"[{"title": "Counselor", "reason": null, "skillGaps": null}]"#,
        )
        .unwrap();
        assert_eq!(parsed[0].reason, "");
        assert!(parsed[0].skill_gaps.is_empty());
    }

    #[test]
    fn test_parse_garbage_is_failure() {
        assert!(matches!(
            try_parse_structured_list("I cannot help with that."),
            Err(EnrichmentError::Parse(_))
        ));
        assert!(matches!(
            try_parse_structured_list("{\"title\": \"Counselor\"}"),
            Err(EnrichmentError::Parse(_))
        ));
    }

    #[test]
    fn test_prompt_embeds_scores_and_titles() {
        let prompt = build_enrichment_prompt(&neutral_scores(), &candidates());
        assert!(prompt.contains("- Openness: 0.50"));
        assert!(prompt.contains("- Neuroticism: 0.50"));
        assert!(prompt.contains("Art Therapist"));
        assert!(prompt.contains("Counselor"));
        assert!(prompt.contains(JSON_ARRAY_ONLY));
        assert!(!prompt.contains("{candidates}"));
    }

    #[test]
    fn test_fallback_has_one_entry_per_candidate() {
        let ranked = candidates();
        let fallback = fallback_recommendations(&ranked);

        assert_eq!(fallback.len(), ranked.len());
        for (rec, candidate) in fallback.iter().zip(&ranked) {
            assert_eq!(rec.career_id, candidate.record.id);
            assert!(rec.skill_gaps.len() <= FALLBACK_SKILL_GAPS);
            assert_eq!(rec.compatibility_score, candidate.compatibility_score);
        }
        assert_eq!(
            fallback[0].reason,
            "Your personality traits align with the following interest codes: Social (40), Artistic (90)."
        );
        assert_eq!(
            fallback[0].skill_gaps,
            vec!["Communication", "Planning", "Research"]
        );
    }

    #[test]
    fn test_fallback_with_few_skills() {
        let mut ranked = candidates();
        ranked[1].record.core_skills = vec!["Empathy".to_string()];
        let fallback = fallback_recommendations(&ranked);
        assert_eq!(fallback[1].skill_gaps, vec!["Empathy".to_string()]);
    }

    #[tokio::test]
    async fn test_unconfigured_generator_uses_fallback() {
        let ranked = candidates();
        let enricher = RecommendationEnricher::new(None);
        let result = enricher.enrich(&neutral_scores(), &ranked).await;

        assert!(!result.ai_service_used);
        assert_eq!(result.recommendations, fallback_recommendations(&ranked));
    }

    #[tokio::test]
    async fn test_service_error_uses_fallback() {
        let ranked = candidates();
        let generator = Arc::new(ScriptedGenerator::failing(503));
        let enricher = RecommendationEnricher::new(Some(generator.clone()));
        let result = enricher.enrich(&neutral_scores(), &ranked).await;

        assert!(!result.ai_service_used);
        assert_eq!(result.recommendations, fallback_recommendations(&ranked));
        assert_eq!(generator.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_reply_uses_fallback() {
        let ranked = candidates();
        let enricher = RecommendationEnricher::new(Some(Arc::new(ScriptedGenerator::replying(
            "As an AI I think you would enjoy many careers.",
        ))));
        let result = enricher.enrich(&neutral_scores(), &ranked).await;

        assert!(!result.ai_service_used);
        assert_eq!(result.recommendations, fallback_recommendations(&ranked));
    }

    #[tokio::test]
    async fn test_reply_with_unknown_titles_only_uses_fallback() {
        let ranked = candidates();
        let enricher = RecommendationEnricher::new(Some(Arc::new(ScriptedGenerator::replying(
            r#"[{"title": "Astronaut", "reason": "Bold", "skillGaps": []}]"#,
        ))));
        let result = enricher.enrich(&neutral_scores(), &ranked).await;
        assert!(!result.ai_service_used);
    }

    #[tokio::test]
    async fn test_valid_reply_is_resolved_against_candidates() {
        let ranked = candidates();
        let counselor_id = ranked[1].record.id;
        let reply = format!(
            r#"```json
[
  {{"title": "art therapist", "reason": "Creative and caring", "skillGaps": ["Art media", "Clinical hours"]}},
  {{"careerId": "{counselor_id}", "title": "Something else", "reason": "Supportive", "skillGaps": ["Licensure"]}},
  {{"title": "Astronaut", "reason": "Bold", "skillGaps": []}},
  {{"title": "Counselor", "reason": "Duplicate", "skillGaps": []}}
]
```"#
        );
        let enricher =
            RecommendationEnricher::new(Some(Arc::new(ScriptedGenerator::replying(&reply))));
        let result = enricher.enrich(&neutral_scores(), &ranked).await;

        assert!(result.ai_service_used);
        assert_eq!(result.recommendations.len(), 2);
        assert_eq!(result.recommendations[0].title, "Art Therapist");
        assert_eq!(result.recommendations[0].compatibility_score, 130.0);
        assert_eq!(result.recommendations[1].career_id, counselor_id);
        assert_eq!(result.recommendations[1].title, "Counselor");
        assert_eq!(result.recommendations[1].reason, "Supportive");
    }

    #[tokio::test]
    async fn test_empty_candidates_skip_generator() {
        let generator = Arc::new(ScriptedGenerator::replying("[]"));
        let enricher = RecommendationEnricher::new(Some(generator.clone()));
        let result = enricher.enrich(&neutral_scores(), &[]).await;

        assert!(result.recommendations.is_empty());
        assert!(!result.ai_service_used);
        assert!(generator.prompts.lock().unwrap().is_empty());
    }
}
