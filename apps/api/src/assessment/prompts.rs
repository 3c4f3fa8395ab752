// Prompt constants for the recommendation enricher.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Enrichment prompt template.
/// Replace: {openness}, {conscientiousness}, {extraversion}, {agreeableness},
///          {neuroticism}, {candidates}, {output_instruction}
pub const ENRICHMENT_PROMPT_TEMPLATE: &str = r#"You are an expert career counselor. Analyze this personality profile and suggest the most suitable careers.

Big Five Personality Scores (0-1 scale):
- Openness: {openness}
- Conscientiousness: {conscientiousness}
- Extraversion: {extraversion}
- Agreeableness: {agreeableness}
- Neuroticism: {neuroticism}

Potential career matches (title [careerId]):
{candidates}

Please provide:
1. 3-5 most suitable careers from the list above (prioritize best matches). Do NOT suggest careers that are not in the list.
2. For each career, a brief explanation of why it suits this personality
3. 2-3 key skill gaps the person might need to address

{output_instruction}

Use this exact format:
[
  {
    "careerId": "the careerId from the list",
    "title": "career title exactly as listed",
    "reason": "Explanation text",
    "skillGaps": ["Skill 1", "Skill 2", "Skill 3"]
  }
]"#;
