// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to prompts whose output is parsed as a JSON array.
pub const JSON_ARRAY_ONLY: &str = "Return ONLY valid JSON: a single JSON array. \
    Do NOT include any text before or after the array. \
    Do NOT include explanations or apologies.";
