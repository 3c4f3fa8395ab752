use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::assessment::matcher::DEFAULT_MATCH_LIMIT;
use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

/// Application configuration loaded from environment variables.
/// Startup fails if `DATABASE_URL` is missing or a numeric variable is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// `None` disables AI enrichment; recommendations then use the fallback path.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub llm_timeout: Duration,
    pub recommendation_limit: usize,
    pub career_seed_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source. Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL")
            .context("Required environment variable 'DATABASE_URL' is not set")?;

        let llm_timeout_secs = match var("LLM_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_LLM_TIMEOUT_SECS,
        };

        let recommendation_limit = match var("RECOMMENDATION_LIMIT") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .context("RECOMMENDATION_LIMIT must be a positive integer")?,
            None => DEFAULT_MATCH_LIMIT,
        };
        if recommendation_limit == 0 {
            bail!("RECOMMENDATION_LIMIT must be at least 1");
        }

        Ok(Config {
            database_url,
            gemini_api_key: var("GEMINI_API_KEY").map(|k| k.trim().to_string()),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: var("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            llm_timeout: Duration::from_secs(llm_timeout_secs),
            recommendation_limit,
            career_seed_path: var("CAREER_SEED_PATH").map(PathBuf::from),
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
