use std::env;

use dotenvy::dotenv;

use crate::error::{PipelineError, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Full search URL of the vector index, including index name and api-version.
    pub search_endpoint: String,
    pub search_api_key: String,
    /// API key for the OpenAI-compatible completion service.
    pub llm_api_key: String,
    /// Base URL of the completion service. Defaults to Gemini's
    /// OpenAI-compatibility endpoint.
    pub llm_base_url: String,
}

const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

fn required(name: &'static str) -> Result<String> {
    env::var(name).map_err(|_| PipelineError::MissingConfiguration { name })
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| PipelineError::MissingConfiguration { name: "PORT" })?,
            search_endpoint: required("SEARCH_ENDPOINT")?,
            search_api_key: required("SEARCH_API_KEY")?,
            llm_api_key: required("GEMINI_API_KEY")?,
            llm_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
        })
    }
}
