//! OpenAI-compatible extraction client
//!
//! Sends free-text regimen descriptions to a chat-completions endpoint with a
//! structured-output schema and deserializes the reply into a `Regimen`. The
//! endpoint and model are overridable through environment variables so the
//! client also works against compatible local servers.

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::models::Regimen;

use super::schema::{regimen_schema, SYSTEM_PROMPT};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-5-mini";

/// Errors from the extraction service
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Model returned no content")]
    EmptyResponse,

    #[error("Model returned invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type LlmResult<T> = Result<T, LlmError>;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Client for the regimen-extraction model.
pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmClient {
    /// Build a client from the environment. Fails only when the API key is
    /// missing; base URL and model fall back to OpenAI defaults.
    pub fn from_env() -> LlmResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| LlmError::MissingApiKey)?;
        let base_url = std::env::var("OMECALC_LLM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("OMECALC_LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    /// Extract a structured regimen from free text.
    pub async fn parse_regimen(&self, text: &str) -> LlmResult<Regimen> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": format!("Parse this opioid regimen: {}", text) }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "opioid_regimen",
                    "schema": regimen_schema()
                }
            }
        });

        tracing::debug!("Requesting regimen extraction from {} ({})", url, self.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!("Extraction API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        tracing::debug!("Raw extraction response: {}", content);

        let mut regimen: Regimen = serde_json::from_str(&content)?;
        // Keep drug names aligned with the conversion table's lowercase keys
        for med in &mut regimen.medications {
            med.drug = med.drug.to_lowercase();
        }

        Ok(regimen)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
