//! Gemini `generateContent` adapter.
//!
//! Requests structured JSON output with a two-field schema and validates the
//! returned text as an [`AiResponse`].

use super::{AiResponse, SolveAdapter, SolveResult, SolverError};
use crate::config::SolverConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// System instruction sent with every request
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful mathematical assistant. You provide clear, \
accurate numerical answers and brief logical explanations. Always format the output as JSON.";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Wraps the user's text in the solving instructions
#[must_use]
pub fn build_prompt(input: &str) -> String {
    format!(
        "Solve this math problem or calculate this expression.\n\
         If it is a general question not related to math or logic, politely decline \
         but try to answer if it involves numbers.\n\
         Input: \"{input}\"\n\
         Provide the result and a brief explanation."
    )
}

/// JSON schema constraining the model output
#[must_use]
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "result": {
                "type": "STRING",
                "description": "The numerical or algebraic result of the calculation."
            },
            "explanation": {
                "type": "STRING",
                "description": "A concise, step-by-step explanation of how the result was derived."
            }
        },
        "required": ["result", "explanation"]
    })
}

// ===== Wire types =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Builds the request body for `input`
pub(crate) fn build_request(input: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content::text(Some("user"), build_prompt(input))],
        system_instruction: Content::text(None, SYSTEM_INSTRUCTION),
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(),
        },
    }
}

/// Extracts and validates the answer from a raw `generateContent` body
pub(crate) fn parse_generate_response(body: &str) -> SolveResult<AiResponse> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();
    AiResponse::from_json(&text)
}

/// Solver backed by the Gemini REST API
#[derive(Debug, Clone)]
pub struct GeminiSolver {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiSolver {
    /// Create a solver with the default transport
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self::with_client(base_url, model, api_key, reqwest::Client::new())
    }

    /// Create a solver from configuration; fails without an API key
    pub fn from_config(config: &SolverConfig) -> SolveResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(SolverError::MissingApiKey)?;

        #[cfg(not(target_arch = "wasm32"))]
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        #[cfg(target_arch = "wasm32")]
        let client = reqwest::Client::new();

        Ok(Self::with_client(
            &config.base_url,
            &config.model,
            api_key,
            client,
        ))
    }

    /// Create a solver with a custom reqwest client
    pub fn with_client(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Returns the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full `generateContent` URL
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl SolveAdapter for GeminiSolver {
    async fn solve(&self, input: &str) -> SolveResult<AiResponse> {
        let url = self.endpoint();
        info!(model = %self.model, "sending generateContent request");

        let resp = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&build_request(input))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "generateContent returned error status");
            return Err(SolverError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        debug!(bytes = body.len(), "generateContent response received");
        parse_generate_response(&body)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
