//! LLM summarization client. Provider seam + the Gemini implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{AppConfig, ENV_GEMINI_KEY};
use crate::error::AgentError;

const GEMINI_MODEL: &str = "gemini-1.5-flash";
const GEMINI_TIMEOUT: Duration = Duration::from_secs(60);

/// Seam used by the pipeline; tests substitute a canned client.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one prompt, get the trimmed completion text back. An empty
    /// completion is an empty string, not an error.
    async fn complete(&self, prompt: &str) -> Result<String, AgentError>;
    fn provider_name(&self) -> &'static str;
}

/// Gemini generateContent client. Requires `GEMINI_API_KEY`.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self, AgentError> {
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or(AgentError::MissingCredential(ENV_GEMINI_KEY))?;
        let http = reqwest::Client::builder()
            .timeout(GEMINI_TIMEOUT)
            .build()
            .map_err(|e| AgentError::Summarize(e.to_string()))?;
        Ok(Self {
            http,
            api_key,
            model: GEMINI_MODEL.to_string(),
        })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
        #[derive(Serialize)]
        struct Part<'a> {
            text: &'a str,
        }
        #[derive(Serialize)]
        struct Content<'a> {
            parts: Vec<Part<'a>>,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            contents: Vec<Content<'a>>,
        }
        #[derive(Deserialize)]
        struct Resp {
            #[serde(default)]
            candidates: Vec<Candidate>,
        }
        #[derive(Deserialize)]
        struct Candidate {
            content: Option<RespContent>,
        }
        #[derive(Deserialize)]
        struct RespContent {
            #[serde(default)]
            parts: Vec<RespPart>,
        }
        #[derive(Deserialize)]
        struct RespPart {
            #[serde(default)]
            text: String,
        }

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let req = Req {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .json(&req)
            .send()
            .await
            .map_err(|e| AgentError::Summarize(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Summarize(format!(
                "provider returned {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let body: Resp = response
            .json()
            .await
            .map_err(|e| AgentError::Summarize(e.to_string()))?;

        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(text.trim().to_string())
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
