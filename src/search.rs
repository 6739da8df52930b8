//! Tavily search client: one query in, a bounded list of normalized results out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{AppConfig, ENV_TAVILY_KEY};
use crate::error::AgentError;

const TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(20);
/// How much of a non-2xx body to carry into the error message.
const ERROR_BODY_CAP: usize = 200;

pub const DEFAULT_MAX_RESULTS: usize = 3;

/// One normalized search hit. Ephemeral: consumed immediately by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Seam for tests and alternative providers.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<SearchResult>, AgentError>;
}

/// Tavily API client for web search.
pub struct TavilyClient {
    api_key: String,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    include_answer: bool,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Default, Deserialize)]
struct TavilyResult {
    title: Option<String>,
    url: Option<String>,
    content: Option<String>,
    snippet: Option<String>,
}

impl TavilyClient {
    /// Fails fast with a typed configuration error when the key is absent.
    pub fn new(config: &AppConfig) -> Result<Self, AgentError> {
        let api_key = config
            .tavily_api_key
            .clone()
            .ok_or(AgentError::MissingCredential(ENV_TAVILY_KEY))?;
        let http = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .map_err(|e| AgentError::SearchRequest(e.to_string()))?;
        Ok(Self { api_key, http })
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, AgentError> {
        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            include_answer: false,
            max_results,
        };

        let response = self
            .http
            .post(TAVILY_ENDPOINT)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::SearchRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Search {
                status: status.as_u16(),
                body: truncate_chars(&body, ERROR_BODY_CAP),
            });
        }

        let payload: TavilyResponse = response
            .json()
            .await
            .map_err(|e| AgentError::SearchRequest(e.to_string()))?;

        Ok(normalize_results(payload.results, max_results))
    }
}

/// Map raw provider hits to `SearchResult`, filling missing titles with
/// "Untitled" and missing snippets with the empty string, and cap the count.
fn normalize_results(raw: Vec<TavilyResult>, max_results: usize) -> Vec<SearchResult> {
    raw.into_iter()
        .map(|r| SearchResult {
            title: r
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            url: r.url.unwrap_or_default(),
            snippet: r.content.or(r.snippet).unwrap_or_default(),
        })
        .take(max_results)
        .collect()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: Option<&str>, url: Option<&str>, content: Option<&str>) -> TavilyResult {
        TavilyResult {
            title: title.map(String::from),
            url: url.map(String::from),
            content: content.map(String::from),
            snippet: None,
        }
    }

    #[test]
    fn missing_title_becomes_untitled_and_missing_snippet_empty() {
        let out = normalize_results(vec![raw(None, Some("http://a"), None)], 3);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Untitled");
        assert_eq!(out[0].url, "http://a");
        assert_eq!(out[0].snippet, "");
    }

    #[test]
    fn snippet_falls_back_from_content_to_snippet_field() {
        let mut r = raw(Some("T"), Some("http://a"), None);
        r.snippet = Some("fallback".into());
        let out = normalize_results(vec![r], 3);
        assert_eq!(out[0].snippet, "fallback");

        let out = normalize_results(vec![raw(Some("T"), Some("http://a"), Some("primary"))], 3);
        assert_eq!(out[0].snippet, "primary");
    }

    #[test]
    fn results_are_capped_at_max() {
        let many = (0..5)
            .map(|i| raw(Some("t"), Some(&format!("http://{i}")), None))
            .collect();
        let out = normalize_results(many, 3);
        assert_eq!(out.len(), 3);
        assert_eq!(out[2].url, "http://2");
    }

    #[test]
    fn client_requires_api_key() {
        let err = TavilyClient::new(&AppConfig::default()).err().expect("no key");
        assert!(matches!(err, AgentError::MissingCredential("TAVILY_API_KEY")));
    }

    #[test]
    fn error_body_truncation_counts_chars() {
        let long = "x".repeat(500);
        assert_eq!(truncate_chars(&long, ERROR_BODY_CAP).len(), 200);
    }
}
