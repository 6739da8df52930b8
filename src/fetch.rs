//! Single-URL fetcher with a fixed timeout and a browser-like user agent.
//!
//! Transport failures never escape as panics or run-level errors; they come
//! back as `ExtractionError::Fetch` values the pipeline records per source.

use std::time::Duration;

use crate::error::ExtractionError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(25);
const USER_AGENT: &str = "Mozilla/5.0 AI-Agent/1.0";

/// A fetched document: lowercased content type plus the raw payload.
#[derive(Debug, Clone)]
pub struct FetchedDoc {
    pub content_type: String,
    pub body: Vec<u8>,
}

impl FetchedDoc {
    /// Payload decoded as text, lossily. Good enough for HTML: the
    /// readability pass collapses whatever the replacement chars touch.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub struct Fetcher {
    http: reqwest::Client,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        // Builder only fails on malformed TLS/proxy setup, neither of which
        // is configured here; falling back would lose the timeout and UA.
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .expect("reqwest client");
        Self { http }
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchedDoc, ExtractionError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ExtractionError::Fetch(e.to_string()))?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        let body = response
            .bytes()
            .await
            .map_err(|e| ExtractionError::Fetch(e.to_string()))?
            .to_vec();

        Ok(FetchedDoc { content_type, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetcher_constructs_with_its_configured_client() {
        // Covers the builder path; a failure here would panic.
        let _ = Fetcher::new();
        let _ = Fetcher::default();
    }

    #[test]
    fn lossy_text_survives_invalid_utf8() {
        let doc = FetchedDoc {
            content_type: "text/html".into(),
            body: vec![b'h', b'i', 0xFF, b'!'],
        };
        let text = doc.text();
        assert!(text.starts_with("hi"));
        assert!(text.ends_with('!'));
    }
}
