//! Error taxonomy for the research pipeline.
//!
//! Two tiers: `AgentError` aborts a whole run and surfaces as a single flash
//! notice in the web layer; `ExtractionError` is recovered per source and
//! recorded as a `SourceFailure` while the run continues.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Run-level failures. Any of these aborts the run; no report is persisted.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Missing {0}. Set it in environment or .env")]
    MissingCredential(&'static str),

    /// Non-2xx from the search provider; `body` is truncated to 200 chars.
    #[error("Search failed with status {status}: {body}")]
    Search { status: u16, body: String },

    /// Transport error before the search provider answered.
    #[error("Search request failed: {0}")]
    SearchRequest(String),

    /// An HTTP client failed to construct for a non-credential reason.
    /// Deliberately not tied to either subsystem.
    #[error("Client initialization failed: {0}")]
    ClientInit(String),

    #[error("No search results found.")]
    NoResults,

    #[error("All candidate sources failed to extract. Try a different query.")]
    AllSourcesFailed,

    /// Transport or provider error from the LLM endpoint.
    #[error("Summarization failed: {0}")]
    Summarize(String),
}

/// Per-source failures. Recovered locally: the source is skipped and the
/// reason recorded. `PdfParse` is kept distinct from `EmptyPdf` so callers
/// can tell a library-internal error from a document with no text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Unable to extract text from PDF")]
    EmptyPdf,

    #[error("PDF parse error: {0}")]
    PdfParse(String),

    #[error("Unable to extract text from HTML")]
    EmptyHtml,
}

/// What gets recorded when a candidate URL is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub url: String,
    pub reason: String,
}

impl SourceFailure {
    pub fn new(url: impl Into<String>, err: &ExtractionError) -> Self {
        Self {
            url: url.into(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_errors_keep_user_visible_wording() {
        assert_eq!(
            ExtractionError::Fetch("connection refused".into()).to_string(),
            "Fetch error: connection refused"
        );
        assert_eq!(
            ExtractionError::EmptyPdf.to_string(),
            "Unable to extract text from PDF"
        );
        assert_eq!(
            ExtractionError::EmptyHtml.to_string(),
            "Unable to extract text from HTML"
        );
    }

    #[test]
    fn pdf_parse_error_is_distinguishable_from_empty_pdf() {
        let parse = ExtractionError::PdfParse("bad xref table".into());
        assert_ne!(parse.to_string(), ExtractionError::EmptyPdf.to_string());
        assert!(parse.to_string().contains("bad xref table"));
    }

    #[test]
    fn missing_credential_names_the_variable() {
        let e = AgentError::MissingCredential("TAVILY_API_KEY");
        assert_eq!(
            e.to_string(),
            "Missing TAVILY_API_KEY. Set it in environment or .env"
        );
    }
}
