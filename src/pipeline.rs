//! The run orchestrator: Search → (Fetch+Extract per result) → Prompt →
//! Summarize. Strictly sequential; per-source failures are recorded and the
//! run continues, everything else aborts it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::{AgentError, SourceFailure};
use crate::extract::{ContentExtractor, HttpExtractor};
use crate::prompt::{build_summarization_prompt, SourceDoc};
use crate::search::{SearchProvider, TavilyClient, DEFAULT_MAX_RESULTS};
use crate::summarize::{GeminiClient, LlmClient};

/// What the store persists per source: title + url, in citation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    pub title: String,
    pub url: String,
}

/// Outcome of a successful run. `sources.len()` equals the number of
/// successful extractions; `errors` lists every skipped URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub summary: String,
    pub sources: Vec<SourceLink>,
    pub errors: Vec<SourceFailure>,
}

/// Seam the web layer depends on.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn run(&self, query: &str) -> Result<RunOutcome, AgentError>;
}

pub type DynAgent = Arc<dyn Agent>;

pub struct Pipeline {
    search: Arc<dyn SearchProvider>,
    extractor: Arc<dyn ContentExtractor>,
    llm: Arc<dyn LlmClient>,
    max_sources: usize,
}

impl Pipeline {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        extractor: Arc<dyn ContentExtractor>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            search,
            extractor,
            llm,
            max_sources: DEFAULT_MAX_RESULTS,
        }
    }
}

#[async_trait]
impl Agent for Pipeline {
    async fn run(&self, query: &str) -> Result<RunOutcome, AgentError> {
        info!(query, "starting research run");
        let results = self.search.search(query, self.max_sources).await?;
        if results.is_empty() {
            return Err(AgentError::NoResults);
        }

        let mut docs: Vec<SourceDoc> = Vec::new();
        let mut errors: Vec<SourceFailure> = Vec::new();
        for result in results.into_iter().take(self.max_sources) {
            if result.url.is_empty() {
                continue;
            }
            match self.extractor.extract(&result.url).await {
                Ok(extracted) => {
                    info!(url = %result.url, kind = ?extracted.kind, "source extracted");
                    docs.push(SourceDoc {
                        title: result.title,
                        url: extracted.url,
                        text: extracted.text,
                    });
                }
                Err(e) => {
                    warn!(url = %result.url, reason = %e, "source skipped");
                    errors.push(SourceFailure::new(result.url, &e));
                }
            }
        }

        if docs.is_empty() {
            return Err(AgentError::AllSourcesFailed);
        }

        let prompt = build_summarization_prompt(query, &docs);
        let summary = self.llm.complete(&prompt).await?;
        info!(
            sources = docs.len(),
            skipped = errors.len(),
            provider = self.llm.provider_name(),
            "run complete"
        );

        let sources = docs
            .into_iter()
            .map(|d| SourceLink {
                title: d.title,
                url: d.url,
            })
            .collect();

        Ok(RunOutcome {
            summary,
            sources,
            errors,
        })
    }
}

/// Agent used when credentials are absent: the server still boots, and
/// `POST /run` surfaces the configuration error as a flash notice.
pub struct UnconfiguredAgent {
    missing: &'static str,
}

#[async_trait]
impl Agent for UnconfiguredAgent {
    async fn run(&self, _query: &str) -> Result<RunOutcome, AgentError> {
        Err(AgentError::MissingCredential(self.missing))
    }
}

/// Factory: build the real pipeline when both credentials exist, otherwise
/// fall back to an agent that reports the first missing one.
pub fn build_agent(config: &AppConfig) -> DynAgent {
    let search = match TavilyClient::new(config) {
        Ok(c) => Arc::new(c),
        Err(AgentError::MissingCredential(name)) => {
            return Arc::new(UnconfiguredAgent { missing: name });
        }
        Err(e) => {
            warn!(error = %e, "search client init failed; runs will report it");
            return Arc::new(FailedInitAgent { message: e.to_string() });
        }
    };
    let llm = match GeminiClient::new(config) {
        Ok(c) => Arc::new(c),
        Err(AgentError::MissingCredential(name)) => {
            return Arc::new(UnconfiguredAgent { missing: name });
        }
        Err(e) => {
            warn!(error = %e, "llm client init failed; runs will report it");
            return Arc::new(FailedInitAgent { message: e.to_string() });
        }
    };
    Arc::new(Pipeline::new(search, Arc::new(HttpExtractor::new()), llm))
}

/// Client construction failed for a non-credential reason (TLS setup etc).
/// The original error's message is carried; the kind stays subsystem-neutral.
struct FailedInitAgent {
    message: String,
}

#[async_trait]
impl Agent for FailedInitAgent {
    async fn run(&self, _query: &str) -> Result<RunOutcome, AgentError> {
        Err(AgentError::ClientInit(self.message.clone()))
    }
}
