// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod flash;
pub mod pages;
pub mod pipeline;
pub mod prompt;
pub mod search;
pub mod store;
pub mod summarize;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::AppConfig;
pub use crate::error::{AgentError, ExtractionError, SourceFailure};
pub use crate::pipeline::{build_agent, Agent, DynAgent, Pipeline, RunOutcome, SourceLink};
pub use crate::store::{Report, ReportMeta, ReportStore};
