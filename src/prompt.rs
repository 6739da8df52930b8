//! Summarization prompt assembly. Pure string work, no I/O.

/// Per-source excerpt cap. Applied here, not at extraction time.
pub const MAX_EXCERPT_CHARS: usize = 1500;

/// A source as the prompt (and the final report) sees it: the search
/// snippet is already dropped by this stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDoc {
    pub title: String,
    pub url: String,
    pub text: String,
}

/// Build the single summarization prompt. Citation indices are 1-based over
/// `sources` as given (failed sources were filtered out upstream) and are
/// never renumbered afterwards.
pub fn build_summarization_prompt(query: &str, sources: &[SourceDoc]) -> String {
    let mut parts = vec![
        "You are a precise research assistant. Summarize findings in 6-10 bullet points."
            .to_string(),
        "Focus on concrete facts, consensus, and cite sources by [n].".to_string(),
        "Add a short 'Key Takeaways' section and include links at end.".to_string(),
        format!("User query: {query}"),
        "\nSources:".to_string(),
    ];
    for (i, s) in sources.iter().enumerate() {
        let title = if s.title.is_empty() { "Source" } else { &s.title };
        let excerpt: String = s
            .text
            .chars()
            .take(MAX_EXCERPT_CHARS)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        parts.push(format!("[{}] {} - {} :: {}", i + 1, title, s.url, excerpt));
    }
    parts.join("\n")
}
