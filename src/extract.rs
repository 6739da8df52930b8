//! Content extraction: classify a fetched document as PDF or HTML and pull
//! readable plain text out of it.

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::fetch::{FetchedDoc, Fetcher};

/// Extracted HTML shorter than this is treated as no usable text.
const MIN_EXTRACTED_SIZE: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Pdf,
    Html,
}

/// One successfully extracted document. `text` is the full extracted body;
/// truncation happens only at prompt-build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSource {
    pub url: String,
    pub text: String,
    pub kind: DocKind,
}

/// Seam for tests: the pipeline only sees this trait.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ExtractedSource, ExtractionError>;
}

/// URL path ends in `.pdf` (optionally followed by a query string),
/// case-insensitive.
pub fn is_pdf_url(url: &str) -> bool {
    static RE_PDF: OnceCell<Regex> = OnceCell::new();
    let re = RE_PDF.get_or_init(|| Regex::new(r"(?i)\.pdf(\?|$)").unwrap());
    re.is_match(url)
}

/// The URL suffix wins regardless of content-type; the header is the
/// fallback signal for suffix-less PDF links.
pub fn classify(url: &str, content_type: &str) -> DocKind {
    if is_pdf_url(url) || content_type.starts_with("application/pdf") {
        DocKind::Pdf
    } else {
        DocKind::Html
    }
}

/// Real extractor: fetch, classify, delegate.
#[derive(Default)]
pub struct HttpExtractor {
    fetcher: Fetcher,
}

impl HttpExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentExtractor for HttpExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedSource, ExtractionError> {
        let doc = self.fetcher.fetch(url).await?;
        extract_from_doc(url, &doc)
    }
}

/// Classification + extraction on an already-fetched payload. Split out so
/// tests can exercise it without a network.
pub fn extract_from_doc(url: &str, doc: &FetchedDoc) -> Result<ExtractedSource, ExtractionError> {
    match classify(url, &doc.content_type) {
        DocKind::Pdf => {
            let text = pdf_text(&doc.body)?;
            Ok(ExtractedSource {
                url: url.to_string(),
                text,
                kind: DocKind::Pdf,
            })
        }
        DocKind::Html => {
            let text = html_text(&doc.text())?;
            Ok(ExtractedSource {
                url: url.to_string(),
                text,
                kind: DocKind::Html,
            })
        }
    }
}

/// PDF payload → trimmed plain text. Parser errors stay distinguishable from
/// documents that simply contain no text.
pub fn pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::PdfParse(e.to_string()))?;
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(ExtractionError::EmptyPdf);
    }
    Ok(text)
}

/// HTML → readable plain text.
///
/// Strategy (readability-style, no external service):
/// 1. Prefer `<article>`, `<main>`, or `[role="main"]` content regions.
/// 2. Fall back to `<body>` with script/style/nav/chrome subtrees skipped.
/// 3. Block-level boundaries become newlines; whitespace is collapsed.
///
/// Output shorter than `MIN_EXTRACTED_SIZE` chars counts as no usable text.
pub fn html_text(html: &str) -> Result<String, ExtractionError> {
    let doc = Html::parse_document(html);

    let mut best = String::new();
    for sel_str in ["article", "main", "[role=\"main\"]"] {
        if let Ok(sel) = Selector::parse(sel_str) {
            if let Some(el) = doc.select(&sel).next() {
                let text = element_text(&el);
                if text.chars().count() >= MIN_EXTRACTED_SIZE {
                    return Ok(text);
                }
                if text.len() > best.len() {
                    best = text;
                }
            }
        }
    }

    if let Ok(body_sel) = Selector::parse("body") {
        if let Some(body) = doc.select(&body_sel).next() {
            let text = element_text(&body);
            if text.len() > best.len() {
                best = text;
            }
        }
    }

    if best.chars().count() < MIN_EXTRACTED_SIZE {
        return Err(ExtractionError::EmptyHtml);
    }
    Ok(best)
}

const SKIP_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "noscript", "svg", "aside", "form", "iframe",
];

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "td", "th", "article",
    "section", "main", "blockquote", "pre", "figcaption", "dt", "dd",
];

fn element_text(el: &ElementRef<'_>) -> String {
    let mut buf = String::new();
    collect_text(el, &mut buf);
    collapse_whitespace(&buf)
}

fn collect_text(el: &ElementRef<'_>, buf: &mut String) {
    if SKIP_TAGS.contains(&el.value().name()) {
        return;
    }
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            buf.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            collect_text(&child_el, buf);
            if BLOCK_TAGS.contains(&child_el.value().name()) {
                buf.push('\n');
            }
        }
    }
}

/// Collapse runs of spaces/tabs within lines and runs of blank lines between
/// blocks; trim the result.
fn collapse_whitespace(s: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in s.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            lines.push(collapsed);
        }
    }
    lines.join("\n")
}
