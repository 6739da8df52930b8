//! Server-rendered HTML pages. Plain string assembly with entity escaping;
//! no template engine, no client-side code.

use html_escape::encode_text;

use crate::flash::{Flash, FlashLevel};
use crate::store::{Report, ReportMeta};

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem;color:#222}\
h1{font-size:1.4rem}\
form{margin:1rem 0}\
input[type=text]{width:70%;padding:.4rem}\
button{padding:.4rem .8rem}\
table{border-collapse:collapse;width:100%}\
td,th{text-align:left;padding:.3rem .6rem;border-bottom:1px solid #ddd}\
.notice{padding:.6rem .8rem;border-radius:4px;margin:.8rem 0}\
.notice.error{background:#fdecea;color:#8a1f11}\
.notice.warning{background:#fcf8e3;color:#8a6d3b}\
.summary{white-space:pre-wrap;background:#f7f7f7;padding:1rem;border-radius:4px}\
.muted{color:#777}";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        encode_text(title)
    )
}

fn flash_banner(flash: Option<&Flash>) -> String {
    match flash {
        Some(f) => {
            let class = match f.level {
                FlashLevel::Error => "error",
                FlashLevel::Warning => "warning",
            };
            format!(
                "<div class=\"notice {class}\">{}</div>\n",
                encode_text(&f.message)
            )
        }
        None => String::new(),
    }
}

pub fn index(reports: &[ReportMeta], missing_keys: &[&str], flash: Option<&Flash>) -> String {
    let mut body = String::new();
    body.push_str("<h1>Research reports</h1>\n");
    body.push_str(&flash_banner(flash));

    if !missing_keys.is_empty() {
        body.push_str(&format!(
            "<div class=\"notice warning\">Missing configuration: {}. \
             Runs will fail until set.</div>\n",
            encode_text(&missing_keys.join(", "))
        ));
    }

    body.push_str(
        "<form method=\"post\" action=\"/run\">\n\
         <input type=\"text\" name=\"query\" placeholder=\"What do you want to research?\">\n\
         <button type=\"submit\">Run</button>\n</form>\n",
    );

    if reports.is_empty() {
        body.push_str("<p class=\"muted\">No reports yet.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>Query</th><th>Created</th></tr>\n");
        for r in reports {
            body.push_str(&format!(
                "<tr><td><a href=\"/report/{}\">{}</a></td><td class=\"muted\">{}</td></tr>\n",
                r.id,
                encode_text(&r.query),
                encode_text(&r.created_at)
            ));
        }
        body.push_str("</table>\n");
    }

    page("Research reports", &body)
}

pub fn report(report: &Report, flash: Option<&Flash>) -> String {
    let mut body = String::new();
    body.push_str(&flash_banner(flash));
    body.push_str(&format!("<h1>{}</h1>\n", encode_text(&report.query)));
    body.push_str(&format!(
        "<p class=\"muted\">Created {}</p>\n",
        encode_text(&report.created_at)
    ));
    body.push_str(&format!(
        "<div class=\"summary\">{}</div>\n",
        encode_text(&report.summary)
    ));

    body.push_str("<h2>Sources</h2>\n<ol>\n");
    for s in &report.sources {
        let title = if s.title.is_empty() { "Source" } else { &s.title };
        body.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            encode_text(&s.url),
            encode_text(title)
        ));
    }
    body.push_str("</ol>\n<p><a href=\"/\">Back to reports</a></p>\n");

    page(&report.query, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SourceLink;

    #[test]
    fn index_escapes_query_text() {
        let reports = vec![ReportMeta {
            id: 1,
            query: "<script>alert(1)</script>".into(),
            created_at: "2026-08-29T00:00:00+00:00".into(),
        }];
        let html = index(&reports, &[], None);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn index_names_missing_keys() {
        let html = index(&[], &["TAVILY_API_KEY"], None);
        assert!(html.contains("TAVILY_API_KEY"));
        assert!(html.contains("Missing configuration"));
    }

    #[test]
    fn report_lists_sources_in_order() {
        let r = Report {
            id: 7,
            query: "rust vs go".into(),
            created_at: "2026-08-29T00:00:00+00:00".into(),
            summary: "- point [1]".into(),
            sources: vec![
                SourceLink {
                    title: "A".into(),
                    url: "http://a".into(),
                },
                SourceLink {
                    title: String::new(),
                    url: "http://b".into(),
                },
            ],
        };
        let html = report(&r, None);
        let a = html.find("http://a").expect("first source");
        let b = html.find("http://b").expect("second source");
        assert!(a < b, "sources must render in citation order");
        assert!(html.contains(">Source</a>"), "empty title falls back");
    }
}
