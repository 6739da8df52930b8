// tests/extract_classify.rs
//
// Document classification and extraction on pre-fetched payloads: URL-suffix
// routing always wins, HTML below the size threshold is rejected, and a
// broken PDF surfaces a parse error distinct from "no text".

use searchbrief::error::ExtractionError;
use searchbrief::extract::{classify, extract_from_doc, is_pdf_url, DocKind};
use searchbrief::fetch::FetchedDoc;

fn html_doc(html: &str) -> FetchedDoc {
    FetchedDoc {
        content_type: "text/html; charset=utf-8".into(),
        body: html.as_bytes().to_vec(),
    }
}

#[test]
fn pdf_suffix_routes_to_pdf_regardless_of_content_type() {
    // Served as HTML, but the path says .pdf: must go down the PDF path.
    assert_eq!(classify("http://x.org/a.PDF?dl=1", "text/html"), DocKind::Pdf);
    assert_eq!(classify("http://x.org/a.pdf", ""), DocKind::Pdf);
    assert_eq!(classify("http://x.org/a", "application/pdf"), DocKind::Pdf);
    assert_eq!(classify("http://x.org/a", "text/html"), DocKind::Html);
}

#[test]
fn pdf_suffix_matcher_edge_cases() {
    assert!(is_pdf_url("http://x.org/dir/report.pdf"));
    assert!(is_pdf_url("http://x.org/report.Pdf?session=abc&dl=1"));
    assert!(!is_pdf_url("http://x.org/report.pdfx"));
    assert!(!is_pdf_url("http://x.org/pdf/report.html"));
}

#[test]
fn html_payload_extracts_readable_text() {
    let filler = "a genuinely readable paragraph of article text ".repeat(10);
    let doc = html_doc(&format!(
        "<html><body><article><h1>Title</h1><p>{filler}</p></article></body></html>"
    ));
    let out = extract_from_doc("http://x.org/page", &doc).expect("extracts");
    assert_eq!(out.kind, DocKind::Html);
    assert!(out.text.contains("genuinely readable paragraph"));
    assert_eq!(out.url, "http://x.org/page");
}

#[test]
fn short_html_yields_empty_html_error() {
    let doc = html_doc("<html><body><p>hi</p></body></html>");
    let err = extract_from_doc("http://x.org/page", &doc).unwrap_err();
    assert!(matches!(err, ExtractionError::EmptyHtml));
    assert_eq!(err.to_string(), "Unable to extract text from HTML");
}

/// Assemble a one-page PDF with a single Helvetica text run. Object offsets
/// are computed while writing so the xref table is valid.
fn minimal_pdf(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
    }

    let xref_start = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    pdf.push_str("0000000000 65535 f \n");
    for off in offsets {
        pdf.push_str(&format!("{off:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.into_bytes()
}

#[test]
fn valid_pdf_payload_extracts_its_text() {
    let doc = FetchedDoc {
        content_type: "application/pdf".into(),
        body: minimal_pdf("Hello from the research pipeline"),
    };
    let out = extract_from_doc("http://x.org/paper.pdf", &doc).expect("valid PDF extracts");
    assert_eq!(out.kind, DocKind::Pdf);
    assert_eq!(out.url, "http://x.org/paper.pdf");
    assert!(
        out.text.contains("Hello from the research pipeline"),
        "content stream text must survive extraction, got: {:?}",
        out.text
    );
    assert_eq!(out.text, out.text.trim(), "extracted text is trimmed");
}

#[test]
fn garbage_pdf_bytes_yield_a_parse_error_not_empty() {
    let doc = FetchedDoc {
        content_type: "application/pdf".into(),
        body: b"this is not a pdf at all".to_vec(),
    };
    let err = extract_from_doc("http://x.org/broken.pdf", &doc).unwrap_err();
    assert!(
        matches!(err, ExtractionError::PdfParse(_)),
        "library failure must stay distinguishable, got: {err}"
    );
}

#[test]
fn html_served_with_pdf_suffix_fails_the_pdf_path() {
    // Spec-mandated routing: the suffix wins even when the payload is HTML,
    // so this must fail as a PDF problem, not fall back to HTML extraction.
    let filler = "plenty of readable text here ".repeat(20);
    let doc = FetchedDoc {
        content_type: "text/html".into(),
        body: format!("<html><body><p>{filler}</p></body></html>").into_bytes(),
    };
    let err = extract_from_doc("http://x.org/mislabeled.pdf", &doc).unwrap_err();
    assert!(matches!(
        err,
        ExtractionError::PdfParse(_) | ExtractionError::EmptyPdf
    ));
}
