//! HTML for the single upload/result page.

use std::fmt::Write;

/// What the page shows below the upload form.
#[derive(Debug, Clone, Copy)]
pub enum PageState<'a> {
    /// Fresh visit, nothing uploaded yet.
    Idle,
    /// Upload processed; `links` may be empty.
    Extracted {
        links: &'a [String],
        download_link: &'a str,
        skipped_entries: usize,
    },
    /// Upload could not be processed.
    Failed { reason: &'a str },
}

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>hlx: HAR link extractor</title>
<style>
body { font-family: sans-serif; max-width: 60rem; margin: 2rem auto; padding: 0 1rem; }
ul.links { font-family: monospace; word-break: break-all; }
.error { color: #a40000; }
</style>
</head>
<body>
<h1>HAR link extractor</h1>
<form action="/upload" method="post" enctype="multipart/form-data">
<input type="file" name="harFile" accept=".har,application/json" required>
<button type="submit">Extract links</button>
</form>
"#;

const TAIL: &str = "</body>\n</html>\n";

pub fn render_page(state: &PageState<'_>) -> String {
    let mut html = String::from(HEAD);
    match state {
        PageState::Idle => {}
        PageState::Extracted {
            links,
            download_link,
            skipped_entries,
        } => render_links(&mut html, links, download_link, *skipped_entries),
        PageState::Failed { reason } => {
            let _ = writeln!(
                html,
                "<p class=\"error\">Could not process the capture: {}</p>",
                escape_html(reason)
            );
        }
    }
    html.push_str(TAIL);
    html
}

fn render_links(html: &mut String, links: &[String], download_link: &str, skipped: usize) {
    if links.is_empty() {
        html.push_str("<p>No links found.</p>\n");
    } else {
        let _ = writeln!(html, "<p>Found {} links.</p>", links.len());
    }
    // Every successful upload persists an artifact, empty or not.
    let _ = writeln!(
        html,
        "<p><a href=\"{}\" download>Download filtered_urls.txt</a></p>",
        escape_html(download_link)
    );
    if !links.is_empty() {
        html.push_str("<ul class=\"links\">\n");
        for link in links {
            let text = escape_html(link);
            if is_web_url(link) {
                let _ = writeln!(html, "<li><a href=\"{text}\">{text}</a></li>");
            } else {
                let _ = writeln!(html, "<li>{text}</li>");
            }
        }
        html.push_str("</ul>\n");
    }
    if skipped > 0 {
        let _ = writeln!(
            html,
            "<p>{} capture entries had no request URL and were ignored.</p>",
            skipped
        );
    }
}

/// Only http(s) links become anchors; anything else is shown as text.
fn is_web_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_has_form_and_no_result() {
        let html = render_page(&PageState::Idle);
        assert!(html.contains("name=\"harFile\""));
        assert!(!html.contains("No links found"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn extracted_lists_links_and_download() {
        let links = vec![
            "https://x/736x/a.jpg".to_string(),
            "https://x/736x/b.jpg?w=1&h=2".to_string(),
        ];
        let html = render_page(&PageState::Extracted {
            links: &links,
            download_link: "/downloads/abc/filtered_urls.txt",
            skipped_entries: 0,
        });
        assert!(html.contains("Found 2 links."));
        assert!(html.contains("href=\"/downloads/abc/filtered_urls.txt\""));
        assert!(html.contains("<a href=\"https://x/736x/a.jpg\">"));
        assert!(html.contains("b.jpg?w=1&amp;h=2"));
        assert!(!html.contains("ignored"));
    }

    #[test]
    fn extracted_empty_is_distinct_from_failure() {
        let empty = render_page(&PageState::Extracted {
            links: &[],
            download_link: "/downloads/abc/filtered_urls.txt",
            skipped_entries: 2,
        });
        assert!(empty.contains("No links found."));
        assert!(empty.contains("href=\"/downloads/abc/filtered_urls.txt\""));
        assert!(!empty.contains("class=\"links\""));
        assert!(empty.contains("2 capture entries"));
        assert!(!empty.contains("class=\"error\""));

        let failed = render_page(&PageState::Failed {
            reason: "expected a log.entries list",
        });
        assert!(failed.contains("class=\"error\""));
        assert!(!failed.contains("No links found."));
    }

    #[test]
    fn escapes_markup() {
        let links = vec!["javascript:alert('<x>')/736x/".to_string()];
        let html = render_page(&PageState::Extracted {
            links: &links,
            download_link: "/d",
            skipped_entries: 0,
        });
        assert!(html.contains("<li>javascript:alert(&#39;&lt;x&gt;&#39;)/736x/</li>"));
        assert!(!html.contains("href=\"javascript"));

        let failed = render_page(&PageState::Failed { reason: "<script>" });
        assert!(failed.contains("&lt;script&gt;"));
    }
}
