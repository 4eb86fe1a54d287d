// src/scrape/mod.rs
pub mod providers;
pub mod types;

use once_cell::sync::OnceCell;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::scrape::types::Notice;

/// Target-path extensions that mark a hyperlink as the notice's attachment.
const DOC_EXTENSIONS: [&str; 3] = [".pdf", ".doc", ".docx"];

/// Visible-text marker for "go to the announcement" style links.
const LINK_MARKER: &str = "here";

struct Selectors {
    panel: Selector,
    title: Selector,
    anchors: Selector,
}

impl Selectors {
    fn new() -> Self {
        Self {
            panel: Selector::parse("div.panel.panel-default").unwrap(),
            title: Selector::parse("h4").unwrap(),
            anchors: Selector::parse("a[href]").unwrap(),
        }
    }
}

fn selectors() -> &'static Selectors {
    static CELL: OnceCell<Selectors> = OnceCell::new();
    CELL.get_or_init(Selectors::new)
}

/// Extract qualifying notices from the board page, newest first (page order),
/// at most `limit`. Only titles containing `keyword` (case-insensitive)
/// qualify. Panels without a title heading are skipped.
pub fn extract_notices(html: &str, base_url: &Url, keyword: &str, limit: usize) -> Vec<Notice> {
    let document = Html::parse_document(html);
    let sel = selectors();
    let keyword = keyword.to_lowercase();

    let mut notices = Vec::new();
    for panel in document.select(&sel.panel) {
        if notices.len() >= limit {
            break;
        }
        let Some(title_el) = panel.select(&sel.title).next() else {
            continue;
        };
        let title = title_el.text().collect::<String>().trim().to_string();
        if title.is_empty() || !title.to_lowercase().contains(&keyword) {
            continue;
        }

        let attachment_link = find_attachment(panel, sel, base_url);
        let external_link = find_external(panel, sel, base_url, attachment_link.as_deref());

        notices.push(Notice {
            title,
            attachment_link,
            external_link,
        });
    }
    notices
}

/// First hyperlink in the panel whose target path ends in a recognized
/// document extension, resolved against the page base. Unresolvable hrefs are
/// skipped as candidates.
fn find_attachment(panel: ElementRef, sel: &Selectors, base: &Url) -> Option<String> {
    panel.select(&sel.anchors).find_map(|a| {
        let href = a.value().attr("href")?;
        let resolved = base.join(href).ok()?;
        let path = resolved.path().to_lowercase();
        DOC_EXTENSIONS
            .iter()
            .any(|ext| path.ends_with(ext))
            .then(|| resolved.to_string())
    })
}

/// Hyperlink whose visible text carries the marker word, resolved against the
/// base; otherwise the first bare URL in the panel's plain text that is not
/// already the attachment.
fn find_external(
    panel: ElementRef,
    sel: &Selectors,
    base: &Url,
    attachment: Option<&str>,
) -> Option<String> {
    let marked = panel.select(&sel.anchors).find_map(|a| {
        let text = a.text().collect::<String>().to_lowercase();
        if !text.contains(LINK_MARKER) {
            return None;
        }
        let href = a.value().attr("href")?;
        base.join(href).ok().map(|u| u.to_string())
    });
    if marked.is_some() {
        return marked;
    }

    let text = panel.text().collect::<String>();
    bare_url_re()
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .find(|u| attachment != Some(u.as_str()))
}

fn bare_url_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r#"https?://[^\s<>"']+"#).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://hub.rgukt.ac.in/hub/notice/index").unwrap()
    }

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        let html = r#"
            <div class="panel panel-default"><h4>Backlog EXAMINATION Notice</h4></div>
            <div class="panel panel-default"><h4>Mid Exam Schedule</h4></div>
            <div class="panel panel-default"><h4>Sports Day</h4></div>
        "#;
        let out = extract_notices(html, &base(), "examination", 10);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Backlog EXAMINATION Notice");
        assert_eq!(out[0].identity(), "Backlog EXAMINATION Notice||");
    }

    #[test]
    fn attachment_resolves_relative_href() {
        let html = r#"
            <div class="panel panel-default">
              <h4>Semester Examination Time Table</h4>
              <a href="/hub/uploads/tt.PDF">Download: Notice Attachment</a>
            </div>
        "#;
        let out = extract_notices(html, &base(), "examination", 10);
        assert_eq!(
            out[0].attachment_link.as_deref(),
            Some("https://hub.rgukt.ac.in/hub/uploads/tt.PDF")
        );
    }

    #[test]
    fn panel_without_heading_is_skipped() {
        let html = r#"
            <div class="panel panel-default"><p>Examination mention, no heading</p></div>
            <div class="panel panel-default"><h4>Examination Notice</h4></div>
        "#;
        let out = extract_notices(html, &base(), "examination", 10);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Examination Notice");
    }

    #[test]
    fn bare_url_fallback_skips_the_attachment_itself() {
        let html = r#"
            <div class="panel panel-default">
              <h4>Examination Hall Tickets</h4>
              <a href="/hub/uploads/ht.docx">Download</a>
              <p>Also at https://hub.rgukt.ac.in/hub/uploads/ht.docx</p>
            </div>
        "#;
        let out = extract_notices(html, &base(), "examination", 10);
        assert_eq!(
            out[0].attachment_link.as_deref(),
            Some("https://hub.rgukt.ac.in/hub/uploads/ht.docx")
        );
        assert_eq!(out[0].external_link, None);
    }
}
