//! HTML link parsing for index pages
//!
//! An index page (`…/format/index/`) links to its sub-problems with plain
//! relative hrefs such as `hello/` or `mario/less/`. Everything else on the
//! page (navigation, anchors, external sites) must be ignored.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// A followable link found on an index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubLink {
    /// The href exactly as written (trimmed)
    pub href: String,
    /// The href resolved against the page's URL
    pub url: Url,
}

/// Decides whether an href names a same-tree sub-resource
///
/// # Rules
///
/// **Reject:**
/// - empty hrefs and anchors (`#top`, or any href containing `#`)
/// - dot-segment references (`.`, `..`, `./x`, `../x`)
/// - hrefs with a scheme (`https://…`, `mailto:…`) or a network location
///   (`//host/…`)
/// - host-absolute paths (`/x/2024/`)
///
/// **Accept:** plain relative paths like `week0/` or `mario/less/`.
pub fn is_followable(href: &str) -> bool {
    let href = href.trim();

    if href.is_empty() || href.contains('#') {
        return false;
    }

    if href.starts_with('.') || href.starts_with('/') {
        return false;
    }

    // Anything that parses on its own carries a scheme
    if Url::parse(href).is_ok() {
        return false;
    }

    // A colon before the first slash is a scheme the url crate rejected
    let head = href.split('/').next().unwrap_or(href);
    !head.contains(':')
}

/// Extracts the followable sub-links of an index page, in document order
///
/// Duplicate targets are reported once.
///
/// # Example
///
/// ```
/// use setup_scout::crawler::extract_sub_links;
/// use url::Url;
///
/// let html = r##"<a href="#top">Top</a><a href="hello/">Hello</a><a href="https://other.example/">x</a>"##;
/// let page = Url::parse("https://docs.example.edu/x/2024/psets/1/").unwrap();
/// let links = extract_sub_links(html, &page);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].url.as_str(), "https://docs.example.edu/x/2024/psets/1/hello/");
/// ```
pub fn extract_sub_links(html: &str, page_url: &Url) -> Vec<SubLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if !is_followable(href) {
            continue;
        }

        let href = href.trim();
        match page_url.join(href) {
            Ok(url) => {
                if seen.insert(url.clone()) {
                    links.push(SubLink {
                        href: href.to_string(),
                        url,
                    });
                }
            }
            Err(e) => tracing::debug!("Skipping unresolvable href {:?}: {}", href, e),
        }
    }

    links
}
