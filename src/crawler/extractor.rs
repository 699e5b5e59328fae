//! Setup-command extraction from problem pages
//!
//! A problem page explains how to fetch its starter files in a section
//! introduced by a level-2 heading such as "Getting Started". Within that
//! section the literal commands are inline `<code>` elements without a class
//! (highlighted blocks carry one) and without a `$` prompt marker.

use crate::config::{ExtractorConfig, DEFAULT_SECTION_HEADINGS};
use scraper::{ElementRef, Html, Node, Selector};

/// Text fragments pulled from one page, in document order, before cleaning
pub type RawCommand = Vec<String>;

/// The nodes following a marker, up to but excluding the next boundary
///
/// Works over any iterator, so the scoping rule does not depend on a
/// particular document tree API.
pub struct Section<I, F> {
    following: I,
    is_boundary: F,
    done: bool,
}

/// Scopes `following` (the siblings after a marker) to the marker's section
pub fn section<I, F>(following: I, is_boundary: F) -> Section<I::IntoIter, F>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> bool,
{
    Section {
        following: following.into_iter(),
        is_boundary,
        done: false,
    }
}

impl<I, F> Iterator for Section<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.following.next() {
            Some(node) if (self.is_boundary)(&node) => {
                self.done = true;
                None
            }
            Some(node) => Some(node),
            None => {
                self.done = true;
                None
            }
        }
    }
}

/// Extracts candidate setup commands from a page's HTML
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    headings: Vec<String>,
}

impl Default for CommandExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_SECTION_HEADINGS.iter().map(|s| s.to_string()).collect())
    }
}

impl CommandExtractor {
    pub fn new(headings: Vec<String>) -> Self {
        Self { headings }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.section_headings.clone())
    }

    /// Whether an H2's text introduces a setup section
    fn is_setup_heading(&self, text: &str) -> bool {
        self.headings.iter().any(|h| text.contains(h.as_str()))
    }

    /// Collects the inline code fragments under every matching H2
    ///
    /// Sections are visited in heading order, so fragments from several
    /// matching headings are concatenated in document order. An empty result
    /// means the page has nothing usable.
    pub fn extract(&self, html: &str) -> RawCommand {
        let document = Html::parse_document(html);
        let mut fragments = Vec::new();

        let (Ok(h2_selector), Ok(code_selector)) = (Selector::parse("h2"), Selector::parse("code"))
        else {
            return fragments;
        };

        for heading in document.select(&h2_selector) {
            let title: String = heading.text().collect();
            if !self.is_setup_heading(&title) {
                continue;
            }

            for node in section(heading.next_siblings(), |n| is_h2(n.value())) {
                let Some(element) = ElementRef::wrap(node) else {
                    continue;
                };

                if element.value().name() == "code" {
                    push_command(&mut fragments, element);
                } else {
                    for code in element.select(&code_selector) {
                        push_command(&mut fragments, code);
                    }
                }
            }
        }

        fragments
    }
}

fn is_h2(node: &Node) -> bool {
    node.as_element().is_some_and(|e| e.name() == "h2")
}

/// Keeps a `<code>` element's text if it looks like a literal command
fn push_command(fragments: &mut RawCommand, code: ElementRef<'_>) {
    if code.value().attr("class").is_some() {
        return;
    }

    let text: String = code.text().collect();
    if text.contains('$') {
        return;
    }

    let text = text.trim();
    if !text.is_empty() {
        fragments.push(text.to_string());
    }
}
