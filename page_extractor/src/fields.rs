//! Field extractors over a normalized document.
//!
//! Each extractor is a pure function of the tree and falls back to a default
//! instead of failing.

use scraper::{ElementRef, Html, Selector};

use crate::Heading;

pub const DEFAULT_TITLE: &str = "No title";

/// Candidate roots for body text, highest priority first.
const CONTENT_ROOTS: [&str; 4] = ["main", "article", "div.content", "body"];

/// Everything the summarizer needs, before any capping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFields {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub headings: Vec<Heading>,
    pub body_text: String,
}

pub fn extract_fields(document: &Html) -> PageFields {
    PageFields {
        title: extract_title(document),
        description: extract_description(document),
        keywords: extract_keywords(document),
        headings: extract_headings(document),
        body_text: extract_body_text(document),
    }
}

fn first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.root_element().select(&selector).next()
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    first(document, selector)
        .map(|el| el.value().attr("content").unwrap_or_default().to_string())
}

pub fn extract_title(document: &Html) -> String {
    first(document, "title")
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// `meta[name=description]`, then `og:description`.
pub fn extract_description(document: &Html) -> String {
    meta_content(document, r#"meta[name="description"]"#)
        .or_else(|| meta_content(document, r#"meta[property="og:description"]"#))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

pub fn extract_keywords(document: &Html) -> String {
    meta_content(document, r#"meta[name="keywords"]"#).unwrap_or_default()
}

/// All h1s, then all h2s, and so on; document order within each level.
pub fn extract_headings(document: &Html) -> Vec<Heading> {
    let mut headings = Vec::new();
    for level in 1..=6u8 {
        let Ok(selector) = Selector::parse(&format!("h{level}")) else {
            continue;
        };
        for el in document.root_element().select(&selector) {
            headings.push(Heading {
                level,
                text: el.text().collect::<String>().trim().to_string(),
            });
        }
    }
    headings
}

/// html5ever always synthesizes a `<body>`, so the last root always matches.
/// Text that only lives in `<head>`, such as the title, is never included.
pub fn extract_body_text(document: &Html) -> String {
    let raw: String = CONTENT_ROOTS
        .iter()
        .find_map(|sel| first(document, sel))
        .map(|root| root.text().collect())
        .unwrap_or_default();
    collapse_whitespace(&raw)
}

/// Flattens text into one paragraph: lines and double-space separated
/// phrases are trimmed, empty ones dropped, the rest joined by single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split(is_line_break)
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}
