//! Builds the flat table of contents shown next to a post.

use crate::markdown;
use pulldown_cmark::{Event, Tag};
use serde::Serialize;

/// One entry of a post's outline. `id` is the anchor [`markdown::to_html`]
/// gives the same heading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Extracts the headings of a Markdown body in document order. Headings with
/// no visible text are left out of the outline.
pub fn extract_headings(body: &str) -> Vec<Heading> {
    let events = markdown::events(body);
    markdown::headings(&events)
        .into_iter()
        .filter_map(|span| {
            let id = match &events[span.start] {
                Event::Start(Tag::Heading { id: Some(id), .. }) => id.to_string(),
                _ => return None,
            };
            if span.text.is_empty() || id.is_empty() {
                return None;
            }
            Some(Heading {
                id,
                text: span.text,
                level: span.level as u8,
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn heading(id: &str, text: &str, level: u8) -> Heading {
        Heading {
            id: id.to_owned(),
            text: text.to_owned(),
            level,
        }
    }

    #[test]
    fn test_outline() {
        let body = "# Hello\n\nintro\n\n## What's *next*?\n\n### [Links](https://example.com) too\n\n## Hello\n";
        assert_eq!(
            vec![
                heading("hello", "Hello", 1),
                heading("whats-next", "What’s next?", 2),
                heading("links-too", "Links too", 3),
                heading("hello-1", "Hello", 2),
            ],
            extract_headings(body)
        );
    }

    #[test]
    fn test_ids_match_rendered_anchors() {
        let body = "## Setup\n\n```\n# comment\n```\n\n## Setup\n";
        let html = markdown::to_html(body);
        let headings = extract_headings(body);
        assert_eq!(2, headings.len());
        for heading in headings {
            assert!(html.contains(&format!("id=\"{}\"", heading.id)), "{}", html);
        }
    }

    #[test]
    fn test_symbol_only_heading_skipped() {
        assert!(extract_headings("## !!!\n").is_empty());
    }

    #[test]
    fn test_no_headings() {
        assert!(extract_headings("just a paragraph").is_empty());
    }
}
