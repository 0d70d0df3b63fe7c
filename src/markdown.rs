//! Renders post bodies to HTML. Headings are given `id` attributes from a
//! [`Slugger`] so that the outline produced by [`crate::toc`] links to them.

use crate::slugger::Slugger;
use pulldown_cmark::{html, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// The Markdown extensions enabled for post bodies.
pub fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Parses `markdown` into events, assigning every heading its anchor id.
pub(crate) fn events(markdown: &str) -> Vec<Event<'_>> {
    let mut events: Vec<Event> = Parser::new_ext(markdown, options()).collect();
    let mut slugger = Slugger::new();
    for heading in headings(&events) {
        let id = slugger.slug(&heading.text);
        if let Event::Start(Tag::Heading { id: slot, .. }) = &mut events[heading.start] {
            *slot = Some(CowStr::from(id));
        }
    }
    events
}

/// A heading found in an event stream.
pub(crate) struct HeadingSpan {
    /// The index of the heading's [`Event::Start`].
    pub start: usize,
    pub level: HeadingLevel,
    /// The heading's visible text, markup removed.
    pub text: String,
}

/// Locates the headings of an event stream along with their text.
pub(crate) fn headings(events: &[Event]) -> Vec<HeadingSpan> {
    let mut spans = Vec::new();
    let mut open: Option<HeadingSpan> = None;
    for (i, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                open = Some(HeadingSpan {
                    start: i,
                    level: *level,
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(mut span) = open.take() {
                    span.text = span.text.trim().to_owned();
                    spans.push(span);
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(span) = open.as_mut() {
                    span.text.push_str(text);
                }
            }
            _ => {}
        }
    }
    spans
}

/// Converts `markdown` to HTML.
pub fn to_html(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events(markdown).into_iter());
    out
}
