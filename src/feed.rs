//! Support for creating RSS and Atom feeds from a list of posts.

use crate::config::{Author, Site};
use crate::post::Post;
use atom_syndication::{Category, Entry, Error as AtomError, Feed, Link, Person, Text};
use chrono::{DateTime, Utc};
use std::io::{self, Write};

/// Bundled configuration for creating a feed.
pub struct FeedConfig<'a> {
    pub site: &'a Site,
    pub author: &'a Author,

    /// Stamped as the feed's `lastBuildDate`/`updated`.
    pub build_date: DateTime<Utc>,
}

impl FeedConfig<'_> {
    fn self_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.site.base(), file_name)
    }
}

/// Formats `date` the way HTTP headers and RSS 2.0 expect, e.g.
/// `Mon, 15 Jan 2024 00:00:00 GMT`.
pub fn http_date(date: DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Writes an RSS 2.0 feed of `posts` (in the order given) to `w`.
pub fn write_rss<W: Write>(config: &FeedConfig, posts: &[Post], mut w: W) -> Result<()> {
    let site = config.site;
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8" ?>"#)?;
    writeln!(
        w,
        r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">"#
    )?;
    writeln!(w, "  <channel>")?;
    writeln!(w, "    <title>{}</title>", escape(&site.title))?;
    writeln!(w, "    <link>{}</link>", escape(site.base()))?;
    writeln!(w, "    <description>{}</description>", escape(&site.description))?;
    writeln!(w, "    <language>{}</language>", escape(&site.language))?;
    writeln!(
        w,
        "    <lastBuildDate>{}</lastBuildDate>",
        http_date(config.build_date)
    )?;
    writeln!(
        w,
        r#"    <atom:link href="{}" rel="self" type="application/rss+xml" />"#,
        escape(&config.self_url("feed.xml"))
    )?;

    for post in posts {
        let fm = &post.frontmatter;
        let url = escape(&site.post_url(&post.slug));
        writeln!(w, "    <item>")?;
        writeln!(w, "      <title>{}</title>", cdata(&fm.title))?;
        writeln!(w, "      <link>{}</link>", url)?;
        writeln!(w, r#"      <guid isPermaLink="true">{}</guid>"#, url)?;
        writeln!(w, "      <pubDate>{}</pubDate>", http_date(fm.date.instant()))?;
        writeln!(w, "      <description>{}</description>", cdata(&fm.description))?;
        for tag in &fm.tags {
            writeln!(w, "      <category>{}</category>", escape(tag))?;
        }
        writeln!(w, "    </item>")?;
    }

    writeln!(w, "  </channel>")?;
    writeln!(w, "</rss>")?;
    Ok(())
}

/// Wraps `text` in a CDATA section. A `]]>` inside the text is split across
/// two sections.
fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Creates an Atom feed of `posts` and writes it to `w`.
pub fn write_atom<W: Write>(config: &FeedConfig, posts: &[Post], w: W) -> Result<()> {
    atom(config, posts).write_to(w)?;
    Ok(())
}

fn atom(config: &FeedConfig, posts: &[Post]) -> Feed {
    let mut feed = Feed::default();
    feed.set_title(config.site.title.as_str());
    feed.set_id(config.site.url.to_string());
    feed.set_updated(config.build_date.fixed_offset());
    if !config.site.description.is_empty() {
        feed.set_subtitle(Some(Text::from(config.site.description.as_str())));
    }
    feed.set_links(vec![
        link(config.site.base(), "alternate"),
        link(&config.self_url("feed.atom"), "self"),
    ]);
    feed.set_entries(posts.iter().map(|p| entry(config, p)).collect::<Vec<Entry>>());
    feed
}

fn entry(config: &FeedConfig, post: &Post) -> Entry {
    let fm = &post.frontmatter;
    let url = config.site.post_url(&post.slug);
    let date = fm.date.instant().fixed_offset();

    let mut entry = Entry::default();
    entry.set_id(url.as_str());
    entry.set_title(fm.title.as_str());
    entry.set_updated(date);
    entry.set_published(Some(date));
    entry.set_links(vec![link(&url, "alternate")]);
    entry.set_authors(vec![person(post.author_or(&config.author.name), config)]);
    if !fm.description.is_empty() {
        entry.set_summary(Some(Text::from(fm.description.as_str())));
    }
    entry.set_categories(
        fm.tags
            .iter()
            .map(|tag| {
                let mut category = Category::default();
                category.set_term(tag.as_str());
                category
            })
            .collect::<Vec<Category>>(),
    );
    entry
}

fn link(href: &str, rel: &str) -> Link {
    let mut link = Link::default();
    link.set_href(href);
    link.set_rel(rel);
    link
}

/// The site author keeps their email; other authors are credited by name only.
fn person(name: &str, config: &FeedConfig) -> Person {
    let mut person = Person::default();
    person.set_name(name);
    if name == config.author.name {
        person.set_email(config.author.email.clone());
    }
    person
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem writing a feed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Returned when there is an Atom-related error.
    #[error(transparent)]
    Atom(#[from] AtomError),
}
