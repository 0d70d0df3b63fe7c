//! Defines the [`Post`] type and the aggregate views computed over a list of
//! posts ([`TagInfo`], [`SeriesInfo`], [`AdjacentPosts`]).

use crate::document::{Collection, Document};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A blog post: the slug (file name less its extension), the parsed
/// frontmatter, and the raw Markdown body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Post {
    pub slug: String,
    pub frontmatter: PostFrontmatter,
    pub body: String,
}

impl Post {
    /// The author to display, falling back to the site-wide author.
    pub fn author_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.frontmatter.author.as_deref().unwrap_or(fallback)
    }

    /// The read time to display, falling back to the configured default.
    pub fn read_time_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.frontmatter.read_time.as_deref().unwrap_or(fallback)
    }

    /// The post's position within its series; absent orders count as 0.
    pub fn series_order(&self) -> i64 {
        self.frontmatter.series_order.unwrap_or(0)
    }

    /// Exact, case-sensitive tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.frontmatter.tags.iter().any(|t| t == tag)
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.frontmatter.category.as_deref() == Some(category)
    }
}

impl Document for Post {
    const COLLECTION: Collection = Collection::Posts;
    type Frontmatter = PostFrontmatter;

    fn from_parts(slug: String, frontmatter: PostFrontmatter, body: String) -> Post {
        Post {
            slug,
            frontmatter,
            body,
        }
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    /// Most recent first.
    fn listing_order(a: &Post, b: &Post) -> Ordering {
        b.frontmatter.date.cmp(&a.frontmatter.date)
    }
}

/// The frontmatter block of a post. `title` and `date` are required; every
/// other field has a default.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFrontmatter {
    pub title: String,

    pub date: PostDate,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub cover_image: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub author: Option<String>,

    /// Authors write this either as `"5"` or `5`.
    #[serde(default, deserialize_with = "string_or_number")]
    pub read_time: Option<String>,

    #[serde(default)]
    pub series: Option<String>,

    #[serde(default)]
    pub series_order: Option<i64>,

    #[serde(default)]
    pub category: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Integer(i) => i.to_string(),
        Raw::Float(f) => f.to_string(),
    }))
}

/// A post's publication date. The text as written in the frontmatter is kept
/// for display while ordering uses the parsed instant.
#[derive(Clone, Debug)]
pub struct PostDate {
    raw: String,
    instant: DateTime<Utc>,
}

impl PostDate {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }
}

impl FromStr for PostDate {
    type Err = chrono::ParseError;

    /// Parses `YYYY-MM-DD` (midnight UTC), RFC 3339, or a zone-less date and
    /// time (taken as UTC).
    fn from_str(s: &str) -> Result<PostDate, chrono::ParseError> {
        const NAIVE_FORMATS: [&str; 3] =
            ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

        let trimmed = s.trim();
        let instant = match DateTime::parse_from_rfc3339(trimmed) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(_) => {
                let naive = NAIVE_FORMATS
                    .iter()
                    .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok());
                match naive {
                    Some(naive) => Utc.from_utc_datetime(&naive),
                    None => Utc.from_utc_datetime(
                        &NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")?.and_time(NaiveTime::MIN),
                    ),
                }
            }
        };
        Ok(PostDate {
            raw: trimmed.to_owned(),
            instant,
        })
    }
}

impl<'de> Deserialize<'de> for PostDate {
    fn deserialize<D>(deserializer: D) -> Result<PostDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<PostDate>()
            .map_err(|e| D::Error::custom(format!("invalid date `{}`: {}", raw, e)))
    }
}

impl Serialize for PostDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl PartialEq for PostDate {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}
impl Eq for PostDate {}

impl PartialOrd for PostDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PostDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl fmt::Display for PostDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A tag or category name together with the number of posts carrying it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagInfo {
    pub name: String,
    pub count: usize,
}

/// The posts of a named series in reading order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeriesInfo {
    pub name: String,
    pub posts: Vec<SeriesEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeriesEntry {
    pub slug: String,
    pub title: String,
    pub order: i64,
}

/// The neighbours of a post in listing order. `next` is the more recent post
/// and `previous` the older one.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AdjacentPosts<P = Post> {
    pub previous: Option<P>,
    pub next: Option<P>,
}

impl AdjacentPosts<&Post> {
    pub fn cloned(&self) -> AdjacentPosts {
        AdjacentPosts {
            previous: self.previous.cloned(),
            next: self.next.cloned(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(yaml: &str) -> serde_yaml::Result<PostFrontmatter> {
        serde_yaml::from_str(yaml)
    }

    #[test]
    fn test_defaults() -> serde_yaml::Result<()> {
        let fm = parse("title: Hello\ndate: 2024-01-15\n")?;
        assert_eq!("Hello", fm.title);
        assert_eq!("2024-01-15", fm.date.as_str());
        assert_eq!("", fm.description);
        assert!(fm.tags.is_empty());
        assert_eq!(None, fm.series_order);
        assert_eq!(None, fm.category);

        let post = Post::from_parts("hello".to_owned(), fm, String::new());
        assert_eq!(0, post.series_order());
        assert_eq!("Site Author", post.author_or("Site Author"));
        assert_eq!("5", post.read_time_or("5"));
        Ok(())
    }

    #[test]
    fn test_camel_case_fields() -> serde_yaml::Result<()> {
        let fm = parse(
            "title: T\ndate: '2024-01-15'\ncoverImage: /img.png\nreadTime: 7\n\
             series: Rust\nseriesOrder: 3\ntags: [a, B]\ncategory: Guides\n",
        )?;
        assert_eq!(Some("/img.png"), fm.cover_image.as_deref());
        assert_eq!(Some("7"), fm.read_time.as_deref());
        assert_eq!(Some("Rust"), fm.series.as_deref());
        assert_eq!(Some(3), fm.series_order);

        let post = Post::from_parts("t".to_owned(), fm, String::new());
        assert!(post.has_tag("B"));
        assert!(!post.has_tag("b"));
        assert!(post.in_category("Guides"));
        Ok(())
    }

    #[test]
    fn test_missing_title_is_rejected() {
        assert!(parse("date: 2024-01-15\n").is_err());
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        assert!(parse("title: T\ndate: yesterday\n").is_err());
    }

    #[test]
    fn test_date_forms() -> Result<(), chrono::ParseError> {
        let midnight: PostDate = "2024-01-15".parse()?;
        let morning: PostDate = "2024-01-15T09:30:00".parse()?;
        let offset: PostDate = "2024-01-15T10:30:00+01:00".parse()?;
        let spaced: PostDate = "2024-01-15 09:30:00".parse()?;

        assert!(midnight < morning);
        assert_eq!(morning, offset);
        assert_eq!(morning, spaced);
        assert_eq!("2024-01-15T10:30:00+01:00", offset.as_str());
        Ok(())
    }
}
