//! Generates `sitemap.xml` and `robots.txt`.

use crate::config::{Robots, Site};
use crate::post::{Post, TagInfo};
use chrono::{DateTime, SecondsFormat, Utc};
use std::io::{self, Write};

/// How often a page is expected to change, as a sitemap `changefreq`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

/// One `<url>` of a sitemap.
#[derive(Clone, Debug, PartialEq)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Lists the pages of the site: the static pages, then every post, then every
/// tag page. Pages without a date of their own use `now`.
pub fn entries(site: &Site, posts: &[Post], tags: &[TagInfo], now: DateTime<Utc>) -> Vec<SitemapEntry> {
    let page = |path: &str, change_frequency: ChangeFrequency, priority: f32| SitemapEntry {
        url: format!("{}{}", site.base(), path),
        last_modified: now,
        change_frequency,
        priority,
    };

    let mut entries = vec![
        page("", ChangeFrequency::Daily, 1.0),
        page("/about", ChangeFrequency::Monthly, 0.8),
        page("/tags", ChangeFrequency::Weekly, 0.7),
    ];
    entries.extend(posts.iter().map(|post| SitemapEntry {
        url: site.post_url(&post.slug),
        last_modified: post.frontmatter.date.instant(),
        change_frequency: ChangeFrequency::Weekly,
        priority: 0.9,
    }));
    entries.extend(tags.iter().map(|tag| SitemapEntry {
        url: site.tag_url(&tag.name),
        last_modified: now,
        change_frequency: ChangeFrequency::Weekly,
        priority: 0.6,
    }));
    entries
}

pub fn write_sitemap<W: Write>(entries: &[SitemapEntry], mut w: W) -> io::Result<()> {
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(w, r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#)?;
    for entry in entries {
        writeln!(w, "<url>")?;
        writeln!(w, "<loc>{}</loc>", entry.url.replace('&', "&amp;"))?;
        writeln!(
            w,
            "<lastmod>{}</lastmod>",
            entry.last_modified.to_rfc3339_opts(SecondsFormat::Millis, true)
        )?;
        writeln!(w, "<changefreq>{}</changefreq>", entry.change_frequency.as_str())?;
        writeln!(w, "<priority>{}</priority>", entry.priority)?;
        writeln!(w, "</url>")?;
    }
    writeln!(w, "</urlset>")?;
    Ok(())
}

pub fn write_robots<W: Write>(site: &Site, robots: &Robots, mut w: W) -> io::Result<()> {
    writeln!(w, "User-Agent: *")?;
    writeln!(w, "Allow: /")?;
    for path in &robots.disallow {
        writeln!(w, "Disallow: {}", path)?;
    }
    writeln!(w)?;
    writeln!(w, "Sitemap: {}/sitemap.xml", site.base())?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::query::test::post;
    use chrono::TimeZone;

    fn site() -> Site {
        serde_yaml::from_str("name: Dev\ntitle: Dev\nurl: https://dev.example\n").expect("site yaml")
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_entries() {
        let posts = vec![post("hello world", "2024-01-15", &["c#"])];
        let tags = vec![TagInfo {
            name: String::from("c#"),
            count: 1,
        }];
        let entries = entries(&site(), &posts, &tags, now());
        let urls: Vec<&str> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            vec![
                "https://dev.example",
                "https://dev.example/about",
                "https://dev.example/tags",
                "https://dev.example/post/hello%20world",
                "https://dev.example/tags/c%23",
            ],
            urls
        );
        assert_eq!(post("x", "2024-01-15", &[]).frontmatter.date.instant(), entries[3].last_modified);
        assert_eq!(0.9, entries[3].priority);
        assert_eq!(ChangeFrequency::Daily, entries[0].change_frequency);
    }

    #[test]
    fn test_write_sitemap() -> io::Result<()> {
        let entries = entries(&site(), &[], &[], now());
        let mut out = Vec::new();
        write_sitemap(&entries, &mut out)?;
        let xml = String::from_utf8_lossy(&out);
        assert!(xml.contains("<loc>https://dev.example/about</loc>"));
        assert!(xml.contains("<lastmod>2024-06-01T00:00:00.000Z</lastmod>"));
        assert!(xml.contains("<changefreq>monthly</changefreq>"));
        assert!(xml.contains("<priority>1</priority>"));
        assert!(xml.contains("<priority>0.8</priority>"));
        assert_eq!(3, xml.matches("<url>").count());
        Ok(())
    }

    #[test]
    fn test_write_robots() -> io::Result<()> {
        let robots = Robots {
            disallow: vec![String::from("/api/")],
        };
        let mut out = Vec::new();
        write_robots(&site(), &robots, &mut out)?;
        assert_eq!(
            "User-Agent: *\nAllow: /\nDisallow: /api/\n\nSitemap: https://dev.example/sitemap.xml\n",
            String::from_utf8_lossy(&out)
        );
        Ok(())
    }
}
