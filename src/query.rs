//! Queries over a list of [`Post`]s. Every function expects the list in
//! listing order (most recent first), as returned by
//! [`crate::index::ContentIndex::posts`], and preserves that order in its
//! results.

use crate::post::{AdjacentPosts, Post, SeriesEntry, SeriesInfo, TagInfo};
use std::collections::HashMap;

/// Counts how many posts carry each tag. The result is sorted by count,
/// descending; equal counts keep the order in which the tags were first seen.
pub fn tag_counts(posts: &[Post]) -> Vec<TagInfo> {
    count(posts.iter().flat_map(|p| p.frontmatter.tags.iter()))
}

/// Like [`tag_counts`], keyed by the `category` field. Posts without a
/// category are skipped.
pub fn category_counts(posts: &[Post]) -> Vec<TagInfo> {
    count(posts.iter().filter_map(|p| p.frontmatter.category.as_ref()))
}

fn count<'a>(names: impl Iterator<Item = &'a String>) -> Vec<TagInfo> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<TagInfo> = Vec::new();
    for name in names {
        match positions.get(name.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                positions.insert(name, counts.len());
                counts.push(TagInfo {
                    name: name.clone(),
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// The posts whose tags include `tag` exactly.
pub fn with_tag<'a>(posts: &'a [Post], tag: &'a str) -> impl Iterator<Item = &'a Post> {
    posts.iter().filter(move |p| p.has_tag(tag))
}

pub fn in_category<'a>(
    posts: &'a [Post],
    category: &'a str,
) -> impl Iterator<Item = &'a Post> {
    posts.iter().filter(move |p| p.in_category(category))
}

/// Collects the posts of series `name` sorted by their series order, or
/// `None` when no post belongs to it.
pub fn series(posts: &[Post], name: &str) -> Option<SeriesInfo> {
    let mut entries: Vec<SeriesEntry> = posts
        .iter()
        .filter(|p| p.frontmatter.series.as_deref() == Some(name))
        .map(|p| SeriesEntry {
            slug: p.slug.clone(),
            title: p.frontmatter.title.clone(),
            order: p.series_order(),
        })
        .collect();
    if entries.is_empty() {
        return None;
    }
    entries.sort_by_key(|e| e.order);
    Some(SeriesInfo {
        name: name.to_owned(),
        posts: entries,
    })
}

/// Finds the neighbours of the post `slug`. Both are absent when the slug
/// isn't in `posts`.
pub fn adjacent<'a>(posts: &'a [Post], slug: &str) -> AdjacentPosts<&'a Post> {
    match posts.iter().position(|p| p.slug == slug) {
        None => AdjacentPosts {
            previous: None,
            next: None,
        },
        Some(i) => AdjacentPosts {
            previous: posts.get(i + 1),
            next: i.checked_sub(1).and_then(|j| posts.get(j)),
        },
    }
}
