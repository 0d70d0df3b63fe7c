//! The search box filter: a case-insensitive, every-word substring match over
//! post titles, descriptions, and tags.

use crate::post::Post;
use serde::Serialize;

/// The most results a search returns.
pub const MAX_RESULTS: usize = 5;

/// The narrow view of a [`Post`] handed to the search box. It never carries
/// the body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub read_time: Option<String>,
}

impl From<&Post> for SearchResult {
    fn from(post: &Post) -> SearchResult {
        let fm = &post.frontmatter;
        SearchResult {
            slug: post.slug.clone(),
            title: fm.title.clone(),
            description: fm.description.clone(),
            date: fm.date.to_string(),
            tags: fm.tags.clone(),
            cover_image: fm.cover_image.clone(),
            read_time: fm.read_time.clone(),
        }
    }
}

/// Returns up to [`MAX_RESULTS`] posts of `corpus` matching `query`. A post
/// matches when every whitespace-separated word of the query occurs in its
/// title, description, or tags (each word may hit a different field). Posts
/// with a query word in the title come first; otherwise `corpus` order is
/// kept.
pub fn search(query: &str, corpus: &[Post]) -> Vec<SearchResult> {
    let query = query.trim().to_lowercase();
    let words: Vec<&str> = query.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<(bool, &Post)> = corpus
        .iter()
        .filter_map(|post| {
            let fields = Fields::of(post);
            if words.iter().all(|w| fields.contains(w)) {
                Some((words.iter().any(|w| fields.title.contains(w)), post))
            } else {
                None
            }
        })
        .collect();

    // Stable, so each partition keeps corpus order.
    matches.sort_by_key(|(title_hit, _)| !title_hit);
    matches
        .into_iter()
        .take(MAX_RESULTS)
        .map(|(_, post)| SearchResult::from(post))
        .collect()
}

/// The lower-cased searchable text of a post.
struct Fields {
    title: String,
    description: String,
    tags: String,
}

impl Fields {
    fn of(post: &Post) -> Fields {
        let fm = &post.frontmatter;
        Fields {
            title: fm.title.to_lowercase(),
            description: fm.description.to_lowercase(),
            tags: fm.tags.join(" ").to_lowercase(),
        }
    }

    fn contains(&self, word: &str) -> bool {
        self.title.contains(word) || self.description.contains(word) || self.tags.contains(word)
    }
}
