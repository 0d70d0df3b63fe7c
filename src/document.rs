//! Defines the [`Collection`] enum and the [`Document`] trait shared by every
//! kind of content record ([`crate::post::Post`],
//! [`crate::project::Project`]).

use serde::de::DeserializeOwned;
use std::cmp::Ordering;
use std::fmt;

/// The file extensions recognized in a collection directory, in order of
/// precedence. When two files share a stem, the one whose extension comes
/// first wins the slug.
pub const EXTENSIONS: [&str; 2] = ["mdx", "md"];

/// Returns the precedence rank of `extension`, or `None` when files with
/// that extension aren't content.
pub fn extension_rank(extension: &str) -> Option<usize> {
    EXTENSIONS.iter().position(|e| *e == extension)
}

/// Identifies one directory of content under the content root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Posts,
    Projects,
}

impl Collection {
    /// The name of the collection's directory under the content root.
    pub fn directory_name(self) -> &'static str {
        match self {
            Collection::Posts => "posts",
            Collection::Projects => "projects",
        }
    }

    /// Whether listing the collection creates its directory when it doesn't
    /// exist yet.
    pub fn creates_directory(self) -> bool {
        matches!(self, Collection::Projects)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.directory_name())
    }
}

/// A record loaded from a single content file: a slug derived from the file
/// name, typed frontmatter, and the raw Markdown body.
pub trait Document: Clone + Sized {
    /// The collection whose directory holds documents of this type.
    const COLLECTION: Collection;

    /// The schema of the document's frontmatter block.
    type Frontmatter: DeserializeOwned;

    fn from_parts(slug: String, frontmatter: Self::Frontmatter, body: String) -> Self;

    fn slug(&self) -> &str;

    /// The listing order of the collection. Listings are sorted with a stable
    /// sort, so documents that compare equal keep their enumeration order.
    fn listing_order(a: &Self, b: &Self) -> Ordering;
}
