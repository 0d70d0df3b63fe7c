//! Loads documents from a content directory and answers queries over them.
//!
//! [`ContentIndex`] re-reads the collection directory on every call, the way a
//! static build pays the cost once per page. [`Snapshot`] reads both
//! collections once and then answers the same queries from memory; it is never
//! invalidated, since content doesn't change while a site is being built.
//!
//! Each operation comes in two flavours. The `scan`/`load` functions return a
//! [`Result`] so failures stay visible to tests and tools. The query functions
//! (`posts`, `post`, `all_tags`, ...) degrade instead: a missing directory is
//! an empty collection, a missing or malformed file is an absent document,
//! and one broken document never hides the rest of a listing.

use crate::document::{extension_rank, Collection, Document, EXTENSIONS};
use crate::frontmatter;
use crate::post::{AdjacentPosts, Post, SeriesInfo, TagInfo};
use crate::project::Project;
use crate::query;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A content root holding one directory per [`Collection`].
#[derive(Clone, Debug)]
pub struct ContentIndex {
    root: PathBuf,
}

impl ContentIndex {
    pub fn new(root: impl Into<PathBuf>) -> ContentIndex {
        ContentIndex { root: root.into() }
    }

    /// The directory holding the documents of `collection`.
    pub fn directory(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.directory_name())
    }

    /// Reads every document of collection `D` and returns them in listing
    /// order, along with the files that couldn't be loaded. A missing
    /// directory yields an empty listing (after creating the directory for
    /// collections that ask for it).
    pub fn scan<D: Document>(&self) -> Result<Listing<D>> {
        let dir = self.directory(D::COLLECTION);
        if !dir.is_dir() {
            if D::COLLECTION.creates_directory() {
                std::fs::create_dir_all(&dir).map_err(|source| Error::Io {
                    path: dir.clone(),
                    source,
                })?;
                debug!(collection = %D::COLLECTION, dir = %dir.display(), "created collection directory");
            }
            return Ok(Listing::default());
        }

        let (sources, mut rejected) = collect_sources(&dir)?;
        let mut documents = Vec::with_capacity(sources.len());
        for source in sources {
            match read::<D>(&source.path, source.slug) {
                Ok(document) => documents.push(document),
                Err(error) => rejected.push(Rejected {
                    path: source.path,
                    error,
                }),
            }
        }

        documents.sort_by(D::listing_order);
        debug!(
            collection = %D::COLLECTION,
            documents = documents.len(),
            rejected = rejected.len(),
            "scanned collection"
        );
        Ok(Listing {
            documents,
            rejected,
        })
    }

    /// Loads the single document of collection `D` whose slug is `slug`. The
    /// slug is percent-decoded first since it usually comes from a URL path.
    pub fn load<D: Document>(&self, slug: &str) -> Result<D> {
        let slug = decode_slug(slug)?;
        let dir = self.directory(D::COLLECTION);
        for extension in EXTENSIONS {
            let path = dir.join(format!("{}.{}", slug, extension));
            if path.is_file() {
                return read(&path, slug);
            }
        }
        Err(Error::NotFound {
            collection: D::COLLECTION,
            slug,
        })
    }

    /// Like [`ContentIndex::scan`], but logs and drops everything that went
    /// wrong.
    pub fn list<D: Document>(&self) -> Vec<D> {
        match self.scan::<D>() {
            Ok(listing) => listing.into_documents(),
            Err(error) => {
                warn!(collection = %D::COLLECTION, %error, "listing collection failed");
                Vec::new()
            }
        }
    }

    /// Like [`ContentIndex::load`], but any failure is an absent document.
    pub fn get<D: Document>(&self, slug: &str) -> Option<D> {
        match self.load::<D>(slug) {
            Ok(document) => Some(document),
            Err(error @ Error::NotFound { .. }) => {
                debug!(%error, "document lookup missed");
                None
            }
            Err(error) => {
                warn!(collection = %D::COLLECTION, slug, %error, "document lookup failed");
                None
            }
        }
    }

    /// Every post, most recent first.
    pub fn posts(&self) -> Vec<Post> {
        self.list()
    }

    /// Every project, highest priority first, then by name.
    pub fn projects(&self) -> Vec<Project> {
        self.list()
    }

    pub fn post(&self, slug: &str) -> Option<Post> {
        self.get(slug)
    }

    pub fn project(&self, slug: &str) -> Option<Project> {
        self.get(slug)
    }

    pub fn all_tags(&self) -> Vec<TagInfo> {
        query::tag_counts(&self.posts())
    }

    pub fn all_categories(&self) -> Vec<TagInfo> {
        query::category_counts(&self.posts())
    }

    pub fn posts_by_tag(&self, tag: &str) -> Vec<Post> {
        let posts = self.posts();
        query::with_tag(&posts, tag).cloned().collect()
    }

    pub fn posts_by_category(&self, category: &str) -> Vec<Post> {
        let posts = self.posts();
        query::in_category(&posts, category).cloned().collect()
    }

    pub fn series_by_name(&self, name: &str) -> Option<SeriesInfo> {
        query::series(&self.posts(), name)
    }

    /// The older (`previous`) and more recent (`next`) neighbours of a post.
    pub fn adjacent_posts(&self, slug: &str) -> AdjacentPosts {
        let posts = self.posts();
        match decode_slug(slug) {
            Ok(slug) => query::adjacent(&posts, &slug).cloned(),
            Err(_) => AdjacentPosts {
                previous: None,
                next: None,
            },
        }
    }

    /// Reads both collections once.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            posts: self.posts(),
            projects: self.projects(),
        }
    }
}

/// Both collections of a [`ContentIndex`], loaded once and held in memory.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    posts: Vec<Post>,
    projects: Vec<Project>,
}

impl Snapshot {
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn post(&self, slug: &str) -> Option<&Post> {
        let slug = decode_slug(slug).ok()?;
        self.posts.iter().find(|p| p.slug == slug)
    }

    pub fn project(&self, slug: &str) -> Option<&Project> {
        let slug = decode_slug(slug).ok()?;
        self.projects.iter().find(|p| p.slug == slug)
    }

    pub fn all_tags(&self) -> Vec<TagInfo> {
        query::tag_counts(&self.posts)
    }

    pub fn all_categories(&self) -> Vec<TagInfo> {
        query::category_counts(&self.posts)
    }

    pub fn posts_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Post> {
        query::with_tag(&self.posts, tag)
    }

    pub fn posts_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Post> {
        query::in_category(&self.posts, category)
    }

    pub fn series_by_name(&self, name: &str) -> Option<SeriesInfo> {
        query::series(&self.posts, name)
    }

    pub fn adjacent_posts(&self, slug: &str) -> AdjacentPosts<&Post> {
        match decode_slug(slug) {
            Ok(slug) => query::adjacent(&self.posts, &slug),
            Err(_) => AdjacentPosts {
                previous: None,
                next: None,
            },
        }
    }
}

/// The outcome of scanning a collection directory.
#[derive(Debug)]
pub struct Listing<D> {
    /// The loaded documents in listing order.
    pub documents: Vec<D>,

    /// The files that were skipped, with the reason.
    pub rejected: Vec<Rejected>,
}

impl<D> Default for Listing<D> {
    fn default() -> Self {
        Listing {
            documents: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl<D> Listing<D> {
    /// Logs every rejected file and returns the documents.
    pub fn into_documents(self) -> Vec<D> {
        for rejected in &self.rejected {
            warn!(
                path = %rejected.path.display(),
                error = %rejected.error,
                "skipping document"
            );
        }
        self.documents
    }
}

/// A content file that couldn't be loaded.
#[derive(Debug)]
pub struct Rejected {
    pub path: PathBuf,
    pub error: Error,
}

/// A content file found in a collection directory, not yet parsed.
struct Source {
    slug: String,
    rank: usize,
    path: PathBuf,
}

/// Enumerates the content files of `dir` sorted by file name. Files whose
/// stems collide are resolved by extension precedence; the losers come back
/// as rejections.
fn collect_sources(dir: &Path) -> Result<(Vec<Source>, Vec<Rejected>)> {
    let mut sources: Vec<Source> = Vec::new();
    let mut rejected: Vec<Rejected> = Vec::new();
    let mut by_slug: HashMap<String, usize> = HashMap::new();

    for result in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match result {
            Ok(entry) => entry,
            // A dangling symlink rejects one entry. Errors on `dir` itself
            // still fail the scan.
            Err(err) if err.depth() > 0 => {
                rejected.push(Rejected {
                    path: err.path().unwrap_or(dir).to_owned(),
                    error: Error::WalkDir(err),
                });
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let rank = match path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(extension_rank)
        {
            Some(rank) => rank,
            None => {
                debug!(path = %path.display(), "ignoring non-content file");
                continue;
            }
        };
        let slug = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_owned(),
            None => {
                rejected.push(Rejected {
                    error: Error::InvalidFileName(path.clone()),
                    path,
                });
                continue;
            }
        };

        let source = Source { slug, rank, path };
        match by_slug.get(&source.slug) {
            None => {
                by_slug.insert(source.slug.clone(), sources.len());
                sources.push(source);
            }
            Some(&i) => {
                let loser = if source.rank < sources[i].rank {
                    std::mem::replace(&mut sources[i], source)
                } else {
                    source
                };
                rejected.push(Rejected {
                    error: Error::DuplicateSlug {
                        slug: loser.slug,
                        kept: sources[i].path.clone(),
                    },
                    path: loser.path,
                });
            }
        }
    }
    Ok((sources, rejected))
}

/// Reads and parses a single content file.
fn read<D: Document>(path: &Path, slug: String) -> Result<D> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;
    let (frontmatter, body) =
        frontmatter::parse::<D::Frontmatter>(&contents).map_err(|source| {
            Error::Frontmatter {
                path: path.to_owned(),
                source,
            }
        })?;
    Ok(D::from_parts(slug, frontmatter, body.to_owned()))
}

/// Percent-decodes a slug taken from a URL and refuses anything that could
/// name a file outside the collection directory.
pub fn decode_slug(raw: &str) -> Result<String> {
    if !has_valid_escapes(raw) {
        return Err(Error::InvalidSlug(raw.to_owned()));
    }
    let decoded = urlencoding::decode(raw)
        .map_err(|_| Error::InvalidSlug(raw.to_owned()))?
        .into_owned();
    if decoded.is_empty()
        || decoded == "."
        || decoded == ".."
        || decoded.contains(['/', '\\', '\0'])
    {
        return Err(Error::InvalidSlug(raw.to_owned()));
    }
    Ok(decoded)
}

/// Whether every `%` in `raw` starts a two-digit hex escape. `urlencoding`
/// passes malformed escapes such as `%zz` through untouched.
fn has_valid_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        b != b'%'
            || matches!(
                bytes.get(i + 1..i + 3),
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            )
    })
}

/// The result of a fallible index operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading documents from a content directory.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when no file in the collection directory has the slug.
    #[error("no document `{slug}` in {collection}")]
    NotFound { collection: Collection, slug: String },

    /// Returned when a slug doesn't decode to a plain file name.
    #[error("invalid slug `{0}`")]
    InvalidSlug(String),

    /// Returned when a file's frontmatter can't be read.
    #[error("parsing `{}`: {source}", .path.display())]
    Frontmatter {
        path: PathBuf,
        source: frontmatter::Error,
    },

    /// Returned for a file that loses a slug collision to `kept`.
    #[error("slug `{slug}` is already taken by `{}`", .kept.display())]
    DuplicateSlug { slug: String, kept: PathBuf },

    /// Returned when a file name isn't valid UTF-8.
    #[error("invalid file name: {0:?}")]
    InvalidFileName(PathBuf),

    /// Returned for I/O errors on a specific file or directory.
    #[error("reading `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Returned when the collection directory, or one of its entries, can't
    /// be walked.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),
}
