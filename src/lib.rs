//! The library code for the `folio` blog engine. Content lives in a directory
//! of Markdown files with YAML frontmatter, one directory per collection
//! (`posts`, `projects`). The architecture can be broken down into three
//! layers:
//!
//! 1. Parsing documents from source files on disk ([`crate::frontmatter`],
//!    [`crate::post`], [`crate::project`])
//! 2. Indexing and querying them ([`crate::index`], [`crate::query`],
//!    [`crate::search`])
//! 3. Producing what pages and feed readers consume: rendered bodies and their
//!    outlines ([`crate::markdown`], [`crate::toc`]) and the generated site
//!    files ([`crate::build`])
//!
//! The index favours degrading over failing: a missing directory is an empty
//! collection and a broken file is skipped, so one bad document never breaks a
//! whole page build. The fallible entry points
//! ([`crate::index::ContentIndex::scan`], [`crate::index::ContentIndex::load`])
//! report what went wrong for tools and tests.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod document;
pub mod feed;
pub mod frontmatter;
pub mod index;
pub mod logging;
pub mod markdown;
pub mod post;
pub mod project;
pub mod query;
pub mod search;
pub mod sitemap;
pub mod slugger;
pub mod toc;
