//! Exports the [`build_site`] function which writes the generated files of a
//! site: the RSS and Atom feeds ([`crate::feed`]), the sitemap and robots file
//! ([`crate::sitemap`]), and the corpus for the client-side search box
//! ([`crate::search`]).

use crate::config::Config;
use crate::feed::{self, FeedConfig};
use crate::index::{ContentIndex, Snapshot};
use crate::search::SearchResult;
use crate::sitemap;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// The files written by [`build_site`], relative to the output directory.
pub const RSS_FILE: &str = "feed.xml";
pub const ATOM_FILE: &str = "feed.atom";
pub const SITEMAP_FILE: &str = "sitemap.xml";
pub const ROBOTS_FILE: &str = "robots.txt";
pub const SEARCH_FILE: &str = "search.json";

/// Loads the content named by `config` once and writes every generated file
/// into `output_directory`, creating it if needed.
pub fn build_site(config: &Config, output_directory: &Path) -> Result<()> {
    let snapshot = ContentIndex::new(&config.content_directory).snapshot();
    write_site(config, &snapshot, output_directory, Utc::now())
}

/// Writes the generated files for an already loaded [`Snapshot`], stamping
/// them with `now`.
pub fn write_site(
    config: &Config,
    snapshot: &Snapshot,
    output_directory: &Path,
    now: DateTime<Utc>,
) -> Result<()> {
    std::fs::create_dir_all(output_directory).map_err(|err| Error::CreateDirectory {
        path: output_directory.to_owned(),
        err,
    })?;

    let feed_config = FeedConfig {
        site: &config.site,
        author: &config.author,
        build_date: now,
    };
    let posts = snapshot.posts();

    write_file(output_directory, RSS_FILE, |w| {
        feed::write_rss(&feed_config, posts, w)
    })?;
    write_file(output_directory, ATOM_FILE, |w| {
        feed::write_atom(&feed_config, posts, w)
    })?;

    let entries = sitemap::entries(&config.site, posts, &snapshot.all_tags(), now);
    write_file(output_directory, SITEMAP_FILE, |w| {
        sitemap::write_sitemap(&entries, w)
    })?;
    write_file(output_directory, ROBOTS_FILE, |w| {
        sitemap::write_robots(&config.site, &config.robots, w)
    })?;

    let corpus: Vec<SearchResult> = posts.iter().map(SearchResult::from).collect();
    write_file(output_directory, SEARCH_FILE, |w| {
        serde_json::to_writer(w, &corpus)
    })?;

    info!(
        posts = posts.len(),
        projects = snapshot.projects().len(),
        output = %output_directory.display(),
        "built site"
    );
    Ok(())
}

/// Creates `dir/name`, hands a buffered writer to `write`, and flushes it.
fn write_file<F, E>(dir: &Path, name: &str, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::result::Result<(), E>,
    E: Into<Error>,
{
    let path = dir.join(name);
    let file = File::create(&path).map_err(|err| Error::CreateFile {
        path: path.clone(),
        err,
    })?;
    let mut w = BufWriter::new(file);
    write(&mut w).map_err(Into::<Error>::into)?;
    w.flush()?;
    info!(path = %path.display(), "wrote file");
    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the output directory can't be created.
    #[error("Creating directory '{}': {err}", .path.display())]
    CreateDirectory { path: PathBuf, err: io::Error },

    /// Returned when an output file can't be created.
    #[error("Creating file '{}': {err}", .path.display())]
    CreateFile { path: PathBuf, err: io::Error },

    /// Returned for errors writing the feeds.
    #[error(transparent)]
    Feed(#[from] feed::Error),

    /// Returned for errors serializing the search corpus.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Returned for other I/O errors.
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use std::fs;

    fn config() -> Config {
        let mut config = Config::from_project_file(Path::new("./testdata/folio.yaml"))
            .expect("fixture config");
        config.site = config
            .site
            .with_url_override(Some("https://blog.example"))
            .expect("valid url");
        config
    }

    #[test]
    fn test_write_site() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let config = config();
        let snapshot = ContentIndex::new(&config.content_directory).snapshot();
        let tmp = tempfile::tempdir()?;
        let out = tmp.path().join("public");
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        write_site(&config, &snapshot, &out, now)?;

        let rss = fs::read_to_string(out.join(RSS_FILE))?;
        assert_eq!(5, rss.matches("<item>").count());
        assert!(rss.contains("<link>https://blog.example/post/hello%20world</link>"));

        let atom = fs::read_to_string(out.join(ATOM_FILE))?;
        assert_eq!(5, atom.matches("<entry>").count());

        let sitemap = fs::read_to_string(out.join(SITEMAP_FILE))?;
        // 3 static pages, 5 posts, 4 tags
        assert_eq!(12, sitemap.matches("<url>").count());

        let robots = fs::read_to_string(out.join(ROBOTS_FILE))?;
        assert!(robots.ends_with("Sitemap: https://blog.example/sitemap.xml\n"));

        let corpus: Vec<serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(out.join(SEARCH_FILE))?)?;
        assert_eq!(5, corpus.len());
        assert_eq!("hello world", corpus[0]["slug"]);
        assert!(corpus[0].get("body").is_none());
        Ok(())
    }
}
