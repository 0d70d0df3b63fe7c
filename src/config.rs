//! Loads the `folio.yaml` project file.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "folio.yaml";

/// The environment variable that overrides `site.url`.
pub const BASE_URL_VAR: &str = "FOLIO_BASE_URL";

/// Site-wide metadata used in feeds and absolute links.
#[derive(Clone, Debug, Deserialize)]
pub struct Site {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: Url,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    String::from("en")
}

impl Site {
    /// The site URL without a trailing slash, ready to have paths appended.
    pub fn base(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }

    pub fn post_url(&self, slug: &str) -> String {
        format!("{}/post/{}", self.base(), urlencoding::encode(slug))
    }

    pub fn tag_url(&self, tag: &str) -> String {
        format!("{}/tags/{}", self.base(), urlencoding::encode(tag))
    }

    /// Replaces the site URL with `url` when one is given.
    pub fn with_url_override(mut self, url: Option<&str>) -> Result<Site> {
        if let Some(url) = url {
            self.url = Url::parse(url)
                .with_context(|| format!("Parsing `{}` from {}", url, BASE_URL_VAR))?;
        }
        Ok(self)
    }
}

/// The author credited on posts that don't name one.
#[derive(Clone, Debug, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Default for Author {
    fn default() -> Self {
        Author {
            name: String::from("Anonymous"),
            email: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Defaults {
    /// Shown for posts without a `readTime`.
    #[serde(default = "default_read_time")]
    pub read_time: String,
}

fn default_read_time() -> String {
    String::from("5")
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            read_time: default_read_time(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Robots {
    #[serde(default = "default_disallow")]
    pub disallow: Vec<String>,
}

fn default_disallow() -> Vec<String> {
    vec![String::from("/api/"), String::from("/private/")]
}

impl Default for Robots {
    fn default() -> Self {
        Robots {
            disallow: default_disallow(),
        }
    }
}

#[derive(Deserialize)]
struct Project {
    site: Site,

    #[serde(default)]
    author: Author,

    #[serde(default = "default_content_directory")]
    content_directory: PathBuf,

    #[serde(default)]
    defaults: Defaults,

    #[serde(default)]
    robots: Robots,
}

fn default_content_directory() -> PathBuf {
    PathBuf::from("content")
}

#[derive(Clone, Debug)]
pub struct Config {
    pub site: Site,
    pub author: Author,
    /// Holds one directory per collection (`posts`, `projects`).
    pub content_directory: PathBuf,
    pub defaults: Defaults,
    pub robots: Robots,
}

impl Config {
    /// Looks for a `folio.yaml` in `dir` and then in each of its ancestors,
    /// and loads the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let dir = dir
            .canonicalize()
            .with_context(|| format!("Resolving project directory `{}`", dir.display()))?;
        let mut current: &Path = &dir;
        loop {
            let path = current.join(PROJECT_FILE);
            if path.is_file() {
                return Config::from_project_file(&path)
                    .with_context(|| format!("Loading configuration `{}`", path.display()));
            }
            current = current.parent().ok_or_else(|| {
                anyhow!(
                    "Could not find `{}` in `{}` or any parent directory",
                    PROJECT_FILE,
                    dir.display()
                )
            })?;
        }
    }

    /// Loads a project file. Relative paths in it are resolved against the
    /// file's directory, and [`BASE_URL_VAR`] overrides the site URL.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;
        let base_url = std::env::var(BASE_URL_VAR).ok();
        Config::from_yaml(&contents, project_root, base_url.as_deref())
    }

    fn from_yaml(contents: &str, project_root: &Path, base_url: Option<&str>) -> Result<Config> {
        let project: Project = serde_yaml::from_str(contents)?;
        Ok(Config {
            site: project.site.with_url_override(base_url)?,
            author: project.author,
            content_directory: project_root.join(project.content_directory),
            defaults: project.defaults,
            robots: project.robots,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    const MINIMAL: &str = "site:\n  name: Folio\n  title: Folio Blog\n  url: https://example.com/\n";

    #[test]
    fn test_defaults() -> Result<()> {
        let config = Config::from_yaml(MINIMAL, Path::new("/srv/blog"), None)?;
        assert_eq!("https://example.com", config.site.base());
        assert_eq!("en", config.site.language);
        assert_eq!("Anonymous", config.author.name);
        assert_eq!("5", config.defaults.read_time);
        assert_eq!(PathBuf::from("/srv/blog/content"), config.content_directory);
        assert_eq!(vec!["/api/", "/private/"], config.robots.disallow);
        Ok(())
    }

    #[test]
    fn test_full() -> Result<()> {
        let yaml = "site:\n  name: Dev\n  title: Dev Blog\n  description: Notes\n  \
                    url: https://dev.example\n  language: vi\n\
                    author:\n  name: Dev Team\n  email: team@dev.example\n\
                    content_directory: site/content\n\
                    defaults:\n  read_time: '10'\n\
                    robots:\n  disallow: [/drafts/]\n";
        let config = Config::from_yaml(yaml, Path::new("/srv"), None)?;
        assert_eq!("vi", config.site.language);
        assert_eq!("Dev Team", config.author.name);
        assert_eq!(Some("team@dev.example"), config.author.email.as_deref());
        assert_eq!(PathBuf::from("/srv/site/content"), config.content_directory);
        assert_eq!("10", config.defaults.read_time);
        assert_eq!(vec!["/drafts/"], config.robots.disallow);
        Ok(())
    }

    #[test]
    fn test_base_url_override() -> Result<()> {
        let config = Config::from_yaml(MINIMAL, Path::new("/"), Some("https://staging.example/"))?;
        assert_eq!("https://staging.example", config.site.base());
        assert!(Config::from_yaml(MINIMAL, Path::new("/"), Some("not a url")).is_err());
        Ok(())
    }

    #[test]
    fn test_urls_are_encoded() -> Result<()> {
        let config = Config::from_yaml(MINIMAL, Path::new("/"), None)?;
        assert_eq!(
            "https://example.com/post/hello%20world",
            config.site.post_url("hello world")
        );
        assert_eq!("https://example.com/tags/c%23", config.site.tag_url("c#"));
        Ok(())
    }

    #[test]
    fn test_from_directory_searches_parents() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        fs::write(tmp.path().join(PROJECT_FILE), MINIMAL)?;
        let nested = tmp.path().join("content").join("posts");
        fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        assert_eq!(
            tmp.path().canonicalize()?.join("content"),
            config.content_directory
        );
        Ok(())
    }

    #[test]
    fn test_missing_site_is_an_error() {
        assert!(Config::from_yaml("author:\n  name: x\n", Path::new("/"), None).is_err());
    }
}
