//! Defines the [`Project`] type, an entry of the portfolio collection.

use crate::document::{Collection, Document};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Project {
    pub slug: String,
    pub frontmatter: ProjectFrontmatter,
    pub body: String,
}

/// The frontmatter block of a project. `name`, `description` and `role` are
/// required.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFrontmatter {
    pub name: String,

    pub description: String,

    pub role: String,

    #[serde(default)]
    pub tech_stack: Vec<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub company: Option<String>,

    #[serde(default)]
    pub cover_image: Option<String>,

    /// Higher numbers are listed first.
    #[serde(default)]
    pub priority: i64,

    #[serde(default)]
    pub period: Option<String>,
}

impl Document for Project {
    const COLLECTION: Collection = Collection::Projects;
    type Frontmatter = ProjectFrontmatter;

    fn from_parts(slug: String, frontmatter: ProjectFrontmatter, body: String) -> Project {
        Project {
            slug,
            frontmatter,
            body,
        }
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    /// Priority descending, then name ascending (byte-wise, so case-sensitive).
    fn listing_order(a: &Project, b: &Project) -> Ordering {
        b.frontmatter
            .priority
            .cmp(&a.frontmatter.priority)
            .then_with(|| a.frontmatter.name.cmp(&b.frontmatter.name))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn project(name: &str, priority: i64) -> Project {
        Project::from_parts(
            name.to_lowercase(),
            ProjectFrontmatter {
                name: name.to_owned(),
                description: String::new(),
                role: String::new(),
                tech_stack: Vec::new(),
                url: None,
                company: None,
                cover_image: None,
                priority,
                period: None,
            },
            String::new(),
        )
    }

    #[test]
    fn test_listing_order() {
        let mut projects = vec![
            project("beta", 0),
            project("Beta", 5),
            project("Alpha", 5),
            project("Zeta", 9),
            project("alpha", 0),
        ];
        projects.sort_by(Project::listing_order);
        let names: Vec<&str> = projects
            .iter()
            .map(|p| p.frontmatter.name.as_str())
            .collect();
        assert_eq!(vec!["Zeta", "Alpha", "Beta", "alpha", "beta"], names);
    }

    #[test]
    fn test_defaults() -> serde_yaml::Result<()> {
        let fm: ProjectFrontmatter = serde_yaml::from_str(
            "name: Folio\ndescription: A blog engine\nrole: Author\n",
        )?;
        assert_eq!(0, fm.priority);
        assert!(fm.tech_stack.is_empty());
        assert_eq!(None, fm.url);
        Ok(())
    }

    #[test]
    fn test_tech_stack() -> serde_yaml::Result<()> {
        let fm: ProjectFrontmatter = serde_yaml::from_str(
            "name: Folio\ndescription: d\nrole: r\ntechStack: [Rust, YAML]\npriority: 3\n",
        )?;
        assert_eq!(vec!["Rust".to_owned(), "YAML".to_owned()], fm.tech_stack);
        assert_eq!(3, fm.priority);
        Ok(())
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let result: serde_yaml::Result<ProjectFrontmatter> =
            serde_yaml::from_str("description: d\nrole: r\n");
        assert!(result.is_err());
    }
}
