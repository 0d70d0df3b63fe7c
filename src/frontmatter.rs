//! Splits a source file into its YAML frontmatter and Markdown body. Every
//! content file must be structured as follows:
//!
//! 1. Initial frontmatter fence (`---`) on the first line
//! 2. YAML frontmatter
//! 3. Terminal frontmatter fence (`---`) on a line of its own; a line such as
//!    `---extra` is YAML, not a fence
//! 4. Markdown body
//!
//! For example:
//!
//! ```md
//! ---
//! title: Hello, world!
//! date: 2024-04-16
//! tags: [greet]
//! ---
//! # Hello
//!
//! World
//! ```

use serde::de::DeserializeOwned;

const FENCE: &str = "---";

/// Returns the `(yaml, body)` halves of `input`. The newline that ends the
/// terminal fence line is not part of the body.
pub fn split(input: &str) -> Result<(&str, &str)> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let rest = input
        .strip_prefix(FENCE)
        .ok_or(Error::MissingStartFence)?;

    // The opening fence must be alone on its line.
    let yaml_start = match rest.find('\n') {
        Some(i) if rest[..i].trim().is_empty() => i + 1,
        None if rest.trim().is_empty() => return Err(Error::MissingEndFence),
        _ => return Err(Error::MissingStartFence),
    };
    let rest = &rest[yaml_start..];

    // The terminal fence is the first line that is `---` and nothing else.
    let mut line_start = 0;
    loop {
        let line_end = rest[line_start..]
            .find('\n')
            .map_or(rest.len(), |i| line_start + i);
        if let Some(tail) = rest[line_start..line_end].strip_prefix(FENCE) {
            if tail.trim().is_empty() {
                let yaml = rest[..line_start].strip_suffix('\n').unwrap_or("");
                let body = rest.get(line_end + 1..).unwrap_or("");
                return Ok((yaml, body));
            }
        }
        if line_end == rest.len() {
            return Err(Error::MissingEndFence);
        }
        line_start = line_end + 1;
    }
}

/// Splits `input` and deserializes the frontmatter into `T`.
pub fn parse<T: DeserializeOwned>(input: &str) -> Result<(T, &str)> {
    let (yaml, body) = split(input)?;
    let frontmatter = serde_yaml::from_str(yaml)?;
    Ok((frontmatter, body))
}

/// Represents the result of a frontmatter operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading the frontmatter block of a source file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a source file doesn't begin with a `---` line.
    #[error("document must begin with `---`")]
    MissingStartFence,

    /// Returned when the starting fence was found but the terminal one was
    /// missing.
    #[error("missing closing `---`")]
    MissingEndFence,

    /// Returned when the frontmatter isn't valid YAML or doesn't match the
    /// collection's schema.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Meta {
        title: String,
        #[serde(default)]
        tags: Vec<String>,
    }

    #[test]
    fn test_split() -> Result<()> {
        let (yaml, body) = split("---\ntitle: Hi\n---\n# Heading\n\ntext\n")?;
        assert_eq!("title: Hi", yaml);
        assert_eq!("# Heading\n\ntext\n", body);
        Ok(())
    }

    #[test]
    fn test_split_crlf() -> Result<()> {
        let (yaml, body) = split("---\r\ntitle: Hi\r\n---\r\nbody")?;
        assert_eq!("title: Hi\r", yaml);
        assert_eq!("body", body);
        Ok(())
    }

    #[test]
    fn test_split_empty_block() -> Result<()> {
        let (yaml, body) = split("---\n---\nbody")?;
        assert_eq!("", yaml);
        assert_eq!("body", body);
        Ok(())
    }

    #[test]
    fn test_dashes_inside_yaml_value() -> Result<()> {
        let (meta, body) =
            parse::<Meta>("---\ntitle: a---b\ntags: [x]\n---\nbody")?;
        assert_eq!("a---b", meta.title);
        assert_eq!(vec!["x".to_owned()], meta.tags);
        assert_eq!("body", body);
        Ok(())
    }

    #[test]
    fn test_missing_fences() {
        assert!(matches!(split("title: Hi\n"), Err(Error::MissingStartFence)));
        assert!(matches!(
            split("---\ntitle: Hi\n"),
            Err(Error::MissingEndFence)
        ));
        assert!(matches!(split("---"), Err(Error::MissingEndFence)));
    }

    #[test]
    fn test_end_fence_must_be_alone() -> Result<()> {
        let (yaml, body) = split("---\ntitle: Hi\n---extra\n---\nbody")?;
        assert_eq!("title: Hi\n---extra", yaml);
        assert_eq!("body", body);
        assert!(matches!(
            split("---\ntitle: Hi\n---extra\nbody"),
            Err(Error::MissingEndFence)
        ));
        Ok(())
    }

    #[test]
    fn test_missing_required_field() {
        assert!(matches!(
            parse::<Meta>("---\ntags: [x]\n---\n"),
            Err(Error::Yaml(_))
        ));
    }
}
