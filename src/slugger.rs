//! Heading anchor ids in the style GitHub generates them: lower-cased, with
//! punctuation and symbols dropped and spaces turned into hyphens. Repeated
//! headings within one document get `-1`, `-2`, ... suffixes.

use std::collections::HashMap;

/// Generates unique anchor ids for the headings of a single document.
#[derive(Debug, Default)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Slugger {
        Slugger::default()
    }

    /// Returns the id for `text`, unique among the ids this slugger has
    /// returned so far.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut candidate = base.clone();
        while self.occurrences.contains_key(&candidate) {
            let n = self.occurrences.entry(base.clone()).or_insert(0);
            *n += 1;
            candidate = format!("{}-{}", base, n);
        }
        self.occurrences.insert(candidate.clone(), 0);
        candidate
    }
}

/// The stateless half of [`Slugger::slug`].
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!("hello-world", slugify("Hello World"));
        assert_eq!("whats-next", slugify("What's next?"));
        assert_eq!("c--rust", slugify("C & Rust"));
        assert_eq!("snake_case-and-kebab-case", slugify("snake_case and kebab-case"));
        assert_eq!("tiếng-việt", slugify("Tiếng Việt"));
        assert_eq!("", slugify("!!!"));
    }

    #[test]
    fn test_repeated_headings() {
        let mut slugger = Slugger::new();
        assert_eq!("intro", slugger.slug("Intro"));
        assert_eq!("intro-1", slugger.slug("Intro"));
        assert_eq!("intro-2", slugger.slug("intro"));
        assert_eq!("other", slugger.slug("Other"));
    }

    #[test]
    fn test_suffix_collides_with_literal_heading() {
        let mut slugger = Slugger::new();
        assert_eq!("a-1", slugger.slug("a-1"));
        assert_eq!("a", slugger.slug("a"));
        assert_eq!("a-2", slugger.slug("a"));
    }
}
