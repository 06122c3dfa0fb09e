//! Shared domain types used across the pipeline stages.

use serde_yaml::Mapping;

/// One trip: a directory under the posts root with an `info.json` and the
/// posts written during it. Travels are assembled per build run and
/// discarded once output is written.
#[derive(Debug, Clone)]
pub struct Travel {
    /// Directory name under the posts root, also the output subdirectory.
    pub id: String,
    /// Display name from `info.json`.
    pub name: String,
    /// Lower-cased country code, keys the flag icon.
    pub country: String,
    /// Trip start date, as written in `info.json`.
    pub start: String,
    /// Trip end date, as written in `info.json`.
    pub end: String,
    /// Posts in filename order.
    pub posts: Vec<Post>,
}

/// One dated entry within a travel.
#[derive(Debug, Clone)]
pub struct Post {
    /// Filename stem; the output file is `<travel-id>/<slug>.html`.
    pub slug: String,
    /// Parsed YAML front matter.
    pub metadata: Mapping,
    /// Markdown body.
    pub content: String,
}

impl Post {
    /// Display title: front-matter `title`, falling back to the slug.
    pub fn title(&self) -> &str {
        self.metadata
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or(&self.slug)
    }

    /// Front-matter `date`, if the author wrote one.
    pub fn date(&self) -> Option<&str> {
        self.metadata.get("date").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn post_with(pairs: &[(&str, &str)]) -> Post {
        let mut metadata = Mapping::new();
        for (k, v) in pairs {
            metadata.insert(Value::from(*k), Value::from(*v));
        }
        Post {
            slug: "01-arrival".to_string(),
            metadata,
            content: String::new(),
        }
    }

    #[test]
    fn title_from_metadata() {
        assert_eq!(post_with(&[("title", "Arrival")]).title(), "Arrival");
    }

    #[test]
    fn title_falls_back_to_slug() {
        assert_eq!(post_with(&[]).title(), "01-arrival");
    }

    #[test]
    fn date_is_optional() {
        assert_eq!(post_with(&[]).date(), None);
        assert_eq!(post_with(&[("date", "2018-05-01")]).date(), Some("2018-05-01"));
    }
}
