//! Front-matter splitting and metadata parsing.
//!
//! A post file carries an optional YAML metadata block ahead of its Markdown
//! body. Two delimiter conventions are recognized, checked in this order:
//!
//! 1. **Dash fence** — the file opens with a run of three or more dashes;
//!    metadata sits between the first and second fence:
//!
//!    ```text
//!    ---
//!    title: Arrival
//!    date: 2018-05-01
//!    ---
//!    First day in Tokyo...
//!    ```
//!
//! 2. **Fenced block** — the file opens with a ```` ```metadata ```` code
//!    fence, closed by a bare ```` ``` ```` line; the body follows:
//!
//!    ````text
//!    ```metadata
//!    title: Arrival
//!    ```
//!    First day in Tokyo...
//!    ````
//!
//! Content that opens with neither marker is all body, with empty metadata.
//! An *opened but unterminated* block of either convention is rejected as
//! [`FrontMatterError::Malformed`] — a lone opening fence is an authoring
//! mistake, not an empty document.
//!
//! YAML syntax errors are reported with line, column, and a caret-annotated
//! snippet of the offending line so the author can find the problem without
//! opening a YAML reference.

use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front matter opened but never closed")]
    Malformed,
    #[error("YAML: {message} at line {line}, column {column}\n{snippet}")]
    MetadataParse {
        message: String,
        line: usize,
        column: usize,
        snippet: String,
    },
}

/// Dash-fence pattern: 3+ dashes, metadata lines, 3+ dashes, body.
static DASH_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A-{3,}[ \t]*\r?\n(?:(.*?)\r?\n)?-{3,}[ \t]*(?:\r?\n(.*))?\z").unwrap()
});

const FENCE_OPEN: &str = "```metadata\n";
const FENCE_CLOSE: &str = "\n```\n";

/// Split a file's text into parsed YAML metadata and the remaining body.
///
/// Pure function over its input. The body is returned as a slice of the
/// original text, untouched.
pub fn split(content: &str) -> Result<(Mapping, &str), FrontMatterError> {
    if content.starts_with("---") {
        let caps = DASH_FENCE.captures(content).ok_or(FrontMatterError::Malformed)?;
        let metadata = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let body = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        return Ok((parse_metadata(metadata)?, body));
    }

    if content.starts_with(FENCE_OPEN) {
        // The opening line's newline may double as the closing fence's
        // leading newline when the block is empty, so search from there.
        let search_from = FENCE_OPEN.len() - 1;
        let close = search_from
            + content[search_from..]
                .find(FENCE_CLOSE)
                .ok_or(FrontMatterError::Malformed)?;
        let metadata = if close < FENCE_OPEN.len() {
            ""
        } else {
            &content[FENCE_OPEN.len()..close]
        };
        let body = &content[close + FENCE_CLOSE.len()..];
        return Ok((parse_metadata(metadata)?, body));
    }

    Ok((Mapping::new(), content))
}

/// Parse a metadata block as a YAML mapping.
///
/// Empty or whitespace-only input is an empty mapping. A block that parses
/// but is not a mapping (a bare scalar, a sequence) is reported as a parse
/// error pointing at its first line.
fn parse_metadata(source: &str) -> Result<Mapping, FrontMatterError> {
    if source.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let value: Value = serde_yaml::from_str(source).map_err(|err| {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));
        FrontMatterError::MetadataParse {
            message: err.to_string(),
            line,
            column,
            snippet: snippet_at(source, line, column),
        }
    })?;

    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(FrontMatterError::MetadataParse {
            message: "front matter must be a YAML mapping".to_string(),
            line: 1,
            column: 1,
            snippet: snippet_at(source, 1, 1),
        }),
    }
}

/// The offending source line with a caret under the reported column.
fn snippet_at(source: &str, line: usize, column: usize) -> String {
    let text = source.lines().nth(line.saturating_sub(1)).unwrap_or("");
    let pad = " ".repeat(column.saturating_sub(1));
    format!("{text}\n{pad}^")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> Mapping {
        let mut m = Mapping::new();
        for (k, v) in pairs {
            m.insert(Value::from(*k), Value::from(*v));
        }
        m
    }

    // =========================================================================
    // Dash fence
    // =========================================================================

    #[test]
    fn dash_fence_splits_metadata_and_body() {
        let (meta, body) = split("---\nname: x\n---\nbody text").unwrap();
        assert_eq!(meta, mapping(&[("name", "x")]));
        assert_eq!(body, "body text");
    }

    #[test]
    fn dash_fence_allows_longer_runs() {
        let (meta, body) = split("-----\ntitle: Osaka\n----\nDay two.").unwrap();
        assert_eq!(meta, mapping(&[("title", "Osaka")]));
        assert_eq!(body, "Day two.");
    }

    #[test]
    fn dash_fence_multiline_metadata() {
        let (meta, body) = split("---\ntitle: Arrival\ndate: '2018-05-01'\n---\nFirst day.").unwrap();
        assert_eq!(
            meta,
            mapping(&[("title", "Arrival"), ("date", "2018-05-01")])
        );
        assert_eq!(body, "First day.");
    }

    #[test]
    fn dash_fence_unterminated_is_malformed() {
        assert!(matches!(
            split("---\nunterminated"),
            Err(FrontMatterError::Malformed)
        ));
    }

    #[test]
    fn dash_fence_empty_body() {
        let (meta, body) = split("---\nname: x\n---").unwrap();
        assert_eq!(meta, mapping(&[("name", "x")]));
        assert_eq!(body, "");
    }

    #[test]
    fn dash_fence_empty_metadata() {
        let (meta, body) = split("---\n---\nbody").unwrap();
        assert_eq!(meta, Mapping::new());
        assert_eq!(body, "body");
    }

    #[test]
    fn dash_fence_crlf_input() {
        let (meta, body) = split("---\r\nname: x\r\n---\r\nbody").unwrap();
        assert_eq!(meta, mapping(&[("name", "x")]));
        assert_eq!(body, "body");
    }

    // =========================================================================
    // Fenced block
    // =========================================================================

    #[test]
    fn fence_block_splits_metadata_and_body() {
        let (meta, body) = split("```metadata\nname: x\n```\nbody").unwrap();
        assert_eq!(meta, mapping(&[("name", "x")]));
        assert_eq!(body, "body");
    }

    #[test]
    fn fence_block_empty_metadata() {
        let (meta, body) = split("```metadata\n```\nbody").unwrap();
        assert_eq!(meta, Mapping::new());
        assert_eq!(body, "body");
    }

    #[test]
    fn fence_block_unterminated_is_malformed() {
        assert!(matches!(
            split("```metadata\nname: x\n"),
            Err(FrontMatterError::Malformed)
        ));
    }

    // =========================================================================
    // No front matter
    // =========================================================================

    #[test]
    fn plain_content_is_all_body() {
        let (meta, body) = split("no fences here").unwrap();
        assert_eq!(meta, Mapping::new());
        assert_eq!(body, "no fences here");
    }

    #[test]
    fn plain_code_fence_is_not_metadata() {
        let input = "```rust\nfn main() {}\n```\ntext";
        let (meta, body) = split(input).unwrap();
        assert_eq!(meta, Mapping::new());
        assert_eq!(body, input);
    }

    #[test]
    fn empty_input_is_empty_body() {
        let (meta, body) = split("").unwrap();
        assert_eq!(meta, Mapping::new());
        assert_eq!(body, "");
    }

    // =========================================================================
    // Metadata parsing diagnostics
    // =========================================================================

    #[test]
    fn empty_metadata_block_is_empty_mapping() {
        let (meta, body) = split("---\n   \n---\nbody").unwrap();
        assert_eq!(meta, Mapping::new());
        assert_eq!(body, "body");
    }

    #[test]
    fn yaml_error_carries_location_and_snippet() {
        let err = split("---\ntitle: a\nbroken: [unclosed\n---\nbody").unwrap_err();
        match err {
            FrontMatterError::MetadataParse { line, snippet, .. } => {
                assert!(line >= 2, "error should point past the first line, got {line}");
                assert!(snippet.contains('^'), "snippet should carry a caret: {snippet}");
            }
            other => panic!("expected MetadataParse, got {other:?}"),
        }
    }

    #[test]
    fn scalar_metadata_is_rejected() {
        let err = split("---\njust a string\n---\nbody").unwrap_err();
        assert!(matches!(err, FrontMatterError::MetadataParse { .. }));
    }
}
