//! Content handlers for the asset tree.
//!
//! Everything under the contents directory (`src/` by convention) maps onto
//! the output root through an explicit per-kind handler:
//!
//! | Kind | Pattern | Output |
//! |------|---------|--------|
//! | JSON page | `*.page.json` | `*.html` — includes resolved, page template |
//! | JSON data | `*.data.json` | none — exists to be `@include`d |
//! | Plain JSON | `*.json` | copied as-is |
//! | Markdown page | `*.md` | `*.html` — front matter + page template |
//! | Sass | `*.scss` / `*.sass` | `*.css` via grass |
//! | Sass partial | `_*.scss` / `_*.sass` | none — import-only |
//! | Static | anything else | copied as-is |
//!
//! Each kind answers two questions: where does it land ([`Content::output_path`],
//! `None` = excluded from output) and what bytes does it produce
//! ([`Content::render`]).
//!
//! A JSON page is an inclusion-resolved document with a `title` and an
//! optional Markdown `body`, rendered through the same page template as a
//! Markdown page. Photo references in either flow through the same EXIF
//! caption rewriting as posts.

use crate::config::SiteConfig;
use crate::frontmatter::{self, FrontMatterError};
use crate::include::{self, IncludeError};
use crate::markdown::{self, ExifSource};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    FrontMatter(#[from] FrontMatterError),
    #[error("{0}")]
    Include(#[from] IncludeError),
    #[error("Sass error: {0}")]
    Sass(#[from] Box<grass::Error>),
}

/// A classified file of the contents tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    JsonPage(PathBuf),
    JsonData(PathBuf),
    Json(PathBuf),
    Markdown(PathBuf),
    Sass(PathBuf),
    SassPartial(PathBuf),
    Static(PathBuf),
}

/// Bytes to write, plus any warnings raised while producing them.
#[derive(Debug)]
pub struct RenderedContent {
    pub bytes: Vec<u8>,
    pub warnings: Vec<String>,
}

impl RenderedContent {
    fn plain(bytes: Vec<u8>) -> Self {
        Self { bytes, warnings: Vec::new() }
    }
}

impl Content {
    /// Classify a path relative to the contents root.
    pub fn classify(rel: &Path) -> Self {
        let name = rel
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let rel = rel.to_path_buf();

        if name.ends_with(".page.json") {
            Content::JsonPage(rel)
        } else if name.ends_with(".data.json") {
            Content::JsonData(rel)
        } else if name.ends_with(".json") {
            Content::Json(rel)
        } else if name.ends_with(".md") || name.ends_with(".markdown") || name.ends_with(".mkd") {
            Content::Markdown(rel)
        } else if name.ends_with(".scss") || name.ends_with(".sass") {
            if name.starts_with('_') {
                Content::SassPartial(rel)
            } else {
                Content::Sass(rel)
            }
        } else {
            Content::Static(rel)
        }
    }

    /// Where this file lands relative to the output root; `None` means it is
    /// excluded from output.
    pub fn output_path(&self) -> Option<PathBuf> {
        match self {
            Content::JsonPage(rel) => Some(replace_suffix(rel, ".page.json", ".html")),
            Content::JsonData(_) | Content::SassPartial(_) => None,
            Content::Json(rel) | Content::Static(rel) => Some(rel.clone()),
            Content::Markdown(rel) => Some(rel.with_extension("html")),
            Content::Sass(rel) => Some(rel.with_extension("css")),
        }
    }

    /// Produce the output bytes for this file. `None` for excluded kinds.
    pub fn render(
        &self,
        contents_root: &Path,
        photos: &dyn ExifSource,
        config: &SiteConfig,
    ) -> Result<Option<RenderedContent>, ContentError> {
        match self {
            Content::JsonData(_) | Content::SassPartial(_) => Ok(None),

            Content::Json(rel) | Content::Static(rel) => {
                Ok(Some(RenderedContent::plain(fs::read(contents_root.join(rel))?)))
            }

            Content::JsonPage(rel) => {
                let document = include::read_json_plus(&contents_root.join(rel))?;
                let title = document
                    .get("title")
                    .and_then(|v| v.as_str())
                    .unwrap_or_else(|| page_stem(rel))
                    .to_string();
                let body = document.get("body").and_then(|v| v.as_str()).unwrap_or("");
                let rendered = markdown::render(body, photos);
                Ok(Some(RenderedContent {
                    bytes: page(config, &title, &rendered.html).into_string().into_bytes(),
                    warnings: rendered.warnings,
                }))
            }

            Content::Markdown(rel) => {
                let raw = fs::read_to_string(contents_root.join(rel))?;
                let (metadata, body) = frontmatter::split(&raw)?;
                let title = metadata
                    .get("title")
                    .and_then(|v| v.as_str())
                    .unwrap_or_else(|| page_stem(rel))
                    .to_string();
                let rendered = markdown::render(body, photos);
                Ok(Some(RenderedContent {
                    bytes: page(config, &title, &rendered.html).into_string().into_bytes(),
                    warnings: rendered.warnings,
                }))
            }

            Content::Sass(rel) => {
                let options = grass::Options::default()
                    .style(config.sass.style.as_grass())
                    .load_path(contents_root);
                let css = grass::from_path(contents_root.join(rel), &options)?;
                Ok(Some(RenderedContent::plain(css.into_bytes())))
            }
        }
    }
}

/// Filename stem without the kind suffix, the title fallback.
fn page_stem(rel: &Path) -> &str {
    let name = rel.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.split('.').next().unwrap_or(name)
}

fn replace_suffix(rel: &Path, suffix: &str, replacement: &str) -> PathBuf {
    let text = rel.to_string_lossy();
    match text.strip_suffix(suffix) {
        Some(stripped) => PathBuf::from(format!("{stripped}{replacement}")),
        None => rel.to_path_buf(),
    }
}

/// The standalone page template used for contents-tree pages.
fn page(config: &SiteConfig, title: &str, body_html: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - " (config.title) }
                link rel="stylesheet" href=(config.stylesheet);
            }
            body {
                main.page {
                    h1 { (title) }
                    article { (PreEscaped(body_html)) }
                }
            }
        }
    }
}
