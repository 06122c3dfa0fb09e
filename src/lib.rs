//! # Travelogue
//!
//! A minimal static site generator for personal travel blogs. Markdown posts
//! with YAML front matter, grouped into travels by directory, rendered to a
//! minified static HTML site with EXIF photo captions and country flags.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      _posts/   →  Vec<Travel>   (filesystem → structured data)
//! 2. Generate  travels   →  docs/         (templates, assets, flags)
//! ```
//!
//! The scan stage is a pure read — it validates each travel's `info.json`,
//! splits front matter, and reports skipped units without touching the
//! output. The generate stage owns all writes. Keeping the stages separate
//! means `check` can run a full validation pass without building, and unit
//! tests can feed hand-built travels straight into the renderer.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — discovers travels and posts, validates `info.json` |
//! | [`generate`] | Stage 2 — renders pages, processes the contents tree, copies flags |
//! | [`frontmatter`] | YAML front matter splitting (two delimiter conventions) |
//! | [`include`] | Recursive `@include` resolution for JSON documents |
//! | [`markdown`] | Markdown → HTML with EXIF captions and YouTube embeds |
//! | [`exif`] | Minimal JPEG APP1/TIFF EXIF reader |
//! | [`content`] | Per-kind handlers for the asset tree (Sass, JSON pages, static) |
//! | [`config`] | `config.toml` loading and validation |
//! | [`types`] | Shared `Travel`/`Post` types |
//! | [`output`] | CLI output formatting — pure `format_*`, printing `print_*` |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system, rather than Handlebars or Tera:
//!
//! - **Compile-time checking**: malformed HTML is a build error, not a runtime surprise.
//! - **Type-safe**: template variables are Rust expressions — no stringly-typed lookups.
//! - **XSS-safe by default**: all interpolation is auto-escaped.
//! - **No prepare step**: templates are plain functions taking their data as
//!   arguments. There is no "compile the templates, then render" ordering to
//!   get wrong and no shared template-handle state.
//!
//! ## Photos Live in the Output Tree
//!
//! Full-size photos are large and rarely change, so they are committed to
//! the output directory (under `photos/`) rather than re-copied every build.
//! The cleanup step preserves a configurable keep-list (`photos`, `assets`,
//! `images`, `CNAME`); EXIF lookups resolve `/photos/...` references against
//! the output directory.
//!
//! ## Pure-Rust EXIF (No Decoder Dependency)
//!
//! Captions need five EXIF fields, not an imaging stack. The [`exif`] module
//! walks the JPEG APP1 segment and TIFF IFDs directly — a couple hundred
//! lines, no system dependencies, and the binary stays self-contained.
//!
//! ## Skip, Don't Abort
//!
//! A travel with a broken `info.json` or a post with malformed front matter
//! is skipped and reported; the rest of the site still builds. Only
//! top-level failures (unreadable posts directory, unwritable output) abort
//! the build.

pub mod config;
pub mod content;
pub mod exif;
pub mod frontmatter;
pub mod generate;
pub mod include;
pub mod markdown;
pub mod output;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
