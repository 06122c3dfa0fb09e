//! Travel and post discovery.
//!
//! First stage of the build: walks the posts directory and assembles the
//! in-memory travel list the render stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! <source>/
//! ├── config.toml                  # Site configuration (optional)
//! ├── flags/                       # Country flag SVGs (jp.svg, kr.svg, ...)
//! ├── src/                         # Asset tree, mapped onto the output root
//! └── _posts/
//!     ├── 2018-05-osaka/           # One directory per travel
//!     │   ├── info.json            # name, country, start, end — all required
//!     │   ├── 01-arrival.md        # Posts, front matter + Markdown
//!     │   └── 02-dotonbori.md
//!     └── 2017-11-taipei/
//!         └── ...
//! ```
//!
//! Travels are ordered newest first (reverse directory-name order — the
//! names start with dates); posts within a travel are in filename order.
//!
//! `info.json` is loaded through the inclusion resolver, so shared documents
//! (a gear list, say) can be `@include`d. A record missing any required
//! field is rejected.
//!
//! ## Failure policy
//!
//! A travel with a missing or broken `info.json`, and a post whose front
//! matter doesn't parse, are *skipped* — recorded on the report with enough
//! context to find the file — rather than failing the build. Only an
//! unreadable posts directory is fatal.

use crate::config::SiteConfig;
use crate::frontmatter;
use crate::include;
use crate::types::{Post, Travel};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("posts directory not found: {0}")]
    MissingPosts(PathBuf),
}

/// Result of the scan stage: the travels to render plus a note for every
/// unit that was skipped.
#[derive(Debug)]
pub struct ScanReport {
    pub travels: Vec<Travel>,
    pub skipped: Vec<String>,
}

/// Required fields of a travel's `info.json`.
#[derive(Debug, Deserialize)]
struct TravelInfo {
    name: String,
    country: String,
    start: String,
    end: String,
}

pub fn scan(source: &Path, config: &SiteConfig) -> Result<ScanReport, ScanError> {
    let posts_root = source.join(&config.posts_dir);
    if !posts_root.is_dir() {
        return Err(ScanError::MissingPosts(posts_root));
    }

    // Newest first: travel directories are named by date.
    let mut ids: Vec<String> = fs::read_dir(&posts_root)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    ids.sort();
    ids.reverse();

    let mut travels = Vec::new();
    let mut skipped = Vec::new();

    for id in ids {
        match read_travel(&posts_root.join(&id), &id, &mut skipped) {
            Ok(Some(travel)) => travels.push(travel),
            Ok(None) => {}
            Err(err) => skipped.push(format!("travel '{id}': {err}")),
        }
    }

    Ok(ScanReport { travels, skipped })
}

/// Read one travel directory. `Ok(None)` means the directory is not a valid
/// travel (no usable `info.json`) and has already been noted on `skipped`.
fn read_travel(
    dir: &Path,
    id: &str,
    skipped: &mut Vec<String>,
) -> Result<Option<Travel>, ScanError> {
    let info_path = dir.join("info.json");
    if !info_path.exists() {
        skipped.push(format!("travel '{id}': no info.json"));
        return Ok(None);
    }

    let info = match travel_info(&info_path) {
        Ok(info) => info,
        Err(reason) => {
            skipped.push(format!("travel '{id}': {reason}"));
            return Ok(None);
        }
    };

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();

    let mut posts = Vec::new();
    for path in &files {
        let slug = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let raw = fs::read_to_string(path)?;
        match frontmatter::split(&raw) {
            Ok((metadata, body)) => posts.push(Post {
                slug,
                metadata,
                content: body.to_string(),
            }),
            Err(err) => skipped.push(format!(
                "post '{id}/{name}': {err}",
                name = path.file_name().unwrap_or_default().to_string_lossy()
            )),
        }
    }

    Ok(Some(Travel {
        id: id.to_string(),
        name: info.name,
        country: info.country.to_lowercase(),
        start: info.start,
        end: info.end,
        posts,
    }))
}

/// Load and validate `info.json`, resolving any `@include` markers.
fn travel_info(path: &Path) -> Result<TravelInfo, String> {
    let document = include::read_json_plus(path).map_err(|e| e.to_string())?;
    let info: TravelInfo = serde_json::from_value(document)
        .map_err(|e| format!("invalid info.json: {e}"))?;
    for (field, value) in [
        ("name", &info.name),
        ("country", &info.country),
        ("start", &info.start),
        ("end", &info.end),
    ] {
        if value.trim().is_empty() {
            return Err(format!("invalid info.json: '{field}' is empty"));
        }
    }
    Ok(info)
}
