//! Recursive `@include` resolution for JSON documents.
//!
//! A mapping node anywhere in a document may carry an `@include` key naming
//! another JSON file; the node is replaced by that file's content. An
//! optional `@include.path` sibling narrows the splice to a sub-value of the
//! loaded document:
//!
//! ```json
//! {
//!   "gear": { "@include": "../shared/gear.json", "@include.path": ["camera"] }
//! }
//! ```
//!
//! ## Resolution algorithm
//!
//! Resolution proceeds in *rounds*. Each round traverses the whole document,
//! collects every marker (mappings may nest inside mappings and sequences),
//! then applies all of the round's substitutions before re-scanning. A marker
//! introduced by a splice is therefore picked up in the following round, and
//! a document with no markers left resolves to itself — re-running resolution
//! on resolved output substitutes nothing.
//!
//! Include paths are relative to the file whose content introduced them: the
//! root document's file for markers present at load time, the included file
//! for markers spliced in later. The resolver tracks the originating file of
//! every spliced subtree to get this right across multi-level chains.
//!
//! A self-referencing document never reaches a fixed point; rounds are capped
//! at [`MAX_ROUNDS`] and exceeding the cap is [`IncludeError::Cycle`].
//!
//! Loading is a capability: [`IncludeLoader`] maps a file path to a parsed
//! document. [`FsLoader`] reads JSON from disk; tests substitute an
//! in-memory map.

use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Round cap — past this, resolution is assumed to be cyclic.
pub const MAX_ROUNDS: usize = 64;

const INCLUDE_KEY: &str = "@include";
const INCLUDE_PATH_KEY: &str = "@include.path";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum IncludeError {
    #[error("failed to load include '{path}' (at {key_path}): {source}")]
    Load {
        key_path: String,
        path: PathBuf,
        source: LoadError,
    },
    #[error("include path segment '{segment}' not found in '{path}'")]
    Navigation { segment: String, path: PathBuf },
    #[error("'{key}' at {key_path} must be {expected}")]
    Marker {
        key: &'static str,
        key_path: String,
        expected: &'static str,
    },
    #[error("includes did not settle after {rounds} rounds; inclusion cycle suspected")]
    Cycle { rounds: usize },
}

/// Document-loading capability used by the resolver.
pub trait IncludeLoader {
    fn load(&self, path: &Path) -> Result<Value, LoadError>;
}

/// Loads JSON documents from the filesystem.
pub struct FsLoader;

impl IncludeLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<Value, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// One step on the path from the document root to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSeg {
    Key(String),
    Index(usize),
}

/// Key-path display used in error messages: `a.b[2].c`, `(root)` when empty.
fn display_path(path: &[PathSeg]) -> String {
    if path.is_empty() {
        return "(root)".to_string();
    }
    let mut out = String::new();
    for seg in path {
        match seg {
            PathSeg::Key(k) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(k);
            }
            PathSeg::Index(i) => {
                let _ = fmt::Write::write_fmt(&mut out, format_args!("[{i}]"));
            }
        }
    }
    out
}

/// A marker found during one scan round.
struct PendingInclude {
    key_path: Vec<PathSeg>,
    file: String,
    navigate: Option<Vec<String>>,
}

/// Result of [`resolve`]: the settled document plus the number of traversal
/// rounds performed (the final, marker-free scan included).
#[derive(Debug)]
pub struct Resolved {
    pub document: Value,
    pub rounds: usize,
}

/// Resolve every `@include` marker in `document`.
///
/// `file` is the path the document was loaded from; relative includes at the
/// top level resolve against its parent directory.
pub fn resolve<L: IncludeLoader>(
    mut document: Value,
    file: &Path,
    loader: &L,
) -> Result<Resolved, IncludeError> {
    let root_dir = parent_dir(file);
    // Originating file per spliced subtree, so markers inside spliced
    // content resolve relative to the file that content came from.
    let mut origins: Vec<(Vec<PathSeg>, PathBuf)> = Vec::new();

    for round in 1..=MAX_ROUNDS {
        let pending = collect_includes(&document)?;
        if pending.is_empty() {
            return Ok(Resolved { document, rounds: round });
        }

        for include in pending {
            let base = origins
                .iter()
                .filter(|(prefix, _)| include.key_path.starts_with(prefix))
                .max_by_key(|(prefix, _)| prefix.len())
                .map(|(_, origin)| parent_dir(origin))
                .unwrap_or_else(|| root_dir.clone());
            let target = normalize(&base.join(&include.file));

            let loaded = loader.load(&target).map_err(|source| IncludeError::Load {
                key_path: display_path(&include.key_path),
                path: target.clone(),
                source,
            })?;

            let spliced = match &include.navigate {
                Some(segments) => navigate(loaded, segments, &target)?,
                None => loaded,
            };

            set_at(&mut document, &include.key_path, spliced);

            // The splice replaced the whole subtree; origins recorded under
            // it no longer describe anything.
            origins.retain(|(prefix, _)| !prefix.starts_with(&include.key_path));
            origins.push((include.key_path, target));
        }
    }

    Err(IncludeError::Cycle { rounds: MAX_ROUNDS })
}

/// Load a JSON file and resolve its includes in one step.
pub fn read_json_plus(path: &Path) -> Result<Value, IncludeError> {
    let document = FsLoader.load(path).map_err(|source| IncludeError::Load {
        key_path: "(root)".to_string(),
        path: path.to_path_buf(),
        source,
    })?;
    Ok(resolve(document, path, &FsLoader)?.document)
}

fn parent_dir(file: &Path) -> PathBuf {
    file.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Lexically drop `.` and collapse `..` components so that chained includes
/// produce comparable, readable target paths.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Scan the document for `@include` markers.
///
/// A node carrying the marker is recorded and not descended into — whatever
/// else it holds is about to be replaced.
fn collect_includes(document: &Value) -> Result<Vec<PendingInclude>, IncludeError> {
    let mut found = Vec::new();
    walk(document, &mut Vec::new(), &mut found)?;
    Ok(found)
}

fn walk(
    node: &Value,
    prefix: &mut Vec<PathSeg>,
    found: &mut Vec<PendingInclude>,
) -> Result<(), IncludeError> {
    match node {
        Value::Object(map) => {
            if let Some(marker) = map.get(INCLUDE_KEY) {
                let file = marker
                    .as_str()
                    .ok_or_else(|| IncludeError::Marker {
                        key: INCLUDE_KEY,
                        key_path: display_path(prefix),
                        expected: "a file path string",
                    })?
                    .to_string();
                let navigate = match map.get(INCLUDE_PATH_KEY) {
                    None => None,
                    Some(value) => Some(navigation_segments(value, prefix)?),
                };
                found.push(PendingInclude {
                    key_path: prefix.clone(),
                    file,
                    navigate,
                });
                return Ok(());
            }
            for (key, child) in map {
                prefix.push(PathSeg::Key(key.clone()));
                walk(child, prefix, found)?;
                prefix.pop();
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                prefix.push(PathSeg::Index(i));
                walk(child, prefix, found)?;
                prefix.pop();
            }
        }
        _ => {}
    }
    Ok(())
}

fn navigation_segments(value: &Value, prefix: &[PathSeg]) -> Result<Vec<String>, IncludeError> {
    let items = value.as_array().ok_or(IncludeError::Marker {
        key: INCLUDE_PATH_KEY,
        key_path: display_path(prefix),
        expected: "a sequence of key strings",
    })?;
    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or(IncludeError::Marker {
                key: INCLUDE_PATH_KEY,
                key_path: display_path(prefix),
                expected: "a sequence of key strings",
            })
        })
        .collect()
}

/// Walk `@include.path` segments into a loaded document.
fn navigate(document: Value, segments: &[String], file: &Path) -> Result<Value, IncludeError> {
    let mut current = document;
    for segment in segments {
        current = match current {
            Value::Object(mut map) => map.remove(segment).ok_or_else(|| IncludeError::Navigation {
                segment: segment.clone(),
                path: file.to_path_buf(),
            })?,
            _ => {
                return Err(IncludeError::Navigation {
                    segment: segment.clone(),
                    path: file.to_path_buf(),
                });
            }
        };
    }
    Ok(current)
}

/// Replace the value at `key_path` with `replacement`.
///
/// Paths come from a scan over this same document, and marked nodes are never
/// nested inside one another within a round, so the path is always present.
fn set_at(document: &mut Value, key_path: &[PathSeg], replacement: Value) {
    let Some((last, parents)) = key_path.split_last() else {
        *document = replacement;
        return;
    };
    let mut node = document;
    for seg in parents {
        node = match (seg, node) {
            (PathSeg::Key(k), Value::Object(map)) => map.get_mut(k).expect("scanned path"),
            (PathSeg::Index(i), Value::Array(items)) => items.get_mut(*i).expect("scanned path"),
            _ => unreachable!("scanned path shape"),
        };
    }
    match (last, node) {
        (PathSeg::Key(k), Value::Object(map)) => {
            map.insert(k.clone(), replacement);
        }
        (PathSeg::Index(i), Value::Array(items)) => items[*i] = replacement,
        _ => unreachable!("scanned path shape"),
    }
}
