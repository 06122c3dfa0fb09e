//! HTML site generation.
//!
//! Second stage of the build: takes the scanned travels and writes the
//! static site.
//!
//! In order:
//!
//! 1. **Clean** the output directory, preserving the configured keep-list
//!    (`assets`, `images`, `photos`, `CNAME` by default — photos are inputs
//!    that live in the output tree), then drop stale `flag-*.svg` icons.
//! 2. **Posts** — each post's Markdown is rendered with EXIF-caption and
//!    YouTube rewriting, wrapped in the post template, minified, and written
//!    to `<travel-id>/<slug>.html`.
//! 3. **Index** — the travel listing page, newest travel first.
//! 4. **Contents tree** — every file under the contents directory is pushed
//!    through its handler (Sass → CSS, JSON pages → HTML, the rest copied or
//!    excluded; see [`crate::content`]).
//! 5. **Flags** — one country flag SVG per travel, copied into
//!    `assets/images/`, skipped when already present or missing at source.
//!
//! ## Output Structure
//!
//! ```text
//! docs/
//! ├── index.html
//! ├── 2018-05-osaka/
//! │   ├── 01-arrival.html
//! │   └── 02-dotonbori.html
//! ├── assets/
//! │   ├── images/flag-jp.svg
//! │   └── styles/style.css       # compiled from src/assets/styles/
//! └── photos/                    # preserved input photos
//! ```
//!
//! ## HTML Generation
//!
//! Templates are [maud](https://maud.lambda.xyz/) components — type-safe,
//! auto-escaped, compiled into the binary, and handed their data explicitly.
//! All HTML output is minified.
//!
//! Per-file failures in the contents tree are reported as warnings and the
//! file is skipped; IO failures on the output side are fatal.

use crate::config::SiteConfig;
use crate::content::{Content, ContentError};
use crate::markdown::{self, ExifSource, PhotoDir};
use crate::types::{Post, Travel};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// What the generate stage did: files written and warnings raised.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub written: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn generate(
    source: &Path,
    output: &Path,
    travels: &[Travel],
    config: &SiteConfig,
) -> Result<GenerateReport, GenerateError> {
    let mut report = GenerateReport::default();

    fs::create_dir_all(output)?;
    clean_output(output, config)?;

    // Photos live in the output tree (kept across builds), so EXIF lookups
    // resolve site paths against the output directory.
    let photos = PhotoDir::new(output);

    for travel in travels {
        fs::create_dir_all(output.join(&travel.id))?;
        for post in &travel.posts {
            render_post(output, travel, post, &photos, config, &mut report)?;
        }
    }

    let index = index_page(config, travels);
    write_html(output, Path::new("index.html"), &index.into_string(), &mut report)?;

    process_contents(source, output, &photos, config, &mut report)?;
    copy_flags(source, output, travels, config, &mut report)?;

    Ok(report)
}

/// Remove previous build products, preserving the keep-list, then drop
/// stale flag icons so renamed countries don't leave orphans behind.
fn clean_output(output: &Path, config: &SiteConfig) -> Result<(), GenerateError> {
    for entry in fs::read_dir(output)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if config.keep.iter().any(|k| *k == name) {
            continue;
        }
        if entry.path().is_dir() {
            fs::remove_dir_all(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }

    let flag_dir = output.join("assets/images");
    if flag_dir.is_dir() {
        for entry in fs::read_dir(&flag_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with("flag-") && name.ends_with(".svg") {
                fs::remove_file(entry.path())?;
            }
        }
    }

    Ok(())
}

fn render_post(
    output: &Path,
    travel: &Travel,
    post: &Post,
    photos: &dyn ExifSource,
    config: &SiteConfig,
    report: &mut GenerateReport,
) -> Result<(), GenerateError> {
    let rendered = markdown::render(&post.content, photos);
    report.warnings.extend(
        rendered
            .warnings
            .into_iter()
            .map(|w| format!("{}/{}: {w}", travel.id, post.slug)),
    );

    let page = post_page(config, travel, post, &rendered.html);
    let rel = Path::new(&travel.id).join(format!("{}.html", post.slug));
    write_html(output, &rel, &page.into_string(), report)
}

/// Run every file of the contents tree through its handler.
///
/// A file whose handler fails is skipped with a warning; the rest of the
/// tree still builds.
fn process_contents(
    source: &Path,
    output: &Path,
    photos: &dyn ExifSource,
    config: &SiteConfig,
    report: &mut GenerateReport,
) -> Result<(), GenerateError> {
    let contents_root = source.join(&config.contents_dir);
    if !contents_root.is_dir() {
        return Ok(());
    }

    for entry in WalkDir::new(&contents_root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(&contents_root)
            .expect("walked under contents root")
            .to_path_buf();

        let content = Content::classify(&rel);
        let Some(out_rel) = content.output_path() else {
            continue;
        };

        match content.render(&contents_root, photos, config) {
            Ok(Some(rendered)) => {
                report.warnings.extend(
                    rendered
                        .warnings
                        .into_iter()
                        .map(|w| format!("{}: {w}", rel.display())),
                );
                if out_rel.extension().is_some_and(|e| e == "html") {
                    let html = String::from_utf8_lossy(&rendered.bytes).into_owned();
                    write_html(output, &out_rel, &html, report)?;
                } else {
                    write_bytes(output, &out_rel, &rendered.bytes, report)?;
                }
            }
            Ok(None) => {}
            Err(ContentError::Io(err)) => return Err(err.into()),
            Err(err) => report
                .warnings
                .push(format!("{}: {err}, skipped", rel.display())),
        }
    }

    Ok(())
}

/// Copy one flag icon per travel country into `assets/images/`.
///
/// Skipped when the icon already exists at the destination or is missing at
/// the source — a missing flag is cosmetic, not fatal.
fn copy_flags(
    source: &Path,
    output: &Path,
    travels: &[Travel],
    config: &SiteConfig,
    report: &mut GenerateReport,
) -> Result<(), GenerateError> {
    let flags_src = source.join(&config.flags_dir);

    for travel in travels {
        let country = &travel.country;
        let from = flags_src.join(format!("{country}.svg"));
        let to_rel = Path::new("assets/images").join(format!("flag-{country}.svg"));
        let to = output.join(&to_rel);

        if to.exists() || !from.exists() {
            continue;
        }
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&from, &to)?;
        report.written.push(to_rel.display().to_string());
    }

    Ok(())
}

// ============================================================================
// Writing
// ============================================================================

fn write_html(
    output: &Path,
    rel: &Path,
    html: &str,
    report: &mut GenerateReport,
) -> Result<(), GenerateError> {
    write_bytes(output, rel, &minify(html), report)
}

fn write_bytes(
    output: &Path,
    rel: &Path,
    bytes: &[u8],
    report: &mut GenerateReport,
) -> Result<(), GenerateError> {
    let path = output.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, bytes)?;
    report.written.push(rel.display().to_string());
    Ok(())
}

/// Minify HTML output using the `minify_html` crate.
fn minify(html: &str) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    minify_html::minify(html.as_bytes(), &cfg)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Base HTML document shared by the index and post pages.
fn base_document(config: &SiteConfig, title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href=(config.stylesheet);
            }
            body {
                (content)
            }
        }
    }
}

fn flag_icon(travel: &Travel) -> Markup {
    let src = format!("/assets/images/flag-{}.svg", travel.country);
    html! { img.flag src=(src) alt=(travel.country); }
}

/// The travel listing: every travel with its dates, flag, and post links.
fn index_page(config: &SiteConfig, travels: &[Travel]) -> Markup {
    base_document(
        config,
        &config.title,
        html! {
            header.site-header {
                h1 { (config.title) }
            }
            main.travels {
                @for travel in travels {
                    section.travel {
                        h2 {
                            (flag_icon(travel))
                            " " (travel.name)
                        }
                        p.dates { (travel.start) " ~ " (travel.end) }
                        ul.posts {
                            @for post in &travel.posts {
                                li {
                                    a href=(format!("/{}/{}.html", travel.id, post.slug)) {
                                        (post.title())
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

/// A single post page: breadcrumb, title, rendered content.
fn post_page(config: &SiteConfig, travel: &Travel, post: &Post, content_html: &str) -> Markup {
    let title = format!("{} - {}", post.title(), config.title);
    base_document(
        config,
        &title,
        html! {
            header.site-header {
                nav.breadcrumb {
                    a href="/" { (config.title) }
                    " / "
                    (flag_icon(travel))
                    " " (travel.name)
                }
            }
            main.post {
                h1 { (post.title()) }
                @if let Some(date) = post.date() {
                    p.date { (date) }
                }
                article { (PreEscaped(content_html)) }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_jpeg, write_file};
    use serde_yaml::Mapping;
    use tempfile::TempDir;

    fn travel(id: &str, country: &str, posts: Vec<Post>) -> Travel {
        Travel {
            id: id.to_string(),
            name: "Osaka".to_string(),
            country: country.to_string(),
            start: "2018-05-01".to_string(),
            end: "2018-05-05".to_string(),
            posts,
        }
    }

    fn post(slug: &str, content: &str) -> Post {
        Post {
            slug: slug.to_string(),
            metadata: Mapping::new(),
            content: content.to_string(),
        }
    }

    fn run(source: &TempDir, output: &TempDir, travels: &[Travel]) -> GenerateReport {
        generate(source.path(), output.path(), travels, &SiteConfig::default()).unwrap()
    }

    // =========================================================================
    // Cleanup
    // =========================================================================

    #[test]
    fn clean_preserves_keep_list_and_removes_the_rest() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_file(&output.path().join("photos/osaka.jpg"), "jpeg").unwrap();
        write_file(&output.path().join("CNAME"), "blog.example.com").unwrap();
        write_file(&output.path().join("old-travel/stale.html"), "old").unwrap();
        write_file(&output.path().join("stale.html"), "old").unwrap();

        run(&source, &output, &[]);

        assert!(output.path().join("photos/osaka.jpg").exists());
        assert!(output.path().join("CNAME").exists());
        assert!(!output.path().join("old-travel").exists());
        assert!(!output.path().join("stale.html").exists());
    }

    #[test]
    fn clean_removes_stale_flags_but_not_other_assets() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_file(&output.path().join("assets/images/flag-xx.svg"), "<svg/>").unwrap();
        write_file(&output.path().join("assets/images/logo.svg"), "<svg/>").unwrap();

        run(&source, &output, &[]);

        assert!(!output.path().join("assets/images/flag-xx.svg").exists());
        assert!(output.path().join("assets/images/logo.svg").exists());
    }

    // =========================================================================
    // Pages
    // =========================================================================

    #[test]
    fn writes_minified_post_and_index_pages() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let travels = vec![travel(
            "2018-05-osaka",
            "jp",
            vec![post("01-arrival", "# Landed\n\nAt last.")],
        )];

        let report = run(&source, &output, &travels);

        let index = fs::read_to_string(output.path().join("index.html")).unwrap();
        assert!(index.contains("Osaka"));
        assert!(index.contains("/2018-05-osaka/01-arrival.html"));
        assert!(!index.contains("\n  "), "index should be minified");

        let page =
            fs::read_to_string(output.path().join("2018-05-osaka/01-arrival.html")).unwrap();
        assert!(page.contains("At last."));
        assert!(report.written.iter().any(|w| w == "index.html"));
    }

    #[test]
    fn post_with_photo_gets_caption_from_output_tree() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_file(&output.path().join("photos/osaka.jpg"), sample_jpeg()).unwrap();
        let travels = vec![travel(
            "2018-05-osaka",
            "jp",
            vec![post("01-arrival", "![view](/photos/osaka.jpg)")],
        )];

        let report = run(&source, &output, &travels);

        let page =
            fs::read_to_string(output.path().join("2018-05-osaka/01-arrival.html")).unwrap();
        assert!(page.contains("FUJIFILM | X100F"));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn missing_photo_is_a_warning_not_a_failure() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let travels = vec![travel(
            "2018-05-osaka",
            "jp",
            vec![post("01-arrival", "![view](/photos/gone.jpg)")],
        )];

        let report = run(&source, &output, &travels);

        assert!(output.path().join("2018-05-osaka/01-arrival.html").exists());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("2018-05-osaka/01-arrival"));
    }

    // =========================================================================
    // Contents tree
    // =========================================================================

    #[test]
    fn contents_tree_is_processed_into_output() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_file(
            &source.path().join("src/assets/styles/style.scss"),
            "$ink: #333;\nbody { color: $ink; }\n",
        )
        .unwrap();
        write_file(&source.path().join("src/robots.txt"), "User-agent: *\n").unwrap();
        write_file(&source.path().join("src/site.data.json"), "{}").unwrap();

        run(&source, &output, &[]);

        let css = fs::read_to_string(output.path().join("assets/styles/style.css")).unwrap();
        assert!(css.contains("color: #333"));
        assert!(output.path().join("robots.txt").exists());
        assert!(!output.path().join("site.data.json").exists());
    }

    #[test]
    fn broken_contents_file_warns_and_build_continues() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_file(&source.path().join("src/bad.scss"), "body { color: ").unwrap();
        write_file(&source.path().join("src/ok.txt"), "fine").unwrap();

        let report = run(&source, &output, &[]);

        assert!(output.path().join("ok.txt").exists());
        assert!(report.warnings.iter().any(|w| w.contains("bad.scss")));
    }

    // =========================================================================
    // Flags
    // =========================================================================

    #[test]
    fn flags_copied_once_per_country() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_file(&source.path().join("flags/jp.svg"), "<svg/>").unwrap();
        let travels = vec![
            travel("2018-05-osaka", "jp", vec![]),
            travel("2017-04-tokyo", "jp", vec![]),
        ];

        run(&source, &output, &travels);

        assert!(output.path().join("assets/images/flag-jp.svg").exists());
    }

    #[test]
    fn missing_flag_source_is_skipped() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let travels = vec![travel("2018-05-osaka", "xx", vec![])];

        run(&source, &output, &travels);

        assert!(!output.path().join("assets/images/flag-xx.svg").exists());
    }
}
