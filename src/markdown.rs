//! Markdown rendering with travel-photo awareness.
//!
//! Rendering is plain [`pulldown_cmark`] with one override: image tokens are
//! intercepted and rewritten by source URL.
//!
//! - **Internal photos** — an absolute site path ending in `.jpg`
//!   (`/photos/osaka/P1020311.jpg`) renders as the default `<img>` followed
//!   by an EXIF caption line: camera make, model, aperture, ISO, and capture
//!   time, joined with `" | "`. Fields the camera didn't write are omitted;
//!   a photo with no usable EXIF gets no caption at all.
//! - **YouTube URLs** used as image sources become a responsive 16:9 iframe
//!   embed, with the video id extracted from any of the usual URL shapes.
//! - Everything else renders unmodified.
//!
//! EXIF lookup is a capability ([`ExifSource`]) so the renderer never touches
//! the disk directly. A photo that cannot be read is reported as a warning on
//! the render result and rendered without a caption — one bad photo reference
//! should not take down the whole build.

use crate::exif::{ExifData, ExifError, read_exif};
use maud::html;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Absolute site path to a JPEG photo.
static INTERNAL_PHOTO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^/.+\.jpg$").unwrap());

/// The usual YouTube URL shapes: watch, embed, short link.
static YOUTUBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(?:www\.)?(?:youtube\.com/\S*(?:(?:/e(?:mbed))?/|watch/?\?(?:\S*?&?v=))|youtu\.be/)([A-Za-z0-9_-]{6,11})",
    )
    .unwrap()
});

/// EXIF lookup capability: site photo path → metadata.
pub trait ExifSource {
    fn exif_for(&self, site_path: &str) -> Result<ExifData, ExifError>;
}

/// Looks photos up under a directory root; `/photos/a.jpg` resolves to
/// `<root>/photos/a.jpg`.
pub struct PhotoDir {
    root: PathBuf,
}

impl PhotoDir {
    pub fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }
}

impl ExifSource for PhotoDir {
    fn exif_for(&self, site_path: &str) -> Result<ExifData, ExifError> {
        read_exif(&self.root.join(site_path.trim_start_matches('/')))
    }
}

/// Rendered HTML plus any per-image warnings raised along the way.
#[derive(Debug)]
pub struct Rendered {
    pub html: String,
    pub warnings: Vec<String>,
}

/// Render Markdown to HTML, rewriting image tokens as described in the
/// module docs.
pub fn render(markdown: &str, photos: &dyn ExifSource) -> Rendered {
    use pulldown_cmark::{Event, Parser, Tag, TagEnd};

    let mut warnings = Vec::new();
    let mut events = Vec::new();
    let mut parser = Parser::new(markdown);

    while let Some(event) = parser.next() {
        match event {
            Event::Start(Tag::Image { dest_url, title, .. }) => {
                // Swallow the span and collect its text as the alt attribute.
                let mut alt = String::new();
                for inner in parser.by_ref() {
                    match inner {
                        Event::End(TagEnd::Image) => break,
                        Event::Text(text) | Event::Code(text) => alt.push_str(&text),
                        _ => {}
                    }
                }
                let html = rewrite_image(&dest_url, &title, &alt, photos, &mut warnings);
                events.push(Event::Html(html.into()));
            }
            other => events.push(other),
        }
    }

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, events.into_iter());
    Rendered { html, warnings }
}

fn rewrite_image(
    src: &str,
    title: &str,
    alt: &str,
    photos: &dyn ExifSource,
    warnings: &mut Vec<String>,
) -> String {
    if let Some(caps) = YOUTUBE.captures(src) {
        return youtube_embed(&caps[1]);
    }

    let mut out = default_image(src, title, alt);

    if INTERNAL_PHOTO.is_match(src) {
        match photos.exif_for(src) {
            Ok(exif) => {
                if let Some(caption) = exif_caption(&exif) {
                    out.push('\n');
                    out.push_str(&html! { p.exif { (caption) } }.into_string());
                }
            }
            Err(err) => warnings.push(format!("EXIF unavailable for '{src}': {err}")),
        }
    }

    out
}

fn default_image(src: &str, title: &str, alt: &str) -> String {
    let title = (!title.is_empty()).then_some(title);
    html! { img src=(src) alt=(alt) title=[title]; }.into_string()
}

fn youtube_embed(id: &str) -> String {
    let url = format!("https://www.youtube.com/embed/{id}");
    html! {
        div.embed-responsive.embed-responsive-16by9 {
            iframe src=(url) frameborder="0" allow="autoplay; encrypted-media" allowfullscreen {}
        }
    }
    .into_string()
}

/// Caption line from whatever fields the camera wrote, `None` if it wrote
/// nothing useful.
fn exif_caption(exif: &ExifData) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(make) = &exif.make {
        parts.push(make.clone());
    }
    if let Some(model) = &exif.model {
        parts.push(model.clone());
    }
    if let Some(f) = exif.f_number {
        parts.push(format!("F/{f}"));
    }
    if let Some(iso) = exif.iso {
        parts.push(format!("ISO-{iso}"));
    }
    if let Some(taken) = &exif.taken {
        parts.push(taken.clone());
    }
    (!parts.is_empty()).then(|| parts.join(" | "))
}
