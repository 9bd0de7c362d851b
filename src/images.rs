//! Image records: every manual illustration with its caption, alt text,
//! surrounding prose and the headings open where it appears.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex_lite::Regex;
use url::Url;

use crate::{
    config::CorpusInfo,
    heading_path,
    html::{self, attribute, clean_inline},
    keywords::{build_keywords, path_tokens},
    record::{ImageRecord, image_id},
};

/// Only assets under this corpus-root directory are indexed.
pub const IMAGES_DIR: &str = "_images/";

/// Longest surrounding-context snippet kept per side.
pub const CONTEXT_LIMIT: usize = 240;

static FIGURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<figure(?:\s[^>]*)?>.*?</figure>")
        .expect("static regex pattern")
});

static FIGCAPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<figcaption[^>]*>(.*?)</figcaption>")
        .expect("static regex pattern")
});

static IMG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<img(?:\s[^>]*)?>").expect("static regex pattern")
});

static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<p(?:\s[^>]*)?>(.*?)</p>|<li(?:\s[^>]*)?>(.*?)</li>")
        .expect("static regex pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
struct Figure {
    start: usize,
    end: usize,
    caption: Option<String>,
}

/// An `<img>` that passed the `_images/` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundImage {
    /// Byte offset of the tag in the scanned HTML.
    pub offset: usize,
    /// Corpus-root-relative asset path.
    pub image: String,
    pub alt: Option<String>,
    /// Caption of the enclosing `<figure>`, if any.
    pub caption: Option<String>,
}

#[derive(Debug, Clone)]
struct Block {
    start: usize,
    end: usize,
    text: String,
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

fn figure_ranges(html: &str) -> Vec<Figure> {
    FIGURE
        .find_iter(html)
        .map(|m| Figure {
            start: m.start(),
            end: m.end(),
            caption: FIGCAPTION
                .captures(m.as_str())
                .and_then(|c| c.get(1))
                .and_then(|c| non_empty(clean_inline(c.as_str()))),
        })
        .collect()
}

/// Resolve `src` against the page at `rel_html` as a browser would.
///
/// Both are resolved under a `file:///` root, so `..` never climbs above
/// the corpus root. Query strings and fragments are dropped and
/// percent-escapes decoded. Returns `None` for sources that leave the
/// corpus (another scheme or host, `data:` URIs).
///
/// # Examples
///
/// ```
/// use manualdex::images::resolve_image_path;
///
/// assert_eq!(
///     resolve_image_path("modeling/meshes/intro.html", "../../_images/v.png?v=2")
///         .as_deref(),
///     Some("_images/v.png")
/// );
/// assert_eq!(resolve_image_path("index.html", "https://example.com/a.png"), None);
/// ```
pub fn resolve_image_path(rel_html: &str, src: &str) -> Option<String> {
    let page = Url::parse("file:///").ok()?.join(rel_html).ok()?;
    let resolved = page.join(src.trim()).ok()?;
    if resolved.scheme() != "file" || resolved.host().is_some() {
        return None;
    }
    let path = percent_decode_str(resolved.path()).decode_utf8().ok()?;
    let path = path.trim_start_matches('/');
    (!path.is_empty()).then(|| path.to_string())
}

/// Find indexed images in document order.
pub fn find_images(html: &str, rel_html: &str) -> Vec<FoundImage> {
    let figures = figure_ranges(html);

    IMG.find_iter(html)
        .filter_map(|m| {
            let tag = m.as_str();
            let image = resolve_image_path(rel_html, attribute(tag, "src")?)?;
            if !image.starts_with(IMAGES_DIR) {
                return None;
            }
            let offset = m.start();
            let caption = figures
                .iter()
                .find(|f| offset >= f.start && offset <= f.end)
                .and_then(|f| f.caption.clone());
            Some(FoundImage {
                offset,
                image,
                alt: attribute(tag, "alt")
                    .and_then(|alt| non_empty(clean_inline(alt))),
                caption,
            })
        })
        .collect()
}

fn text_blocks(html: &str) -> Vec<Block> {
    BLOCK
        .captures_iter(html)
        .filter_map(|c| {
            let whole = c.get(0)?;
            let inner = c.get(1).or_else(|| c.get(2))?;
            Some(Block {
                start: whole.start(),
                end: whole.end(),
                text: clean_inline(inner.as_str()),
            })
        })
        .collect()
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
pub fn trim_to_length(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let head: String = text.chars().take(max - 3).collect();
    format!("{}...", head.trim_end())
}

fn context_around(blocks: &[Block], offset: usize) -> (Option<String>, Option<String>) {
    let before = blocks
        .iter()
        .rev()
        .find(|b| b.end <= offset)
        .map(|b| b.text.as_str());
    let after = blocks
        .iter()
        .find(|b| b.start > offset)
        .map(|b| b.text.as_str());
    let trim = |t: Option<&str>| {
        t.filter(|t| !t.is_empty())
            .map(|t| trim_to_length(t, CONTEXT_LIMIT))
    };
    (trim(before), trim(after))
}

/// Build the image records of one page.
///
/// Images and headings are scanned inside the main content article when
/// the page has one, else across the whole document. Returns no records
/// for pages without indexed images.
pub fn extract_images(
    html: &str,
    rel_html: &str,
    corpus: &CorpusInfo,
) -> Vec<ImageRecord> {
    let page_title =
        html::extract_title(html).unwrap_or_else(|| rel_html.to_string());
    let article = html::extract_article(html).unwrap_or(html);

    let found = find_images(article, rel_html);
    if found.is_empty() {
        return Vec::new();
    }

    let headings = html::scan_headings(article);
    let offsets: Vec<usize> = found.iter().map(|f| f.offset).collect();
    let contexts = heading_path::assign(&headings, &offsets);
    let blocks = text_blocks(article);

    found
        .into_iter()
        .zip(contexts)
        .enumerate()
        .map(|(idx, (img, ctx))| {
            let (context_before, context_after) =
                context_around(&blocks, img.offset);

            let keywords = {
                let mut sources = vec![
                    img.caption.as_deref().unwrap_or_default(),
                    ctx.heading_path.as_str(),
                    page_title.as_str(),
                    context_before.as_deref().unwrap_or_default(),
                    context_after.as_deref().unwrap_or_default(),
                    img.alt.as_deref().unwrap_or_default(),
                ];
                sources.extend(path_tokens(rel_html));
                sources.extend(path_tokens(&img.image));
                build_keywords(sources)
            };

            ImageRecord {
                id: image_id(&corpus.id_prefix, rel_html, &img.image, idx + 1),
                source: corpus.source.clone(),
                version: corpus.version.clone(),
                language: corpus.language.clone(),
                file: rel_html.to_string(),
                section: ctx.section.unwrap_or_else(|| page_title.clone()),
                page_title: page_title.clone(),
                heading_path: ctx.heading_path,
                headings: ctx.headings,
                image: img.image,
                caption: img.caption,
                alt: img.alt,
                context_before,
                context_after,
                keywords,
            }
        })
        .collect()
}
