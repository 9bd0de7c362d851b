//! Plain-text extraction of a manual page and its segment records.

use std::sync::LazyLock;

use regex_lite::{Captures, Regex};

use crate::{
    chunking::{SegmentConfig, chunk_text},
    config::CorpusInfo,
    heading_path,
    html::{self, Heading, decode_entities, flatten_inline, strip_tags},
    record::{TextRecord, text_id},
};

/// Pages whose cleaned text is shorter than this carry no content.
pub const MIN_PAGE_CHARS: usize = 80;

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("static regex pattern")
}

/// Blocks dropped wholesale. Figures belong to the image index.
static NOISE: LazyLock<[Regex; 5]> = LazyLock::new(|| {
    [
        pattern(r"(?is)<script.*?</script>"),
        pattern(r"(?is)<style.*?</style>"),
        pattern(r"(?is)<nav.*?</nav>"),
        pattern(r"(?is)<aside.*?</aside>"),
        pattern(r"(?is)<figure.*?</figure>"),
    ]
});

static PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?is)<p(?:\s[^>]*)?>(.*?)</p>"));

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?is)<li(?:\s[^>]*)?>(.*?)</li>"));

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)<br\s*/?>"));

/// Cleaned text of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPage {
    /// Plain text; headings appear as `# Title` lines, list items as
    /// `- item` lines.
    pub text: String,
    /// Headings in document order. Offsets are character offsets of the
    /// heading lines in `text`.
    pub headings: Vec<Heading>,
}

impl CleanedPage {
    /// First level-1 heading, else the first heading, else `fallback`.
    pub fn section(&self, fallback: &str) -> String {
        self.headings
            .iter()
            .find(|h| h.level == 1)
            .or_else(|| self.headings.first())
            .map_or_else(|| fallback.to_string(), |h| h.text.clone())
    }
}

fn heading_marker(level: usize, text: &str) -> String {
    format!("{} {text}", "#".repeat(level))
}

fn group<'h>(c: &Captures<'h>) -> &'h str {
    c.get(1).map_or("", |m| m.as_str())
}

fn inline_text(fragment: &str) -> String {
    strip_tags(fragment).trim().to_string()
}

/// Reduce a page to its article text.
///
/// Entities stay encoded until every tag is gone, so escaped markup such
/// as `&lt;Ctrl&gt;` survives as text. Returns `None` when the page has no main content article or when too
/// little text survives cleaning.
pub fn clean_page(raw_html: &str) -> Option<CleanedPage> {
    let mut content = html::extract_article(raw_html)?.to_string();

    for re in NOISE.iter() {
        content = re.replace_all(&content, "").into_owned();
    }

    let headings = html::scan_headings(&content);

    for (idx, re) in html::HEADINGS.iter().enumerate() {
        content = re
            .replace_all(&content, |c: &Captures| {
                let text = c.get(1).map(|m| flatten_inline(m.as_str()));
                let text = text.unwrap_or_default();
                format!("\n{}\n", heading_marker(idx + 1, &text))
            })
            .into_owned();
    }

    content = PARAGRAPH
        .replace_all(&content, |c: &Captures| {
            format!("\n{}\n", inline_text(group(c)))
        })
        .into_owned();
    content = LIST_ITEM
        .replace_all(&content, |c: &Captures| {
            format!("\n- {}", inline_text(group(c)))
        })
        .into_owned();
    content = LINE_BREAK.replace_all(&content, "\n").into_owned();

    let text = normalize_lines(&decode_entities(&strip_tags(&content)));
    if text.chars().count() < MIN_PAGE_CHARS {
        return None;
    }

    let headings = locate_headings(&text, headings);
    Some(CleanedPage { text, headings })
}

/// Collapse blanks within lines and allow at most one empty line in a row.
fn normalize_lines(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in text.split('\n') {
        let line = line
            .split([' ', '\t', '\r'])
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let blank_run = line.is_empty()
            && lines.last().is_some_and(|l| l.is_empty());
        if !blank_run {
            lines.push(line);
        }
    }
    lines.join("\n").trim().to_string()
}

/// Re-anchor headings at the character offsets of their marker lines.
///
/// Headings are matched in order. A marker line may match a heading further
/// down the queue; the headings it skips over have no marker and are
/// dropped, while later ones still anchor.
fn locate_headings(text: &str, headings: Vec<Heading>) -> Vec<Heading> {
    let mut pending = headings.as_slice();
    let mut located = Vec::new();
    let mut offset = 0;

    for line in text.split('\n') {
        if line.starts_with('#')
            && let Some(idx) = pending
                .iter()
                .position(|h| line == heading_marker(h.level, &h.text))
        {
            located.push(Heading {
                offset,
                ..pending[idx].clone()
            });
            pending = &pending[idx + 1..];
        }
        offset += line.chars().count() + 1;
    }
    located
}

/// Clean, segment and wrap one page as text records.
///
/// Each segment's heading path is the set of headings open where the
/// segment's text begins.
pub fn page_segments(
    raw_html: &str,
    rel_html: &str,
    corpus: &CorpusInfo,
    segments: &SegmentConfig,
) -> Vec<TextRecord> {
    let Some(page) = clean_page(raw_html) else {
        return Vec::new();
    };
    let section = page.section(rel_html);
    let chunks = chunk_text(&page.text, segments);
    let anchors: Vec<usize> =
        chunks.iter().map(|c| c.content_offset).collect();
    let contexts = heading_path::assign(&page.headings, &anchors);

    chunks
        .into_iter()
        .zip(contexts)
        .map(|(chunk, ctx)| TextRecord {
            id: text_id(&corpus.id_prefix, rel_html, chunk.index + 1),
            source: corpus.source.clone(),
            version: corpus.version.clone(),
            language: corpus.language.clone(),
            file: rel_html.to_string(),
            section: section.clone(),
            heading_path: ctx.heading_path,
            headings: ctx.headings,
            text: chunk.text,
        })
        .collect()
}
