//! Regex-based helpers for the Sphinx/Furo HTML the manual is built with.
//!
//! The manual is machine-generated and regular enough that a handful of
//! patterns recover everything the index needs. All offsets reported here
//! are byte offsets into the string that was scanned; they are only ever
//! compared with each other, so ordering is all that matters.

use std::sync::LazyLock;

use regex_lite::Regex;

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("static regex pattern")
}

static TAG: LazyLock<Regex> = LazyLock::new(|| pattern(r"<[^>]+>"));

static ARTICLE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r#"(?is)<article[^>]*id="furo-main-content"[^>]*>(.*?)</article>"#)
});

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?is)<title(?:\s[^>]*)?>(.*?)</title>"));

/// Deepest heading level tracked anywhere in the pipeline.
pub const MAX_HEADING_LEVEL: usize = 3;

/// `<h1>`..`<h3>` with the inner HTML in group 1, indexed by level - 1.
///
/// One pattern per level: `regex-lite` has no backreferences to pair
/// `<hN>` with `</hN>`.
pub static HEADINGS: LazyLock<[Regex; MAX_HEADING_LEVEL]> =
    LazyLock::new(|| {
        [
            pattern(r"(?is)<h1(?:\s[^>]*)?>(.*?)</h1>"),
            pattern(r"(?is)<h2(?:\s[^>]*)?>(.*?)</h2>"),
            pattern(r"(?is)<h3(?:\s[^>]*)?>(.*?)</h3>"),
        ]
    });

/// A heading element found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 for `<h1>`, up to [`MAX_HEADING_LEVEL`].
    pub level: usize,
    pub text: String,
    /// Byte offset of the opening tag.
    pub offset: usize,
}

/// Permalink marker appended to headings, raw or entity-encoded.
const PERMALINK: [&str; 3] = ["¶", "&para;", "&#182;"];

/// Decode HTML entities in one pass; non-breaking spaces become spaces.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).replace('\u{a0}', " ")
}

/// Replace every tag with a single space.
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, " ").into_owned()
}

/// Collapse every whitespace run (newlines included) to one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip tags from an inline fragment and collapse it to one line, keeping
/// entities encoded.
///
/// The trailing `¶` permalink marker Sphinx appends to headings is dropped.
pub fn flatten_inline(fragment: &str) -> String {
    let mut text = collapse_whitespace(&strip_tags(fragment));
    loop {
        let Some(rest) =
            PERMALINK.iter().find_map(|mark| text.strip_suffix(mark))
        else {
            return text;
        };
        text = rest.trim_end().to_string();
    }
}

/// Turn an inline HTML fragment into a single clean line of text.
///
/// Strips tags, decodes entities, collapses whitespace and drops the
/// trailing `¶` permalink marker.
pub fn clean_inline(fragment: &str) -> String {
    collapse_whitespace(&decode_entities(&flatten_inline(fragment)))
        .trim_end_matches('¶')
        .trim_end()
        .to_string()
}

/// Inner HTML of the Furo main content article, if the page has one.
pub fn extract_article(html: &str) -> Option<&str> {
    ARTICLE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Page title from `<title>`, falling back to the first `<h1>`.
pub fn extract_title(html: &str) -> Option<String> {
    let from_tag = |re: &Regex| {
        re.captures(html)
            .and_then(|c| c.get(1))
            .map(|m| clean_inline(m.as_str()))
            .filter(|t| !t.is_empty())
    };
    from_tag(&*TITLE).or_else(|| from_tag(&HEADINGS[0]))
}

/// Every non-empty `<h1>`..`<h3>` in document order.
pub fn scan_headings(html: &str) -> Vec<Heading> {
    let mut headings: Vec<Heading> = HEADINGS
        .iter()
        .enumerate()
        .flat_map(|(idx, re)| {
            re.captures_iter(html).filter_map(move |c| {
                let whole = c.get(0)?;
                let text = clean_inline(c.get(1)?.as_str());
                (!text.is_empty()).then_some(Heading {
                    level: idx + 1,
                    text,
                    offset: whole.start(),
                })
            })
        })
        .collect();
    headings.sort_by_key(|h| h.offset);
    headings
}

/// Read a quoted attribute value out of a single tag.
pub fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let lower = tag.to_ascii_lowercase();
    let mut search_from = 0;
    while let Some(found) = lower[search_from..].find(name) {
        let start = search_from + found;
        search_from = start + name.len();

        let boundary = lower[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_whitespace());
        let rest = lower[search_from..].trim_start();
        if !boundary || !rest.starts_with('=') {
            continue;
        }

        let value_start = tag.len() - rest.len() + 1;
        let value = tag[value_start..].trim_start();
        let quote = value.chars().next()?;
        if quote != '"' && quote != '\'' {
            return None;
        }
        let body = &value[1..];
        let end = body.find(quote)?;
        return Some(&body[..end]);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_standard_entities() {
        assert_eq!(
            decode_entities("a&nbsp;&amp;&lt;b&gt;&quot;c&quot;&#39;"),
            "a &<b>\"c\"'"
        );
    }

    #[test]
    fn decodes_each_entity_once() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("&#x41;&#66;"), "AB");
    }

    #[test]
    fn flatten_keeps_entities() {
        assert_eq!(
            flatten_inline("The <kbd>&lt;Ctrl&gt;</kbd> key<a>¶</a>"),
            "The &lt;Ctrl&gt; key"
        );
        assert_eq!(clean_inline("The &lt;Ctrl&gt; key"), "The <Ctrl> key");
        assert_eq!(flatten_inline("Shift<a>&#182;</a>"), "Shift");
    }

    #[test]
    fn clean_inline_drops_permalink() {
        let raw = "Modeling <a class=\"headerlink\" href=\"#m\">¶</a>";
        assert_eq!(clean_inline(raw), "Modeling");
    }

    #[test]
    fn clean_inline_collapses_whitespace() {
        assert_eq!(clean_inline("  Edit\n   <em>Mode</em>  "), "Edit Mode");
    }

    #[test]
    fn extracts_furo_article() {
        let html = r#"<nav>menu</nav><article role="main" id="furo-main-content"><p>Body</p></article>"#;
        assert_eq!(extract_article(html), Some("<p>Body</p>"));
        assert_eq!(extract_article("<main><p>x</p></main>"), None);
    }

    #[test]
    fn title_prefers_title_tag() {
        let html = "<title>Vertices &amp; Edges</title><h1>Other</h1>";
        assert_eq!(extract_title(html).as_deref(), Some("Vertices & Edges"));
        assert_eq!(
            extract_title("<h1>Only Heading</h1>").as_deref(),
            Some("Only Heading")
        );
        assert_eq!(extract_title("<p>none</p>"), None);
    }

    #[test]
    fn headings_are_in_document_order() {
        let html = "<h2>B</h2><h1>A</h1><h3>C</h3><h2> </h2>";
        let headings = scan_headings(html);
        let got: Vec<_> =
            headings.iter().map(|h| (h.level, h.text.as_str())).collect();
        assert_eq!(got, vec![(2, "B"), (1, "A"), (3, "C")]);
        assert!(headings.windows(2).all(|w| w[0].offset < w[1].offset));
    }

    #[test]
    fn reads_attributes() {
        let tag = r#"<img data-src="x" alt='A vertex' SRC="../_images/v.png">"#;
        assert_eq!(attribute(tag, "src"), Some("../_images/v.png"));
        assert_eq!(attribute(tag, "alt"), Some("A vertex"));
        assert_eq!(attribute(tag, "title"), None);
    }
}
