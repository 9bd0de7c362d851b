//! Corpus-wide extraction: walk, read, extract per page, write one index.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    chunking::SegmentConfig,
    config::CorpusInfo,
    error::Result,
    extract,
    images,
    index_file::write_index,
    record::{ImageRecord, TextRecord},
    walker::{DiscoveredFile, discover_html_files},
};

/// Read a page, replacing invalid UTF-8 with U+FFFD.
fn read_page(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read every page in parallel and run `per_page` on it.
///
/// Results are concatenated in walker order. Unreadable pages are logged
/// and skipped.
fn collect_pages<T, F>(files: &[DiscoveredFile], per_page: F) -> Vec<T>
where
    T: Send,
    F: Fn(&str, &DiscoveredFile) -> Vec<T> + Sync,
{
    files
        .par_iter()
        .map(|file| match read_page(&file.absolute_path) {
            Ok(html) => per_page(&html, file),
            Err(e) => {
                warn!(file = %file.relative_path, "skipping unreadable page: {e}");
                Vec::new()
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

/// Build text segment records for every page under `root`.
pub fn build_text_records(
    root: &Path,
    corpus: &CorpusInfo,
    segments: &SegmentConfig,
) -> Result<Vec<TextRecord>> {
    let files = discover_html_files(root)?;
    debug!(pages = files.len(), "discovered pages");

    Ok(collect_pages(&files, |html, file| {
        let records =
            extract::page_segments(html, &file.relative_path, corpus, segments);
        if records.is_empty() {
            debug!(file = %file.relative_path, "no article text");
        }
        records
    }))
}

/// Build image records for every page under `root`.
pub fn build_image_records(
    root: &Path,
    corpus: &CorpusInfo,
) -> Result<Vec<ImageRecord>> {
    let files = discover_html_files(root)?;
    debug!(pages = files.len(), "discovered pages");

    Ok(collect_pages(&files, |html, file| {
        images::extract_images(html, &file.relative_path, corpus)
    }))
}

/// Extract the text index of `root` into `out`, replacing it.
///
/// Returns the number of records written.
pub fn extract_text_index(
    root: &Path,
    out: &Path,
    corpus: &CorpusInfo,
    segments: &SegmentConfig,
) -> Result<usize> {
    let records = build_text_records(root, corpus, segments)?;
    let count = write_index(out, &records)?;
    info!(records = count, path = %out.display(), "wrote text index");
    Ok(count)
}

/// Extract the image index of `root` into `out`, replacing it.
///
/// Returns the number of records written.
pub fn extract_image_index(
    root: &Path,
    out: &Path,
    corpus: &CorpusInfo,
) -> Result<usize> {
    let records = build_image_records(root, corpus)?;
    let count = write_index(out, &records)?;
    info!(records = count, path = %out.display(), "wrote image index");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{error::Error, index_file::load_index};

    fn page(title: &str, body: &str) -> String {
        format!(
            concat!(
                "<html><head><title>{title}</title></head><body>",
                r#"<article id="furo-main-content">{body}</article>"#,
                "</body></html>"
            ),
            title = title,
            body = body,
        )
    }

    fn corpus_dir() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("modeling")).unwrap();
        fs::create_dir_all(root.join("_images")).unwrap();

        let prose = "Vertices are the corners of a mesh. ".repeat(10);
        fs::write(
            root.join("modeling/basics.html"),
            page(
                "Modeling",
                &format!(
                    concat!(
                        "<h1>Modeling Basics</h1><p>{}</p>",
                        r#"<figure><img src="../_images/vertex.png" alt="Vertex">"#,
                        "<figcaption>Selecting a vertex</figcaption></figure>",
                    ),
                    prose
                ),
            ),
        )
        .unwrap();
        fs::write(
            root.join("index.html"),
            page("Home", &format!("<h1>Home</h1><p>{prose}</p>")),
        )
        .unwrap();
        fs::write(root.join("genindex.html"), page("Index", &prose)).unwrap();
        tmp
    }

    #[test]
    fn text_index_covers_each_page() {
        let tmp = corpus_dir();
        let out = tmp.path().join("out/index.jsonl");
        let count = extract_text_index(
            tmp.path(),
            &out,
            &CorpusInfo::default(),
            &SegmentConfig::default(),
        )
        .unwrap();

        let records: Vec<TextRecord> = load_index(&out).unwrap();
        assert_eq!(records.len(), count);
        let files: Vec<_> = records.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(files, vec!["index.html", "modeling/basics.html"]);
    }

    #[test]
    fn image_index_finds_figures() {
        let tmp = corpus_dir();
        let out = tmp.path().join("images.jsonl");
        extract_image_index(tmp.path(), &out, &CorpusInfo::default()).unwrap();

        let records: Vec<ImageRecord> = load_index(&out).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].image, "_images/vertex.png");
        assert_eq!(records[0].caption.as_deref(), Some("Selecting a vertex"));
        assert_eq!(records[0].heading_path, "Modeling Basics");
        assert_eq!(records[0].page_title, "Modeling");
    }

    #[test]
    fn reruns_are_byte_identical() {
        let tmp = corpus_dir();
        let out = tmp.path().join("images.jsonl");
        let corpus = CorpusInfo::default();

        extract_image_index(tmp.path(), &out, &corpus).unwrap();
        let first = fs::read(&out).unwrap();
        extract_image_index(tmp.path(), &out, &corpus).unwrap();
        assert_eq!(fs::read(&out).unwrap(), first);

        let text_out = tmp.path().join("index.jsonl");
        let segments = SegmentConfig::default();
        extract_text_index(tmp.path(), &text_out, &corpus, &segments).unwrap();
        let first = fs::read(&text_out).unwrap();
        extract_text_index(tmp.path(), &text_out, &corpus, &segments).unwrap();
        assert_eq!(fs::read(&text_out).unwrap(), first);
    }

    #[test]
    fn invalid_utf8_page_is_still_indexed() {
        let tmp = corpus_dir();
        let mut html = page(
            "Latin",
            concat!(
                "<h1>Caf</h1><p>Caf\u{0}</p>",
                r#"<figure><img src="_images/cafe.png">"#,
                "<figcaption>Menu</figcaption></figure>",
            ),
        )
        .into_bytes();
        let pos = html.iter().position(|b| *b == 0).unwrap();
        html[pos] = 0xE9;
        fs::write(tmp.path().join("latin.html"), html).unwrap();

        let records =
            build_image_records(tmp.path(), &CorpusInfo::default()).unwrap();
        let latin: Vec<_> =
            records.iter().filter(|r| r.file == "latin.html").collect();
        assert_eq!(latin.len(), 1);
        assert_eq!(latin[0].caption.as_deref(), Some("Menu"));
        assert_eq!(latin[0].context_before.as_deref(), Some("Caf\u{FFFD}"));
    }

    #[test]
    fn unreadable_page_is_skipped() {
        let tmp = corpus_dir();
        let mut files = discover_html_files(tmp.path()).unwrap();
        files.insert(
            0,
            DiscoveredFile {
                relative_path: "vanished.html".to_string(),
                absolute_path: tmp.path().join("vanished.html"),
            },
        );

        let records = collect_pages(&files, |html, file| {
            images::extract_images(html, &file.relative_path, &CorpusInfo::default())
        });
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file, "modeling/basics.html");
    }

    #[test]
    fn missing_root_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let err = extract_image_index(
            &tmp.path().join("absent"),
            &tmp.path().join("out.jsonl"),
            &CorpusInfo::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::CorpusRoot(_)));
    }
}
