//! Newline-delimited JSON index files.
//!
//! Each run rewrites a whole file: records are written to a sibling
//! temporary file which then replaces the target, so readers only ever
//! see a complete index. Loading is strict; index files are generated,
//! never hand-edited, so one bad line fails the whole load.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Error, Result};

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `records` to `path`, one JSON object per line.
///
/// Parent directories are created as needed. Returns the number of
/// records written.
pub fn write_index<T: Serialize>(path: &Path, records: &[T]) -> Result<usize> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    {
        let mut out = BufWriter::new(File::create(&tmp)?);
        for record in records {
            serde_json::to_writer(&mut out, record)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(records.len())
}

/// Parse newline-delimited JSON, skipping blank lines.
///
/// `path` is only used to label errors.
pub fn parse_index<T: DeserializeOwned>(
    contents: &str,
    path: &Path,
) -> Result<Vec<T>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| Error::IndexParse {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            })
        })
        .collect()
}

/// Load every record of an index file.
pub fn load_index<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound {
                kind: "index file",
                name: path.display().to_string(),
            }
        } else {
            Error::Io(e)
        }
    })?;
    parse_index(&contents, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ImageRecord, IndexRecord, TextRecord, fixtures};

    fn text_record(id: &str) -> TextRecord {
        TextRecord {
            id: id.to_string(),
            source: "s".to_string(),
            version: "v".to_string(),
            language: "en".to_string(),
            file: "p.html".to_string(),
            section: "S".to_string(),
            heading_path: "S".to_string(),
            headings: vec!["S".to_string()],
            text: "body".to_string(),
        }
    }

    #[test]
    fn writes_one_line_per_record() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("index.jsonl");
        let records = vec![text_record("a"), text_record("b")];

        assert_eq!(write_index(&path, &records).unwrap(), 2);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.ends_with('\n'));
        assert!(!temp_path(&path).exists());

        let loaded: Vec<TextRecord> = load_index(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn rewrite_replaces_previous_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("index.jsonl");
        write_index(&path, &[text_record("a"), text_record("b")]).unwrap();
        write_index(&path, &[text_record("c")]).unwrap();

        let loaded: Vec<TextRecord> = load_index(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "c");
    }

    #[test]
    fn blank_lines_are_ignored() {
        let line = serde_json::to_string(&text_record("a")).unwrap();
        let contents = format!("\n{line}\n   \n{line}\n");
        let loaded: Vec<TextRecord> =
            parse_index(&contents, Path::new("x.jsonl")).unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let line = serde_json::to_string(&text_record("a")).unwrap();
        let contents = format!("{line}\n{{not json\n");
        let err = parse_index::<TextRecord>(&contents, Path::new("x.jsonl"))
            .unwrap_err();

        match err {
            Error::IndexParse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn schema_violation_is_fatal() {
        let contents = r#"{"id":"a","file":"p.html"}"#;
        assert!(parse_index::<ImageRecord>(contents, Path::new("x")).is_err());
        assert!(parse_index::<IndexRecord>(contents, Path::new("x")).is_err());
    }

    #[test]
    fn mixed_records_load_as_variants() {
        let contents = format!(
            "{}\n{}\n",
            serde_json::to_string(&fixtures::image(Some("c"), "A")).unwrap(),
            serde_json::to_string(&text_record("t")).unwrap()
        );
        let loaded: Vec<IndexRecord> =
            parse_index(&contents, Path::new("x")).unwrap();
        assert!(matches!(loaded[0], IndexRecord::Image(_)));
        assert!(matches!(loaded[1], IndexRecord::Text(_)));
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err =
            load_index::<TextRecord>(&tmp.path().join("none.jsonl")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
