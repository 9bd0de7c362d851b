use std::{fmt::Write as _, path::Path};

use serde::Serialize;

use crate::{
    bm25,
    error::Result,
    glossary,
    html::collapse_whitespace,
    images::trim_to_length,
    index_file::load_index,
    record::{ImageRecord, IndexRecord, Preview, TextRecord},
};

/// Number of hits printed when no count is given.
pub const DEFAULT_RESULT_COUNT: usize = 5;

/// Longest context shown per hit in terminal output.
pub const PREVIEW_CHARS: usize = 160;

/// Which index a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexKind {
    #[default]
    Images,
    Text,
}

/// Parameters for a single query.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query: String,
    pub count: usize,
    pub kind: IndexKind,
}

/// A ranked record, owned so it can outlive the loaded index.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub rank: usize,
    pub score: f64,
    #[serde(flatten)]
    pub record: IndexRecord,
}

/// Load the index at `path` and rank it against the expanded query.
pub fn execute_search(
    params: &SearchParams,
    path: &Path,
) -> Result<Vec<SearchResult>> {
    let records: Vec<IndexRecord> = match params.kind {
        IndexKind::Images => load_index::<ImageRecord>(path)?
            .into_iter()
            .map(IndexRecord::Image)
            .collect(),
        IndexKind::Text => load_index::<TextRecord>(path)?
            .into_iter()
            .map(IndexRecord::Text)
            .collect(),
    };
    tracing::debug!(records = records.len(), path = %path.display(), "loaded index");

    Ok(search_records(&records, &params.query, params.count))
}

/// Rank already-loaded records.
pub fn search_records(
    records: &[IndexRecord],
    query: &str,
    count: usize,
) -> Vec<SearchResult> {
    let expanded = glossary::expand_query(query);
    tracing::debug!(query = %expanded, "expanded query");

    bm25::rank(records, &expanded, count)
        .into_iter()
        .enumerate()
        .map(|(i, hit)| SearchResult {
            rank: i + 1,
            score: hit.score,
            record: hit.record.clone(),
        })
        .collect()
}

/// Render results for terminal output.
pub fn format_human(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No matches found.\n".to_string();
    }

    let mut out = String::new();
    for r in results {
        let record = &r.record;
        let _ = writeln!(out, "{:>3}. [{:.3}] {}", r.rank, r.score, record.location());
        if !record.heading_path().is_empty() {
            let _ = writeln!(out, "     {}", record.heading_path());
        }
        if let Some(caption) = record.caption() {
            let _ = writeln!(out, "     caption: {caption}");
        }
        let context = collapse_whitespace(&record.context());
        if !context.is_empty() {
            let _ = writeln!(
                out,
                "     {}",
                trim_to_length(&context, PREVIEW_CHARS)
            );
        }
    }
    let _ = writeln!(out, "\n{} result(s)", results.len());
    out
}

/// Render results as a JSON array.
pub fn format_json(results: &[SearchResult]) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}
