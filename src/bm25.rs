//! In-memory BM25 ranking over index records.
//!
//! Every query re-scores the whole candidate set from scratch: document
//! frequencies and the average length come from the candidates passed
//! in, not from any persisted statistics.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

/// Term frequency saturation.
pub const K1: f64 = 1.5;

/// Length normalization strength.
pub const B: f64 = 0.75;

/// Punctuation treated as a token boundary, on top of whitespace.
const SEPARATORS: &[char] = &[
    '、', '。', ',', '.', '!', '?', ':', '"', '\'', '(', ')', '\\', '/', '[',
    ']', '-',
];

/// Anything that can be scored against a query.
pub trait Weighted {
    /// The text to score; fields may be repeated to weight them.
    fn weighted_text(&self) -> String;
}

/// A scored candidate.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a, T> {
    pub record: &'a T,
    pub score: f64,
}

/// Lower-case and split on whitespace and [`SEPARATORS`].
///
/// # Examples
///
/// ```
/// use manualdex::bm25::tokenize;
///
/// assert_eq!(tokenize("Edit-Mode: Vertices."), vec!["edit", "mode", "vertices"]);
/// assert!(tokenize(" ?!, ").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || SEPARATORS.contains(&c))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

struct Scored {
    term_freq: HashMap<String, usize>,
    len: usize,
}

impl Scored {
    fn new(tokens: Vec<String>) -> Self {
        let len = tokens.len();
        let mut term_freq = HashMap::new();
        for token in tokens {
            *term_freq.entry(token).or_insert(0) += 1;
        }
        Self { term_freq, len }
    }
}

/// Rank `records` against `query`, best first, at most `limit` hits.
///
/// Only candidates sharing at least one token with the query are
/// returned. Equal scores keep the order of `records`, so results are
/// deterministic for a given index file.
pub fn rank<'a, T>(records: &'a [T], query: &str, limit: usize) -> Vec<Hit<'a, T>>
where
    T: Weighted + Sync,
{
    let mut seen = HashSet::new();
    let query_tokens: Vec<String> = tokenize(query)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect();
    if query_tokens.is_empty() || records.is_empty() || limit == 0 {
        return Vec::new();
    }

    let docs: Vec<Scored> = records
        .par_iter()
        .map(|r| Scored::new(tokenize(&r.weighted_text())))
        .collect();

    let mut doc_freq: HashMap<&str, usize> = HashMap::new();
    for doc in &docs {
        for token in doc.term_freq.keys() {
            *doc_freq.entry(token.as_str()).or_insert(0) += 1;
        }
    }

    let total_docs = docs.len() as f64;
    let total_len: usize = docs.iter().map(|d| d.len).sum();
    let avg_len = total_len as f64 / total_docs;

    let idf: Vec<(&str, f64)> = query_tokens
        .iter()
        .filter_map(|qt| {
            let df = *doc_freq.get(qt.as_str())? as f64;
            let idf = (1.0 + (total_docs - df + 0.5) / (df + 0.5)).ln();
            Some((qt.as_str(), idf))
        })
        .collect();

    let mut hits: Vec<Hit<'a, T>> = records
        .iter()
        .zip(&docs)
        .filter_map(|(record, doc)| {
            let score = score_doc(doc, &idf, avg_len);
            (score > 0.0).then_some(Hit { record, score })
        })
        .collect();

    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(limit);
    hits
}

fn score_doc(doc: &Scored, idf: &[(&str, f64)], avg_len: f64) -> f64 {
    let length_norm = 1.0 - B + B * (doc.len as f64 / avg_len);
    idf.iter()
        .filter_map(|(token, idf)| {
            let tf = *doc.term_freq.get(*token)? as f64;
            Some(idf * (tf * (K1 + 1.0)) / (tf + K1 * length_norm))
        })
        .sum()
}
