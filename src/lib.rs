//! manualdex - index a product manual's HTML build and search it.
//!
//! Extraction walks the manual, turns each page into overlapping text
//! segments and per-image records (caption, alt text, surrounding prose and
//! the headings open where the image appears), and writes both as
//! newline-delimited JSON. Queries are expanded through a small
//! Japanese/English glossary and ranked with BM25, recomputed in memory on
//! every call.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use manualdex::{CorpusInfo, pipeline};
//! use manualdex::search::{self, IndexKind, SearchParams};
//!
//! let index = Path::new("data/image_index.jsonl");
//! pipeline::extract_image_index(
//!     Path::new("data/manual"),
//!     index,
//!     &CorpusInfo::default(),
//! )
//! .unwrap();
//!
//! let params = SearchParams {
//!     query: "頂点 選択".to_string(),
//!     count: 5,
//!     kind: IndexKind::Images,
//! };
//! for r in search::execute_search(&params, index).unwrap() {
//!     println!("{:.3} {:?}", r.score, r.record);
//! }
//! ```

pub mod bm25;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod glossary;
pub mod heading_path;
pub mod html;
pub mod images;
pub mod index_file;
pub mod keywords;
pub mod page;
pub mod pipeline;
pub mod record;
pub mod search;
pub mod walker;

pub use chunking::SegmentConfig;
pub use config::{Config, CorpusInfo};
pub use error::{Error, Result};
pub use record::{ImageRecord, IndexRecord, TextRecord};
