use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const CORPUS_ENV: &str = "MANUALDEX_CORPUS";
pub const TEXT_INDEX_ENV: &str = "MANUALDEX_TEXT_INDEX";
pub const IMAGE_INDEX_ENV: &str = "MANUALDEX_IMAGE_INDEX";
pub const PAGE_DIR_ENV: &str = "MANUALDEX_PAGE_DIR";

const DEFAULT_CORPUS: &str = "data/manual";
const DEFAULT_TEXT_INDEX: &str = "data/index.jsonl";
const DEFAULT_IMAGE_INDEX: &str = "data/image_index.jsonl";
const DEFAULT_PAGE_DIR: &str = "public/sample";

/// Provenance stamped on every record of one corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusInfo {
    /// Leading component of every record id.
    pub id_prefix: String,
    pub source: String,
    pub version: String,
    pub language: String,
}

impl Default for CorpusInfo {
    fn default() -> Self {
        Self {
            id_prefix: "blender-manual-v500-en".to_string(),
            source: "Blender Manual".to_string(),
            version: "5.0.0".to_string(),
            language: "en".to_string(),
        }
    }
}

/// Paths given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub corpus: Option<PathBuf>,
    pub text_index: Option<PathBuf>,
    pub image_index: Option<PathBuf>,
    pub page_dir: Option<PathBuf>,
}

/// Resolved locations of the corpus and everything derived from it.
#[derive(Debug, Clone)]
pub struct Config {
    corpus_root: PathBuf,
    text_index: PathBuf,
    image_index: PathBuf,
    page_dir: PathBuf,
    pub corpus: CorpusInfo,
}

impl Config {
    /// Resolve every path from, in order of priority:
    /// 1. An explicit override (from the command line)
    /// 2. The matching `MANUALDEX_*` environment variable
    /// 3. A fixed default relative to the working directory
    pub fn resolve(overrides: &PathOverrides) -> Result<Self> {
        Ok(Self {
            corpus_root: pick(
                overrides.corpus.as_deref(),
                CORPUS_ENV,
                DEFAULT_CORPUS,
            )?,
            text_index: pick(
                overrides.text_index.as_deref(),
                TEXT_INDEX_ENV,
                DEFAULT_TEXT_INDEX,
            )?,
            image_index: pick(
                overrides.image_index.as_deref(),
                IMAGE_INDEX_ENV,
                DEFAULT_IMAGE_INDEX,
            )?,
            page_dir: pick(
                overrides.page_dir.as_deref(),
                PAGE_DIR_ENV,
                DEFAULT_PAGE_DIR,
            )?,
            corpus: CorpusInfo::default(),
        })
    }

    pub fn corpus_root(&self) -> &Path {
        &self.corpus_root
    }

    pub fn text_index(&self) -> &Path {
        &self.text_index
    }

    pub fn image_index(&self) -> &Path {
        &self.image_index
    }

    pub fn page_dir(&self) -> &Path {
        &self.page_dir
    }
}

fn pick(explicit: Option<&Path>, env: &str, default: &str) -> Result<PathBuf> {
    let path = if let Some(path) = explicit {
        path.to_path_buf()
    } else if let Ok(val) = std::env::var(env) {
        PathBuf::from(val)
    } else {
        PathBuf::from(default)
    };

    if path.as_os_str().is_empty() {
        return Err(Error::Config(format!("empty path for {env}")));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_win() {
        let overrides = PathOverrides {
            corpus: Some(PathBuf::from("/tmp/manual")),
            text_index: Some(PathBuf::from("/tmp/text.jsonl")),
            image_index: Some(PathBuf::from("/tmp/images.jsonl")),
            page_dir: Some(PathBuf::from("/tmp/page")),
        };
        let config = Config::resolve(&overrides).unwrap();

        assert_eq!(config.corpus_root(), Path::new("/tmp/manual"));
        assert_eq!(config.text_index(), Path::new("/tmp/text.jsonl"));
        assert_eq!(config.image_index(), Path::new("/tmp/images.jsonl"));
        assert_eq!(config.page_dir(), Path::new("/tmp/page"));
    }

    #[test]
    fn pick_falls_back_to_default() {
        let path =
            pick(None, "MANUALDEX_TEST_UNSET_VARIABLE", "data/x").unwrap();
        assert_eq!(path, PathBuf::from("data/x"));
    }

    #[test]
    fn empty_explicit_path_is_rejected() {
        let err = pick(Some(Path::new("")), CORPUS_ENV, "data/x").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn default_corpus_info() {
        let info = CorpusInfo::default();
        assert_eq!(info.id_prefix, "blender-manual-v500-en");
        assert_eq!(info.source, "Blender Manual");
    }
}
