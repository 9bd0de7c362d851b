use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{}:{line}: malformed index record: {source}", path.display())]
    IndexParse {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("corpus root does not exist or is not a directory: {0}")]
    CorpusRoot(PathBuf),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },
}
