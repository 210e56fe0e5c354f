//! Error type shared by the search engine, key encodings and key files.

use std::io;
use std::path::PathBuf;

/// Errors produced while preparing, running or finalizing a search.
#[derive(Debug, thiserror::Error)]
pub enum VanityError {
    #[error("at least one pattern is required")]
    EmptyPatternSet,

    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The key generation capability could not produce a keypair.
    /// Never retried: a search that hits this stops as a whole.
    #[error("key generation failed: {0}")]
    GenerationFailure(String),

    #[error("key encoding failed: {0}")]
    EncodingFailure(String),

    #[error("malformed key: {0}")]
    MalformedKey(String),

    #[error("failed to spawn thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("a search worker panicked")]
    WorkerPanicked,

    #[error("search cancelled before a match was found")]
    Cancelled,

    #[error("{} already exists, use --overwrite to replace it", .0.display())]
    AlreadyExists(PathBuf),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
