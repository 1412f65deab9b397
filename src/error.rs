//! Defines custom error types for the library.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
/// Error type returned when a slide export cannot be processed.
pub enum EmbedError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("No release tag of the form v<major>.<minor>.<patch> was found on the release page")]
    VersionNotFound,

    #[error("Document has no {tag} tag to insert into")]
    MissingInsertionPoint { tag: &'static str },

    #[error("Chart export {} is malformed: {reason}", .path.display())]
    MalformedExport { path: PathBuf, reason: String },

    #[error("Invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Invalid placeholder pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl EmbedError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
