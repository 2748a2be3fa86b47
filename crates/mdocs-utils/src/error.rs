use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while reading or writing content on disk.
#[derive(Debug, Error)]
pub enum Error {
  /// A file or directory could not be read or written.
  #[error("I/O error on `{path}`: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  /// A directory listing failed part way through.
  #[error("failed to list `{path}`: {source}")]
  Walk {
    path:   PathBuf,
    #[source]
    source: walkdir::Error,
  },

  /// A version index file is not valid JSON for the index schema.
  #[error("invalid version index `{path}`: {source}")]
  Index {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

impl Error {
  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
