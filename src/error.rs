//! Error types for the catalog, the filesystem primitives and the transfer queue.
//!
//! Application plumbing (`main`, `App::update`) uses `anyhow::Result`; these
//! enums are what the core hands back so callers can report or aggregate them.

use std::io;
use std::path::PathBuf;

/// Failure to snapshot a directory.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
  /// The directory could not be opened (missing, permissions, not a directory).
  #[error("cannot read directory {}: {source}", path.display())]
  DirectoryUnreadable {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Failure of a single filesystem primitive.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
  #[error("not found: {}", .0.display())]
  NotFound(PathBuf),

  #[error("{}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Fewer bytes reached the destination than the source holds (e.g. disk full).
  #[error("short copy to {}: {copied} of {expected} bytes", path.display())]
  ShortCopy {
    path: PathBuf,
    expected: u64,
    copied: u64,
  },

  #[error("invalid name: {0:?}")]
  InvalidName(String),

  #[error("{} already exists", .0.display())]
  AlreadyExists(PathBuf),

  /// The destination lies inside the directory being copied.
  #[error("cannot copy {} into itself ({})", dir.display(), dest.display())]
  IntoItself { dir: PathBuf, dest: PathBuf },
}

impl FsError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    FsError::Io { path: path.into(), source }
  }
}

/// Rejection of an enqueue request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
  #[error("transfer queue is full ({capacity} items)")]
  CapacityExceeded { capacity: usize },
}
