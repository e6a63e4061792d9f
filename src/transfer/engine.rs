use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::queue::{TransferItem, TransferMode, TransferQueue};
use crate::error::FsError;
use crate::fs::ops;

/// Blocking yes/no question put to the user. Cancelling counts as "no".
pub trait Confirm {
  fn confirm(&mut self, prompt: &str, detail: &str) -> bool;
}

impl<F> Confirm for F
where
  F: FnMut(&str, &str) -> bool,
{
  fn confirm(&mut self, prompt: &str, detail: &str) -> bool {
    self(prompt, detail)
  }
}

/// Outcome of a paste or delete batch.
#[derive(Debug, Default)]
pub struct BatchResult {
  pub succeeded: usize,
  pub failed: usize,
  pub skipped: usize,
  pub errors: Vec<(PathBuf, FsError)>,
}

impl BatchResult {
  fn fail(&mut self, path: &Path, err: FsError) {
    warn!(path = %path.display(), error = %err, "batch item failed");
    self.failed += 1;
    self.errors.push((path.to_path_buf(), err));
  }

  pub fn has_failures(&self) -> bool {
    self.failed > 0
  }

  /// One line for the status bar, e.g. `Pasted 3, 1 failed (disk full)`.
  pub fn summary(&self, verb: &str) -> String {
    let mut line = format!("{verb} {}", self.succeeded);
    if self.failed > 0 {
      line.push_str(&format!(", {} failed", self.failed));
    }
    if self.skipped > 0 {
      line.push_str(&format!(", {} skipped", self.skipped));
    }
    if let Some((_, err)) = self.errors.first() {
      line.push_str(&format!(" ({err})"));
    }
    line
  }
}

/// Drain the queue into `destination`, in enqueue order.
///
/// Existing destinations are only overwritten after `confirm` agrees. A
/// failing item is recorded and the batch moves on. A batch that held any
/// move empties the queue afterwards whatever the outcome; copy-only
/// batches leave it as it was.
pub fn execute_paste(queue: &mut TransferQueue, destination: &Path, confirm: &mut impl Confirm) -> BatchResult {
  let mut result = BatchResult::default();
  let had_move = queue.has_move();

  for item in queue.iter() {
    let dest = destination.join(&item.name);
    if dest == item.source_path || same_file(&dest, &item.source_path) {
      result.skipped += 1;
      continue;
    }

    if fs::symlink_metadata(&dest).is_ok()
      && !confirm.confirm("Overwrite existing item?", &item.display_name())
    {
      result.skipped += 1;
      continue;
    }

    match transfer(item, &dest) {
      Ok(()) => result.succeeded += 1,
      Err(err) => result.fail(&item.source_path, err),
    }
  }

  if had_move {
    queue.clear();
  }

  info!(
    destination = %destination.display(),
    succeeded = result.succeeded,
    failed = result.failed,
    skipped = result.skipped,
    "paste finished"
  );
  result
}

/// Whether both paths resolve to the same inode, e.g. when `a` is reached
/// through a symlinked directory.
fn same_file(a: &Path, b: &Path) -> bool {
  use std::os::unix::fs::MetadataExt;

  match (fs::metadata(a), fs::metadata(b)) {
    (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
    _ => false,
  }
}

fn transfer(item: &TransferItem, dest: &Path) -> Result<(), FsError> {
  match item.mode {
    TransferMode::Move => fs::rename(&item.source_path, dest).map_err(|e| FsError::io(&item.source_path, e)),
    TransferMode::Copy if item.is_dir => ops::copy_directory(&item.source_path, dest),
    TransferMode::Copy => ops::copy_file(&item.source_path, dest).map(|_| ()),
  }
}

/// Remove every target recursively after a single confirmation for the
/// whole set. One failing target does not stop the others.
pub fn execute_delete(targets: &[PathBuf], confirm: &mut impl Confirm) -> BatchResult {
  let mut result = BatchResult::default();
  if targets.is_empty() {
    return result;
  }

  let detail = match targets {
    [single] => single
      .file_name()
      .map(|n| n.to_string_lossy().to_string())
      .unwrap_or_else(|| single.display().to_string()),
    _ => format!("{} items", targets.len()),
  };
  if !confirm.confirm("Delete permanently?", &detail) {
    result.skipped = targets.len();
    return result;
  }

  for path in targets {
    match ops::remove_recursive(path) {
      Ok(()) => result.succeeded += 1,
      Err(err) => result.fail(path, err),
    }
  }

  info!(succeeded = result.succeeded, failed = result.failed, "delete finished");
  result
}
