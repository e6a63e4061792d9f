use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::QueueError;
use crate::fs::Entry;

pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
  Copy,
  Move,
}

impl TransferMode {
  pub fn label(self) -> &'static str {
    match self {
      TransferMode::Copy => "COPY",
      TransferMode::Move => "MOVE",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferItem {
  pub source_path: PathBuf,
  /// Raw file name, reused as the name at the destination.
  pub name: OsString,
  pub is_dir: bool,
  pub mode: TransferMode,
}

impl TransferItem {
  pub fn display_name(&self) -> Cow<'_, str> {
    self.name.to_string_lossy()
  }
}

/// What an enqueue request actually did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Enqueued {
  pub added: usize,
  /// Names skipped because they were already queued.
  pub duplicates: usize,
  /// Targets left out because the queue filled up partway.
  pub dropped: usize,
}

/// Pending copy/move items, in the order they were requested.
#[derive(Debug, Clone)]
pub struct TransferQueue {
  items: Vec<TransferItem>,
  capacity: usize,
}

impl Default for TransferQueue {
  fn default() -> Self {
    Self::new(DEFAULT_CAPACITY)
  }
}

impl TransferQueue {
  pub fn new(capacity: usize) -> Self {
    Self {
      items: Vec::new(),
      capacity: capacity.max(1),
    }
  }

  /// Queue `targets` for copying. Names already in the queue are skipped.
  pub fn enqueue_copy(&mut self, targets: &[&Entry], source_dir: &Path) -> Result<Enqueued, QueueError> {
    if targets.iter().any(|entry| !self.holds_name(entry)) {
      self.ensure_room()?;
    }
    let mut report = Enqueued::default();
    for entry in targets {
      if self.holds_name(entry) {
        report.duplicates += 1;
        continue;
      }
      self.push(entry, source_dir, TransferMode::Copy, &mut report);
    }
    debug!(?report, queued = self.items.len(), "enqueue copy");
    Ok(report)
  }

  /// Replace the pending move set with `targets`. Copy items stay queued.
  pub fn enqueue_move(&mut self, targets: &[&Entry], source_dir: &Path) -> Result<Enqueued, QueueError> {
    self.items.retain(|item| item.mode != TransferMode::Move);
    self.ensure_room()?;
    let mut report = Enqueued::default();
    for entry in targets {
      self.push(entry, source_dir, TransferMode::Move, &mut report);
    }
    debug!(?report, queued = self.items.len(), "enqueue move");
    Ok(report)
  }

  fn holds_name(&self, entry: &Entry) -> bool {
    self.items.iter().any(|item| item.name == entry.file_name)
  }

  fn ensure_room(&self) -> Result<(), QueueError> {
    if self.is_full() {
      return Err(QueueError::CapacityExceeded { capacity: self.capacity });
    }
    Ok(())
  }

  fn push(&mut self, entry: &Entry, source_dir: &Path, mode: TransferMode, report: &mut Enqueued) {
    if self.is_full() {
      report.dropped += 1;
      return;
    }
    self.items.push(TransferItem {
      source_path: source_dir.join(&entry.file_name),
      name: entry.file_name.clone(),
      is_dir: entry.is_dir,
      mode,
    });
    report.added += 1;
  }

  pub fn clear(&mut self) {
    self.items.clear();
  }

  /// Drop every item whose source is `path` or lies beneath it.
  pub fn forget(&mut self, path: &Path) -> usize {
    let before = self.items.len();
    self.items.retain(|item| !item.source_path.starts_with(path));
    before - self.items.len()
  }

  pub fn contains_source(&self, path: &Path) -> bool {
    self.items.iter().any(|item| item.source_path == path)
  }

  pub fn has_move(&self) -> bool {
    self.items.iter().any(|item| item.mode == TransferMode::Move)
  }

  /// "COPY", "MOVE" or "MIXED" for the header indicator.
  pub fn mode_label(&self) -> &'static str {
    let copies = self.items.iter().any(|item| item.mode == TransferMode::Copy);
    match (copies, self.has_move()) {
      (true, true) => "MIXED",
      (false, true) => TransferMode::Move.label(),
      _ => TransferMode::Copy.label(),
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = &TransferItem> {
    self.items.iter()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn is_full(&self) -> bool {
    self.items.len() >= self.capacity
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }
}
