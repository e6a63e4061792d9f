use std::ffi::OsString;
use std::path::Path;

/// One child of the directory currently on display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
  /// The name exactly as the filesystem returned it. Every path is built
  /// from this one.
  pub file_name: OsString,
  /// Lossy UTF-8 rendering of `file_name`, for display and filtering.
  pub name: String,
  pub is_dir: bool,
  pub size: u64,
  pub selected: bool,
  pub visible: bool,
}

impl Entry {
  /// Stats `dir/name`, following symlinks. A failed stat yields a plain
  /// zero-sized file entry instead of an error.
  pub fn stat(dir: &Path, file_name: impl Into<OsString>) -> Self {
    let file_name = file_name.into();
    let metadata = dir.join(&file_name).metadata();
    let is_dir = metadata.as_ref().is_ok_and(|m| m.is_dir());
    let size = match &metadata {
      Ok(m) if !m.is_dir() => m.len(),
      _ => 0,
    };
    Self::new(file_name, is_dir, size)
  }

  pub fn new(file_name: impl Into<OsString>, is_dir: bool, size: u64) -> Self {
    let file_name = file_name.into();
    Self {
      name: file_name.to_string_lossy().into_owned(),
      file_name,
      is_dir,
      size,
      selected: false,
      visible: true,
    }
  }

  /// Case-insensitive substring match; `needle` must already be lowercase.
  pub fn matches(&self, needle: &str) -> bool {
    needle.is_empty() || self.name.to_lowercase().contains(needle)
  }
}
