use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::entry::Entry;
use crate::error::CatalogError;

/// Snapshot of one directory's immediate children.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  pub dir: PathBuf,
  pub entries: Vec<Entry>,
}

impl Catalog {
  pub fn load(dir: &Path) -> Result<Self, CatalogError> {
    let read_dir = std::fs::read_dir(dir).map_err(|source| CatalogError::DirectoryUnreadable {
      path: dir.to_path_buf(),
      source,
    })?;

    let mut entries = Vec::new();
    for item in read_dir.flatten() {
      let file_name = item.file_name();
      if file_name == "." || file_name == ".." {
        continue;
      }
      entries.push(Entry::stat(dir, file_name));
    }

    // Directories first, then case-insensitive alphabetical
    entries.sort_by(|a, b| {
      b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.file_name.cmp(&b.file_name))
    });

    debug!(dir = %dir.display(), count = entries.len(), "catalog loaded");
    Ok(Self { dir: dir.to_path_buf(), entries })
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Entry> {
    self.entries.get(index)
  }

  /// Index of the entry whose raw name is `file_name`.
  pub fn position(&self, file_name: impl AsRef<OsStr>) -> Option<usize> {
    let file_name = file_name.as_ref();
    self.entries.iter().position(|e| e.file_name.as_os_str() == file_name)
  }

  pub fn path_of(&self, entry: &Entry) -> PathBuf {
    self.dir.join(&entry.file_name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use std::sync::atomic::{AtomicU32, Ordering};

  static COUNTER: AtomicU32 = AtomicU32::new(0);

  fn setup_test_dir() -> PathBuf {
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("dirman_catalog_{id}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("beta_dir")).unwrap();
    fs::create_dir_all(dir.join("Alpha_dir")).unwrap();
    fs::write(dir.join("charlie.txt"), "hello").unwrap();
    fs::write(dir.join("delta.rs"), "fn main() {}").unwrap();
    fs::write(dir.join(".hidden"), "secret").unwrap();
    dir
  }

  #[test]
  fn test_load_lists_all_children() {
    let dir = setup_test_dir();
    let catalog = Catalog::load(&dir).unwrap();
    assert_eq!(catalog.len(), 5);
    assert!(catalog.entries.iter().all(|e| e.name != "." && e.name != ".."));
    assert!(catalog.position(".hidden").is_some());
    assert_eq!(catalog.dir, dir);
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_entries_start_visible_and_unselected() {
    let dir = setup_test_dir();
    let catalog = Catalog::load(&dir).unwrap();
    assert!(catalog.entries.iter().all(|e| e.visible && !e.selected));
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_dirs_first_case_insensitive() {
    let dir = setup_test_dir();
    let catalog = Catalog::load(&dir).unwrap();
    let names: Vec<&str> = catalog.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha_dir", "beta_dir", ".hidden", "charlie.txt", "delta.rs"]);
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_sizes_recorded() {
    let dir = setup_test_dir();
    let catalog = Catalog::load(&dir).unwrap();
    let charlie = catalog.get(catalog.position("charlie.txt").unwrap()).unwrap();
    assert_eq!(charlie.size, 5);
    let beta = catalog.get(catalog.position("beta_dir").unwrap()).unwrap();
    assert_eq!(beta.size, 0);
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_load_missing_dir_is_unreadable() {
    let missing = std::env::temp_dir().join(format!("dirman_catalog_missing_{}", std::process::id()));
    let _ = fs::remove_dir_all(&missing);
    let err = Catalog::load(&missing).unwrap_err();
    assert!(matches!(err, CatalogError::DirectoryUnreadable { .. }));
  }

  #[test]
  fn test_load_file_is_unreadable() {
    let dir = setup_test_dir();
    let err = Catalog::load(&dir.join("charlie.txt")).unwrap_err();
    assert!(matches!(err, CatalogError::DirectoryUnreadable { .. }));
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_load_grows_past_small_capacity() {
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("dirman_catalog_many_{id}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    for i in 0..250 {
      fs::write(dir.join(format!("f{i:03}")), "").unwrap();
    }
    let catalog = Catalog::load(&dir).unwrap();
    assert_eq!(catalog.len(), 250);
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_path_of_joins_dir() {
    let dir = setup_test_dir();
    let catalog = Catalog::load(&dir).unwrap();
    let entry = catalog.get(0).unwrap();
    assert_eq!(catalog.path_of(entry), dir.join(&entry.file_name));
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_non_utf8_names_stay_distinct() {
    use std::os::unix::ffi::OsStrExt;

    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("dirman_catalog_raw_{id}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    // Both render as "caf\u{FFFD}.txt"
    let latin1 = OsStr::from_bytes(b"caf\xe9.txt");
    let stray = OsStr::from_bytes(b"caf\xff.txt");
    fs::write(dir.join(latin1), "hello").unwrap();
    fs::write(dir.join(stray), "bye").unwrap();

    let catalog = Catalog::load(&dir).unwrap();
    assert_eq!(catalog.len(), 2);
    let first = catalog.get(catalog.position(latin1).unwrap()).unwrap();
    let second = catalog.get(catalog.position(stray).unwrap()).unwrap();
    assert_eq!(first.size, 5);
    assert_eq!(second.size, 3);
    assert_eq!(fs::read(catalog.path_of(first)).unwrap(), b"hello");
    let _ = fs::remove_dir_all(&dir);
  }
}
