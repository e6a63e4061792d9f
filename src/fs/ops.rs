use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::FsError;

/// Copy a single file byte for byte, giving the destination the source's
/// permission bits. An existing destination is truncated.
pub fn copy_file(source: &Path, dest: &Path) -> Result<u64, FsError> {
  let mut src = File::open(source).map_err(|e| open_error(source, e))?;
  let metadata = src.metadata().map_err(|e| FsError::io(source, e))?;

  let mut options = OpenOptions::new();
  options.write(true).create(true).truncate(true);
  #[cfg(unix)]
  {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    options.mode(metadata.permissions().mode());
  }
  let mut dst = options.open(dest).map_err(|e| FsError::io(dest, e))?;

  let copied = io::copy(&mut src, &mut dst).map_err(|e| FsError::io(dest, e))?;
  if copied != metadata.len() {
    return Err(FsError::ShortCopy {
      path: dest.to_path_buf(),
      expected: metadata.len(),
      copied,
    });
  }

  // The create mode is filtered by the umask and ignored for existing files
  fs::set_permissions(dest, metadata.permissions()).map_err(|e| FsError::io(dest, e))?;
  Ok(copied)
}

/// Recursively copy a directory. Stops at the first failing child and
/// leaves whatever was already copied in place.
///
/// A destination inside `source` is refused up front with
/// [`FsError::IntoItself`] and nothing is created.
pub fn copy_directory(source: &Path, dest: &Path) -> Result<(), FsError> {
  let real_source = fs::canonicalize(source).map_err(|_| FsError::NotFound(source.to_path_buf()))?;
  let parent = dest.parent().unwrap_or(dest);
  let real_parent = fs::canonicalize(parent).map_err(|e| FsError::io(parent, e))?;
  if real_parent.starts_with(&real_source) {
    return Err(FsError::IntoItself {
      dir: source.to_path_buf(),
      dest: dest.to_path_buf(),
    });
  }
  copy_tree(source, dest)
}

fn copy_tree(source: &Path, dest: &Path) -> Result<(), FsError> {
  let metadata = fs::metadata(source).map_err(|_| FsError::NotFound(source.to_path_buf()))?;

  let mut builder = fs::DirBuilder::new();
  #[cfg(unix)]
  {
    use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
    builder.mode(metadata.permissions().mode());
  }
  if let Err(e) = builder.create(dest)
    && e.kind() != io::ErrorKind::AlreadyExists
  {
    return Err(FsError::io(dest, e));
  }

  for entry in fs::read_dir(source).map_err(|e| FsError::io(source, e))? {
    let entry = entry.map_err(|e| FsError::io(source, e))?;
    let src_path = entry.path();
    let dst_path = dest.join(entry.file_name());
    let Ok(child) = fs::metadata(&src_path) else {
      warn!(path = %src_path.display(), "skipping child that cannot be stat'ed");
      continue;
    };
    if child.is_dir() {
      copy_tree(&src_path, &dst_path)?;
    } else {
      copy_file(&src_path, &dst_path)?;
    }
  }
  Ok(())
}

/// Delete a file, symlink or whole directory tree. The first failure stops
/// the walk and leaves the rest untouched.
pub fn remove_recursive(path: &Path) -> Result<(), FsError> {
  let metadata = fs::symlink_metadata(path).map_err(|e| open_error(path, e))?;
  if metadata.is_dir() {
    for entry in fs::read_dir(path).map_err(|e| FsError::io(path, e))? {
      let entry = entry.map_err(|e| FsError::io(path, e))?;
      remove_recursive(&entry.path())?;
    }
    fs::remove_dir(path).map_err(|e| FsError::io(path, e))
  } else {
    fs::remove_file(path).map_err(|e| FsError::io(path, e))
  }
}

/// Create an empty file named `name` inside `dir`.
pub fn create_file(dir: &Path, name: &str) -> Result<PathBuf, FsError> {
  let path = new_child_path(dir, name)?;
  OpenOptions::new()
    .write(true)
    .create_new(true)
    .open(&path)
    .map_err(|e| create_error(&path, e))?;
  Ok(path)
}

/// Create a directory named `name` inside `dir` with mode 0755.
pub fn create_dir(dir: &Path, name: &str) -> Result<PathBuf, FsError> {
  let path = new_child_path(dir, name)?;
  let mut builder = fs::DirBuilder::new();
  #[cfg(unix)]
  {
    use std::os::unix::fs::DirBuilderExt;
    builder.mode(0o755);
  }
  builder.create(&path).map_err(|e| create_error(&path, e))?;
  Ok(path)
}

fn new_child_path(dir: &Path, name: &str) -> Result<PathBuf, FsError> {
  let name = name.trim();
  if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\0') {
    return Err(FsError::InvalidName(name.to_string()));
  }
  Ok(dir.join(name))
}

fn open_error(path: &Path, e: io::Error) -> FsError {
  if e.kind() == io::ErrorKind::NotFound {
    FsError::NotFound(path.to_path_buf())
  } else {
    FsError::io(path, e)
  }
}

fn create_error(path: &Path, e: io::Error) -> FsError {
  if e.kind() == io::ErrorKind::AlreadyExists {
    FsError::AlreadyExists(path.to_path_buf())
  } else {
    FsError::io(path, e)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::os::unix::fs::PermissionsExt;
  use std::sync::atomic::{AtomicU32, Ordering};

  static COUNTER: AtomicU32 = AtomicU32::new(0);

  fn test_dir(prefix: &str) -> PathBuf {
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("dirman_ops_{prefix}_{id}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
  }

  fn mode_of(path: &Path) -> u32 {
    fs::metadata(path).unwrap().permissions().mode() & 0o777
  }

  #[test]
  fn test_copy_file_preserves_bytes_and_mode() {
    let dir = test_dir("copy_mode");
    let src = dir.join("a.txt");
    fs::write(&src, "hello").unwrap();
    fs::set_permissions(&src, fs::Permissions::from_mode(0o644)).unwrap();

    let dst = dir.join("b.txt");
    let copied = copy_file(&src, &dst).unwrap();
    assert_eq!(copied, 5);
    assert_eq!(fs::read(&dst).unwrap(), b"hello");
    assert_eq!(mode_of(&dst), 0o644);
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_copy_file_keeps_restrictive_mode() {
    let dir = test_dir("copy_mode_600");
    let src = dir.join("secret");
    fs::write(&src, "x").unwrap();
    fs::set_permissions(&src, fs::Permissions::from_mode(0o600)).unwrap();

    let dst = dir.join("secret_copy");
    copy_file(&src, &dst).unwrap();
    assert_eq!(mode_of(&dst), 0o600);
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_copy_file_truncates_existing() {
    let dir = test_dir("copy_truncate");
    let src = dir.join("short.txt");
    let dst = dir.join("long.txt");
    fs::write(&src, "new").unwrap();
    fs::write(&dst, "much longer old content").unwrap();

    copy_file(&src, &dst).unwrap();
    assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_copy_file_missing_source() {
    let dir = test_dir("copy_missing");
    let err = copy_file(&dir.join("nope"), &dir.join("dst")).unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));
    assert!(!dir.join("dst").exists());
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_copy_directory_recursive() {
    let dir = test_dir("copy_dir");
    let src = dir.join("docs");
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::write(src.join("a.txt"), "aaa").unwrap();
    fs::write(src.join("sub").join("b.txt"), "bbb").unwrap();

    let dst = dir.join("backup_docs");
    copy_directory(&src, &dst).unwrap();

    assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "aaa");
    assert_eq!(fs::read_to_string(dst.join("sub").join("b.txt")).unwrap(), "bbb");
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_copy_directory_into_existing_dir_merges() {
    let dir = test_dir("copy_dir_merge");
    let src = dir.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("new.txt"), "new").unwrap();
    let dst = dir.join("dst");
    fs::create_dir_all(&dst).unwrap();
    fs::write(dst.join("old.txt"), "old").unwrap();

    copy_directory(&src, &dst).unwrap();
    assert!(dst.join("new.txt").exists());
    assert!(dst.join("old.txt").exists());
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_copy_directory_missing_source() {
    let dir = test_dir("copy_dir_missing");
    let err = copy_directory(&dir.join("ghost"), &dir.join("out")).unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_copy_directory_skips_dangling_symlink() {
    let dir = test_dir("copy_dir_dangling");
    let src = dir.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("ok.txt"), "ok").unwrap();
    std::os::unix::fs::symlink(src.join("missing"), src.join("broken")).unwrap();

    let dst = dir.join("dst");
    copy_directory(&src, &dst).unwrap();
    assert!(dst.join("ok.txt").exists());
    assert!(fs::symlink_metadata(dst.join("broken")).is_err());
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_copy_directory_fails_when_dest_parent_missing() {
    let dir = test_dir("copy_dir_noparent");
    let src = dir.join("src");
    fs::create_dir_all(&src).unwrap();
    let err = copy_directory(&src, &dir.join("no").join("such").join("dst")).unwrap_err();
    assert!(matches!(err, FsError::Io { .. }));
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_copy_directory_into_own_subdir_refused() {
    let dir = test_dir("copy_dir_itself");
    let src = dir.join("docs");
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::write(src.join("a.txt"), "a").unwrap();

    let err = copy_directory(&src, &src.join("sub").join("docs")).unwrap_err();
    assert!(matches!(err, FsError::IntoItself { .. }));
    assert!(!src.join("sub").join("docs").exists());
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_copy_directory_into_itself_through_symlink_refused() {
    let dir = test_dir("copy_dir_itself_link");
    let src = dir.join("docs");
    fs::create_dir_all(&src).unwrap();
    std::os::unix::fs::symlink(&src, dir.join("alias")).unwrap();

    let err = copy_directory(&src, &dir.join("alias").join("docs")).unwrap_err();
    assert!(matches!(err, FsError::IntoItself { .. }));
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_copy_directory_next_to_source_allowed() {
    let dir = test_dir("copy_dir_sibling");
    let src = dir.join("docs");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("a.txt"), "a").unwrap();

    // A sibling whose name shares a prefix is not inside the source
    copy_directory(&src, &dir.join("docs2")).unwrap();
    assert_eq!(fs::read(dir.join("docs2").join("a.txt")).unwrap(), b"a");
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_remove_recursive_dir() {
    let dir = test_dir("remove_dir");
    let target = dir.join("tree");
    fs::create_dir_all(target.join("a").join("b")).unwrap();
    fs::write(target.join("top.txt"), "x").unwrap();
    fs::write(target.join("a").join("b").join("deep.txt"), "y").unwrap();

    remove_recursive(&target).unwrap();
    assert!(!target.exists());
    assert!(dir.exists());
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_remove_recursive_file() {
    let dir = test_dir("remove_file");
    let file = dir.join("gone.txt");
    fs::write(&file, "bye").unwrap();
    remove_recursive(&file).unwrap();
    assert!(!file.exists());
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_remove_recursive_does_not_follow_symlinked_dir() {
    let dir = test_dir("remove_link");
    let real = dir.join("real");
    fs::create_dir_all(&real).unwrap();
    fs::write(real.join("keep.txt"), "keep").unwrap();
    let link = dir.join("link");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    remove_recursive(&link).unwrap();
    assert!(fs::symlink_metadata(&link).is_err());
    assert!(real.join("keep.txt").exists());
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_remove_recursive_missing() {
    let dir = test_dir("remove_missing");
    let err = remove_recursive(&dir.join("nothing")).unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_create_file_and_dir() {
    let dir = test_dir("create");
    let file = create_file(&dir, "new.txt").unwrap();
    assert!(file.is_file());
    let sub = create_dir(&dir, "newdir").unwrap();
    assert!(sub.is_dir());
    assert_eq!(mode_of(&sub) & 0o700, 0o700);
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_create_rejects_existing() {
    let dir = test_dir("create_existing");
    fs::write(dir.join("taken"), "").unwrap();
    assert!(matches!(create_file(&dir, "taken"), Err(FsError::AlreadyExists(_))));
    assert!(matches!(create_dir(&dir, "taken"), Err(FsError::AlreadyExists(_))));
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_create_rejects_bad_names() {
    let dir = test_dir("create_bad");
    for name in ["", "   ", ".", "..", "a/b"] {
      assert!(matches!(create_file(&dir, name), Err(FsError::InvalidName(_))), "{name:?}");
    }
    let _ = fs::remove_dir_all(&dir);
  }
}
