//! File logging. The terminal is in raw mode while the UI runs, so events
//! never go to stdout or stderr.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `dirman=debug`.
pub const LOG_ENV: &str = "DIRMAN_LOG";

pub fn default_log_path() -> Option<PathBuf> {
  dirs::state_dir()
    .or_else(dirs::data_local_dir)
    .map(|d| d.join("dirman").join("dirman.log"))
}

fn env_filter() -> EnvFilter {
  EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `path`. Returns the path in use,
/// or `None` when the file could not be opened and logging stays off.
pub fn init(path: Option<&Path>) -> Option<PathBuf> {
  let path = path.map(Path::to_path_buf).or_else(default_log_path)?;
  if let Some(parent) = path.parent() {
    let _ = std::fs::create_dir_all(parent);
  }
  let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .with_target(false)
    .try_init()
    .ok()?;
  Some(path)
}
