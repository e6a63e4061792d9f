use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::action::Action;
use crate::config::Config;
use crate::event::{InputMode, PromptKind};
use crate::fs::{Catalog, ops};
use crate::theme::Theme;
use crate::transfer::{self, BatchResult, Confirm, Enqueued, TransferMode, TransferQueue};
use crate::view::{Direction, ViewState};

/// Longest name the text prompt accepts, in bytes.
pub const PROMPT_MAX_LEN: usize = 255;

/// Rows taken by everything but the list itself: header, list borders,
/// status line and key hints.
pub const CHROME_ROWS: u16 = 5;

/// An operation that needs the user to confirm through a blocking dialog.
/// The main loop runs it with [`App::run_pending`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOp {
  Paste,
  Delete(Vec<PathBuf>),
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
  pub text: String,
  pub is_error: bool,
  ticks_left: u16,
}

pub struct App {
  pub current_dir: PathBuf,
  pub view: ViewState,
  pub queue: TransferQueue,
  pub theme: Theme,
  pub input_mode: InputMode,
  pub filter_input: String,
  pub prompt_kind: Option<PromptKind>,
  pub prompt_input: String,
  pub show_help: bool,
  pub should_quit: bool,
  pub pending: Option<PendingOp>,
  pub status: Option<StatusMessage>,
  status_ticks: u16,
}

impl App {
  pub fn new(dir: PathBuf, config: &Config) -> Result<Self> {
    let dir = std::fs::canonicalize(&dir).with_context(|| format!("cannot open {}", dir.display()))?;
    let catalog = Catalog::load(&dir)?;
    info!(dir = %dir.display(), entries = catalog.len(), "starting");
    Ok(Self {
      current_dir: dir,
      view: ViewState::new(catalog, 20),
      queue: TransferQueue::new(config.queue_capacity),
      theme: config.theme.clone(),
      input_mode: InputMode::Normal,
      filter_input: String::new(),
      prompt_kind: None,
      prompt_input: String::new(),
      show_help: false,
      should_quit: false,
      pending: None,
      status: None,
      status_ticks: config.status_ticks,
    })
  }

  pub fn update(&mut self, action: Action) -> Result<()> {
    if self.input_mode == InputMode::GPrefix && !matches!(action, Action::Tick | Action::Resize(..)) {
      self.input_mode = InputMode::Normal;
    }

    match action {
      Action::Quit => self.should_quit = true,
      Action::MoveUp => {
        self.view.move_highlight(Direction::Up);
      }
      Action::MoveDown => {
        self.view.move_highlight(Direction::Down);
      }
      Action::PageUp => self.view.page_up(),
      Action::PageDown => self.view.page_down(),
      Action::GoToTop => self.view.goto_top(),
      Action::GoToBottom => self.view.goto_bottom(),
      Action::GPress => self.input_mode = InputMode::GPrefix,
      Action::EnterDir => self.enter_dir(),
      Action::GoParent => self.go_parent(),
      Action::ToggleSelect => {
        if let Some(index) = self.view.highlight() {
          self.view.toggle_selection(index);
          self.view.move_highlight(Direction::Down);
        }
      }
      Action::SelectAll => self.view.select_all(),
      Action::ClearSelection => self.view.clear_selection(),
      Action::FilterStart => {
        self.filter_input = self.view.filter_text().to_string();
        self.input_mode = InputMode::Filter;
      }
      Action::FilterInput(c) => {
        self.filter_input.push(c);
        self.view.apply_filter(&self.filter_input, true);
      }
      Action::FilterBackspace => {
        self.filter_input.pop();
        self.view.apply_filter(&self.filter_input, !self.filter_input.is_empty());
      }
      Action::FilterConfirm => {
        self.input_mode = InputMode::Normal;
        if self.filter_input.is_empty() {
          self.view.apply_filter("", false);
        }
      }
      Action::FilterCancel | Action::ClearFilter => {
        self.input_mode = InputMode::Normal;
        self.filter_input.clear();
        if self.view.filter_active() {
          self.view.apply_filter("", false);
        }
      }
      Action::CopyToQueue => self.enqueue(TransferMode::Copy),
      Action::MoveToQueue => self.enqueue(TransferMode::Move),
      Action::Paste => {
        if self.queue.is_empty() {
          self.set_error("Queue is empty".to_string());
        } else {
          self.pending = Some(PendingOp::Paste);
        }
      }
      Action::ClearQueue => {
        let count = self.queue.len();
        self.queue.clear();
        self.set_status(format!("Queue cleared ({count} removed)"));
      }
      Action::DeleteStart => {
        let catalog = self.view.catalog();
        let paths: Vec<PathBuf> = self.view.targets().iter().map(|e| catalog.path_of(e)).collect();
        if paths.is_empty() {
          self.set_error("Nothing to delete".to_string());
        } else {
          self.pending = Some(PendingOp::Delete(paths));
        }
      }
      Action::NewFileStart => self.start_prompt(PromptKind::NewFile),
      Action::NewDirStart => self.start_prompt(PromptKind::NewDir),
      Action::PromptInput(c) => {
        if self.prompt_input.len() + c.len_utf8() <= PROMPT_MAX_LEN && !c.is_control() {
          self.prompt_input.push(c);
        }
      }
      Action::PromptBackspace => {
        self.prompt_input.pop();
      }
      Action::PromptConfirm => self.confirm_prompt(),
      Action::PromptCancel => self.cancel_prompt(),
      Action::Reload => {
        if self.reload() {
          self.set_status("Reloaded".to_string());
        }
      }
      Action::ToggleHelp => {
        self.show_help = !self.show_help;
        self.input_mode = if self.show_help { InputMode::Help } else { InputMode::Normal };
      }
      Action::CycleTheme => {
        self.theme = self.theme.next();
        self.set_status(format!("Color scheme: {}", self.theme.name));
      }
      Action::Resize(_, h) => {
        self.view.set_page_size(h.saturating_sub(CHROME_ROWS).max(1) as usize);
      }
      Action::Tick => self.tick_status(),
      Action::None => {}
    }
    Ok(())
  }

  fn enter_dir(&mut self) {
    let Some(entry) = self.view.highlighted() else {
      return;
    };
    if !entry.is_dir {
      let msg = format!("{} is not a directory", entry.name);
      self.set_error(msg);
      return;
    }
    let target = self.current_dir.join(&entry.file_name);
    self.navigate(target, None);
  }

  fn go_parent(&mut self) {
    let Some(parent) = self.current_dir.parent().map(PathBuf::from) else {
      return;
    };
    let came_from = self.current_dir.file_name().map(OsStr::to_os_string);
    self.navigate(parent, came_from);
  }

  /// Switch to `dir`. On failure the current listing and location stay.
  fn navigate(&mut self, dir: PathBuf, highlight: Option<OsString>) {
    match Catalog::load(&dir) {
      Ok(catalog) => {
        debug!(from = %self.current_dir.display(), to = %dir.display(), "navigate");
        self.current_dir = dir;
        self.filter_input.clear();
        self.view.apply_filter("", false);
        self.view.replace_catalog(catalog);
        if let Some(name) = highlight {
          self.view.highlight_name(&name);
        }
      }
      Err(e) => self.set_error(e.to_string()),
    }
  }

  /// Re-read the current directory, keeping the filter and the highlighted
  /// name where possible.
  pub fn reload(&mut self) -> bool {
    let keep = self.view.highlighted().map(|e| e.file_name.clone());
    match Catalog::load(&self.current_dir) {
      Ok(catalog) => {
        self.view.replace_catalog(catalog);
        if let Some(name) = keep {
          self.view.highlight_name(&name);
        }
        true
      }
      Err(e) => {
        self.set_error(e.to_string());
        false
      }
    }
  }

  fn enqueue(&mut self, mode: TransferMode) {
    let targets = self.view.targets();
    if targets.is_empty() {
      self.set_error("Nothing to queue".to_string());
      return;
    }
    let result = match mode {
      TransferMode::Copy => self.queue.enqueue_copy(&targets, &self.current_dir),
      TransferMode::Move => self.queue.enqueue_move(&targets, &self.current_dir),
    };
    drop(targets);

    match result {
      Ok(report) => {
        if report.added > 0 {
          self.view.clear_selection();
        }
        let msg = enqueue_message(&report, mode, self.queue.capacity());
        if report.dropped > 0 {
          self.set_error(msg);
        } else {
          self.set_status(msg);
        }
      }
      Err(e) => self.set_error(e.to_string()),
    }
  }

  fn start_prompt(&mut self, kind: PromptKind) {
    self.prompt_kind = Some(kind);
    self.prompt_input.clear();
    self.input_mode = InputMode::Prompt;
  }

  fn cancel_prompt(&mut self) {
    self.prompt_kind = None;
    self.prompt_input.clear();
    self.input_mode = InputMode::Normal;
  }

  fn confirm_prompt(&mut self) {
    let Some(kind) = self.prompt_kind else {
      self.cancel_prompt();
      return;
    };
    let name = self.prompt_input.trim().to_string();
    if name.is_empty() {
      return;
    }
    self.cancel_prompt();

    let created = match kind {
      PromptKind::NewFile => ops::create_file(&self.current_dir, &name),
      PromptKind::NewDir => ops::create_dir(&self.current_dir, &name),
    };
    match created {
      Ok(path) => {
        info!(path = %path.display(), "created");
        self.reload();
        self.view.highlight_name(&name);
        let what = if kind.is_dir() { "Directory" } else { "File" };
        self.set_status(format!("{what} created: {name}"));
      }
      Err(e) => self.set_error(e.to_string()),
    }
  }

  /// Run the operation scheduled by the last action, asking `confirm` for
  /// every decision that needs the user, then reload the listing.
  pub fn run_pending(&mut self, confirm: &mut impl Confirm) -> Result<()> {
    let Some(op) = self.pending.take() else {
      return Ok(());
    };

    match op {
      PendingOp::Paste => {
        let result = transfer::execute_paste(&mut self.queue, &self.current_dir, confirm);
        self.reload();
        self.report(&result, "Pasted");
      }
      PendingOp::Delete(paths) => {
        let result = transfer::execute_delete(&paths, confirm);
        if result.succeeded + result.failed == 0 {
          self.set_status("Delete cancelled".to_string());
          return Ok(());
        }
        for path in &paths {
          if std::fs::symlink_metadata(path).is_err() {
            self.queue.forget(path);
          }
        }
        self.reload();
        self.report(&result, "Deleted");
      }
    }
    Ok(())
  }

  fn report(&mut self, result: &BatchResult, verb: &str) {
    let line = result.summary(verb);
    if result.has_failures() {
      self.set_error(line);
    } else {
      self.set_status(line);
    }
  }

  pub fn set_status(&mut self, text: String) {
    self.show_status(text, false);
  }

  pub fn set_error(&mut self, text: String) {
    self.show_status(text, true);
  }

  fn show_status(&mut self, text: String, is_error: bool) {
    self.status = Some(StatusMessage {
      text,
      is_error,
      ticks_left: self.status_ticks,
    });
  }

  fn tick_status(&mut self) {
    if let Some(status) = &mut self.status {
      if status.ticks_left == 0 {
        self.status = None;
      } else {
        status.ticks_left -= 1;
      }
    }
  }

  /// Whether `file_name` in the current directory is waiting in the queue.
  pub fn is_queued(&self, file_name: impl AsRef<OsStr>) -> bool {
    self.queue.contains_source(&self.current_dir.join(file_name.as_ref()))
  }
}

fn enqueue_message(report: &Enqueued, mode: TransferMode, capacity: usize) -> String {
  let verb = match mode {
    TransferMode::Copy => "copy",
    TransferMode::Move => "move",
  };
  let mut msg = format!("Queued {} for {verb}", report.added);
  if report.duplicates > 0 {
    msg.push_str(&format!(", {} already queued", report.duplicates));
  }
  if report.dropped > 0 {
    msg.push_str(&format!(", {} dropped (queue full at {capacity})", report.dropped));
  }
  msg
}
