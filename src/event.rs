use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::action::Action;
use crate::config::{Config, normalize_key_event};

pub enum Event {
  Key(KeyEvent),
  Resize(u16, u16),
  Tick,
}

pub struct EventLoop {
  rx: mpsc::Receiver<Event>,
}

impl EventLoop {
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || loop {
      if event::poll(tick_rate).unwrap_or(false) {
        match event::read() {
          Ok(CrosstermEvent::Key(key)) if key.kind != KeyEventKind::Release => {
            if tx.send(Event::Key(key)).is_err() {
              break;
            }
          }
          Ok(CrosstermEvent::Resize(w, h)) => {
            if tx.send(Event::Resize(w, h)).is_err() {
              break;
            }
          }
          _ => {}
        }
      } else if tx.send(Event::Tick).is_err() {
        break;
      }
    });

    Self { rx }
  }

  pub fn next(&self) -> Result<Event> {
    Ok(self.rx.recv()?)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
  Normal,
  Filter,
  GPrefix,
  Prompt,
  Help,
}

/// What the text prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
  NewFile,
  NewDir,
}

impl PromptKind {
  pub fn title(self) -> &'static str {
    match self {
      PromptKind::NewFile => "New file",
      PromptKind::NewDir => "New directory",
    }
  }

  pub fn is_dir(self) -> bool {
    self == PromptKind::NewDir
  }
}

fn is_text(key: &KeyEvent) -> bool {
  !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

pub fn map_key(key: KeyEvent, mode: InputMode, config: &Config) -> Action {
  match mode {
    InputMode::Filter => match key.code {
      KeyCode::Esc => Action::FilterCancel,
      KeyCode::Enter => Action::FilterConfirm,
      KeyCode::Backspace => Action::FilterBackspace,
      KeyCode::Char(c) if is_text(&key) => Action::FilterInput(c),
      _ => Action::None,
    },
    InputMode::Prompt => match key.code {
      KeyCode::Esc => Action::PromptCancel,
      KeyCode::Enter => Action::PromptConfirm,
      KeyCode::Backspace => Action::PromptBackspace,
      KeyCode::Char(c) if is_text(&key) => Action::PromptInput(c),
      _ => Action::None,
    },
    InputMode::Help => match key.code {
      KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Action::ToggleHelp,
      _ => Action::None,
    },
    InputMode::GPrefix => {
      let kb = normalize_key_event(key);
      config.g_prefix_keys.get(&kb).cloned().unwrap_or(Action::None)
    }
    InputMode::Normal => {
      let kb = normalize_key_event(key);
      config.normal_keys.get(&kb).cloned().unwrap_or(Action::None)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

  fn key(code: KeyCode) -> KeyEvent {
    key_with_mod(code, KeyModifiers::NONE)
  }

  fn key_with_mod(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
      code,
      modifiers,
      kind: KeyEventKind::Press,
      state: KeyEventState::NONE,
    }
  }

  fn cfg() -> Config {
    Config::default()
  }

  #[test]
  fn test_normal_mode_quit() {
    let c = cfg();
    assert_eq!(map_key(key(KeyCode::Char('q')), InputMode::Normal, &c), Action::Quit);
    assert_eq!(
      map_key(key_with_mod(KeyCode::Char('c'), KeyModifiers::CONTROL), InputMode::Normal, &c),
      Action::Quit
    );
  }

  #[test]
  fn test_normal_mode_navigation() {
    let c = cfg();
    assert_eq!(map_key(key(KeyCode::Char('j')), InputMode::Normal, &c), Action::MoveDown);
    assert_eq!(map_key(key(KeyCode::Up), InputMode::Normal, &c), Action::MoveUp);
    assert_eq!(map_key(key(KeyCode::Enter), InputMode::Normal, &c), Action::EnterDir);
    assert_eq!(map_key(key(KeyCode::Char('-')), InputMode::Normal, &c), Action::GoParent);
    assert_eq!(map_key(key(KeyCode::PageDown), InputMode::Normal, &c), Action::PageDown);
  }

  #[test]
  fn test_normal_mode_operations() {
    let c = cfg();
    assert_eq!(map_key(key(KeyCode::Char(' ')), InputMode::Normal, &c), Action::ToggleSelect);
    assert_eq!(map_key(key(KeyCode::Char('c')), InputMode::Normal, &c), Action::CopyToQueue);
    assert_eq!(map_key(key(KeyCode::Char('m')), InputMode::Normal, &c), Action::MoveToQueue);
    assert_eq!(map_key(key(KeyCode::Char('p')), InputMode::Normal, &c), Action::Paste);
    assert_eq!(
      map_key(key_with_mod(KeyCode::Char('R'), KeyModifiers::SHIFT), InputMode::Normal, &c),
      Action::DeleteStart
    );
    assert_eq!(
      map_key(key_with_mod(KeyCode::Char('N'), KeyModifiers::SHIFT), InputMode::Normal, &c),
      Action::NewDirStart
    );
    assert_eq!(
      map_key(key_with_mod(KeyCode::Char('?'), KeyModifiers::SHIFT), InputMode::Normal, &c),
      Action::ToggleHelp
    );
  }

  #[test]
  fn test_filter_mode() {
    let c = cfg();
    assert_eq!(map_key(key(KeyCode::Char('q')), InputMode::Filter, &c), Action::FilterInput('q'));
    assert_eq!(map_key(key(KeyCode::Enter), InputMode::Filter, &c), Action::FilterConfirm);
    assert_eq!(map_key(key(KeyCode::Esc), InputMode::Filter, &c), Action::FilterCancel);
    assert_eq!(map_key(key(KeyCode::Backspace), InputMode::Filter, &c), Action::FilterBackspace);
    assert_eq!(
      map_key(key_with_mod(KeyCode::Char('c'), KeyModifiers::CONTROL), InputMode::Filter, &c),
      Action::None
    );
  }

  #[test]
  fn test_prompt_mode() {
    let c = cfg();
    assert_eq!(map_key(key(KeyCode::Char('R')), InputMode::Prompt, &c), Action::PromptInput('R'));
    assert_eq!(map_key(key(KeyCode::Enter), InputMode::Prompt, &c), Action::PromptConfirm);
    assert_eq!(map_key(key(KeyCode::Esc), InputMode::Prompt, &c), Action::PromptCancel);
    assert_eq!(map_key(key(KeyCode::Backspace), InputMode::Prompt, &c), Action::PromptBackspace);
  }

  #[test]
  fn test_help_mode_only_closes() {
    let c = cfg();
    assert_eq!(map_key(key(KeyCode::Char('?')), InputMode::Help, &c), Action::ToggleHelp);
    assert_eq!(map_key(key(KeyCode::Esc), InputMode::Help, &c), Action::ToggleHelp);
    assert_eq!(map_key(key(KeyCode::Char('p')), InputMode::Help, &c), Action::None);
  }

  #[test]
  fn test_g_prefix_mode() {
    let c = cfg();
    assert_eq!(map_key(key(KeyCode::Char('g')), InputMode::GPrefix, &c), Action::GoToTop);
    assert_eq!(map_key(key(KeyCode::Char('x')), InputMode::GPrefix, &c), Action::None);
  }

  #[test]
  fn test_custom_config_remaps_key() {
    let mut c = cfg();
    let kb = crate::config::KeyBinding {
      code: KeyCode::Char('j'),
      modifiers: KeyModifiers::NONE,
    };
    c.normal_keys.insert(kb, Action::Quit);
    assert_eq!(map_key(key(KeyCode::Char('j')), InputMode::Normal, &c), Action::Quit);
  }

  #[test]
  fn test_prompt_kind() {
    assert!(PromptKind::NewDir.is_dir());
    assert!(!PromptKind::NewFile.is_dir());
    assert_eq!(PromptKind::NewFile.title(), "New file");
  }
}
