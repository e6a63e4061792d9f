//! Popups drawn over the file list: the yes/no confirmation used by paste
//! and delete, and the name prompt for new files and directories.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use tracing::warn;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::event::{Event, EventLoop};
use crate::theme::Theme;
use crate::transfer::Confirm;
use crate::ui::Tui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
  Yes,
  No,
}

impl Choice {
  fn toggled(self) -> Self {
    match self {
      Choice::Yes => Choice::No,
      Choice::No => Choice::Yes,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogInput {
  Decide(bool),
  Toggle,
  Ignore,
}

/// What a key press means while the confirmation dialog has `focus`.
pub fn confirm_key(key: KeyEvent, focus: Choice) -> DialogInput {
  if key.modifiers.contains(KeyModifiers::CONTROL) {
    return match key.code {
      KeyCode::Char('c') => DialogInput::Decide(false),
      _ => DialogInput::Ignore,
    };
  }
  match key.code {
    KeyCode::Char('y' | 'Y') => DialogInput::Decide(true),
    KeyCode::Char('n' | 'N') | KeyCode::Esc => DialogInput::Decide(false),
    KeyCode::Enter => DialogInput::Decide(focus == Choice::Yes),
    KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab | KeyCode::Char('h' | 'l') => {
      DialogInput::Toggle
    }
    _ => DialogInput::Ignore,
  }
}

/// Focus and pending terminal size of an open confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogState {
  pub focus: Choice,
  /// Last size reported while the dialog was open, for the main loop to
  /// apply once it closes.
  pub resized: Option<(u16, u16)>,
}

impl DialogState {
  pub fn new() -> Self {
    Self {
      focus: Choice::No,
      resized: None,
    }
  }

  /// Feed one input event. Returns the answer once the user has decided.
  pub fn handle(&mut self, event: Event) -> Option<bool> {
    match event {
      Event::Key(key) => match confirm_key(key, self.focus) {
        DialogInput::Decide(answer) => return Some(answer),
        DialogInput::Toggle => self.focus = self.focus.toggled(),
        DialogInput::Ignore => {}
      },
      Event::Resize(w, h) => self.resized = Some((w, h)),
      Event::Tick => {}
    }
    None
  }
}

impl Default for DialogState {
  fn default() -> Self {
    Self::new()
  }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  let x = area.x + (area.width - width) / 2;
  let y = area.y + (area.height - height) / 2;
  Rect::new(x, y, width, height)
}

pub fn render_confirm(prompt: &str, detail: &str, focus: Choice, theme: &Theme, area: Rect, buf: &mut Buffer) {
  let text_width = prompt.width().max(detail.width()).max(16) as u16;
  let popup = centered(area, text_width + 6, 7);
  if popup.width < 12 || popup.height < 5 {
    return;
  }

  Clear.render(popup, buf);

  let button = |label: &'static str, choice: Choice| {
    if focus == choice {
      Span::styled(
        label,
        Style::default()
          .fg(Color::Black)
          .bg(theme.highlight)
          .add_modifier(Modifier::BOLD),
      )
    } else {
      Span::styled(label, Style::default().fg(theme.text))
    }
  };

  let lines = vec![
    Line::from(Span::styled(
      format!(" {prompt}"),
      Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    )),
    Line::from(Span::styled(format!(" {detail}"), Style::default().fg(theme.info))),
    Line::from(""),
    Line::from(vec![
      Span::raw("   "),
      button(" Yes ", Choice::Yes),
      Span::raw("  "),
      button(" No ", Choice::No),
    ]),
  ];

  let block = Block::default()
    .borders(Borders::ALL)
    .title(" Confirm ")
    .border_style(Style::default().fg(theme.danger));

  Paragraph::new(lines).block(block).render(popup, buf);
}

/// The name prompt for a pending new file or directory.
pub fn render_prompt(app: &App, area: Rect, buf: &mut Buffer) {
  let Some(kind) = app.prompt_kind else {
    return;
  };
  let theme = &app.theme;
  let popup = centered(area, 50.min(area.width.saturating_sub(4)), 3);
  if popup.width < 12 || popup.height < 3 {
    return;
  }

  Clear.render(popup, buf);

  // Keep the tail of long input in view
  let room = popup.width.saturating_sub(4) as usize;
  let mut shown = app.prompt_input.as_str();
  while shown.width() > room {
    let mut chars = shown.chars();
    chars.next();
    shown = chars.as_str();
  }

  let border = if kind.is_dir() { theme.dir } else { theme.file };
  let line = Line::from(vec![
    Span::styled(format!(" {shown}"), Style::default().fg(theme.text)),
    Span::styled("▌", Style::default().fg(border)),
  ]);

  let block = Block::default()
    .borders(Borders::ALL)
    .title(format!(" {} ", kind.title()))
    .border_style(Style::default().fg(border));

  Paragraph::new(line).block(block).render(popup, buf);
}

/// Blocking confirmation through the terminal. Reads keys from the shared
/// event channel until the user decides, redrawing over the last frame.
pub struct TerminalPrompter<'a> {
  terminal: &'a mut Tui,
  events: &'a EventLoop,
  theme: Theme,
  backdrop: &'a Buffer,
  resized: Option<(u16, u16)>,
}

impl<'a> TerminalPrompter<'a> {
  pub fn new(terminal: &'a mut Tui, events: &'a EventLoop, theme: Theme, backdrop: &'a Buffer) -> Self {
    Self {
      terminal,
      events,
      theme,
      backdrop,
      resized: None,
    }
  }

  /// The terminal size last reported while a dialog was open, if any.
  pub fn resized(&self) -> Option<(u16, u16)> {
    self.resized
  }

  fn draw(&mut self, prompt: &str, detail: &str, focus: Choice) -> bool {
    let theme = &self.theme;
    let backdrop = self.backdrop;
    let drawn = self.terminal.draw(|frame| {
      let area = frame.area();
      if backdrop.area == area {
        *frame.buffer_mut() = backdrop.clone();
      }
      render_confirm(prompt, detail, focus, theme, area, frame.buffer_mut());
    });
    if let Err(e) = drawn {
      warn!(error = %e, "failed to draw confirmation");
      return false;
    }
    true
  }
}

impl Confirm for TerminalPrompter<'_> {
  fn confirm(&mut self, prompt: &str, detail: &str) -> bool {
    let mut state = DialogState::new();
    let answer = loop {
      if !self.draw(prompt, detail, state.focus) {
        break false;
      }
      let Ok(event) = self.events.next() else {
        break false;
      };
      if let Some(answer) = state.handle(event) {
        break answer;
      }
    };
    if state.resized.is_some() {
      self.resized = state.resized;
    }
    answer
  }
}
