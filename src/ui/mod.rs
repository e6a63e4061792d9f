pub mod dialog;
pub mod file_list;
pub mod help;
pub mod status_bar;

use std::io::Stdout;

use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};
use ratatui::{Frame, Terminal};

use crate::app::App;
use crate::config::Config;
use crate::event::InputMode;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn draw(frame: &mut Frame, app: &App, config: &Config) {
  let area = frame.area();

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(3),    // file list
      Constraint::Length(1), // status
      Constraint::Length(1), // key hints
    ])
    .split(area);

  render_header(app, chunks[0], frame.buffer_mut());
  file_list::render_file_list(app, chunks[1], frame.buffer_mut());
  status_bar::render_status_bar(app, chunks[2], frame.buffer_mut());
  status_bar::render_key_hints(app, config, chunks[3], frame.buffer_mut());

  if app.show_help {
    help::render_help(config, &app.theme, area, frame.buffer_mut());
  }
  if app.input_mode == InputMode::Prompt {
    dialog::render_prompt(app, area, frame.buffer_mut());
  }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
  let theme = &app.theme;
  let mut spans = vec![
    Span::styled(" dirman ", Style::default().fg(theme.title).add_modifier(Modifier::BOLD)),
    Span::styled(
      app.current_dir.to_string_lossy().to_string(),
      Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    ),
  ];

  if !app.queue.is_empty() {
    spans.push(Span::styled(
      format!("  {}", queue_indicator(app)),
      Style::default().fg(theme.queued).add_modifier(Modifier::BOLD),
    ));
  }

  Paragraph::new(Line::from(spans)).render(area, buf);
}

pub fn queue_indicator(app: &App) -> String {
  let count = app.queue.len();
  format!("[QUEUE: {count} item(s) ({})]", app.queue.mode_label())
}
