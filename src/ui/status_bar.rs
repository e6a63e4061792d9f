use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::event::InputMode;
use crate::ui::file_list::format_size;

const HINTS: &[(Action, &str)] = &[
  (Action::EnterDir, "open"),
  (Action::GoParent, "up"),
  (Action::ToggleSelect, "select"),
  (Action::CopyToQueue, "copy"),
  (Action::MoveToQueue, "move"),
  (Action::Paste, "paste"),
  (Action::DeleteStart, "delete"),
  (Action::FilterStart, "filter"),
  (Action::ToggleHelp, "help"),
  (Action::Quit, "quit"),
];

pub fn render_status_bar(app: &App, area: Rect, buf: &mut Buffer) {
  let theme = &app.theme;
  let line = match app.input_mode {
    InputMode::Filter => Line::from(vec![
      Span::styled(" /", Style::default().fg(theme.info).add_modifier(Modifier::BOLD)),
      Span::styled(app.filter_input.as_str(), Style::default().fg(theme.text)),
      Span::styled("▌", Style::default().fg(theme.info)),
      Span::styled(
        format!("  {} match(es)", app.view.visible_count()),
        Style::default().fg(Color::DarkGray),
      ),
    ]),
    InputMode::GPrefix => Line::from(vec![
      Span::styled(" g", Style::default().fg(theme.info).add_modifier(Modifier::BOLD)),
      Span::styled(" (press g for first page)", Style::default().fg(Color::DarkGray)),
    ]),
    InputMode::Normal | InputMode::Prompt | InputMode::Help => {
      if let Some(ref status) = app.status {
        let color = if status.is_error { theme.danger } else { theme.success };
        Line::from(Span::styled(format!(" {}", status.text), Style::default().fg(color)))
      } else if let Some(entry) = app.view.highlighted() {
        let kind = if entry.is_dir {
          "directory".to_string()
        } else {
          format_size(entry.size)
        };
        let cursor = app.view.highlight_position().map_or(0, |p| p + 1);
        Line::from(vec![
          Span::styled(
            format!(" {}", entry.name),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
          ),
          Span::styled(format!(" | {kind}"), Style::default().fg(Color::DarkGray)),
          Span::styled(
            format!(" | {cursor}/{} ", app.view.visible_count()),
            Style::default().fg(Color::DarkGray),
          ),
        ])
      } else {
        Line::from(Span::styled(" No entries", Style::default().fg(Color::DarkGray)))
      }
    }
  };

  Paragraph::new(line)
    .style(Style::default().fg(theme.status))
    .render(area, buf);
}

/// One-line reminder of the most used bindings, built from the live config
/// so remapped keys show up.
pub fn render_key_hints(app: &App, config: &Config, area: Rect, buf: &mut Buffer) {
  let lookup = config.reverse_lookup();
  let key_style = Style::default().fg(app.theme.info).add_modifier(Modifier::BOLD);
  let desc_style = Style::default().fg(Color::DarkGray);

  let mut spans = vec![Span::raw(" ")];
  for (action, label) in HINTS {
    let Some(key) = lookup.get(action).and_then(|keys| keys.first()) else {
      continue;
    };
    spans.push(Span::styled(key.clone(), key_style));
    spans.push(Span::styled(format!(" {label}  "), desc_style));
  }

  Paragraph::new(Line::from(spans)).render(area, buf);
}
