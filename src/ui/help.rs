use std::collections::HashMap;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::action::Action;
use crate::config::Config;
use crate::theme::Theme;

const SECTIONS: &[(&str, &[Action])] = &[
  (
    "Navigation",
    &[
      Action::MoveDown,
      Action::MoveUp,
      Action::PageDown,
      Action::PageUp,
      Action::GoToTop,
      Action::GoToBottom,
      Action::EnterDir,
      Action::GoParent,
    ],
  ),
  (
    "Selection",
    &[Action::ToggleSelect, Action::SelectAll, Action::ClearSelection],
  ),
  ("Filter", &[Action::FilterStart, Action::ClearFilter]),
  (
    "Queue",
    &[Action::CopyToQueue, Action::MoveToQueue, Action::Paste, Action::ClearQueue],
  ),
  (
    "Files",
    &[Action::NewFileStart, Action::NewDirStart, Action::DeleteStart, Action::Reload],
  ),
  ("Other", &[Action::CycleTheme, Action::ToggleHelp, Action::Quit]),
];

fn section_line(title: &str, section_style: Style) -> Line<'static> {
  Line::from(Span::styled(
    format!(" {title}"),
    section_style.add_modifier(Modifier::DIM),
  ))
}

fn entry_line(lookup: &HashMap<Action, Vec<String>>, action: &Action, key_style: Style, desc_style: Style) -> Line<'static> {
  let keys = lookup
    .get(action)
    .map(|v| v.join(" / "))
    .unwrap_or_else(|| "-".to_string());
  Line::from(vec![
    Span::styled(format!("  {keys:<18}"), key_style.add_modifier(Modifier::BOLD)),
    Span::styled(action.description(), desc_style),
  ])
}

pub fn help_lines(config: &Config, theme: &Theme) -> Vec<Line<'static>> {
  let lookup = config.reverse_lookup();
  let key_style = Style::default().fg(theme.info);
  let desc_style = Style::default().fg(theme.text);
  let section_style = Style::default().fg(theme.title);

  let mut lines = Vec::new();
  for (title, actions) in SECTIONS {
    lines.push(section_line(title, section_style));
    for action in *actions {
      lines.push(entry_line(&lookup, action, key_style, desc_style));
    }
  }
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    " Press q, ? or Esc to close",
    Style::default().fg(Color::DarkGray),
  )));
  lines
}

pub fn render_help(config: &Config, theme: &Theme, area: Rect, buf: &mut Buffer) {
  let lines = help_lines(config, theme);
  let width = 48.min(area.width.saturating_sub(4));
  let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));

  if width < 10 || height < 5 {
    return;
  }

  let x = area.x + (area.width.saturating_sub(width)) / 2;
  let y = area.y + (area.height.saturating_sub(height)) / 2;
  let popup = Rect::new(x, y, width, height);

  Clear.render(popup, buf);

  let block = Block::default()
    .borders(Borders::ALL)
    .title(" Help ")
    .border_style(Style::default().fg(theme.border));

  Paragraph::new(lines).block(block).render(popup, buf);
}
