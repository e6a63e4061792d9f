use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;

const SIZE_COLUMN: usize = 9;

pub fn format_size(bytes: u64) -> String {
  const KB: u64 = 1024;
  const MB: u64 = 1024 * KB;
  const GB: u64 = 1024 * MB;
  const TB: u64 = 1024 * GB;

  if bytes >= TB {
    format!("{:.1} TB", bytes as f64 / TB as f64)
  } else if bytes >= GB {
    format!("{:.1} GB", bytes as f64 / GB as f64)
  } else if bytes >= MB {
    format!("{:.1} MB", bytes as f64 / MB as f64)
  } else if bytes >= KB {
    format!("{:.1} KB", bytes as f64 / KB as f64)
  } else {
    format!("{bytes} B")
  }
}

/// Cut `s` to at most `max` terminal columns, ending in `~` when shortened,
/// and pad it with spaces to exactly `max` columns.
pub fn fit_width(s: &str, max: usize) -> String {
  if max == 0 {
    return String::new();
  }
  if s.width() <= max {
    let mut out = s.to_string();
    out.push_str(&" ".repeat(max - s.width()));
    return out;
  }

  let mut out = String::new();
  let mut used = 0;
  for c in s.chars() {
    let w = c.width().unwrap_or(0);
    if used + w > max - 1 {
      break;
    }
    out.push(c);
    used += w;
  }
  out.push('~');
  used += 1;
  out.push_str(&" ".repeat(max - used));
  out
}

fn list_title(app: &App) -> String {
  let view = &app.view;
  let mut title = format!(" Page {}/{} ", view.current_page() + 1, view.page_count());
  if view.selection_count() > 0 {
    title.push_str(&format!("| {} selected ", view.selection_count()));
  }
  if view.filter_active() {
    title.push_str(&format!("| filter: {} ", view.filter_text()));
  }
  title
}

pub fn render_file_list(app: &App, area: Rect, buf: &mut Buffer) {
  let theme = &app.theme;
  let inner_width = area.width.saturating_sub(2) as usize;
  // Gutter of two marker columns, then the name, then the size column
  let name_width = inner_width.saturating_sub(2 + 1 + SIZE_COLUMN);
  let highlight = app.view.highlight();

  let mut lines: Vec<Line> = Vec::with_capacity(app.view.page_size());
  for (index, entry) in app.view.page_entries() {
    let is_highlighted = highlight == Some(index);
    let queued = app.is_queued(&entry.file_name);

    let display_name = if entry.is_dir {
      format!("{}/", entry.name)
    } else {
      entry.name.clone()
    };
    let size = if entry.is_dir {
      "<DIR>".to_string()
    } else {
      format_size(entry.size)
    };

    let base = if is_highlighted {
      Style::default()
        .fg(Color::Black)
        .bg(theme.highlight)
        .add_modifier(Modifier::BOLD)
    } else if entry.is_dir {
      Style::default().fg(theme.dir).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(theme.file)
    };
    let marker_style = if is_highlighted { base } else { Style::default().fg(theme.queued) };
    let select_style = if is_highlighted {
      base
    } else {
      Style::default().fg(theme.success).add_modifier(Modifier::BOLD)
    };

    lines.push(Line::from(vec![
      Span::styled(if entry.selected { "+" } else { " " }, select_style),
      Span::styled(if queued { "*" } else { " " }, marker_style),
      Span::styled(fit_width(&display_name, name_width), base),
      Span::styled(format!(" {size:>SIZE_COLUMN$}"), base),
    ]));
  }

  if lines.is_empty() {
    let msg = if app.view.catalog().is_empty() {
      " Empty directory"
    } else {
      " No matches"
    };
    lines.push(Line::from(Span::styled(msg, Style::default().fg(Color::DarkGray))));
  }

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(theme.border))
    .title(list_title(app))
    .title_style(Style::default().fg(theme.title).add_modifier(Modifier::BOLD));

  Paragraph::new(lines).block(block).render(area, buf);
}
