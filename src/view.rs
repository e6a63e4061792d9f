//! Filtered, paginated, multi-select projection over a [`Catalog`].
//!
//! The view owns the catalog it projects. `visible` is a secondary index of
//! catalog positions that pass the filter, rebuilt by every `apply_filter`;
//! the highlight and page offset are both expressed against it.

use std::ffi::OsStr;

use crate::fs::{Catalog, Entry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Up,
  Down,
}

#[derive(Debug, Clone)]
pub struct ViewState {
  catalog: Catalog,
  visible: Vec<usize>,
  /// Position in `visible` of the highlighted entry.
  cursor: usize,
  /// Offset into `visible`, always a multiple of `page_size`.
  page_start: usize,
  page_size: usize,
  filter_text: String,
  filter_active: bool,
  selection_count: usize,
}

impl ViewState {
  pub fn new(catalog: Catalog, page_size: usize) -> Self {
    let mut view = Self {
      catalog,
      visible: Vec::new(),
      cursor: 0,
      page_start: 0,
      page_size: page_size.max(1),
      filter_text: String::new(),
      filter_active: false,
      selection_count: 0,
    };
    view.apply_filter("", false);
    view
  }

  /// Recompute visibility for every entry, recount the selection and go back
  /// to the first visible entry on the first page.
  pub fn apply_filter(&mut self, text: &str, active: bool) {
    self.filter_text = text.to_string();
    self.filter_active = active;

    let needle = text.to_lowercase();
    self.visible.clear();
    self.selection_count = 0;
    for (i, entry) in self.catalog.entries.iter_mut().enumerate() {
      entry.visible = !active || entry.matches(&needle);
      if entry.visible {
        self.visible.push(i);
        if entry.selected {
          self.selection_count += 1;
        }
      }
    }

    self.cursor = 0;
    self.page_start = 0;
  }

  /// Step to the neighbouring visible entry. Returns false at either end.
  pub fn move_highlight(&mut self, direction: Direction) -> bool {
    match direction {
      Direction::Down => {
        if self.cursor + 1 >= self.visible.len() {
          return false;
        }
        self.cursor += 1;
        if self.cursor >= self.page_start + self.page_size {
          self.page_start += self.page_size;
        }
      }
      Direction::Up => {
        if self.cursor == 0 || self.visible.is_empty() {
          return false;
        }
        self.cursor -= 1;
        if self.cursor < self.page_start {
          self.page_start = self.page_start.saturating_sub(self.page_size);
        }
      }
    }
    true
  }

  /// Flip the selection flag of the catalog entry at `index`. Hidden entries
  /// are left alone.
  pub fn toggle_selection(&mut self, index: usize) -> bool {
    let Some(entry) = self.catalog.entries.get_mut(index) else {
      return false;
    };
    if !entry.visible {
      return false;
    }
    entry.selected = !entry.selected;
    if entry.selected {
      self.selection_count += 1;
    } else {
      self.selection_count -= 1;
    }
    true
  }

  /// Deselect everything if anything is selected, otherwise select every
  /// visible entry.
  pub fn select_all(&mut self) {
    if self.selection_count > 0 {
      self.clear_selection();
      return;
    }
    for &i in &self.visible {
      self.catalog.entries[i].selected = true;
    }
    self.selection_count = self.visible.len();
  }

  pub fn clear_selection(&mut self) {
    for entry in &mut self.catalog.entries {
      entry.selected = false;
    }
    self.selection_count = 0;
  }

  pub fn page_up(&mut self) {
    self.jump_to_page(self.page_start.saturating_sub(self.page_size));
  }

  pub fn page_down(&mut self) {
    self.jump_to_page(self.page_start + self.page_size);
  }

  pub fn goto_top(&mut self) {
    self.jump_to_page(0);
  }

  pub fn goto_bottom(&mut self) {
    self.jump_to_page(self.last_page_start());
  }

  fn jump_to_page(&mut self, start: usize) {
    if self.visible.is_empty() {
      return;
    }
    self.page_start = start.min(self.last_page_start());
    self.cursor = self.page_start;
  }

  fn last_page_start(&self) -> usize {
    (self.page_count() - 1) * self.page_size
  }

  /// Resize pages, keeping the page that holds the highlight.
  pub fn set_page_size(&mut self, size: usize) {
    self.page_size = size.max(1);
    self.page_start = (self.cursor / self.page_size) * self.page_size;
  }

  /// Swap in a freshly loaded catalog and reapply the current filter.
  pub fn replace_catalog(&mut self, catalog: Catalog) {
    self.catalog = catalog;
    let text = std::mem::take(&mut self.filter_text);
    self.apply_filter(&text, self.filter_active);
  }

  /// Highlight the visible entry called `name` and move to its page.
  pub fn highlight_name(&mut self, file_name: impl AsRef<OsStr>) -> bool {
    let Some(index) = self.catalog.position(file_name) else {
      return false;
    };
    let Some(pos) = self.visible.iter().position(|&i| i == index) else {
      return false;
    };
    self.cursor = pos;
    self.page_start = (pos / self.page_size) * self.page_size;
    true
  }

  /// The entries an operation acts on: every selected visible entry, or the
  /// highlighted one when nothing is selected.
  pub fn targets(&self) -> Vec<&Entry> {
    if self.selection_count == 0 {
      return self.highlighted().into_iter().collect();
    }
    self
      .visible
      .iter()
      .map(|&i| &self.catalog.entries[i])
      .filter(|e| e.selected)
      .collect()
  }

  /// Catalog index and entry for every row of the current page.
  pub fn page_entries(&self) -> impl Iterator<Item = (usize, &Entry)> {
    let end = (self.page_start + self.page_size).min(self.visible.len());
    let start = self.page_start.min(end);
    self.visible[start..end].iter().map(|&i| (i, &self.catalog.entries[i]))
  }

  /// Catalog index of the highlighted entry, if anything is visible.
  pub fn highlight(&self) -> Option<usize> {
    self.visible.get(self.cursor).copied()
  }

  /// Position of the highlight among the visible entries.
  pub fn highlight_position(&self) -> Option<usize> {
    (self.cursor < self.visible.len()).then_some(self.cursor)
  }

  pub fn highlighted(&self) -> Option<&Entry> {
    self.highlight().and_then(|i| self.catalog.get(i))
  }

  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  pub fn visible_count(&self) -> usize {
    self.visible.len()
  }

  pub fn selection_count(&self) -> usize {
    self.selection_count
  }

  pub fn filter_text(&self) -> &str {
    &self.filter_text
  }

  pub fn filter_active(&self) -> bool {
    self.filter_active
  }

  pub fn page_size(&self) -> usize {
    self.page_size
  }

  #[cfg(test)]
  pub fn page_start(&self) -> usize {
    self.page_start
  }

  pub fn current_page(&self) -> usize {
    self.page_start / self.page_size
  }

  pub fn page_count(&self) -> usize {
    self.visible.len().div_ceil(self.page_size).max(1)
  }
}
