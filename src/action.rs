#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
  Quit,
  MoveUp,
  MoveDown,
  PageUp,
  PageDown,
  GoToTop,
  GoToBottom,
  GPress,
  EnterDir,
  GoParent,
  ToggleSelect,
  SelectAll,
  ClearSelection,
  FilterStart,
  FilterInput(char),
  FilterBackspace,
  FilterConfirm,
  FilterCancel,
  ClearFilter,
  CopyToQueue,
  MoveToQueue,
  Paste,
  ClearQueue,
  DeleteStart,
  NewFileStart,
  NewDirStart,
  PromptInput(char),
  PromptBackspace,
  PromptConfirm,
  PromptCancel,
  Reload,
  ToggleHelp,
  CycleTheme,
  Resize(u16, u16),
  Tick,
  None,
}

impl Action {
  pub fn from_name(name: &str) -> Option<Action> {
    match name {
      "quit" => Some(Action::Quit),
      "move_up" => Some(Action::MoveUp),
      "move_down" => Some(Action::MoveDown),
      "page_up" => Some(Action::PageUp),
      "page_down" => Some(Action::PageDown),
      "go_to_top" => Some(Action::GoToTop),
      "go_to_bottom" => Some(Action::GoToBottom),
      "g_press" => Some(Action::GPress),
      "enter_dir" => Some(Action::EnterDir),
      "go_parent" => Some(Action::GoParent),
      "toggle_select" => Some(Action::ToggleSelect),
      "select_all" => Some(Action::SelectAll),
      "clear_selection" => Some(Action::ClearSelection),
      "filter_start" => Some(Action::FilterStart),
      "clear_filter" => Some(Action::ClearFilter),
      "copy" => Some(Action::CopyToQueue),
      "move" => Some(Action::MoveToQueue),
      "paste" => Some(Action::Paste),
      "clear_queue" => Some(Action::ClearQueue),
      "delete" => Some(Action::DeleteStart),
      "new_file" => Some(Action::NewFileStart),
      "new_dir" => Some(Action::NewDirStart),
      "reload" => Some(Action::Reload),
      "toggle_help" => Some(Action::ToggleHelp),
      "cycle_theme" => Some(Action::CycleTheme),
      "none" => Some(Action::None),
      _ => None,
    }
  }

  /// Short description for the help overlay.
  pub fn description(&self) -> &'static str {
    match self {
      Action::Quit => "Quit",
      Action::MoveUp => "Move up",
      Action::MoveDown => "Move down",
      Action::PageUp => "Previous page",
      Action::PageDown => "Next page",
      Action::GoToTop => "First page",
      Action::GoToBottom => "Last page",
      Action::GPress => "g prefix",
      Action::EnterDir => "Open directory",
      Action::GoParent => "Parent directory",
      Action::ToggleSelect => "Select / deselect",
      Action::SelectAll => "Select all / none",
      Action::ClearSelection => "Clear selection",
      Action::FilterStart => "Filter",
      Action::ClearFilter => "Clear filter",
      Action::CopyToQueue => "Queue for copy",
      Action::MoveToQueue => "Queue for move",
      Action::Paste => "Paste queue here",
      Action::ClearQueue => "Clear queue",
      Action::DeleteStart => "Delete",
      Action::NewFileStart => "New file",
      Action::NewDirStart => "New directory",
      Action::Reload => "Reload",
      Action::ToggleHelp => "Help",
      Action::CycleTheme => "Next color scheme",
      _ => "",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_from_name_bindable_actions() {
    assert_eq!(Action::from_name("quit"), Some(Action::Quit));
    assert_eq!(Action::from_name("move_up"), Some(Action::MoveUp));
    assert_eq!(Action::from_name("move_down"), Some(Action::MoveDown));
    assert_eq!(Action::from_name("page_up"), Some(Action::PageUp));
    assert_eq!(Action::from_name("page_down"), Some(Action::PageDown));
    assert_eq!(Action::from_name("go_to_top"), Some(Action::GoToTop));
    assert_eq!(Action::from_name("go_to_bottom"), Some(Action::GoToBottom));
    assert_eq!(Action::from_name("g_press"), Some(Action::GPress));
    assert_eq!(Action::from_name("enter_dir"), Some(Action::EnterDir));
    assert_eq!(Action::from_name("go_parent"), Some(Action::GoParent));
    assert_eq!(Action::from_name("toggle_select"), Some(Action::ToggleSelect));
    assert_eq!(Action::from_name("select_all"), Some(Action::SelectAll));
    assert_eq!(Action::from_name("clear_selection"), Some(Action::ClearSelection));
    assert_eq!(Action::from_name("filter_start"), Some(Action::FilterStart));
    assert_eq!(Action::from_name("clear_filter"), Some(Action::ClearFilter));
    assert_eq!(Action::from_name("copy"), Some(Action::CopyToQueue));
    assert_eq!(Action::from_name("move"), Some(Action::MoveToQueue));
    assert_eq!(Action::from_name("paste"), Some(Action::Paste));
    assert_eq!(Action::from_name("clear_queue"), Some(Action::ClearQueue));
    assert_eq!(Action::from_name("delete"), Some(Action::DeleteStart));
    assert_eq!(Action::from_name("new_file"), Some(Action::NewFileStart));
    assert_eq!(Action::from_name("new_dir"), Some(Action::NewDirStart));
    assert_eq!(Action::from_name("reload"), Some(Action::Reload));
    assert_eq!(Action::from_name("toggle_help"), Some(Action::ToggleHelp));
    assert_eq!(Action::from_name("cycle_theme"), Some(Action::CycleTheme));
  }

  #[test]
  fn test_from_name_none() {
    assert_eq!(Action::from_name("none"), Some(Action::None));
  }

  #[test]
  fn test_from_name_invalid() {
    assert_eq!(Action::from_name("garbage"), None);
    assert_eq!(Action::from_name(""), None);
  }

  #[test]
  fn test_from_name_unbindable() {
    assert_eq!(Action::from_name("filter_input"), None);
    assert_eq!(Action::from_name("prompt_input"), None);
    assert_eq!(Action::from_name("resize"), None);
    assert_eq!(Action::from_name("tick"), None);
  }

  #[test]
  fn test_bindable_actions_have_descriptions() {
    for name in ["quit", "copy", "move", "paste", "delete", "select_all", "cycle_theme"] {
      let action = Action::from_name(name).unwrap();
      assert!(!action.description().is_empty(), "{name}");
    }
  }
}
