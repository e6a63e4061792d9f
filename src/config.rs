use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::action::Action;
use crate::theme::Theme;
use crate::transfer::queue::DEFAULT_CAPACITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
  pub code: KeyCode,
  pub modifiers: KeyModifiers,
}

impl KeyBinding {
  pub fn display_key(&self) -> String {
    let key_name = match self.code {
      KeyCode::Char(' ') => "Space".to_string(),
      KeyCode::Char(c) => c.to_string(),
      KeyCode::Enter => "Enter".to_string(),
      KeyCode::Esc => "Esc".to_string(),
      KeyCode::Backspace => "Backspace".to_string(),
      KeyCode::Delete => "Delete".to_string(),
      KeyCode::Tab => "Tab".to_string(),
      KeyCode::Home => "Home".to_string(),
      KeyCode::End => "End".to_string(),
      KeyCode::PageUp => "PageUp".to_string(),
      KeyCode::PageDown => "PageDown".to_string(),
      KeyCode::Up => "Up".to_string(),
      KeyCode::Down => "Down".to_string(),
      KeyCode::Left => "Left".to_string(),
      KeyCode::Right => "Right".to_string(),
      KeyCode::F(n) => format!("F{n}"),
      _ => format!("{:?}", self.code),
    };

    if self.modifiers.contains(KeyModifiers::CONTROL) {
      format!("Ctrl+{key_name}")
    } else if self.modifiers.contains(KeyModifiers::ALT) {
      format!("Alt+{key_name}")
    } else {
      key_name
    }
  }
}

pub struct Config {
  pub tick_rate_ms: u64,
  pub queue_capacity: usize,
  pub theme: Theme,
  pub status_ticks: u16,
  pub normal_keys: HashMap<KeyBinding, Action>,
  pub g_prefix_keys: HashMap<KeyBinding, Action>,
}

#[derive(Deserialize, Default)]
struct TomlConfig {
  general: Option<GeneralConfig>,
  keys: Option<KeysConfig>,
}

#[derive(Deserialize, Default)]
struct GeneralConfig {
  tick_rate_ms: Option<u64>,
  queue_capacity: Option<usize>,
  theme: Option<String>,
  status_ticks: Option<u16>,
}

#[derive(Deserialize, Default)]
struct KeysConfig {
  normal: Option<HashMap<String, String>>,
  g_prefix: Option<HashMap<String, String>>,
}

pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
  if s.is_empty() {
    return None;
  }

  // A lone "+" is a key, not a separator
  let parts: Vec<&str> = if s == "+" { vec!["+"] } else { s.split('+').collect() };

  if let [key] = parts.as_slice() {
    if let Some(code) = named_key(key) {
      return Some(KeyBinding { code, modifiers: KeyModifiers::NONE });
    }
    return single_char(key).map(|c| KeyBinding { code: KeyCode::Char(c), modifiers: KeyModifiers::NONE });
  }

  let [modifier, key] = parts.as_slice() else {
    return None;
  };

  let modifiers = match modifier.to_lowercase().as_str() {
    "ctrl" => KeyModifiers::CONTROL,
    "alt" => KeyModifiers::ALT,
    "shift" => {
      // shift+x is stored the way crossterm reports it: 'X' without SHIFT
      if let Some(c) = single_char(key) {
        let upper = c.to_uppercase().next().unwrap_or(c);
        return Some(KeyBinding { code: KeyCode::Char(upper), modifiers: KeyModifiers::NONE });
      }
      return named_key(key).map(|code| KeyBinding { code, modifiers: KeyModifiers::SHIFT });
    }
    _ => return None,
  };

  if let Some(code) = named_key(key) {
    return Some(KeyBinding { code, modifiers });
  }
  single_char(key).map(|c| KeyBinding { code: KeyCode::Char(c), modifiers })
}

fn single_char(s: &str) -> Option<char> {
  let mut chars = s.chars();
  match (chars.next(), chars.next()) {
    (Some(c), None) => Some(c),
    _ => None,
  }
}

fn named_key(s: &str) -> Option<KeyCode> {
  match s.to_lowercase().as_str() {
    "enter" => Some(KeyCode::Enter),
    "space" => Some(KeyCode::Char(' ')),
    "esc" => Some(KeyCode::Esc),
    "up" => Some(KeyCode::Up),
    "down" => Some(KeyCode::Down),
    "left" => Some(KeyCode::Left),
    "right" => Some(KeyCode::Right),
    "backspace" => Some(KeyCode::Backspace),
    "delete" => Some(KeyCode::Delete),
    "tab" => Some(KeyCode::Tab),
    "home" => Some(KeyCode::Home),
    "end" => Some(KeyCode::End),
    "pageup" => Some(KeyCode::PageUp),
    "pagedown" => Some(KeyCode::PageDown),
    s if s.starts_with('f') && s.len() > 1 => {
      s[1..].parse::<u8>().ok().filter(|&n| (1..=24).contains(&n)).map(KeyCode::F)
    }
    _ => None,
  }
}

pub fn normalize_key_event(key: KeyEvent) -> KeyBinding {
  let mut modifiers = key.modifiers;
  // Uppercase letters and shifted punctuation like '?' carry SHIFT on some
  // terminals; the character already encodes it
  if let KeyCode::Char(c) = key.code
    && (c.is_uppercase() || !c.is_alphanumeric())
  {
    modifiers -= KeyModifiers::SHIFT;
  }
  KeyBinding { code: key.code, modifiers }
}

impl Default for Config {
  fn default() -> Self {
    let mut config = Config::empty();
    let mut errors = Vec::new();
    config.apply_toml_str(Config::default_toml(), &mut errors);
    config
  }
}

impl Config {
  fn empty() -> Self {
    Config {
      tick_rate_ms: 100,
      queue_capacity: DEFAULT_CAPACITY,
      theme: Theme::default(),
      status_ticks: 30,
      normal_keys: HashMap::new(),
      g_prefix_keys: HashMap::new(),
    }
  }

  fn apply_toml_str(&mut self, s: &str, errors: &mut Vec<String>) {
    let toml_config: TomlConfig = match toml::from_str(s) {
      Ok(c) => c,
      Err(e) => {
        errors.push(format!("failed to parse config.toml: {e}"));
        return;
      }
    };

    if let Some(general) = toml_config.general {
      if let Some(tick) = general.tick_rate_ms {
        self.tick_rate_ms = tick.max(10);
      }
      if let Some(capacity) = general.queue_capacity {
        if capacity == 0 {
          errors.push("queue_capacity must be at least 1".to_string());
        } else {
          self.queue_capacity = capacity;
        }
      }
      if let Some(name) = general.theme {
        match Theme::from_name(&name) {
          Some(theme) => self.theme = theme,
          None => errors.push(format!(
            "unknown theme {name:?} (available: {})",
            Theme::available_themes().join(", ")
          )),
        }
      }
      if let Some(ticks) = general.status_ticks {
        self.status_ticks = ticks;
      }
    }

    if let Some(keys) = toml_config.keys {
      if let Some(normal) = keys.normal {
        self.normal_keys = parse_bindings(&normal, errors);
      }
      if let Some(g_prefix) = keys.g_prefix {
        self.g_prefix_keys = parse_bindings(&g_prefix, errors);
      }
    }
  }

  pub fn default_toml() -> &'static str {
    r#"[general]
tick_rate_ms = 100    # event loop tick rate in ms
queue_capacity = 10   # items the copy/move queue holds
theme = "default"     # default, ocean, forest, sunset, matrix, mono, gold, purple
status_ticks = 30     # ticks a status message stays visible

[keys.normal]
j = "move_down"
k = "move_up"
down = "move_down"
up = "move_up"
l = "enter_dir"
right = "enter_dir"
enter = "enter_dir"
h = "go_parent"
left = "go_parent"
"-" = "go_parent"
pagedown = "page_down"
pageup = "page_up"
"ctrl+d" = "page_down"
"ctrl+u" = "page_up"
home = "go_to_top"
end = "go_to_bottom"
"shift+g" = "go_to_bottom"
g = "g_press"
space = "toggle_select"
a = "select_all"
u = "clear_selection"
"/" = "filter_start"
esc = "clear_filter"
c = "copy"
m = "move"
p = "paste"
x = "clear_queue"
"shift+r" = "delete"
delete = "delete"
n = "new_file"
"shift+n" = "new_dir"
"ctrl+r" = "reload"
t = "cycle_theme"
"?" = "toggle_help"
q = "quit"
"ctrl+c" = "quit"

[keys.g_prefix]
g = "go_to_top"
"#
  }

  pub fn reverse_lookup(&self) -> HashMap<Action, Vec<String>> {
    let mut map: HashMap<Action, Vec<String>> = HashMap::new();
    for (kb, action) in &self.normal_keys {
      map.entry(action.clone()).or_default().push(kb.display_key());
    }
    for (kb, action) in &self.g_prefix_keys {
      let key_str = format!("g{}", kb.display_key());
      map.entry(action.clone()).or_default().push(key_str);
    }
    for keys in map.values_mut() {
      keys.sort();
    }
    map
  }

  pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dirman").join("config.toml"))
  }

  pub fn dump_default_config(path: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, Self::default_toml()).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
  }

  /// Read the user config if there is one. Problems are returned alongside
  /// a usable config rather than failing.
  pub fn load() -> (Config, Vec<String>) {
    let mut errors = Vec::new();
    let content = Self::config_path().and_then(|p| std::fs::read_to_string(p).ok());
    let config = match content {
      Some(s) => Self::load_from_str_with_errors(&s, &mut errors),
      None => Config::default(),
    };
    (config, errors)
  }

  #[cfg(test)]
  pub fn load_from_str(s: &str) -> Config {
    let mut errors = Vec::new();
    Self::load_from_str_with_errors(s, &mut errors)
  }

  fn load_from_str_with_errors(s: &str, errors: &mut Vec<String>) -> Config {
    let mut config = Config::default();
    config.apply_toml_str(s, errors);
    config
  }
}

fn parse_bindings(section: &HashMap<String, String>, errors: &mut Vec<String>) -> HashMap<KeyBinding, Action> {
  let mut bindings = HashMap::new();
  for (key_str, action_str) in section {
    let Some(kb) = parse_key_binding(key_str) else {
      errors.push(format!("invalid key binding: {key_str:?}"));
      continue;
    };
    let Some(action) = Action::from_name(action_str) else {
      errors.push(format!("invalid action: {action_str:?}"));
      continue;
    };
    bindings.insert(kb, action);
  }
  bindings
}
