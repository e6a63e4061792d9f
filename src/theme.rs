use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
  pub name: &'static str,
  pub border: Color,
  pub title: Color,
  pub dir: Color,
  pub file: Color,
  /// Background of the highlighted row; its text is drawn black.
  pub highlight: Color,
  pub text: Color,
  pub status: Color,
  pub danger: Color,
  pub success: Color,
  pub info: Color,
  pub queued: Color,
}

const NAMES: &[&str] = &["default", "ocean", "forest", "sunset", "matrix", "mono", "gold", "purple"];

impl Theme {
  #[allow(clippy::too_many_arguments)]
  const fn scheme(
    name: &'static str,
    border: Color,
    title: Color,
    dir: Color,
    file: Color,
    highlight: Color,
    text: Color,
    status: Color,
    danger: Color,
    success: Color,
    info: Color,
  ) -> Self {
    Self {
      name,
      border,
      title,
      dir,
      file,
      highlight,
      text,
      status,
      danger,
      success,
      info,
      queued: Color::Magenta,
    }
  }

  pub fn classic() -> Self {
    use Color::*;
    Self::scheme("default", White, Cyan, Blue, Blue, Cyan, White, White, Red, Green, Yellow)
  }

  pub fn ocean() -> Self {
    use Color::*;
    Self::scheme("ocean", Cyan, Blue, Blue, Blue, Blue, Cyan, Cyan, Red, Green, Yellow)
  }

  pub fn forest() -> Self {
    use Color::*;
    Self::scheme("forest", Green, Green, Green, Green, Green, White, Green, Red, Yellow, Cyan)
  }

  pub fn sunset() -> Self {
    use Color::*;
    Self::scheme("sunset", Red, Yellow, Yellow, Yellow, Red, Yellow, Red, Magenta, Green, Cyan)
  }

  pub fn matrix() -> Self {
    use Color::*;
    Self::scheme("matrix", Green, Green, Green, Green, Green, Green, Green, Red, Yellow, White)
  }

  pub fn mono() -> Self {
    use Color::*;
    let mut theme = Self::scheme("mono", White, White, White, White, White, White, White, White, White, White);
    theme.queued = White;
    theme
  }

  pub fn gold() -> Self {
    use Color::*;
    Self::scheme("gold", Yellow, Yellow, Yellow, Yellow, Yellow, Yellow, Yellow, Red, Green, Cyan)
  }

  pub fn purple() -> Self {
    use Color::*;
    Self::scheme("purple", Magenta, Magenta, Green, Green, Magenta, Magenta, Magenta, Red, Green, Cyan)
  }

  pub fn from_name(name: &str) -> Option<Self> {
    match name.to_lowercase().as_str() {
      "default" => Some(Self::classic()),
      "ocean" => Some(Self::ocean()),
      "forest" => Some(Self::forest()),
      "sunset" => Some(Self::sunset()),
      "matrix" => Some(Self::matrix()),
      "mono" => Some(Self::mono()),
      "gold" => Some(Self::gold()),
      "purple" => Some(Self::purple()),
      _ => None,
    }
  }

  pub fn available_themes() -> &'static [&'static str] {
    NAMES
  }

  /// The scheme after this one, wrapping around.
  pub fn next(&self) -> Self {
    let pos = NAMES.iter().position(|n| *n == self.name).unwrap_or(0);
    let next = NAMES[(pos + 1) % NAMES.len()];
    Self::from_name(next).unwrap_or_default()
  }
}

impl Default for Theme {
  fn default() -> Self {
    Self::classic()
  }
}
