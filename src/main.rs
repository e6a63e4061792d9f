mod action;
mod app;
mod config;
mod error;
mod event;
mod fs;
mod logging;
mod theme;
mod transfer;
mod ui;
mod view;

use std::io;
use std::panic;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use tracing::{error, info};

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::event::{Event, EventLoop, map_key};
use crate::ui::dialog::TerminalPrompter;

fn main() -> Result<()> {
  let mut args = std::env::args().skip(1);

  let mut show_help = false;
  let mut show_version = false;
  let mut show_init = false;
  let mut log_path: Option<PathBuf> = None;
  let mut path_arg: Option<String> = None;

  while let Some(arg) = args.next() {
    match arg.as_str() {
      "--help" | "-h" => show_help = true,
      "--version" | "-V" => show_version = true,
      "--init" => show_init = true,
      "--log" => match args.next() {
        Some(path) => log_path = Some(PathBuf::from(path)),
        None => {
          eprintln!("dirman: --log needs a file path");
          std::process::exit(1);
        }
      },
      a if !a.starts_with('-') => path_arg = Some(a.to_string()),
      _ => {
        eprintln!("dirman: unknown option '{arg}'");
        std::process::exit(1);
      }
    }
  }

  if show_help {
    println!(concat!(
      "dirman - paged terminal directory manager\n",
      "\n",
      "Usage: dirman [options] [path]\n",
      "\n",
      "Options:\n",
      "  --init                   Write the default config to ~/.config/dirman/\n",
      "  --log <file>             Write the log to <file> (level from DIRMAN_LOG)\n",
      "  -h, --help               Print this help message\n",
      "  -V, --version            Print version\n",
      "\n",
      "If no path is given, opens the current directory.",
    ));
    return Ok(());
  }

  if show_version {
    println!("dirman {}", env!("CARGO_PKG_VERSION"));
    return Ok(());
  }

  if show_init {
    return write_default_config();
  }

  let log_file = logging::init(log_path.as_deref());
  let (config, config_errors) = Config::load();
  for e in &config_errors {
    error!(error = %e, "config");
  }

  let root = match path_arg {
    Some(p) => PathBuf::from(p),
    None => std::env::current_dir().context("cannot determine the current directory")?,
  };
  let mut app = App::new(root, &config)?;
  if !config_errors.is_empty() {
    app.set_error(config_errors.join("; "));
  }

  let original_hook = panic::take_hook();
  panic::set_hook(Box::new(move |info| {
    let _ = restore_terminal();
    original_hook(info);
  }));

  setup_terminal()?;
  let backend = CrosstermBackend::new(io::stdout());
  let mut terminal = Terminal::new(backend)?;

  let size = terminal.size()?;
  app.update(Action::Resize(size.width, size.height))?;

  let events = EventLoop::new(Duration::from_millis(config.tick_rate_ms));
  info!(log = ?log_file, "event loop started");

  let result = run(&mut terminal, &events, &mut app, &config);
  restore_terminal()?;
  result
}

fn run(terminal: &mut ui::Tui, events: &EventLoop, app: &mut App, config: &Config) -> Result<()> {
  // The last drawn frame, shown behind confirmation dialogs
  let mut backdrop = Buffer::default();

  loop {
    let frame = terminal.draw(|frame| ui::draw(frame, app, config))?;
    backdrop.clone_from(frame.buffer);

    match events.next()? {
      Event::Key(key) => {
        let action = map_key(key, app.input_mode, config);
        app.update(action)?;
      }
      Event::Resize(w, h) => app.update(Action::Resize(w, h))?,
      Event::Tick => app.update(Action::Tick)?,
    }

    if app.pending.is_some() {
      let mut prompter = TerminalPrompter::new(terminal, events, app.theme.clone(), &backdrop);
      app.run_pending(&mut prompter)?;
      // The dialog swallows resizes; apply the last one to the page size
      if let Some((w, h)) = prompter.resized() {
        app.update(Action::Resize(w, h))?;
      }
    }

    if app.should_quit {
      info!("quit");
      return Ok(());
    }
  }
}

fn write_default_config() -> Result<()> {
  let Some(config_path) = Config::config_path() else {
    eprintln!("dirman: could not determine the config directory");
    std::process::exit(1);
  };

  if config_path.exists() {
    eprint!("{} already exists. Overwrite? [y/N] ", config_path.display());
    let mut answer = String::new();
    io::stdin().read_line(&mut answer).unwrap_or(0);
    if !answer.trim().eq_ignore_ascii_case("y") {
      return Ok(());
    }
  }

  match Config::dump_default_config(&config_path) {
    Ok(()) => println!("{}", config_path.display()),
    Err(e) => {
      eprintln!("dirman: {e:#}");
      std::process::exit(1);
    }
  }
  Ok(())
}

fn setup_terminal() -> Result<()> {
  enable_raw_mode()?;
  execute!(io::stdout(), EnterAlternateScreen)?;
  Ok(())
}

fn restore_terminal() -> Result<()> {
  disable_raw_mode()?;
  execute!(io::stdout(), LeaveAlternateScreen)?;
  Ok(())
}
