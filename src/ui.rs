use crate::changeset::StagedEntry;
use crate::error::Interrupted;
use crate::workflow::Interaction;
use anyhow::{Context, Result};

#[doc(hidden)]
#[macro_export]
macro_rules! __console {
    ($stream:ident, $paint:ident, $text:expr) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::$stream(), "{}", $text.$paint());
    }};
}

#[macro_export]
macro_rules! warning {
    // format string literal (with or without inline formatting)
    ($fmt:literal $(, $($arg:tt)*)?) => {
        $crate::__console!(stderr, yellow, format!($fmt $(, $($arg)*)?))
    };
    // arbitrary expression (non-literal)
    ($expr:expr) => {
        $crate::__console!(stderr, yellow, format!("{}", $expr))
    };
}

#[macro_export]
macro_rules! error {
    ($fmt:literal $(, $($arg:tt)*)?) => {
        $crate::__console!(stderr, red, format!($fmt $(, $($arg)*)?))
    };
    ($expr:expr) => {
        $crate::__console!(stderr, red, format!("{}", $expr))
    };
}

#[macro_export]
macro_rules! status {
    ($fmt:literal $(, $($arg:tt)*)?) => {
        $crate::__console!(stdout, green, format!($fmt $(, $($arg)*)?))
    };
    ($expr:expr) => {
        $crate::__console!(stdout, green, format!("{}", $expr))
    };
}

#[macro_export]
macro_rules! info {
    () => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout());
    }};
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), $fmt $(, $($arg)*)?);
    }};
    ($expr:expr) => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", $expr);
    }};
}

/// print a titled list of paths, indented like git status
pub fn list_files(title: &str, paths: &[String]) {
    status!("{}", title);
    for path in paths {
        info!("  - {}", path);
    }
}

/// colored single-letter status, like `git status --short`
pub fn status_char(status: char) -> String {
    use colored::Colorize;
    let letter = status.to_string();
    match status {
        'A' => letter.green(),
        'D' => letter.red(),
        'R' => letter.cyan(),
        _ => letter.yellow(),
    }
    .to_string()
}

/// one line per staged entry, status letter first
pub fn staged_overview(entries: &[StagedEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| format!("{} {}", status_char(entry.status), entry.path))
        .collect()
}

/// raw mode for the lifetime of the guard
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        crossterm::terminal::enable_raw_mode()
            .context("this command requires an interactive terminal")?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// single key prompt, returns the lowercased first char of the chosen option
///
/// enter picks the first option. esc and ctrl-c return `Interrupted`.
pub fn prompt(options: &[&str]) -> Result<char> {
    use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
    use std::io::{self, Write};

    // validate options are not empty (programming error if violated)
    debug_assert!(!options.is_empty(), "prompt requires at least one option");
    debug_assert!(
        options.iter().all(|opt| !opt.is_empty()),
        "prompt options cannot be empty strings"
    );

    // build prompt string like "[Y]ES/[n]o"
    let mut prompt_parts = Vec::with_capacity(options.len());
    let mut valid_chars = Vec::with_capacity(options.len());
    for opt in options {
        let mut chars = opt.chars();
        let first = chars.next().unwrap_or('?');
        prompt_parts.push(format!("[{first}]{}", chars.as_str()));
        valid_chars.push(first.to_lowercase().next().unwrap_or(first));
    }

    print!("{} ? ", prompt_parts.join("/"));
    let _ = io::stdout().flush();

    let choice = {
        let _raw = RawMode::enable()?;
        loop {
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) = event::read().context("failed to read key")?
            else {
                continue;
            };

            match code {
                KeyCode::Esc => break None,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break None,
                // enter uses first option as default
                KeyCode::Enter => break Some(0),
                KeyCode::Char(c) => {
                    let lower = c.to_lowercase().next().unwrap_or(c);
                    if let Some(idx) = valid_chars.iter().position(|&ch| ch == lower) {
                        break Some(idx);
                    }
                }
                _ => {}
            }
        }
    };

    match choice {
        Some(idx) => {
            info!(options[idx]);
            Ok(valid_chars[idx])
        }
        None => {
            info!("^C");
            Err(Interrupted.into())
        }
    }
}

/// the interactive terminal the tool runs in
pub struct Terminal;

impl Interaction for Terminal {
    fn confirm(&self, question: &str) -> Result<bool> {
        use std::io::{self, Write};

        print!("{question} ");
        let _ = io::stdout().flush();
        Ok(prompt(&["YES", "no"])? == 'y')
    }
}
