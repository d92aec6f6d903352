use std::io::{self, stdout, BufRead, Write};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};

/// Leaves raw mode on every exit path.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Reads a line without echoing it.
///
/// `Esc`, `Ctrl-C` and an empty answer all mean the user backed out.
pub fn password(label: &str) -> io::Result<Option<String>> {
    print!("{label}: ");
    stdout().flush()?;

    let mut password = String::new();
    let cancelled = {
        let _raw = RawMode::enable()?;
        loop {
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            else {
                continue;
            };
            if kind == KeyEventKind::Release {
                continue;
            }
            match code {
                KeyCode::Enter => break false,
                KeyCode::Esc => break true,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break true,
                KeyCode::Backspace => {
                    password.pop();
                }
                KeyCode::Char(c) => password.push(c),
                _ => {}
            }
        }
    };
    println!();

    Ok((!cancelled && !password.is_empty()).then_some(password))
}

/// Reads one trimmed line; an empty answer is `None`.
///
/// A closed stdin is an [`io::ErrorKind::UnexpectedEof`] error.
pub fn line(label: &str) -> io::Result<Option<String>> {
    print!("{label}: ");
    stdout().flush()?;

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer)? == 0 {
        return Err(io::ErrorKind::UnexpectedEof.into());
    }
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_owned()))
}

pub fn confirm(question: &str) -> io::Result<bool> {
    Ok(line(&format!("{question} [y/N]"))?.is_some_and(|a| is_yes(&a)))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
}
