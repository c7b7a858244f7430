//! Line-based prompts on the controlling terminal.

use std::io;

use colored::*;
use console::Term;

use crate::terminal::colors;

pub fn is_interactive() -> bool {
    Term::stdout().is_term()
}

fn label(question: &str) -> String {
    format!("{} {} ", "?".color(colors::ACCENT).bold(), question)
}

pub fn ask(question: &str) -> io::Result<String> {
    let term = Term::stdout();
    term.write_str(&label(question))?;
    Ok(term.read_line()?.trim().to_owned())
}

pub fn ask_secret(question: &str) -> io::Result<String> {
    let term = Term::stdout();
    term.write_str(&label(question))?;
    term.read_secure_line()
}

/// Yes/no question; anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> io::Result<bool> {
    let answer = ask(&format!("{question} [y/N]"))?;
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}
