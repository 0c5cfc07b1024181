use crate::error::{ExtractError, Result};
use crate::ui::locale::Catalog;
use console::{style, Term};
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Asks for the archive path on the terminal.
///
/// Falls back to a plain stdin read when stderr is not a terminal, so
/// piped input still answers the prompt.
pub fn prompt_archive_path(catalog: &Catalog) -> Result<PathBuf> {
    let term = Term::stderr();
    term.write_str(&style(catalog.enter_archive_path).cyan().to_string())?;
    let line = read_input_line(&term)?;

    parse_archive_path(&line)
}

fn read_input_line(term: &Term) -> io::Result<String> {
    if term.is_term() {
        term.read_line()
    } else {
        read_line_from(io::stdin().lock())
    }
}

fn read_line_from<R: BufRead>(mut reader: R) -> io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line)
}

/// Turns raw terminal input into a path.
///
/// Paths dragged onto a terminal window usually arrive wrapped in quotes.
pub fn parse_archive_path(input: &str) -> Result<PathBuf> {
    let cleaned = strip_quotes(input.trim()).trim();

    if cleaned.is_empty() {
        return Err(ExtractError::InvalidPath {
            path: "no archive path entered".to_string(),
        });
    }

    Ok(PathBuf::from(cleaned))
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote)) {
            return inner;
        }
    }
    s.trim_matches('"')
}

/// Blocks until Enter is pressed.
pub fn wait_for_enter(catalog: &Catalog) {
    let term = Term::stderr();
    if term.write_str(&style(catalog.press_enter).cyan().to_string()).is_ok() {
        let _ = read_input_line(&term);
    }
}
