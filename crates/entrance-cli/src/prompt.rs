//! Line-oriented prompts on stdin/stdout.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};

use entrance_core::ValidationError;

/// Print `label` and read one trimmed line. `None` at end of input.
pub fn read_line(input: &mut dyn BufRead, label: &str) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Like [`read_line`], but end of input is an error.
pub fn ask(input: &mut dyn BufRead, label: &str) -> Result<String> {
    match read_line(input, label)? {
        Some(line) => Ok(line),
        None => bail!("input ended while waiting for {}", label.trim_end_matches([':', ' '])),
    }
}

/// Ask until `check` accepts the answer.
pub fn ask_valid<T>(
    input: &mut dyn BufRead,
    label: &str,
    check: impl Fn(&str) -> Result<T, ValidationError>,
) -> Result<T> {
    loop {
        let line = ask(input, label)?;
        match check(&line) {
            Ok(value) => return Ok(value),
            Err(e) => println!("  {e}. Please try again."),
        }
    }
}

/// Ask a yes/no question; anything but `y`/`yes` (or end of input) is no.
pub fn confirm(input: &mut dyn BufRead, question: &str) -> Result<bool> {
    let answer = read_line(input, &format!("{question} [y/N]: "))?;
    Ok(matches!(
        answer.as_deref().map(str::to_lowercase).as_deref(),
        Some("y" | "yes")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn ask_valid_retries_until_accepted() {
        let mut input = Cursor::new("abc\n12x\n42\n");
        let id = ask_valid(&mut input, "ID: ", entrance_core::validate::parse_id).unwrap();
        assert_eq!(id, 42);
    }

    #[test]
    fn ask_fails_at_end_of_input() {
        let mut input = Cursor::new("");
        let err = ask(&mut input, "Name: ").unwrap_err();
        assert!(err.to_string().contains("input ended while waiting for Name"));
    }

    #[test]
    fn confirm_answers() {
        assert!(confirm(&mut Cursor::new("Y\n"), "Go?").unwrap());
        assert!(confirm(&mut Cursor::new("yes\n"), "Go?").unwrap());
        assert!(!confirm(&mut Cursor::new("n\n"), "Go?").unwrap());
        assert!(!confirm(&mut Cursor::new(""), "Go?").unwrap());
    }
}
