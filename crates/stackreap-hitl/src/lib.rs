use std::io::{BufRead, Write};

use anyhow::{Context, Result};

/// Prompt shown before any deletion request goes out.
pub fn format_prompt(count: usize, prefix: &str) -> String {
    format!("Are you sure you want to delete {count} stacks matching prefix '{prefix}'? (y/N): ")
}

/// Only a literal `y` (either case) counts as yes.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Writes the prompt, reads one line. EOF and empty input are a "no".
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, count: usize, prefix: &str) -> Result<bool> {
    output.write_all(format_prompt(count, prefix).as_bytes()).context("write confirmation prompt")?;
    output.flush().context("flush confirmation prompt")?;

    let mut line = String::new();
    input.read_line(&mut line).context("read confirmation answer")?;
    Ok(is_affirmative(&line))
}

/// [`confirm`] on the process's stdin/stderr.
pub fn confirm_on_terminal(count: usize, prefix: &str) -> Result<bool> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stderr();
    confirm(&mut input, &mut output, count, prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answer(s: &str) -> bool {
        let mut out = Vec::new();
        confirm(&mut Cursor::new(s.as_bytes().to_vec()), &mut out, 2, "pit-").unwrap()
    }

    #[test]
    fn test_format_prompt() {
        assert_eq!(
            format_prompt(3, "thisguymartin-pit"),
            "Are you sure you want to delete 3 stacks matching prefix 'thisguymartin-pit'? (y/N): "
        );
    }

    #[test]
    fn accepts_only_y() {
        assert!(answer("y\n"));
        assert!(answer("Y\n"));
        assert!(answer("  y  \r\n"));
        assert!(!answer("yes\n"));
        assert!(!answer("n\n"));
        assert!(!answer("\n"));
        assert!(!answer(""));
    }

    #[test]
    fn prompt_is_written_before_reading() {
        let mut out = Vec::new();
        confirm(&mut Cursor::new(b"n\n".to_vec()), &mut out, 1, "x").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format_prompt(1, "x"));
    }
}
