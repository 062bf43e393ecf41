//! Interactive air hockey mode menu.

use super::args::HockeyMode;
use crate::constants::CLI_MENU_PROMPT;
use std::io::{self, BufRead, Write};

/// `1` trains, `2` plays; anything else is rejected.
pub fn parse_mode(input: &str) -> Option<HockeyMode> {
    match input.trim() {
        "1" => Some(HockeyMode::Train),
        "2" => Some(HockeyMode::Play),
        _ => None,
    }
}

/// Shows the prompt and reads one line of input.
///
/// # Errors
///
/// Returns an error if the prompt cannot be written or input cannot be read.
pub fn prompt_mode<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<HockeyMode>> {
    write!(output, "{CLI_MENU_PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(parse_mode(&line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("1\n"), Some(HockeyMode::Train));
        assert_eq!(parse_mode(" 2 "), Some(HockeyMode::Play));
        assert_eq!(parse_mode("3"), None);
        assert_eq!(parse_mode(""), None);
        assert_eq!(parse_mode("train"), None);
    }

    #[test]
    fn test_prompt_reads_one_line() {
        let mut input = io::Cursor::new("2\n1\n");
        let mut output = Vec::new();
        let mode = prompt_mode(&mut input, &mut output).unwrap();
        assert_eq!(mode, Some(HockeyMode::Play));
        assert_eq!(String::from_utf8(output).unwrap(), CLI_MENU_PROMPT);
    }

    #[test]
    fn test_prompt_on_closed_input() {
        let mut input = io::Cursor::new("");
        let mut output = Vec::new();
        assert_eq!(prompt_mode(&mut input, &mut output).unwrap(), None);
    }
}
