//! Line-oriented front end: every input line is a run of key presses.
//!
//! Characters map through [`token_for_key`], with two extra bindings for
//! keys a terminal line cannot carry: `c`/`C` for AC and `<` for backspace.

use crate::calculator::{DisplayState, Session, Token, token_for_key};
use crate::config::ReplConfig;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// What a single input line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineCommand {
    Quit,
    Reset,
    Keys(Vec<Token>),
}

/// Map one terminal character to a token. Unbound characters yield `None`.
pub fn token_for_char(c: char) -> Option<Token> {
    match c {
        'c' | 'C' => Some(Token::Clear),
        '<' => Some(Token::Backspace),
        _ => {
            let mut buf = [0u8; 4];
            token_for_key(c.encode_utf8(&mut buf))
        }
    }
}

/// Translate a string of key characters into tokens, skipping unbound ones.
pub fn tokens_from_keys(keys: &str) -> Vec<Token> {
    keys.chars()
        .filter_map(|c| {
            let token = token_for_char(c);
            if token.is_none() && !c.is_whitespace() {
                debug!(key = %c, "ignoring unbound key");
            }
            token
        })
        .collect()
}

pub fn parse_line(line: &str) -> LineCommand {
    match line.trim() {
        ":q" | "quit" | "exit" => LineCommand::Quit,
        ":reset" => LineCommand::Reset,
        keys => LineCommand::Keys(tokens_from_keys(keys)),
    }
}

/// Render a display for output.
pub fn render(display: &DisplayState, session: &Session, json: bool, show_kind: bool) -> String {
    if json {
        return serde_json::to_string(display).unwrap_or_else(|_| display.text.clone());
    }
    match session.error() {
        Some(err) if display.is_error && show_kind => {
            format!("{} ({})", display.text, err.kind())
        }
        _ => display.text.clone(),
    }
}

/// Drive `session` from `input` until EOF or a quit command.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    settings: &ReplConfig,
    json: bool,
    input: R,
    mut output: W,
) -> io::Result<()> {
    let prompt = if json { "" } else { settings.prompt.as_str() };
    write!(output, "{}", prompt)?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        let display = match parse_line(&line) {
            LineCommand::Quit => break,
            LineCommand::Reset => session.reset(),
            LineCommand::Keys(tokens) => session.submit_all(tokens),
        };
        writeln!(
            output,
            "{}",
            render(&display, session, json, settings.show_kind)
        )?;
        write!(output, "{}", prompt)?;
        output.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Operator;
    use std::io::Cursor;

    fn run_script(script: &str, json: bool, show_kind: bool) -> String {
        let mut session = Session::new();
        let settings = ReplConfig {
            prompt: String::new(),
            show_kind,
        };
        let mut out = Vec::new();
        run(&mut session, &settings, json, Cursor::new(script), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_char_bindings() {
        assert_eq!(token_for_char('c'), Some(Token::Clear));
        assert_eq!(token_for_char('<'), Some(Token::Backspace));
        assert_eq!(token_for_char('='), Some(Token::Evaluate));
        assert_eq!(
            token_for_char('-'),
            Some(Token::Operator(Operator::Subtract))
        );
        assert_eq!(token_for_char('x'), None);
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line(" :q "), LineCommand::Quit);
        assert_eq!(parse_line("exit"), LineCommand::Quit);
        assert_eq!(parse_line(":reset"), LineCommand::Reset);
        assert_eq!(
            parse_line("1 + 2"),
            LineCommand::Keys(vec![
                Token::Digit(1),
                Token::Operator(Operator::Add),
                Token::Digit(2)
            ])
        );
    }

    #[test]
    fn test_session_script() {
        let out = run_script("12+3\n=\n*2=\n", false, false);
        assert_eq!(out, "12+3\n15\n30\n");
    }

    #[test]
    fn test_stops_at_quit() {
        let out = run_script("1\n:q\n2\n", false, false);
        assert_eq!(out, "1\n");
    }

    #[test]
    fn test_error_with_kind() {
        let out = run_script("5/0=\n", false, true);
        assert_eq!(out, "Calculation error (NonFiniteResult)\n");
    }

    #[test]
    fn test_json_output() {
        let out = run_script("5/0=\nc\n", true, false);
        assert_eq!(
            out,
            "{\"text\":\"Calculation error\",\"is_error\":true}\n{\"text\":\"0\",\"is_error\":false}\n"
        );
    }
}
