//! Key tokens for the command line
//!
//! Accepts every keyboard key the calculator understands plus a few names
//! for keypad-only buttons. Plain character runs such as `12+3=` are split
//! into single keys.

use omnicalc::core::{Event, Operator};

use crate::error::{CliError, CliResult};

/// Maps one whole token to an event, if it names a key
fn named_key(token: &str) -> Option<Event> {
    match token {
        "AC" | "ac" | "C" | "clear" => Some(Event::Clear),
        "neg" | "±" | "+/-" => Some(Event::ToggleSign),
        "%" | "pct" => Some(Event::Percent),
        "mod" => Some(Event::Operator(Operator::Modulo)),
        "x" | "×" => Some(Event::Operator(Operator::Multiply)),
        "÷" => Some(Event::Operator(Operator::Divide)),
        "back" | "⌫" => Some(Event::Backspace),
        other => Event::from_key(other),
    }
}

/// Parses one token, splitting character runs
pub fn parse_token(token: &str) -> CliResult<Vec<Event>> {
    if let Some(event) = named_key(token) {
        return Ok(vec![event]);
    }
    token
        .chars()
        .map(|ch| {
            let mut buf = [0u8; 4];
            named_key(ch.encode_utf8(&mut buf))
                .ok_or_else(|| CliError::invalid_argument(format!("unknown key '{ch}' in '{token}'")))
        })
        .collect()
}

/// Parses a list of tokens
pub fn parse_keys<S: AsRef<str>>(tokens: &[S]) -> CliResult<Vec<Event>> {
    let mut events = Vec::new();
    for token in tokens {
        let token = token.as_ref().trim();
        if token.is_empty() {
            continue;
        }
        events.extend(parse_token(token)?);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_keys() {
        assert_eq!(parse_token("7").unwrap(), vec![Event::Digit(7)]);
        assert_eq!(parse_token("Enter").unwrap(), vec![Event::Equals]);
        assert_eq!(parse_token("Escape").unwrap(), vec![Event::Clear]);
        assert_eq!(parse_token("Backspace").unwrap(), vec![Event::Backspace]);
    }

    #[test]
    fn test_named_buttons() {
        assert_eq!(parse_token("AC").unwrap(), vec![Event::Clear]);
        assert_eq!(parse_token("neg").unwrap(), vec![Event::ToggleSign]);
        assert_eq!(parse_token("%").unwrap(), vec![Event::Percent]);
        assert_eq!(
            parse_token("mod").unwrap(),
            vec![Event::Operator(Operator::Modulo)]
        );
        assert_eq!(
            parse_token("×").unwrap(),
            vec![Event::Operator(Operator::Multiply)]
        );
    }

    #[test]
    fn test_character_run() {
        assert_eq!(
            parse_token("12+3=").unwrap(),
            vec![
                Event::Digit(1),
                Event::Digit(2),
                Event::Operator(Operator::Add),
                Event::Digit(3),
                Event::Equals
            ]
        );
        assert_eq!(
            parse_token("50%").unwrap(),
            vec![Event::Digit(5), Event::Digit(0), Event::Percent]
        );
    }

    #[test]
    fn test_unknown_key() {
        let err = parse_token("1q").unwrap_err();
        assert!(err.to_string().contains("unknown key 'q'"));
    }

    #[test]
    fn test_parse_keys_skips_blank() {
        let events = parse_keys(&["1", " ", "+", "1", "="]).unwrap();
        assert_eq!(events.len(), 4);
    }
}
