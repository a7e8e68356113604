//! Key script parser
//!
//! A key script is a textual transcript of button presses, e.g.
//! `12.5 + 3 =` or `5 ÷ 0 = C`. Each digit, `.` and operator glyph is one
//! key; words resolve through the keypad aliases (`AC`, `DEL`, `mod`, ...).
//! Whitespace, `,` and `;` separate keys and `#` starts a comment.

use chumsky::prelude::*;
use tracing::debug;

use super::{CalculatorError, Key};

/// Parse a key script into the keys it presses
///
/// # Example
/// ```
/// use tally::core::{parse_script, Key, Operator};
///
/// let keys = parse_script("12 x 3 =").unwrap();
/// assert_eq!(keys.len(), 5);
/// assert_eq!(keys[2], Key::Operator(Operator::Multiply));
/// ```
pub fn parse_script(input: &str) -> Result<Vec<Key>, CalculatorError> {
    let keys = script_parser()
        .parse(input)
        .into_result()
        .map_err(|errors| match errors.into_iter().next() {
            Some(error) => CalculatorError::script(error.reason().to_string(), error.span().start),
            None => CalculatorError::script("invalid key script", 0),
        })?;

    debug!(key_count = keys.len(), "Parsed key script");
    Ok(keys)
}

fn script_parser<'src>() -> impl Parser<'src, &'src str, Vec<Key>, extra::Err<Rich<'src, char>>> + Clone
{
    let separators = separator().repeated();

    separators
        .clone()
        .ignore_then(
            word_key()
                .or(glyph_key())
                .then_ignore(separators)
                .repeated()
                .collect::<Vec<_>>(),
        )
        .then_ignore(end())
}

/// Whitespace, list punctuation, or a `#` comment running to end of line
fn separator<'src>() -> impl Parser<'src, &'src str, (), extra::Err<Rich<'src, char>>> + Clone {
    let comment = just('#').then(none_of('\n').repeated()).ignored();
    one_of(" \t\r\n,;").ignored().or(comment)
}

/// A run of letters such as `AC`, `del` or `x`
fn word_key<'src>() -> impl Parser<'src, &'src str, Key, extra::Err<Rich<'src, char>>> + Clone {
    one_of('a'..='z')
        .or(one_of('A'..='Z'))
        .repeated()
        .at_least(1)
        .to_slice()
        .try_map(|label: &str, span| label.parse::<Key>().map_err(|e| Rich::custom(span, e)))
}

/// A single-character key: digit, decimal point, operator, `=`, `%` or `⌫`
fn glyph_key<'src>() -> impl Parser<'src, &'src str, Key, extra::Err<Rich<'src, char>>> + Clone {
    one_of("0123456789.+-×*÷/=%⌫").try_map(|c: char, span| {
        c.to_string()
            .parse::<Key>()
            .map_err(|e| Rich::custom(span, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Operator;

    #[test]
    fn test_digits_are_individual_keys() {
        let keys = parse_script("120").unwrap();
        assert_eq!(
            keys,
            vec![
                Key::digit(1).unwrap(),
                Key::digit(2).unwrap(),
                Key::digit(0).unwrap()
            ]
        );
    }

    #[test]
    fn test_whitespace_is_optional() {
        assert_eq!(parse_script("5+3=").unwrap(), parse_script(" 5 + 3 = ").unwrap());
    }

    #[test]
    fn test_operator_aliases() {
        let keys = parse_script("* × x / ÷ mod").unwrap();
        assert_eq!(
            keys,
            vec![
                Key::Operator(Operator::Multiply),
                Key::Operator(Operator::Multiply),
                Key::Operator(Operator::Multiply),
                Key::Operator(Operator::Divide),
                Key::Operator(Operator::Divide),
                Key::Operator(Operator::Percent),
            ]
        );
    }

    #[test]
    fn test_control_words() {
        let keys = parse_script("AC c clear DEL backspace ⌫ %").unwrap();
        assert_eq!(
            keys,
            vec![
                Key::Clear,
                Key::Clear,
                Key::Clear,
                Key::Backspace,
                Key::Backspace,
                Key::Backspace,
                Key::Percent,
            ]
        );
    }

    #[test]
    fn test_letters_split_from_digits() {
        let keys = parse_script("6x7").unwrap();
        assert_eq!(keys[1], Key::Operator(Operator::Multiply));
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_comments_and_separators() {
        let keys = parse_script("1, 2; # ignored 9 9 9\n+ 3").unwrap();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_empty_script() {
        assert!(parse_script("").unwrap().is_empty());
        assert!(parse_script("  # nothing\n").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_word_reports_offset() {
        let err = parse_script("5 + q =").unwrap_err();
        match err {
            CalculatorError::Script { offset, .. } => assert_eq!(offset, 4),
            other => panic!("Expected script error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_symbol_is_rejected() {
        assert!(matches!(
            parse_script("5 ^ 2"),
            Err(CalculatorError::Script { offset: 2, .. })
        ));
    }
}
