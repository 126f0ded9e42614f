//! Lexer for path descriptions using logos

use logos::Logos;

use crate::error::{PathError, Span};

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\n\r\x0C,]+")]
pub enum Token {
    #[regex(r"[MmZzLlHhVvCcSsQqTtAa]", |lex| lex.slice().chars().next())]
    Command(char),

    #[regex(r"[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?", number)]
    Number(f64),
}

fn number(lex: &mut logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Lex a path description into tokens with spans.
///
/// Any character outside the grammar aborts lexing.
pub fn lex(input: &str) -> Result<Vec<(Token, Span)>, PathError> {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| match tok {
            Ok(t) => Ok((t, span)),
            Err(()) => Err(PathError::unexpected(&input[span.clone()], span)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<Token> {
        lex(input).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_commands_and_numbers() {
        assert_eq!(
            kinds("M10,20 l-5.5 .5"),
            vec![
                Token::Command('M'),
                Token::Number(10.0),
                Token::Number(20.0),
                Token::Command('l'),
                Token::Number(-5.5),
                Token::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_adjacent_numbers_split_on_sign_and_dot() {
        assert_eq!(
            kinds("1.5.5-2"),
            vec![Token::Number(1.5), Token::Number(0.5), Token::Number(-2.0)]
        );
    }

    #[test]
    fn test_exponent() {
        assert_eq!(kinds("1e2 -3E-1"), vec![Token::Number(100.0), Token::Number(-0.3)]);
    }

    #[test]
    fn test_unknown_letter_is_error() {
        let err = lex("M 0 0 X 1").unwrap_err();
        assert_eq!(err, PathError::unexpected("X", 6..7));
    }
}
