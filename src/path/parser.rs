//! Parser turning path descriptions into [`PathCommand`] sequences

use crate::error::{PathError, Span};

use super::command::{PathCommand, Point};
use super::lexer::{lex, Token};

/// Parse an SVG path description.
///
/// Commands may repeat their operand groups without restating the letter;
/// extra coordinate pairs after a moveto become linetos of the same
/// relativity. An empty (or whitespace-only) description yields no commands.
pub fn parse(description: &str) -> Result<Vec<PathCommand>, PathError> {
    let tokens = lex(description)?;
    PathParser::new(description, tokens).run()
}

struct PathParser<'a> {
    source: &'a str,
    tokens: Vec<(Token, Span)>,
    pos: usize,
}

impl<'a> PathParser<'a> {
    fn new(source: &'a str, tokens: Vec<(Token, Span)>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    fn run(mut self) -> Result<Vec<PathCommand>, PathError> {
        let mut commands = Vec::new();

        while let Some((token, span)) = self.tokens.get(self.pos).cloned() {
            let Token::Command(letter) = token else {
                return Err(PathError::ExpectedCommand { span });
            };
            self.pos += 1;

            if commands.is_empty() && !matches!(letter, 'M' | 'm') {
                return Err(PathError::MissingMoveTo {
                    found: letter,
                    span,
                });
            }

            if matches!(letter, 'Z' | 'z') {
                commands.push(PathCommand::ClosePath);
                continue;
            }

            // The first operand group is mandatory; later ones are implicit repeats.
            let mut first = true;
            while first || self.next_is_number() {
                commands.push(self.command(letter, first, &span)?);
                first = false;
            }
        }

        Ok(commands)
    }

    fn next_is_number(&self) -> bool {
        matches!(self.tokens.get(self.pos), Some((Token::Number(_), _)))
    }

    fn command(
        &mut self,
        letter: char,
        first: bool,
        span: &Span,
    ) -> Result<PathCommand, PathError> {
        let relative = letter.is_ascii_lowercase();
        let command = match letter.to_ascii_uppercase() {
            'M' => {
                let [x, y] = self.numbers::<2>(letter, span)?;
                let to = Point::new(x, y);
                if first {
                    PathCommand::MoveTo { to, relative }
                } else {
                    PathCommand::LineTo { to, relative }
                }
            }
            'L' => {
                let [x, y] = self.numbers::<2>(letter, span)?;
                PathCommand::LineTo {
                    to: Point::new(x, y),
                    relative,
                }
            }
            'H' => {
                let [x] = self.numbers::<1>(letter, span)?;
                PathCommand::HorizontalTo { x, relative }
            }
            'V' => {
                let [y] = self.numbers::<1>(letter, span)?;
                PathCommand::VerticalTo { y, relative }
            }
            'C' => {
                let [x1, y1, x2, y2, x, y] = self.numbers::<6>(letter, span)?;
                PathCommand::CubicTo {
                    control1: Point::new(x1, y1),
                    control2: Point::new(x2, y2),
                    to: Point::new(x, y),
                    relative,
                }
            }
            'S' => {
                let [x2, y2, x, y] = self.numbers::<4>(letter, span)?;
                PathCommand::SmoothCubicTo {
                    control2: Point::new(x2, y2),
                    to: Point::new(x, y),
                    relative,
                }
            }
            'Q' => {
                let [x1, y1, x, y] = self.numbers::<4>(letter, span)?;
                PathCommand::QuadraticTo {
                    control: Point::new(x1, y1),
                    to: Point::new(x, y),
                    relative,
                }
            }
            'T' => {
                let [x, y] = self.numbers::<2>(letter, span)?;
                PathCommand::SmoothQuadraticTo {
                    to: Point::new(x, y),
                    relative,
                }
            }
            'A' => {
                let [rx, ry, rotation] = self.numbers::<3>(letter, span)?;
                let large_arc = self.flag(letter, 3, span)?;
                let sweep = self.flag(letter, 4, span)?;
                let [x, y] = self
                    .numbers::<2>(letter, span)
                    .map_err(|e| shift_arity(e, 5, 7))?;
                PathCommand::ArcTo {
                    radii: Point::new(rx, ry),
                    x_axis_rotation: rotation,
                    large_arc,
                    sweep,
                    to: Point::new(x, y),
                    relative,
                }
            }
            // The lexer only produces letters of the path alphabet.
            _ => return Err(PathError::ExpectedCommand { span: span.clone() }),
        };
        Ok(command)
    }

    /// Read exactly `N` numeric operands
    fn numbers<const N: usize>(
        &mut self,
        letter: char,
        span: &Span,
    ) -> Result<[f64; N], PathError> {
        let mut out = [0.0; N];
        for (found, slot) in out.iter_mut().enumerate() {
            match self.tokens.get(self.pos) {
                Some((Token::Number(n), _)) => {
                    *slot = *n;
                    self.pos += 1;
                }
                other => {
                    let end = other.map(|(_, s)| s.start).unwrap_or(self.source.len());
                    return Err(PathError::arity(letter, N, found, span.start..end));
                }
            }
        }
        Ok(out)
    }

    /// Read an arc flag, splitting compact forms such as `01` or `1.5`
    fn flag(&mut self, letter: char, index: usize, span: &Span) -> Result<bool, PathError> {
        let Some((Token::Number(_), num_span)) = self.tokens.get(self.pos).cloned() else {
            let end = self
                .tokens
                .get(self.pos)
                .map(|(_, s)| s.start)
                .unwrap_or(self.source.len());
            return Err(PathError::arity(letter, 7, index, span.start..end));
        };

        let text = &self.source[num_span.clone()];
        let flag = match text.as_bytes().first() {
            Some(b'0') => false,
            Some(b'1') => true,
            _ => {
                return Err(PathError::InvalidFlag {
                    command: letter,
                    found: text.to_string(),
                    span: num_span,
                })
            }
        };

        if text.len() == 1 {
            self.pos += 1;
            return Ok(flag);
        }

        // The remainder of a compact token is the next operand.
        let rest_span = num_span.start + 1..num_span.end;
        match self.source[rest_span.clone()].parse::<f64>() {
            Ok(rest) => {
                self.tokens[self.pos] = (Token::Number(rest), rest_span);
                Ok(flag)
            }
            Err(_) => Err(PathError::InvalidFlag {
                command: letter,
                found: text.to_string(),
                span: num_span,
            }),
        }
    }
}

fn shift_arity(err: PathError, offset: usize, expected: usize) -> PathError {
    match err {
        PathError::Arity {
            command,
            found,
            span,
            ..
        } => PathError::arity(command, expected, found + offset, span),
        other => other,
    }
}
