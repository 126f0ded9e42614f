//! Error types for path parsing, tree access and rendering

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in a path description
pub type Span = std::ops::Range<usize>;

/// Errors produced while parsing a path description
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// A character that is neither a command letter, a number nor a separator
    #[error("unexpected character '{found}' at {span:?}")]
    UnexpectedCharacter { found: String, span: Span },

    /// A number where a command letter was required
    #[error("expected a path command at {span:?}")]
    ExpectedCommand { span: Span },

    /// The description does not begin with a moveto
    #[error("path must begin with a moveto, found '{found}' at {span:?}")]
    MissingMoveTo { found: char, span: Span },

    /// A command without enough numeric operands
    #[error("command '{command}' expects {expected} operands, found {found} at {span:?}")]
    Arity {
        command: char,
        expected: usize,
        found: usize,
        span: Span,
    },

    /// An arc flag that is not `0` or `1`
    #[error("invalid arc flag '{found}' for command '{command}' at {span:?}")]
    InvalidFlag {
        command: char,
        found: String,
        span: Span,
    },
}

impl PathError {
    pub fn unexpected(found: impl Into<String>, span: Span) -> Self {
        Self::UnexpectedCharacter {
            found: found.into(),
            span,
        }
    }

    pub fn arity(command: char, expected: usize, found: usize, span: Span) -> Self {
        Self::Arity {
            command,
            expected,
            found,
            span,
        }
    }

    /// Source span of the offending input
    pub fn span(&self) -> &Span {
        match self {
            Self::UnexpectedCharacter { span, .. }
            | Self::ExpectedCommand { span }
            | Self::MissingMoveTo { span, .. }
            | Self::Arity { span, .. }
            | Self::InvalidFlag { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let span = self.span().clone();
        let message = self.to_string();

        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(self.label())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => message,
        }
    }

    fn label(&self) -> String {
        match self {
            Self::UnexpectedCharacter { .. } => "not part of the path grammar".to_string(),
            Self::ExpectedCommand { .. } => "operand without a command".to_string(),
            Self::MissingMoveTo { .. } => "expected 'M' or 'm' here".to_string(),
            Self::Arity { expected, .. } => format!("needs {} numbers", expected),
            Self::InvalidFlag { .. } => "flags must be 0 or 1".to_string(),
        }
    }
}

/// Errors from indexed access into the node tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("child index {index} out of bounds (container has {len} children)")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("node '{name}' is not a container")]
    NotAContainer { name: String },
}

/// Errors that can occur while rasterizing a document
#[derive(Error, Debug)]
pub enum RenderError {
    /// A path node carried an invalid description
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// The canvas could not be allocated
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    /// Failure reported by an externally implemented shape
    #[error("shape '{name}' failed: {reason}")]
    Shape { name: String, reason: String },
}

impl RenderError {
    pub fn shape(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Shape {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_display() {
        let err = PathError::arity('L', 2, 1, 4..8);
        insta::assert_snapshot!(
            err.to_string(),
            @"command 'L' expects 2 operands, found 1 at 4..8"
        );
    }

    #[test]
    fn test_span_accessor() {
        let err = PathError::unexpected("X", 3..4);
        assert_eq!(err.span(), &(3..4));
    }

    #[test]
    fn test_format_mentions_message() {
        let err = PathError::unexpected("X", 5..6);
        let report = err.format("M 0 0X", "inline");
        assert!(report.contains("unexpected character 'X'"));
    }

    #[test]
    fn test_render_error_from_path_error() {
        let err: RenderError = PathError::ExpectedCommand { span: 0..1 }.into();
        assert!(matches!(err, RenderError::Path(_)));
        assert!(err.to_string().starts_with("path error"));
    }

    #[test]
    fn test_index_error_display() {
        let err = TreeError::IndexOutOfBounds { index: 3, len: 1 };
        assert!(err.to_string().contains("index 3"));
    }
}
