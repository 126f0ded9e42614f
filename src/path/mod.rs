//! SVG path mini-language: parsing and polyline approximation
//!
//! [`parse`] turns a path description into typed commands and
//! [`Approximator`] flattens them into coordinate groups used both for
//! dimension inference and for painting.

pub mod approximate;
pub mod command;
pub mod lexer;
pub mod parser;

pub use approximate::{Approximator, DEFAULT_TOLERANCE};
pub use command::{Axis, CoordinateGroup, PathCommand, Point, SegmentKind};
pub use parser::parse;

use crate::error::PathError;

/// Parse and approximate a description in one step
pub fn approximate_description(
    description: &str,
    approximator: &Approximator,
) -> Result<Vec<CoordinateGroup>, PathError> {
    let commands = parse(description)?;
    Ok(approximator.approximate(&commands))
}
