//! Container-scoped stylesheets and the style cascade

pub mod cascade;
pub mod css;

pub use cascade::{Cascade, ComputedStyle, SelectorPattern, PAINT_PROPERTIES};
pub use css::{Declarations, StyleRules};
