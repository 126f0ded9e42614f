//! Rasterization onto a tiny-skia pixmap
//!
//! The traversal carries the rules in scope and the parent's computed style
//! down the tree. Containers skip their subtree under `display: none` and
//! push their translate offset before visiting children.

pub mod config;
pub mod context;
pub mod paint;
pub mod render;

pub use config::{ConfigError, RasterConfig};
pub use context::Rasterizer;
pub use paint::{parse_color, ShapeStyle};
pub use render::{build_path, Shape};
