//! SVG Rasterizer - an SVG document tree with a path engine, a style cascade
//! and a tiny-skia backed rasterizer
//!
//! # Example
//!
//! ```rust
//! use svg_rasterizer::{rasterize, Document};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let rect = doc.create_element("rect", [("width", "10"), ("height", "10")]);
//! doc.add_child(root, rect);
//!
//! let canvas = rasterize(&doc).unwrap();
//! assert_eq!(canvas.width(), 10);
//! ```

pub mod document;
pub mod error;
pub mod path;
pub mod raster;
pub mod style;

pub use document::{Axis, ChildRef, Document, Node, NodeId, NodeKind};
pub use error::{PathError, RenderError, TreeError};
pub use path::{Approximator, CoordinateGroup, PathCommand, Point, SegmentKind};
pub use raster::{ConfigError, RasterConfig, Rasterizer, Shape};
pub use style::{Cascade, ComputedStyle, Declarations, SelectorPattern, StyleRules};

use log::{debug, warn};

use document::parse_length;
use raster::parse_color;

/// Rasterize a document with default options
pub fn rasterize(document: &Document) -> Result<Rasterizer, RenderError> {
    rasterize_with_config(document, &RasterConfig::default())
}

/// Rasterize a document onto a fresh canvas.
///
/// Each canvas side comes from the config, then the root's `width`/`height`
/// attribute, then dimension inference over the root's children.
pub fn rasterize_with_config(
    document: &Document,
    config: &RasterConfig,
) -> Result<Rasterizer, RenderError> {
    let root = document.root();
    let width = match config.width {
        Some(width) => width,
        None => canvas_side(document, "width", Axis::Horizontal)?,
    };
    let height = match config.height {
        Some(height) => height,
        None => canvas_side(document, "height", Axis::Vertical)?,
    };
    debug!("rasterizing onto a {}x{} canvas", width, height);

    let mut rasterizer = Rasterizer::with_config(width, height, config)?;
    if let Some(background) = config.background.as_deref() {
        match parse_color(background) {
            Some(color) => rasterizer.clear(color),
            None => warn!("ignoring unsupported background color {:?}", background),
        }
    }

    document.rasterize(root, &mut rasterizer)?;
    Ok(rasterizer)
}

fn canvas_side(document: &Document, attribute: &str, axis: Axis) -> Result<u32, RenderError> {
    let root = document.root();
    let declared = document
        .attribute(root, attribute)
        .and_then(parse_length)
        .filter(|v| *v > 0.0);
    let value = match declared {
        Some(value) => value,
        None => document.guess_dimension(root, axis)?,
    };
    Ok(value.ceil().clamp(0.0, u32::MAX as f64) as u32)
}
