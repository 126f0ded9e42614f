//! Paint properties: color parsing and per-node paint resolution

use log::warn;
use tiny_skia::Color;

use crate::document::parse_length;
use crate::style::ComputedStyle;

/// Parse a CSS color value, keeping its alpha; `None` for `none` and
/// unparseable input
pub fn parse_color(input: &str) -> Option<Color> {
    let value = input.trim();
    if value.eq_ignore_ascii_case("none") {
        return None;
    }
    let parsed = csscolorparser::parse(&value.to_ascii_lowercase()).ok()?;
    let [r, g, b, a] = parsed.to_rgba8();
    Some(Color::from_rgba8(r, g, b, a))
}

fn parse_opacity(value: Option<&str>) -> f32 {
    value
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
        .unwrap_or(1.0)
}

/// Resolved paint for a leaf shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
}

impl ShapeStyle {
    /// Fill, stroke and opacity from a node's computed style.
    ///
    /// Fill defaults to black and stroke to none. Unparseable colors fall
    /// back to those defaults.
    pub fn from_computed(style: &ComputedStyle) -> Self {
        let opacity = parse_opacity(style.get("opacity"));

        let fill = match style.get("fill") {
            None => Some(Color::BLACK),
            Some(value) => color_or_default(value, Some(Color::BLACK)),
        }
        .map(|color| {
            with_opacity(color, opacity * parse_opacity(style.get("fill-opacity")))
        });

        let stroke = style
            .get("stroke")
            .and_then(|value| color_or_default(value, None))
            .map(|color| {
                with_opacity(color, opacity * parse_opacity(style.get("stroke-opacity")))
            });

        let stroke_width = style
            .get("stroke-width")
            .and_then(parse_length)
            .filter(|w| *w >= 0.0)
            .unwrap_or(1.0) as f32;

        Self {
            fill,
            stroke,
            stroke_width,
        }
    }

    /// Whether anything would be painted at all
    pub fn is_visible(&self) -> bool {
        self.fill.is_some() || (self.stroke.is_some() && self.stroke_width > 0.0)
    }
}

fn color_or_default(value: &str, default: Option<Color>) -> Option<Color> {
    if value.trim().eq_ignore_ascii_case("none") {
        return None;
    }
    match parse_color(value) {
        Some(color) => Some(color),
        None => {
            warn!("unsupported color {:?}, using default", value);
            default
        }
    }
}

fn with_opacity(mut color: Color, opacity: f32) -> Color {
    color.apply_opacity(opacity);
    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, NodeId};

    fn rgba(color: Color) -> [u8; 4] {
        let c = color.to_color_u8();
        [c.red(), c.green(), c.blue(), c.alpha()]
    }

    fn resolve(doc: &Document, id: NodeId) -> ShapeStyle {
        let (cascade, parent) = doc.style_scope(id);
        let style = ComputedStyle::compute(&cascade, doc.node(id).unwrap(), &parent);
        ShapeStyle::from_computed(&style)
    }

    #[test]
    fn test_parse_color_forms() {
        assert_eq!(parse_color("#ff0000").map(rgba), Some([255, 0, 0, 255]));
        assert_eq!(parse_color("#0f0").map(rgba), Some([0, 255, 0, 255]));
        assert_eq!(parse_color("rgb(0, 0, 255)").map(rgba), Some([0, 0, 255, 255]));
        assert_eq!(parse_color(" Navy ").map(rgba), Some([0, 0, 128, 255]));
        assert_eq!(parse_color("teal").map(rgba), Some([0, 128, 128, 255]));
        assert_eq!(parse_color("silver").map(rgba), Some([192, 192, 192, 255]));
        assert_eq!(parse_color("none"), None);
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_parse_color_keeps_alpha() {
        let [r, g, b, a] = parse_color("rgba(255, 0, 0, 0.5)").map(rgba).unwrap();
        assert_eq!((r, g, b), (255, 0, 0));
        assert!((127..=128).contains(&a));
        assert_eq!(parse_color("#00ff0080").map(rgba), Some([0, 255, 0, 128]));
        assert_eq!(parse_color("transparent").map(rgba), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_defaults_are_black_fill_no_stroke() {
        let mut doc = Document::new();
        let root = doc.root();
        let rect = doc.create_element("rect", [("width", "1")]);
        doc.add_child(root, rect);
        let style = resolve(&doc, rect);
        assert_eq!(style.fill.map(rgba), Some([0, 0, 0, 255]));
        assert_eq!(style.stroke, None);
        assert_eq!(style.stroke_width, 1.0);
    }

    #[test]
    fn test_fill_none_and_stroke_from_cascade() {
        let mut doc = Document::new();
        let root = doc.root();
        let css = doc.create_style("#outline { stroke: red; stroke-width: 3 }");
        doc.add_child(root, css);
        let rect = doc.create_element("rect", [("id", "outline"), ("fill", "none")]);
        doc.add_child(root, rect);
        let style = resolve(&doc, rect);
        assert_eq!(style.fill, None);
        assert_eq!(style.stroke.map(rgba), Some([255, 0, 0, 255]));
        assert_eq!(style.stroke_width, 3.0);
        assert!(style.is_visible());
    }

    #[test]
    fn test_nothing_to_paint() {
        let mut doc = Document::new();
        let root = doc.root();
        let rect = doc.create_element("rect", [("fill", "none"), ("stroke", "blue")]);
        doc.node_mut(rect).unwrap().set_style("stroke-width", "0");
        doc.add_child(root, rect);
        assert!(!resolve(&doc, rect).is_visible());
    }

    #[test]
    fn test_opacity_scales_alpha() {
        let mut doc = Document::new();
        let root = doc.root();
        let rect = doc.create_element("rect", [("fill", "white"), ("opacity", "0.5")]);
        doc.add_child(root, rect);
        let alpha = resolve(&doc, rect).fill.map(|c| c.alpha());
        assert_eq!(alpha, Some(0.5));
    }

    #[test]
    fn test_unknown_color_falls_back_to_black() {
        let mut doc = Document::new();
        let root = doc.root();
        let rect = doc.create_element("rect", [("fill", "not-a-color")]);
        doc.add_child(root, rect);
        assert_eq!(resolve(&doc, rect).fill.map(rgba), Some([0, 0, 0, 255]));
    }
}
