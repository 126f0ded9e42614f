//! Node data: kind, attributes and the non-owning parent link

use indexmap::IndexMap;

use crate::raster::Shape;
use crate::style::css::{format_declarations, parse_declarations};
use crate::style::StyleRules;

use super::NodeId;

/// Attribute name -> raw value, in insertion order
pub type Attributes = IndexMap<String, String>;

/// The closed set of node kinds the core knows how to handle
#[derive(Debug)]
pub enum NodeKind {
    /// `<svg>` document root
    Svg,
    /// `<g>` group
    Group,
    /// `<rect>`
    Rect,
    /// `<path>`
    Path,
    /// `<style>` with its stylesheet text
    Style { css: String },
    /// `<tspan>` with its text content
    Tspan { text: String },
    /// A leaf implemented outside this crate
    Shape(Box<dyn Shape>),
    /// Any other element; preserved for serialization, never painted
    Unknown(String),
}

impl NodeKind {
    /// Select a kind from an element tag
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "svg" => NodeKind::Svg,
            "g" => NodeKind::Group,
            "rect" => NodeKind::Rect,
            "path" => NodeKind::Path,
            "style" => NodeKind::Style { css: String::new() },
            "tspan" => NodeKind::Tspan {
                text: String::new(),
            },
            other => NodeKind::Unknown(other.to_string()),
        }
    }

    pub fn tag_name(&self) -> &str {
        match self {
            NodeKind::Svg => "svg",
            NodeKind::Group => "g",
            NodeKind::Rect => "rect",
            NodeKind::Path => "path",
            NodeKind::Style { .. } => "style",
            NodeKind::Tspan { .. } => "tspan",
            NodeKind::Shape(shape) => shape.tag_name(),
            NodeKind::Unknown(tag) => tag,
        }
    }

    /// Whether nodes of this kind own a child list
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Svg | NodeKind::Group)
    }
}

/// Child list and scoped stylesheet rules owned by a container
#[derive(Debug, Default)]
pub struct Container {
    pub(crate) children: Vec<NodeId>,
    pub(crate) styles: StyleRules,
}

/// A single element in the document arena
#[derive(Debug)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) attributes: Attributes,
    pub(crate) parent: Option<NodeId>,
    pub(crate) container: Option<Container>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        let container = kind.is_container().then(Container::default);
        Self {
            kind,
            attributes: Attributes::new(),
            parent: None,
            container,
        }
    }

    /// Tag name, e.g. `g` or `rect`
    pub fn name(&self) -> &str {
        self.kind.tag_name()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_container(&self) -> bool {
        self.container.is_some()
    }

    /// Children in paint order; empty for leaves
    pub fn children(&self) -> &[NodeId] {
        self.container
            .as_ref()
            .map(|c| c.children.as_slice())
            .unwrap_or(&[])
    }

    /// Stylesheet rules scoped to this container
    pub fn container_styles(&self) -> Option<&StyleRules> {
        self.container.as_ref().map(|c| &c.styles)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Numeric attribute value; missing or malformed values read as 0
    pub fn number(&self, name: &str) -> f64 {
        self.attribute(name).and_then(parse_length).unwrap_or(0.0)
    }

    pub fn x(&self) -> f64 {
        self.number("x")
    }

    pub fn y(&self) -> f64 {
        self.number("y")
    }

    pub fn width(&self) -> f64 {
        self.number("width")
    }

    pub fn height(&self) -> f64 {
        self.number("height")
    }

    /// Text carried by `<style>` and `<tspan>` nodes
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Style { css } => Some(css),
            NodeKind::Tspan { text } => Some(text),
            _ => None,
        }
    }

    /// Replace the text of a `<style>` or `<tspan>`; returns false for other kinds
    pub fn set_text(&mut self, value: impl Into<String>) -> bool {
        match &mut self.kind {
            NodeKind::Style { css } => *css = value.into(),
            NodeKind::Tspan { text } => *text = value.into(),
            _ => return false,
        }
        true
    }

    /// Declaration from the inline `style` attribute
    pub fn style(&self, property: &str) -> Option<String> {
        let inline = self.attribute("style")?;
        parse_declarations(inline).shift_remove(property)
    }

    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        let mut declarations = self
            .attribute("style")
            .map(parse_declarations)
            .unwrap_or_default();
        declarations.insert(property.to_ascii_lowercase(), value.into());
        self.set_attribute("style", format_declarations(&declarations));
    }

    pub fn remove_style(&mut self, property: &str) -> Option<String> {
        let mut declarations = parse_declarations(self.attribute("style")?);
        let removed = declarations.shift_remove(property);
        if declarations.is_empty() {
            self.remove_attribute("style");
        } else {
            self.set_attribute("style", format_declarations(&declarations));
        }
        removed
    }
}

/// Parse a length in user units, ignoring a trailing `px`
pub fn parse_length(input: &str) -> Option<f64> {
    let s = input.trim();
    let s = s.strip_suffix("px").unwrap_or(s).trim();
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
