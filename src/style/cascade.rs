//! Cascade resolution over container-scoped stylesheet rules.
//!
//! Each container keeps the rules of the `<style>` children added to it.
//! A node's applicable rules are gathered from every container between the
//! root and the node's parent, root first, so declarations from nearer
//! containers overwrite those of their ancestors.
//!
//! Traversals resolve styles top-down: a [`Cascade`] holds the rule sets in
//! scope and each node's [`ComputedStyle`] is built from its parent's.

use crate::document::{Document, Node, NodeId};

use super::css::{parse_declarations, Declarations, StyleRules};

/// Properties resolved for every node painted by the rasterizer
pub const PAINT_PROPERTIES: [&str; 8] = [
    "display",
    "visibility",
    "opacity",
    "fill",
    "fill-opacity",
    "stroke",
    "stroke-opacity",
    "stroke-width",
];

/// Matcher built from a node's `id` and `class` attributes.
///
/// Stylesheet keys match when they contain `#id` or `.class` as a selector
/// component, so compound selectors such as `rect.box` or `g .box:hover`
/// also apply. The component has to end the name: `.box` does not match
/// `.boxed` and `#main` does not match `#mainframe`, which is stricter than
/// a bare substring search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorPattern {
    components: Vec<String>,
}

impl SelectorPattern {
    /// Build the pattern for a node; `None` when it has neither id nor class
    pub fn for_node(node: &Node) -> Option<Self> {
        Self::from_parts(node.id(), node.attribute("class"))
    }

    pub fn from_parts(id: Option<&str>, class: Option<&str>) -> Option<Self> {
        let mut components = Vec::new();
        if let Some(id) = id.map(str::trim).filter(|s| !s.is_empty()) {
            components.push(format!("#{}", id));
        }
        for class in class.unwrap_or_default().split_whitespace() {
            components.push(format!(".{}", class));
        }
        (!components.is_empty()).then_some(Self { components })
    }

    /// `#id` and `.class` components, id first
    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn matches(&self, selector: &str) -> bool {
        self.components.iter().any(|component| {
            selector.match_indices(component.as_str()).any(|(at, _)| {
                let next = selector[at + component.len()..].chars().next();
                !next.is_some_and(is_name_char)
            })
        })
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Container rule sets in scope at one point of a traversal, outermost first
#[derive(Debug, Clone, Default)]
pub struct Cascade<'a> {
    scopes: Vec<&'a StyleRules>,
}

impl<'a> Cascade<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a container; its rules apply to everything below it
    pub fn push(&mut self, rules: &'a StyleRules) {
        self.scopes.push(rules);
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Value of `property` from the nearest matching rule
    pub fn declaration(&self, pattern: &SelectorPattern, property: &str) -> Option<&'a str> {
        self.scopes.iter().rev().find_map(|&rules| {
            rules
                .iter()
                .rev()
                .filter(|(selector, _)| pattern.matches(selector))
                .find_map(|(_, declarations)| declarations.get(property))
                .map(String::as_str)
        })
    }

    /// Every matching declaration, merged outermost first
    pub fn matching(&self, pattern: &SelectorPattern) -> Declarations {
        let mut resolved = Declarations::new();
        for rules in &self.scopes {
            for (_, declarations) in rules.iter().filter(|(key, _)| pattern.matches(key)) {
                for (property, value) in declarations {
                    resolved.insert(property.clone(), value.clone());
                }
            }
        }
        resolved
    }
}

/// Resolved [`PAINT_PROPERTIES`] of one node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedStyle {
    values: Declarations,
}

impl ComputedStyle {
    /// Resolve a node from its own declarations, the rules in scope and its
    /// parent's resolved values
    pub fn compute(cascade: &Cascade<'_>, node: &Node, parent: &ComputedStyle) -> Self {
        let inline = node
            .attribute("style")
            .map(parse_declarations)
            .unwrap_or_default();
        let pattern = SelectorPattern::for_node(node);

        let mut values = Declarations::new();
        for property in PAINT_PROPERTIES {
            let value = own_value(cascade, node, &inline, pattern.as_ref(), property)
                .or_else(|| parent.get(property));
            if let Some(value) = value {
                values.insert(property.to_string(), value.to_string());
            }
        }
        Self { values }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.values.get(property).map(String::as_str)
    }

    pub fn is_display_none(&self) -> bool {
        self.get("display").is_some_and(|v| v.trim() == "none")
    }

    /// `visibility` is `hidden` or `collapse`
    pub fn is_hidden(&self) -> bool {
        self.get("visibility")
            .is_some_and(|v| matches!(v.trim(), "hidden" | "collapse"))
    }
}

/// A node's own value: inline `style`, presentation attribute, then the rules
/// in scope. `inherit` reads as unset.
fn own_value<'v>(
    cascade: &Cascade<'v>,
    node: &'v Node,
    inline: &'v Declarations,
    pattern: Option<&SelectorPattern>,
    property: &str,
) -> Option<&'v str> {
    inline
        .get(property)
        .map(String::as_str)
        .or_else(|| node.attribute(property))
        .or_else(|| pattern.and_then(|p| cascade.declaration(p, property)))
        .filter(|v| v.trim() != "inherit")
}

impl Document {
    /// Rules from the container cascade that apply to `node`
    pub fn container_style_for_node(&self, node: NodeId) -> Declarations {
        let Some(data) = self.node(node) else {
            return Declarations::new();
        };
        let Some(parent) = data.parent() else {
            return Declarations::new();
        };
        let pattern = SelectorPattern::for_node(data);
        self.container_style_by_pattern(parent, pattern.as_ref())
    }

    /// Merge the matching rules of `container` and all its ancestors,
    /// outermost first
    pub fn container_style_by_pattern(
        &self,
        container: NodeId,
        pattern: Option<&SelectorPattern>,
    ) -> Declarations {
        let Some(pattern) = pattern else {
            return Declarations::new();
        };
        let mut cascade = Cascade::new();
        for id in self.ancestry(container) {
            if let Some(rules) = self.node(id).and_then(Node::container_styles) {
                cascade.push(rules);
            }
        }
        cascade.matching(pattern)
    }

    /// Resolve a property for a node.
    ///
    /// Order: inline `style` declaration, presentation attribute, container
    /// cascade; when still unset or `inherit`, the parent's computed value.
    pub fn computed_style(&self, node: NodeId, property: &str) -> Option<String> {
        let mut cascade = Cascade::new();
        let mut value = None;
        for id in self.ancestry(node) {
            let data = self.node(id)?;
            let inline = data
                .attribute("style")
                .map(parse_declarations)
                .unwrap_or_default();
            let pattern = SelectorPattern::for_node(data);
            if let Some(own) = own_value(&cascade, data, &inline, pattern.as_ref(), property) {
                value = Some(own.to_string());
            }
            if let Some(rules) = data.container_styles() {
                cascade.push(rules);
            }
        }
        value
    }

    /// Rules in scope for `node` and the computed style of its parent, as a
    /// traversal starting at `node` needs them
    pub fn style_scope(&self, node: NodeId) -> (Cascade<'_>, ComputedStyle) {
        let mut cascade = Cascade::new();
        let mut inherited = ComputedStyle::default();
        let chain = self.ancestry(node);
        let above = chain.len().saturating_sub(1);
        for &id in &chain[..above] {
            let Some(data) = self.node(id) else {
                continue;
            };
            inherited = ComputedStyle::compute(&cascade, data, &inherited);
            if let Some(rules) = data.container_styles() {
                cascade.push(rules);
            }
        }
        (cascade, inherited)
    }

    /// Path from the root down to `node`, inclusive
    fn ancestry(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.contains(node).then_some(node);
        while let Some(id) = current {
            if chain.len() > self.len() {
                break;
            }
            chain.push(id);
            current = self.parent(id);
        }
        chain.reverse();
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pattern_requires_id_or_class() {
        assert!(SelectorPattern::from_parts(None, None).is_none());
        assert!(SelectorPattern::from_parts(Some(""), Some("   ")).is_none());
    }

    #[test]
    fn test_pattern_matches_components() {
        let pattern = SelectorPattern::from_parts(Some("main"), Some("box wide")).unwrap();
        assert_eq!(pattern.components(), &["#main", ".box", ".wide"]);
        assert!(pattern.matches("#main"));
        assert!(pattern.matches(".box"));
        assert!(pattern.matches("rect.wide"));
        assert!(pattern.matches("g .box:hover"));
        assert!(pattern.matches(".boxed, .box"));
        assert!(!pattern.matches(".boxed"));
        assert!(!pattern.matches("#mainframe"));
        assert!(!pattern.matches("rect"));
    }

    #[test]
    fn test_pattern_is_literal() {
        let pattern = SelectorPattern::from_parts(Some("a+b"), None).unwrap();
        assert!(pattern.matches("#a+b"));
        assert!(!pattern.matches("#aab"));
    }

    #[test]
    fn test_nearest_scope_wins() {
        let outer = StyleRules::parse(".box { fill: red; stroke: black }");
        let inner = StyleRules::parse(".box { fill: blue }");
        let pattern = SelectorPattern::from_parts(None, Some("box")).unwrap();

        let mut cascade = Cascade::new();
        cascade.push(&outer);
        cascade.push(&inner);
        assert_eq!(cascade.declaration(&pattern, "fill"), Some("blue"));
        assert_eq!(cascade.declaration(&pattern, "stroke"), Some("black"));
        assert_eq!(cascade.matching(&pattern).get("fill").map(String::as_str), Some("blue"));

        cascade.pop();
        assert_eq!(cascade.depth(), 1);
        assert_eq!(cascade.declaration(&pattern, "fill"), Some("red"));
    }

    #[test]
    fn test_inline_beats_container_rules() {
        let mut doc = Document::new();
        let root = doc.root();
        let style = doc.create_style(".box { fill: red; stroke: black }");
        doc.add_child(root, style);
        let rect = doc.create_element("rect", [("class", "box"), ("style", "fill: green")]);
        doc.add_child(root, rect);

        assert_eq!(doc.computed_style(rect, "fill").as_deref(), Some("green"));
        assert_eq!(doc.computed_style(rect, "stroke").as_deref(), Some("black"));
    }

    #[test]
    fn test_inherit_and_missing_walk_to_parent() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.set_attribute(root, "fill", "navy");
        let g = doc.create(NodeKind::Group);
        doc.add_child(root, g);
        let rect = doc.create_element("rect", [("fill", "inherit")]);
        doc.add_child(g, rect);

        assert_eq!(doc.computed_style(rect, "fill").as_deref(), Some("navy"));
        assert_eq!(doc.computed_style(rect, "stroke"), None);
    }

    #[test]
    fn test_detached_node_has_no_container_style() {
        let mut doc = Document::new();
        let rect = doc.create_element("rect", [("class", "box")]);
        assert!(doc.container_style_for_node(rect).is_empty());
    }

    #[test]
    fn test_computed_style_set_agrees_with_single_lookup() {
        let mut doc = Document::new();
        let root = doc.root();
        let css = doc.create_style(".lvl { stroke: green } .leaf { fill: teal; opacity: 0.5 }");
        doc.add_child(root, css);
        let g = doc.create_element("g", [("class", "lvl"), ("visibility", "hidden")]);
        doc.add_child(root, g);
        let rect = doc.create_element("rect", [("class", "leaf"), ("style", "stroke-width: 3")]);
        doc.add_child(g, rect);

        let (cascade, parent) = doc.style_scope(rect);
        assert_eq!(cascade.depth(), 2);
        let style = ComputedStyle::compute(&cascade, doc.node(rect).unwrap(), &parent);
        for property in PAINT_PROPERTIES {
            assert_eq!(
                style.get(property).map(str::to_string),
                doc.computed_style(rect, property),
                "{property}"
            );
        }
        assert!(style.is_hidden());
        assert!(!style.is_display_none());
    }
}
