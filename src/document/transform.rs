//! Group `transform` handling: translate offsets and stripping

use std::sync::OnceLock;

use log::trace;
use regex::Regex;

use super::node::NodeKind;
use super::{Document, NodeId};

const NUMBER: &str = r"[+-]?(?:\d+(?:\.\d*)?|\.\d+)";

fn translate_regex() -> Option<&'static Regex> {
    static TRANSLATE: OnceLock<Option<Regex>> = OnceLock::new();
    TRANSLATE
        .get_or_init(|| {
            let source = format!(r"translate\(\s*({NUMBER})\s*(?:,\s*|\s+)({NUMBER})\s*\)");
            Regex::new(&source).ok()
        })
        .as_ref()
}

/// Extract `(tx, ty)` from a `translate(tx, ty)` transform list.
///
/// Any other transform function yields `None`.
pub fn parse_translate(transform: &str) -> Option<(f64, f64)> {
    let captures = translate_regex()?.captures(transform)?;
    let x = captures.get(1)?.as_str().parse().ok()?;
    let y = captures.get(2)?.as_str().parse().ok()?;
    Some((x, y))
}

impl Document {
    /// Translate offset of a group; `None` for other nodes or transforms
    pub fn offset(&self, group: NodeId) -> Option<(f64, f64)> {
        let node = self.node(group)?;
        if !matches!(node.kind(), NodeKind::Group) {
            return None;
        }
        parse_translate(node.attribute("transform")?)
    }

    pub fn x_offset(&self, group: NodeId) -> Option<f64> {
        self.offset(group).map(|(x, _)| x)
    }

    pub fn y_offset(&self, group: NodeId) -> Option<f64> {
        self.offset(group).map(|(_, y)| y)
    }

    /// Clear `transform` on this container and every group reached through
    /// nested groups
    pub fn remove_group_transforms(&mut self, container: NodeId) {
        let Some(node) = self.node_mut(container) else {
            return;
        };
        if !node.is_container() {
            return;
        }
        if node.remove_attribute("transform").is_some() {
            trace!("stripped transform from {:?}", container);
        }

        let groups: Vec<NodeId> = self
            .children(container)
            .iter()
            .copied()
            .filter(|&child| matches!(self.node(child).map(|n| n.kind()), Some(NodeKind::Group)))
            .collect();
        for group in groups {
            self.remove_group_transforms(group);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_translate_variants() {
        assert_eq!(parse_translate("translate(10.5, 20.25)"), Some((10.5, 20.25)));
        assert_eq!(parse_translate("translate(3 -4)"), Some((3.0, -4.0)));
        assert_eq!(parse_translate("scale(2)"), None);
        assert_eq!(parse_translate("rotate(45) translate(1,2)"), Some((1.0, 2.0)));
        assert_eq!(parse_translate("translate(5)"), None);
    }

    #[test]
    fn test_offset_only_for_groups() {
        let mut doc = Document::new();
        let g = doc.create_element("g", [("transform", "translate(1.5, 2.5)")]);
        let rect = doc.create_element("rect", [("transform", "translate(1.5, 2.5)")]);
        assert_eq!(doc.offset(g), Some((1.5, 2.5)));
        assert_eq!(doc.x_offset(g), Some(1.5));
        assert_eq!(doc.y_offset(g), Some(2.5));
        assert_eq!(doc.offset(rect), None);
    }

    #[test]
    fn test_remove_group_transforms_keeps_leaves() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.set_attribute(root, "transform", "translate(1, 1)");
        let outer = doc.create_element("g", [("transform", "translate(2, 2)")]);
        let inner = doc.create_element("g", [("transform", "scale(2)")]);
        let rect = doc.create_element("rect", [("transform", "translate(3, 3)")]);
        doc.add_child(root, outer);
        doc.add_child(outer, inner);
        doc.add_child(inner, rect);

        doc.remove_group_transforms(root);

        assert_eq!(doc.attribute(root, "transform"), None);
        assert_eq!(doc.attribute(outer, "transform"), None);
        assert_eq!(doc.attribute(inner, "transform"), None);
        assert_eq!(doc.attribute(rect, "transform"), Some("translate(3, 3)"));
    }
}
