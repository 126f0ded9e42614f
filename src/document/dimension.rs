//! Extent estimation for containers without explicit width/height

use crate::error::PathError;
use crate::path::{approximate_description, Approximator, Axis};

use super::node::NodeKind;
use super::{Document, NodeId};

impl Document {
    pub fn guess_width(&self, container: NodeId) -> Result<f64, PathError> {
        self.guess_dimension(container, Axis::Horizontal)
    }

    pub fn guess_height(&self, container: NodeId) -> Result<f64, PathError> {
        self.guess_dimension(container, Axis::Vertical)
    }

    /// Largest single-child contribution along `axis`.
    ///
    /// This is a heuristic, not a bounding box: nested containers report
    /// their own guess without adding their translate offsets.
    pub fn guess_dimension(&self, container: NodeId, axis: Axis) -> Result<f64, PathError> {
        let mut measurement: f64 = 0.0;
        for &child in self.children(container) {
            if let Some(extent) = self.extent_contribution(child, axis)? {
                measurement = measurement.max(extent);
            }
        }
        Ok(measurement)
    }

    /// What a single node adds to its container's extent
    pub fn extent_contribution(&self, id: NodeId, axis: Axis) -> Result<Option<f64>, PathError> {
        let Some(node) = self.node(id) else {
            return Ok(None);
        };

        let extent = match node.kind() {
            NodeKind::Rect => Some(match axis {
                Axis::Horizontal => node.x() + node.width(),
                Axis::Vertical => node.y() + node.height(),
            }),
            NodeKind::Path => {
                let Some(d) = node.attribute("d") else {
                    return Ok(None);
                };
                approximate_description(d, &Approximator::default())?
                    .iter()
                    .filter_map(|group| group.max_along(axis))
                    .reduce(f64::max)
            }
            NodeKind::Svg | NodeKind::Group => Some(self.guess_dimension(id, axis)?),
            NodeKind::Shape(shape) => shape.extent(node, axis),
            NodeKind::Style { .. } | NodeKind::Tspan { .. } | NodeKind::Unknown(_) => None,
        };
        Ok(extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeKind;

    fn rect(doc: &mut Document, x: &str, width: &str) -> NodeId {
        doc.create_element("rect", [("x", x), ("width", width), ("y", "0"), ("height", "1")])
    }

    #[test]
    fn test_empty_container_is_zero() {
        let doc = Document::new();
        assert_eq!(doc.guess_width(doc.root()).unwrap(), 0.0);
    }

    #[test]
    fn test_rect_contributes_offset_plus_extent() {
        let mut doc = Document::new();
        let root = doc.root();
        let r = rect(&mut doc, "4", "6");
        doc.add_child(root, r);
        assert_eq!(doc.guess_width(root).unwrap(), 10.0);
        assert_eq!(doc.guess_height(root).unwrap(), 1.0);
    }

    #[test]
    fn test_path_contributes_max_coordinate() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.create_element("path", [("d", "M 2 3 L 40 7 L 12 25")]);
        doc.add_child(root, p);
        assert_eq!(doc.guess_width(root).unwrap(), 40.0);
        assert_eq!(doc.guess_height(root).unwrap(), 25.0);
    }

    #[test]
    fn test_unknown_and_text_nodes_contribute_nothing() {
        let mut doc = Document::new();
        let root = doc.root();
        let circle = doc.create_element("circle", [("cx", "100"), ("r", "5")]);
        let tspan = doc.create_tspan("hello");
        doc.add_child(root, circle);
        doc.add_child(root, tspan);
        assert_eq!(doc.guess_width(root).unwrap(), 0.0);
    }

    #[test]
    fn test_nested_group_recurses() {
        let mut doc = Document::new();
        let root = doc.root();
        let g = doc.create(NodeKind::Group);
        doc.add_child(root, g);
        let r = rect(&mut doc, "30", "5");
        doc.add_child(g, r);
        let small = rect(&mut doc, "0", "2");
        doc.add_child(root, small);
        assert_eq!(doc.guess_width(root).unwrap(), 35.0);
    }

    #[test]
    fn test_bad_path_fails_loudly() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.create_element("path", [("d", "M 0 0 L 5")]);
        doc.add_child(root, p);
        assert!(doc.guess_width(root).is_err());
    }
}
