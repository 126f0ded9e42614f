//! Arena-backed document tree and its mutation operations.
//!
//! All nodes live in a single [`SlotMap`]; parents refer to children by
//! [`NodeId`] in their child lists and children refer back to their parent by
//! id. Only the container operations below touch either side of that link, so
//! a node always has at most one parent and appears at most once in that
//! parent's child list.

use log::{debug, trace};
use slotmap::{new_key_type, SlotMap};

use crate::error::TreeError;
use crate::style::StyleRules;

use super::node::{Node, NodeKind};

new_key_type! {
    /// Handle to a node in a [`Document`]
    pub struct NodeId;
}

/// A child given either by identity or by position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRef {
    Node(NodeId),
    Index(usize),
}

impl From<NodeId> for ChildRef {
    fn from(id: NodeId) -> Self {
        ChildRef::Node(id)
    }
}

impl From<usize> for ChildRef {
    fn from(index: usize) -> Self {
        ChildRef::Index(index)
    }
}

/// An SVG document: the node arena plus its `<svg>` root
#[derive(Debug)]
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding an empty `<svg>` root
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(NodeKind::Svg));
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocate a detached node
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.insert(Node::new(kind))
    }

    /// Allocate a detached node from a tag and an attribute set, as handed
    /// over by a document reader
    pub fn create_element<I, K, V>(&mut self, tag: &str, attributes: I) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut node = Node::new(NodeKind::from_tag(tag));
        for (name, value) in attributes {
            node.set_attribute(name, value);
        }
        self.nodes.insert(node)
    }

    /// Allocate a detached `<style>` node
    pub fn create_style(&mut self, css: impl Into<String>) -> NodeId {
        self.create(NodeKind::Style { css: css.into() })
    }

    /// Allocate a detached `<tspan>` node
    pub fn create_tspan(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeKind::Tspan { text: text.into() })
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable access for attribute edits; structure stays under the
    /// document's control
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of allocated nodes, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(Node::name)
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?.attribute(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.set_attribute(name, value);
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.node_mut(id)?.remove_attribute(name)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    /// Whether `ancestor` appears on the parent chain of `id` (or is `id`)
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        let mut steps = 0;
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            // Parent chains are acyclic; the bound only guards corrupted input.
            steps += 1;
            if steps > self.nodes.len() {
                return false;
            }
            current = self.parent(node);
        }
        false
    }

    /// Append `node` to `container`'s children.
    ///
    /// Returns whether the tree changed. Adding a node to itself, to one of
    /// its own descendants, or to its current parent is a no-op, as is adding
    /// to a leaf. A node attached elsewhere is detached first. Adding a
    /// `<style>` node merges its rules into the container's scoped styles.
    pub fn add_child(&mut self, container: NodeId, node: NodeId) -> bool {
        if !self.contains(node) || !self.is_container(container) {
            return false;
        }
        if self.parent(node) == Some(container) || self.is_ancestor_or_self(node, container) {
            trace!("add_child: {:?} already placed under {:?}", node, container);
            return false;
        }

        if let Some(previous) = self.parent(node) {
            debug!("reparenting {:?} from {:?} to {:?}", node, previous, container);
            self.remove_child(previous, node);
        }

        let css = match &self.nodes[node].kind {
            NodeKind::Style { css } => Some(css.clone()),
            _ => None,
        };

        if let Some(parent) = self.nodes[container].container.as_mut() {
            parent.children.push(node);
        }
        self.nodes[node].parent = Some(container);

        if let Some(css) = css {
            self.add_container_style(container, &css);
        }
        true
    }

    /// Remove a child given by identity or index.
    ///
    /// Returns whether the tree changed; unknown nodes and out-of-range
    /// indices leave it untouched.
    pub fn remove_child(&mut self, container: NodeId, child: impl Into<ChildRef>) -> bool {
        let Some(index) = self.resolve_child_index(container, child.into()) else {
            return false;
        };
        let Some(parent) = self.nodes.get_mut(container).and_then(|n| n.container.as_mut()) else {
            return false;
        };
        let removed = parent.children.remove(index);
        if let Some(node) = self.nodes.get_mut(removed) {
            node.parent = None;
        }
        true
    }

    fn resolve_child_index(&self, container: NodeId, child: ChildRef) -> Option<usize> {
        let children = self.children(container);
        match child {
            ChildRef::Index(index) => (index < children.len()).then_some(index),
            ChildRef::Node(id) => children.iter().position(|&c| c == id),
        }
    }

    fn is_container(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(Node::is_container)
    }

    pub fn count_children(&self, container: NodeId) -> usize {
        self.children(container).len()
    }

    pub fn child(&self, container: NodeId, index: usize) -> Result<NodeId, TreeError> {
        let node = self.node(container).ok_or_else(|| TreeError::NotAContainer {
            name: format!("{:?}", container),
        })?;
        if !node.is_container() {
            return Err(TreeError::NotAContainer {
                name: node.name().to_string(),
            });
        }
        let children = node.children();
        children
            .get(index)
            .copied()
            .ok_or(TreeError::IndexOutOfBounds {
                index,
                len: children.len(),
            })
    }

    /// Merge stylesheet text into a container's scoped rules
    pub fn add_container_style(&mut self, container: NodeId, css: &str) -> bool {
        let Some(target) = self.nodes.get_mut(container).and_then(|n| n.container.as_mut()) else {
            return false;
        };
        let rules = StyleRules::parse(css);
        debug!("merging {} style rules into {:?}", rules.len(), container);
        target.styles.merge(rules);
        true
    }

    /// Depth-first search in document order, starting with `start` itself
    pub fn find_child_node_by_id(&self, start: NodeId, id: &str) -> Option<NodeId> {
        self.descendants(start)
            .find(|&candidate| self.node(candidate).and_then(Node::id) == Some(id))
    }

    /// Iterate a subtree in document order, starting with `start`
    pub fn descendants(&self, start: NodeId) -> Descendants<'_> {
        let stack = if self.contains(start) { vec![start] } else { Vec::new() };
        Descendants {
            document: self,
            stack,
        }
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    document: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.document.children(current).iter().rev());
        Some(current)
    }
}
