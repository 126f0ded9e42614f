//! The SVG document tree
//!
//! Nodes live in an arena owned by [`Document`]. Containers (`svg`, `g`)
//! hold ordered child lists and scoped stylesheet rules; every node keeps a
//! non-owning link back to its parent.

pub mod dimension;
pub mod node;
pub mod transform;
pub mod tree;

pub use crate::path::Axis;
pub use node::{parse_length, Attributes, Container, Node, NodeKind};
pub use transform::parse_translate;
pub use tree::{ChildRef, Descendants, Document, NodeId};
