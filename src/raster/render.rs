//! Tree traversal that paints a document onto a [`Rasterizer`]

use std::fmt;

use log::{debug, trace};
use tiny_skia::{PathBuilder, Rect};

use crate::document::{Axis, Document, Node, NodeId, NodeKind};
use crate::error::RenderError;
use crate::path::{approximate_description, CoordinateGroup, SegmentKind};
use crate::style::{Cascade, ComputedStyle};

use super::context::Rasterizer;
use super::paint::ShapeStyle;

/// A leaf element implemented outside the core.
///
/// Attach one with `NodeKind::Shape`; the traversal hands it the document and
/// the node's resolved paint properties.
pub trait Shape: fmt::Debug {
    /// Element tag, e.g. `circle`
    fn tag_name(&self) -> &str;

    fn rasterize(
        &self,
        document: &Document,
        node: NodeId,
        style: &ComputedStyle,
        rasterizer: &mut Rasterizer,
    ) -> Result<(), RenderError>;

    /// Extent used when guessing container dimensions
    fn extent(&self, _node: &Node, _axis: Axis) -> Option<f64> {
        None
    }
}

impl Document {
    /// Paint `node` and its subtree in document order
    pub fn rasterize(&self, node: NodeId, rasterizer: &mut Rasterizer) -> Result<(), RenderError> {
        let (mut cascade, inherited) = self.style_scope(node);
        self.visit(node, &inherited, &mut cascade, rasterizer)
    }

    fn visit<'a>(
        &'a self,
        node: NodeId,
        inherited: &ComputedStyle,
        cascade: &mut Cascade<'a>,
        rasterizer: &mut Rasterizer,
    ) -> Result<(), RenderError> {
        let Some(data) = self.node(node) else {
            return Ok(());
        };
        if matches!(
            data.kind(),
            NodeKind::Style { .. } | NodeKind::Tspan { .. } | NodeKind::Unknown(_)
        ) {
            trace!("nothing to paint for <{}>", data.name());
            return Ok(());
        }

        let style = ComputedStyle::compute(cascade, data, inherited);
        match data.kind() {
            NodeKind::Svg | NodeKind::Group => {
                self.visit_container(node, data, &style, cascade, rasterizer)
            }
            NodeKind::Rect => paint_rect(node, data, &style, rasterizer),
            NodeKind::Path => paint_path(node, data, &style, rasterizer),
            NodeKind::Shape(shape) => shape.rasterize(self, node, &style, rasterizer),
            NodeKind::Style { .. } | NodeKind::Tspan { .. } | NodeKind::Unknown(_) => Ok(()),
        }
    }

    fn visit_container<'a>(
        &'a self,
        container: NodeId,
        data: &'a Node,
        style: &ComputedStyle,
        cascade: &mut Cascade<'a>,
        rasterizer: &mut Rasterizer,
    ) -> Result<(), RenderError> {
        if style.is_display_none() {
            debug!("skipping {:?}: display is none", container);
            return Ok(());
        }

        let offset = self.offset(container);
        if let Some((x, y)) = offset {
            rasterizer.save();
            rasterizer.translate(x, y);
        }
        let scoped = data.container_styles();
        if let Some(rules) = scoped {
            cascade.push(rules);
        }

        let result = data
            .children()
            .iter()
            .try_for_each(|&child| self.visit(child, style, cascade, rasterizer));

        if scoped.is_some() {
            cascade.pop();
        }
        if offset.is_some() {
            rasterizer.restore();
        }
        result
    }
}

fn paint_rect(
    id: NodeId,
    node: &Node,
    style: &ComputedStyle,
    rasterizer: &mut Rasterizer,
) -> Result<(), RenderError> {
    let Some(paint) = leaf_paint(style) else {
        return Ok(());
    };
    let Some(rect) = Rect::from_xywh(
        node.x() as f32,
        node.y() as f32,
        node.width() as f32,
        node.height() as f32,
    ) else {
        trace!("rect {:?} has no area", id);
        return Ok(());
    };

    draw(&PathBuilder::from_rect(rect), &paint, rasterizer);
    Ok(())
}

fn paint_path(
    id: NodeId,
    node: &Node,
    style: &ComputedStyle,
    rasterizer: &mut Rasterizer,
) -> Result<(), RenderError> {
    let Some(paint) = leaf_paint(style) else {
        return Ok(());
    };
    let Some(description) = node.attribute("d") else {
        return Ok(());
    };

    let groups = approximate_description(description, rasterizer.approximator())?;
    let Some(path) = build_path(&groups) else {
        trace!("path {:?} produced no drawable outline", id);
        return Ok(());
    };

    draw(&path, &paint, rasterizer);
    Ok(())
}

/// Paint for a built-in leaf, or `None` when it would draw nothing
fn leaf_paint(style: &ComputedStyle) -> Option<ShapeStyle> {
    if style.is_display_none() || style.is_hidden() {
        return None;
    }
    Some(ShapeStyle::from_computed(style)).filter(ShapeStyle::is_visible)
}

fn draw(path: &tiny_skia::Path, paint: &ShapeStyle, rasterizer: &mut Rasterizer) {
    if let Some(fill) = paint.fill {
        rasterizer.fill_path(path, fill);
    }
    if let Some(stroke) = paint.stroke.filter(|_| paint.stroke_width > 0.0) {
        rasterizer.stroke_path(path, stroke, paint.stroke_width);
    }
}

/// Turn coordinate groups into a polyline outline
pub fn build_path(groups: &[CoordinateGroup]) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    let mut needs_move = true;

    for group in groups {
        match group.kind {
            SegmentKind::Move => {
                if let Some(p) = group.points.last() {
                    builder.move_to(p.x as f32, p.y as f32);
                    needs_move = false;
                }
            }
            SegmentKind::Close => {
                if !needs_move {
                    builder.close();
                }
                needs_move = true;
            }
            _ => {
                let mut points = group.points.iter();
                let first = points.next();
                if needs_move {
                    if let Some(p) = first {
                        builder.move_to(p.x as f32, p.y as f32);
                        needs_move = false;
                    }
                }
                for p in points {
                    builder.line_to(p.x as f32, p.y as f32);
                }
            }
        }
    }
    builder.finish()
}
