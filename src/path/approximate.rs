//! Curve flattening: path commands to polyline coordinate groups
//!
//! The approximator threads a current point (and the last control point,
//! for smooth curve reflection) through the command list. Quadratic curves
//! are elevated to cubics and arcs are split into cubic segments of at most
//! a quarter turn, so a single recursive subdivision routine flattens every
//! curve kind.

use std::f64::consts::PI;

use super::command::{CoordinateGroup, PathCommand, Point, SegmentKind};

/// Default maximum distance between a curve and its polyline
pub const DEFAULT_TOLERANCE: f64 = 0.25;

/// Subdivision depth cap; 2^16 segments per curve is far beyond any tolerance
const MAX_DEPTH: u32 = 16;

/// Converts path commands into polylines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approximator {
    tolerance: f64,
}

impl Default for Approximator {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Approximator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom flattening tolerance.
    ///
    /// Non-finite or non-positive values fall back to [`DEFAULT_TOLERANCE`].
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = if tolerance.is_finite() && tolerance > 0.0 {
            tolerance
        } else {
            DEFAULT_TOLERANCE
        };
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Approximate commands as one coordinate group per command
    pub fn approximate(&self, commands: &[PathCommand]) -> Vec<CoordinateGroup> {
        let mut state = PenState::default();
        commands
            .iter()
            .map(|command| self.step(&mut state, command))
            .collect()
    }

    fn step(&self, state: &mut PenState, command: &PathCommand) -> CoordinateGroup {
        let from = state.current;
        let resolve = |p: Point, relative: bool| if relative { p.offset_by(from) } else { p };

        let (points, cubic_ctrl, quad_ctrl) = match *command {
            PathCommand::MoveTo { to, relative } => {
                let to = resolve(to, relative);
                state.subpath_start = to;
                state.current = to;
                (vec![to], None, None)
            }
            PathCommand::LineTo { to, relative } => {
                let to = resolve(to, relative);
                (self.line(state, to), None, None)
            }
            PathCommand::HorizontalTo { x, relative } => {
                let x = if relative { from.x + x } else { x };
                (self.line(state, Point::new(x, from.y)), None, None)
            }
            PathCommand::VerticalTo { y, relative } => {
                let y = if relative { from.y + y } else { y };
                (self.line(state, Point::new(from.x, y)), None, None)
            }
            PathCommand::CubicTo {
                control1,
                control2,
                to,
                relative,
            } => {
                let c1 = resolve(control1, relative);
                let c2 = resolve(control2, relative);
                let to = resolve(to, relative);
                (self.cubic(state, c1, c2, to), Some(c2), None)
            }
            PathCommand::SmoothCubicTo {
                control2,
                to,
                relative,
            } => {
                let c1 = state
                    .last_cubic_control
                    .map(|c| c.reflect_about(from))
                    .unwrap_or(from);
                let c2 = resolve(control2, relative);
                let to = resolve(to, relative);
                (self.cubic(state, c1, c2, to), Some(c2), None)
            }
            PathCommand::QuadraticTo {
                control,
                to,
                relative,
            } => {
                let control = resolve(control, relative);
                let to = resolve(to, relative);
                (self.quadratic(state, control, to), None, Some(control))
            }
            PathCommand::SmoothQuadraticTo { to, relative } => {
                let control = state
                    .last_quad_control
                    .map(|c| c.reflect_about(from))
                    .unwrap_or(from);
                let to = resolve(to, relative);
                (self.quadratic(state, control, to), None, Some(control))
            }
            PathCommand::ArcTo {
                radii,
                x_axis_rotation,
                large_arc,
                sweep,
                to,
                relative,
            } => {
                let to = resolve(to, relative);
                let arc = Arc {
                    from,
                    to,
                    rx: radii.x,
                    ry: radii.y,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                };
                (self.arc(state, &arc), None, None)
            }
            PathCommand::ClosePath => {
                let start = state.subpath_start;
                (self.line(state, start), None, None)
            }
        };

        state.last_cubic_control = cubic_ctrl;
        state.last_quad_control = quad_ctrl;
        CoordinateGroup::new(command.kind(), points)
    }

    fn line(&self, state: &mut PenState, to: Point) -> Vec<Point> {
        let from = state.current;
        state.current = to;
        vec![from, to]
    }

    fn quadratic(&self, state: &mut PenState, control: Point, to: Point) -> Vec<Point> {
        let from = state.current;
        let (c1, c2) = quad_to_cubic(from, control, to);
        self.cubic(state, c1, c2, to)
    }

    fn cubic(&self, state: &mut PenState, c1: Point, c2: Point, to: Point) -> Vec<Point> {
        let from = state.current;
        let mut points = vec![from];
        flatten_cubic(from, c1, c2, to, self.tolerance, 0, &mut points);
        state.current = to;
        points
    }

    fn arc(&self, state: &mut PenState, arc: &Arc) -> Vec<Point> {
        let Some(curves) = arc.to_cubics() else {
            return self.line(state, arc.to);
        };
        let mut points = vec![arc.from];
        let mut start = arc.from;
        for [c1, c2, end] in curves {
            flatten_cubic(start, c1, c2, end, self.tolerance, 0, &mut points);
            start = end;
        }
        // Pin the final point to the exact endpoint instead of the trig result.
        if let Some(last) = points.last_mut() {
            *last = arc.to;
        }
        state.current = arc.to;
        points
    }
}

#[derive(Debug, Default)]
struct PenState {
    current: Point,
    subpath_start: Point,
    last_cubic_control: Option<Point>,
    last_quad_control: Option<Point>,
}

fn quad_to_cubic(from: Point, control: Point, to: Point) -> (Point, Point) {
    (
        from.lerp(control, 2.0 / 3.0),
        to.lerp(control, 2.0 / 3.0),
    )
}

/// Recursive de Casteljau subdivision; appends every point after `p0`.
fn flatten_cubic(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    tolerance: f64,
    depth: u32,
    out: &mut Vec<Point>,
) {
    if depth >= MAX_DEPTH || is_flat(p0, p1, p2, p3, tolerance) {
        out.push(p3);
        return;
    }

    let p01 = p0.lerp(p1, 0.5);
    let p12 = p1.lerp(p2, 0.5);
    let p23 = p2.lerp(p3, 0.5);
    let p012 = p01.lerp(p12, 0.5);
    let p123 = p12.lerp(p23, 0.5);
    let mid = p012.lerp(p123, 0.5);

    flatten_cubic(p0, p01, p012, mid, tolerance, depth + 1, out);
    flatten_cubic(mid, p123, p23, p3, tolerance, depth + 1, out);
}

fn is_flat(p0: Point, p1: Point, p2: Point, p3: Point, tolerance: f64) -> bool {
    let dx = p3.x - p0.x;
    let dy = p3.y - p0.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq <= f64::EPSILON {
        // Closed or zero-length chord: measure the control points from the start.
        let d1 = (p1.x - p0.x).hypot(p1.y - p0.y);
        let d2 = (p2.x - p0.x).hypot(p2.y - p0.y);
        return d1.max(d2) <= tolerance;
    }

    let d1 = ((p1.x - p0.x) * dy - (p1.y - p0.y) * dx).abs();
    let d2 = ((p2.x - p0.x) * dy - (p2.y - p0.y) * dx).abs();
    (d1 + d2) * (d1 + d2) <= tolerance * tolerance * len_sq
}

/// An elliptical arc in endpoint parameterization
struct Arc {
    from: Point,
    to: Point,
    rx: f64,
    ry: f64,
    x_axis_rotation: f64,
    large_arc: bool,
    sweep: bool,
}

impl Arc {
    /// Center-parameterize the arc and split it into cubic segments.
    ///
    /// Returns `None` for arcs that degenerate to a straight line.
    fn to_cubics(&self) -> Option<Vec<[Point; 3]>> {
        let mut rx = self.rx.abs();
        let mut ry = self.ry.abs();
        if rx == 0.0 || ry == 0.0 || self.from == self.to {
            return None;
        }

        let phi = self.x_axis_rotation.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();

        let dx2 = (self.from.x - self.to.x) / 2.0;
        let dy2 = (self.from.y - self.to.y) / 2.0;
        let x1p = cos_phi * dx2 + sin_phi * dy2;
        let y1p = -sin_phi * dx2 + cos_phi * dy2;

        // Scale up radii that cannot span the endpoints.
        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let s = lambda.sqrt();
            rx *= s;
            ry *= s;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
        let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
        let coef = if den == 0.0 {
            0.0
        } else {
            let sign = if self.large_arc == self.sweep { -1.0 } else { 1.0 };
            sign * (num / den).max(0.0).sqrt()
        };
        let cxp = coef * (rx * y1p / ry);
        let cyp = coef * (-ry * x1p / rx);

        let cx = cos_phi * cxp - sin_phi * cyp + (self.from.x + self.to.x) / 2.0;
        let cy = sin_phi * cxp + cos_phi * cyp + (self.from.y + self.to.y) / 2.0;

        let angle =
            |ux: f64, uy: f64, vx: f64, vy: f64| (ux * vy - uy * vx).atan2(ux * vx + uy * vy);

        let ux = (x1p - cxp) / rx;
        let uy = (y1p - cyp) / ry;
        let vx = (-x1p - cxp) / rx;
        let vy = (-y1p - cyp) / ry;

        let mut theta = angle(1.0, 0.0, ux, uy);
        let mut sweep_angle = angle(ux, uy, vx, vy);
        if !self.sweep && sweep_angle > 0.0 {
            sweep_angle -= 2.0 * PI;
        } else if self.sweep && sweep_angle < 0.0 {
            sweep_angle += 2.0 * PI;
        }

        let count = (sweep_angle.abs() / (PI / 2.0)).ceil().max(1.0) as usize;
        let delta = sweep_angle / count as f64;

        let map = |x: f64, y: f64| {
            let x = rx * x;
            let y = ry * y;
            Point::new(cx + cos_phi * x - sin_phi * y, cy + sin_phi * x + cos_phi * y)
        };

        let mut curves = Vec::with_capacity(count);
        for _ in 0..count {
            let t1 = theta;
            let t2 = theta + delta;
            let k = (4.0 / 3.0) * (delta / 4.0).tan();
            let (s1, c1) = t1.sin_cos();
            let (s2, c2) = t2.sin_cos();
            curves.push([
                map(c1 - k * s1, s1 + k * c1),
                map(c2 + k * s2, s2 - k * c2),
                map(c2, s2),
            ]);
            theta = t2;
        }
        Some(curves)
    }
}
