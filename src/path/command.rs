//! Typed path commands produced by the parser

/// Axis along which an extent is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A 2D point in user space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset this point by another, used to resolve relative operands
    pub fn offset_by(self, origin: Point) -> Point {
        Point::new(self.x + origin.x, self.y + origin.y)
    }

    /// Reflect `self` through `center`
    pub fn reflect_about(self, center: Point) -> Point {
        Point::new(2.0 * center.x - self.x, 2.0 * center.y - self.y)
    }

    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// One command of the SVG path mini-language.
///
/// Operands are kept exactly as written: relative commands are resolved
/// against the running current point only during approximation.
#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    MoveTo {
        to: Point,
        relative: bool,
    },
    LineTo {
        to: Point,
        relative: bool,
    },
    HorizontalTo {
        x: f64,
        relative: bool,
    },
    VerticalTo {
        y: f64,
        relative: bool,
    },
    CubicTo {
        control1: Point,
        control2: Point,
        to: Point,
        relative: bool,
    },
    SmoothCubicTo {
        control2: Point,
        to: Point,
        relative: bool,
    },
    QuadraticTo {
        control: Point,
        to: Point,
        relative: bool,
    },
    SmoothQuadraticTo {
        to: Point,
        relative: bool,
    },
    ArcTo {
        radii: Point,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
        relative: bool,
    },
    ClosePath,
}

impl PathCommand {
    pub fn kind(&self) -> SegmentKind {
        match self {
            PathCommand::MoveTo { .. } => SegmentKind::Move,
            PathCommand::LineTo { .. }
            | PathCommand::HorizontalTo { .. }
            | PathCommand::VerticalTo { .. } => SegmentKind::Line,
            PathCommand::CubicTo { .. } | PathCommand::SmoothCubicTo { .. } => SegmentKind::Cubic,
            PathCommand::QuadraticTo { .. } | PathCommand::SmoothQuadraticTo { .. } => {
                SegmentKind::Quadratic
            }
            PathCommand::ArcTo { .. } => SegmentKind::Arc,
            PathCommand::ClosePath => SegmentKind::Close,
        }
    }

    pub fn is_relative(&self) -> bool {
        match self {
            PathCommand::MoveTo { relative, .. }
            | PathCommand::LineTo { relative, .. }
            | PathCommand::HorizontalTo { relative, .. }
            | PathCommand::VerticalTo { relative, .. }
            | PathCommand::CubicTo { relative, .. }
            | PathCommand::SmoothCubicTo { relative, .. }
            | PathCommand::QuadraticTo { relative, .. }
            | PathCommand::SmoothQuadraticTo { relative, .. }
            | PathCommand::ArcTo { relative, .. } => *relative,
            PathCommand::ClosePath => false,
        }
    }
}

/// Names the kind of command a coordinate group was produced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Move,
    Line,
    Cubic,
    Quadratic,
    Arc,
    Close,
}

/// Polyline points standing in for one command's contribution
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateGroup {
    pub kind: SegmentKind,
    pub points: Vec<Point>,
}

impl CoordinateGroup {
    pub fn new(kind: SegmentKind, points: Vec<Point>) -> Self {
        Self { kind, points }
    }

    /// Largest coordinate along `axis` in this group
    pub fn max_along(&self, axis: Axis) -> Option<f64> {
        self.points
            .iter()
            .map(|p| match axis {
                Axis::Horizontal => p.x,
                Axis::Vertical => p.y,
            })
            .reduce(f64::max)
    }
}
