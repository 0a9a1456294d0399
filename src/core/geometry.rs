use serde::{Deserialize, Serialize};

/// Pixel or data-space position.
///
/// Either coordinate may be NaN. Hit-testing treats a NaN coordinate as
/// "unset" and measures distance along the other axis only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point with only the x coordinate set.
    #[must_use]
    pub const fn x_only(x: f64) -> Self {
        Self { x, y: f64::NAN }
    }

    /// Point with only the y coordinate set.
    #[must_use]
    pub const fn y_only(y: f64) -> Self {
        Self { x: f64::NAN, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Which distance the point supports when probing hit areas.
    #[must_use]
    pub fn measurement(self) -> Measurement {
        match (self.x.is_nan(), self.y.is_nan()) {
            (false, true) => Measurement::X,
            (true, false) => Measurement::Y,
            _ => Measurement::Xy,
        }
    }
}

/// Distance metric selected by the probe point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Measurement {
    /// Euclidean distance.
    Xy,
    /// Horizontal distance only (probe y is unset).
    X,
    /// Vertical distance only (probe x is unset).
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned rectangle. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Builds a rectangle, clamping negative extents to zero.
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.left + 0.5 * self.width, self.top + 0.5 * self.height)
    }

    #[must_use]
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Inclusive on all four edges.
    #[must_use]
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Shrinks the rectangle by the given margins, never below zero size.
    #[must_use]
    pub fn inset(self, left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(
            self.left + left,
            self.top + top,
            self.width - left - right,
            self.height - top - bottom,
        )
    }
}

/// Shortest distance from `point` to the segment `a`-`b`.
#[must_use]
pub fn distance_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return point.distance_to(a);
    }

    let t = (((point.x - a.x) * dx + (point.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    point.distance_to(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Distance from `value` to the closed interval `[lo, hi]` (0 inside).
#[must_use]
pub fn distance_to_interval(value: f64, lo: f64, hi: f64) -> f64 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    (lo - value).max(value - hi).max(0.0)
}
