//! Catmull-Rom smoothing for spline series.
//!
//! The curve passes through every input sample. Sampling is decimated so the
//! emitted polyline never contains two consecutive points closer than
//! [`MIN_PIXEL_STEP`] on both axes.

use crate::core::geometry::Point;

/// Fraction of the point count used as the parameter step.
const STEP_FACTOR: f64 = 0.002;

/// Minimum axis displacement between two emitted samples, in pixels.
pub const MIN_PIXEL_STEP: f64 = 3.0;

// Rows produce the t^3, t^2, t^1 and t^0 coefficients from
// (p[i-1], p[i], p[i+1], p[i+2]).
const BASIS: [[f64; 4]; 4] = [
    [-0.5, 1.5, -1.5, 0.5],
    [1.0, -2.5, 2.0, -0.5],
    [-0.5, 0.0, 0.5, 0.0],
    [0.0, 1.0, 0.0, 0.0],
];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cubic {
    a: Point,
    b: Point,
    c: Point,
    d: Point,
}

impl Cubic {
    fn from_controls(controls: [Point; 4]) -> Self {
        let row = |r: [f64; 4]| {
            Point::new(
                r[0] * controls[0].x + r[1] * controls[1].x + r[2] * controls[2].x + r[3] * controls[3].x,
                r[0] * controls[0].y + r[1] * controls[1].y + r[2] * controls[2].y + r[3] * controls[3].y,
            )
        };
        Self {
            a: row(BASIS[0]),
            b: row(BASIS[1]),
            c: row(BASIS[2]),
            d: row(BASIS[3]),
        }
    }

    fn eval(&self, t: f64) -> Point {
        Point::new(
            ((self.a.x * t + self.b.x) * t + self.c.x) * t + self.d.x,
            ((self.a.y * t + self.b.y) * t + self.c.y) * t + self.d.y,
        )
    }
}

/// Piecewise cubic through pixel-space samples.
#[derive(Debug, Clone)]
pub struct Spline<'a> {
    xs: &'a [f64],
    ys: &'a [f64],
    len: usize,
    segments: Vec<Cubic>,
}

impl<'a> Spline<'a> {
    /// Builds the curve from parallel coordinate slices. Extra trailing
    /// values in the longer slice are ignored.
    #[must_use]
    pub fn new(xs: &'a [f64], ys: &'a [f64]) -> Self {
        let len = xs.len().min(ys.len());
        let mut segments = Vec::new();
        if len >= 4 {
            segments.reserve(len - 1);
            let at = |i: usize| Point::new(xs[i], ys[i]);
            for i in 0..len - 1 {
                let before = if i == 0 { at(i) } else { at(i - 1) };
                let after = if i == len - 2 { at(i + 1) } else { at(i + 2) };
                segments.push(Cubic::from_controls([before, at(i), at(i + 1), after]));
            }
        }

        Self {
            xs,
            ys,
            len,
            segments,
        }
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.len
    }

    /// Evaluates the curve at `param` in `[0, point_count - 1]`.
    ///
    /// The segment index is clamped so float error at the ends never reads
    /// past the coefficient table. Returns `None` for curves with fewer than
    /// four points.
    #[must_use]
    pub fn point_at(&self, param: f64) -> Option<Point> {
        if self.segments.is_empty() {
            return None;
        }
        let last = self.segments.len() - 1;
        let index = if param <= 0.0 {
            0
        } else {
            (param.floor() as usize).min(last)
        };
        Some(self.segments[index].eval(param - index as f64))
    }

    /// Returns the smoothed samples. Calling it again restarts the sequence.
    #[must_use]
    pub fn calculate(&self) -> SplinePoints<'_, 'a> {
        let step = self.len as f64 * STEP_FACTOR;
        SplinePoints {
            spline: self,
            next: 0,
            step,
            last: None,
        }
    }
}

/// Lazy iterator over spline samples.
#[derive(Debug, Clone)]
pub struct SplinePoints<'s, 'a> {
    spline: &'s Spline<'a>,
    next: usize,
    step: f64,
    last: Option<Point>,
}

impl SplinePoints<'_, '_> {
    /// Drains the sequence into parallel coordinate vectors.
    #[must_use]
    pub fn into_xy(self) -> (Vec<f64>, Vec<f64>) {
        let (mut xs, mut ys) = (Vec::new(), Vec::new());
        for point in self {
            xs.push(point.x);
            ys.push(point.y);
        }
        (xs, ys)
    }
}

impl Iterator for SplinePoints<'_, '_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let spline = self.spline;
        if spline.segments.is_empty() {
            // Too few samples to smooth: pass the input through.
            if self.next >= spline.len {
                return None;
            }
            let point = Point::new(spline.xs[self.next], spline.ys[self.next]);
            self.next += 1;
            return Some(point);
        }

        let end = (spline.len - 1) as f64;
        loop {
            let param = self.next as f64 * self.step;
            if param > end {
                return None;
            }
            self.next += 1;

            let point = spline.point_at(param)?;
            let emit = match self.last {
                None => true,
                Some(last) => {
                    (point.x - last.x).abs() >= MIN_PIXEL_STEP
                        || (point.y - last.y).abs() >= MIN_PIXEL_STEP
                }
            };
            if emit {
                self.last = Some(point);
                return Some(point);
            }
        }
    }
}
