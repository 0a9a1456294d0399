//! Dataset-wide analysis shared by every plotter of one plot area.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::geometry::Rect;
use crate::core::series::Series;
use crate::core::types::DataType;

/// Running sums keyed by x data value.
///
/// Keys match by exact value after `OrderedFloat` normalisation: `0.1 + 0.2`
/// and `0.3` are different stacks.
pub type StackSums = BTreeMap<OrderedFloat<f64>, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stacking {
    #[default]
    None,
    Stacked,
    /// Stacked, with every stack normalised to a 0..1 fraction.
    Stacked100pc,
}

impl Stacking {
    #[must_use]
    pub fn is_stacked(self) -> bool {
        !matches!(self, Self::None)
    }

    #[must_use]
    pub fn is_normalized(self) -> bool {
        matches!(self, Self::Stacked100pc)
    }
}

/// Positive and negative running stacks. Values of opposite sign never
/// cancel each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackAccumulator {
    positive: StackSums,
    negative: StackSums,
}

impl StackAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.positive.clear();
        self.negative.clear();
    }

    /// Adds `value` to the stack at `x` and returns the new stack top.
    pub fn push(&mut self, x: f64, value: f64) -> f64 {
        let sums = if value >= 0.0 {
            &mut self.positive
        } else {
            &mut self.negative
        };
        let total = sums.entry(OrderedFloat(x)).or_insert(0.0);
        *total += value;
        *total
    }
}

/// Limits, shared x-vector and stack totals for a set of series.
#[derive(Debug, Clone, PartialEq)]
pub struct DataInfo {
    stacking: Stacking,
    limits: Option<Rect>,
    x_values: Vec<f64>,
    x_data_type: DataType,
    stacked_abs_sum: StackSums,
}

impl Default for DataInfo {
    fn default() -> Self {
        Self {
            stacking: Stacking::None,
            limits: None,
            x_values: Vec::new(),
            x_data_type: DataType::Number,
            stacked_abs_sum: StackSums::new(),
        }
    }
}

impl DataInfo {
    /// Scans the plotted series.
    ///
    /// Series that are not plotted are ignored. Series bound to a custom y
    /// axis are never stacked and only contribute to the x limits.
    #[must_use]
    pub fn analyze(series: &[&Series], stacking: Stacking) -> Self {
        let plotted: Vec<&Series> = series
            .iter()
            .copied()
            .filter(|s| s.visibility.is_plotted())
            .collect();
        let (x_values, x_data_type) = shared_x_values(&plotted);

        let mut info = Self {
            stacking,
            limits: None,
            x_values,
            x_data_type,
            stacked_abs_sum: StackSums::new(),
        };

        if stacking.is_normalized() {
            let mut abs_sum = StackSums::new();
            for s in plotted.iter().filter(|s| !s.custom_axis_y) {
                for (_, x, y) in info.valid_points(s) {
                    *abs_sum.entry(OrderedFloat(x)).or_insert(0.0) += y.abs();
                }
            }
            info.stacked_abs_sum = abs_sum;
        }

        let mut bounds = Bounds::default();
        let mut stack = StackAccumulator::new();
        for s in &plotted {
            let mut count = 0_usize;
            for (_, x, y) in info.valid_points(s) {
                count += 1;
                bounds.add_x(x);
                if s.custom_axis_y {
                    continue;
                }
                let y = if stacking.is_stacked() {
                    stack.push(x, info.normalize(x, y))
                } else {
                    y
                };
                bounds.add_y(y);
            }
            trace!(name = ?s.name, count, "analyzed series");
        }
        info.limits = bounds.rect();
        info
    }

    #[must_use]
    pub fn stacking(&self) -> Stacking {
        self.stacking
    }

    /// Data-space bounding rectangle (`left`/`top` are the x/y minimums),
    /// `None` when no series has a valid point.
    #[must_use]
    pub fn limits(&self) -> Option<Rect> {
        self.limits
    }

    /// X-vector borrowed by series without their own x-values.
    #[must_use]
    pub fn x_values(&self) -> &[f64] {
        &self.x_values
    }

    #[must_use]
    pub fn x_data_type(&self) -> DataType {
        self.x_data_type
    }

    #[must_use]
    pub fn stacked_abs_sum(&self, x: f64) -> Option<f64> {
        self.stacked_abs_sum.get(&OrderedFloat(x)).copied()
    }

    /// Scales `y` by the absolute stack total at `x` for 100% stacking;
    /// identity otherwise. A zero total yields 0.
    #[must_use]
    pub fn normalize(&self, x: f64, y: f64) -> f64 {
        if !self.stacking.is_normalized() {
            return y;
        }
        match self.stacked_abs_sum(x) {
            Some(sum) if sum != 0.0 => y / sum,
            _ => 0.0,
        }
    }

    /// X-values a series plots against.
    #[must_use]
    pub fn series_x_values<'s>(&'s self, series: &'s Series) -> &'s [f64] {
        match series.x_values.as_deref() {
            Some(xs) if series.x_data_type != DataType::String => xs,
            _ => &self.x_values,
        }
    }

    /// `(index, x, y)` for every index where both values are finite.
    pub fn valid_points<'s>(
        &'s self,
        series: &'s Series,
    ) -> impl Iterator<Item = (usize, f64, f64)> + 's {
        let ys = series.y_values.as_deref().unwrap_or_default();
        let xs = self.series_x_values(series);
        xs.iter()
            .zip(ys)
            .enumerate()
            .filter(|(_, (x, y))| x.is_finite() && y.is_finite())
            .map(|(i, (&x, &y))| (i, x, y))
    }

    /// Raw y range of one series, used for custom y axes.
    #[must_use]
    pub fn series_y_range(&self, series: &Series) -> Option<(f64, f64)> {
        let mut bounds = Bounds::default();
        for (_, x, y) in self.valid_points(series) {
            bounds.add_x(x);
            bounds.add_y(y);
        }
        bounds.rect().map(|r| (r.top, r.bottom()))
    }
}

/// First plotted series' x-values when they are numeric or dates, otherwise
/// the ordinals `0..longest`.
fn shared_x_values(series: &[&Series]) -> (Vec<f64>, DataType) {
    let source = series
        .iter()
        .find(|s| s.x_values.is_some() && s.x_data_type != DataType::String);
    if let Some(s) = source {
        if let Some(xs) = s.x_values.as_ref() {
            return (xs.clone(), s.x_data_type);
        }
    }

    let longest = series
        .iter()
        .map(|s| s.y_values.as_ref().map_or(0, Vec::len))
        .max()
        .unwrap_or(0);
    let data_type = if series.iter().any(|s| s.x_data_type == DataType::String) {
        DataType::String
    } else {
        DataType::Number
    };
    ((0..longest).map(|i| i as f64).collect(), data_type)
}

#[derive(Debug, Default)]
struct Bounds {
    x: Option<(f64, f64)>,
    y: Option<(f64, f64)>,
}

impl Bounds {
    fn add_x(&mut self, value: f64) {
        self.x = extend(self.x, value);
    }

    fn add_y(&mut self, value: f64) {
        self.y = extend(self.y, value);
    }

    fn rect(&self) -> Option<Rect> {
        let (x_min, x_max) = finite_span(self.x?);
        let (y_min, y_max) = finite_span(self.y.unwrap_or((0.0, 0.0)));
        Some(Rect::new(x_min, y_min, x_max - x_min, y_max - y_min))
    }
}

/// Largest magnitude a limit keeps when the data span overflows `f64`.
const HALF_MAX: f64 = f64::MAX / 2.0;

/// Overflowing stack totals are not limits.
fn extend(range: Option<(f64, f64)>, value: f64) -> Option<(f64, f64)> {
    if !value.is_finite() {
        return range;
    }
    match range {
        Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        None => Some((value, value)),
    }
}

fn finite_span((lo, hi): (f64, f64)) -> (f64, f64) {
    if (hi - lo).is_finite() {
        return (lo, hi);
    }
    warn!(lo, hi, "data range overflows, clamping limits");
    (lo.max(-HALF_MAX), hi.min(HALF_MAX))
}
