//! Series plotters: data values to pixel geometry plus hit areas.

mod bubble;
mod line;

pub use bubble::{BubbleOptions, BubblePlotter};
pub use line::LinePlotter;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{AxisScale, DataInfo, Point, Rect, Series};
use crate::error::ChartResult;
use crate::interaction::HitTestArena;
use crate::render::{Color, RenderEngine};

pub use crate::core::Stacking;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartType {
    #[default]
    Line,
    /// Symbols only.
    Scatter,
    Spline,
    LineSymbols,
    SplineSymbols,
    Bubble,
}

impl ChartType {
    #[must_use]
    pub fn has_line(self) -> bool {
        matches!(
            self,
            Self::Line | Self::Spline | Self::LineSymbols | Self::SplineSymbols
        )
    }

    #[must_use]
    pub fn is_spline(self) -> bool {
        matches!(self, Self::Spline | Self::SplineSymbols)
    }

    #[must_use]
    pub fn has_symbols(self) -> bool {
        matches!(
            self,
            Self::Scatter | Self::LineSymbols | Self::SplineSymbols | Self::Bubble
        )
    }
}

/// Symbol render-order index to point index, per series.
pub type ElementMap = IndexMap<usize, Vec<usize>>;

/// What a custom item hook receives for each symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemContext {
    pub series_index: usize,
    pub point_index: usize,
    pub center: Point,
    pub size: f64,
    pub data_x: f64,
    pub data_y: f64,
}

/// Replaces the default symbol drawing. The engine style is already set to
/// the symbol's fill and stroke.
pub type ItemFormatter = dyn Fn(&mut dyn RenderEngine, &ItemContext) -> ChartResult<()>;

/// Everything one plot pass shares between series.
pub struct PlotPass<'p> {
    pub engine: &'p mut dyn RenderEngine,
    pub axis_x: &'p dyn AxisScale,
    pub axis_y: &'p dyn AxisScale,
    pub arena: &'p mut HitTestArena,
    pub palette: &'p [Color],
    pub data_info: &'p DataInfo,
    /// X data runs vertically, y data horizontally.
    pub rotated: bool,
    pub clip_path: Option<&'p str>,
    pub elements: &'p mut ElementMap,
    pub item_formatter: Option<&'p ItemFormatter>,
}

impl PlotPass<'_> {
    /// Pixel position of a data point, honouring rotation. Coordinates that
    /// cannot be mapped come back as NaN.
    #[must_use]
    pub fn to_pixel(&self, x: f64, y: f64) -> Point {
        if self.rotated {
            Point::new(self.axis_y.convert(y), self.axis_x.convert(x))
        } else {
            Point::new(self.axis_x.convert(x), self.axis_y.convert(y))
        }
    }

    #[must_use]
    pub fn palette_color(&self, series_index: usize) -> Color {
        if self.palette.is_empty() {
            return Color::BLACK;
        }
        self.palette[series_index % self.palette.len()]
    }
}

/// Per-chart-type drawing algorithm.
pub trait SeriesPlotter {
    /// Resets per-pass accumulators. Called once before the first series.
    fn clear(&mut self);

    /// Data-space rectangle the axes must cover.
    fn adjust_limits(&mut self, data_info: &DataInfo, series: &[&Series], plot_rect: Rect) -> Rect;

    /// Draws one series and registers its hit areas.
    fn plot_series(
        &mut self,
        pass: &mut PlotPass<'_>,
        series: &Series,
        series_index: usize,
        series_count: usize,
    ) -> ChartResult<()>;
}

/// Data limits with a unit fallback for empty datasets.
pub(crate) fn data_limits(data_info: &DataInfo) -> Rect {
    data_info
        .limits()
        .unwrap_or_else(|| Rect::new(0.0, 0.0, 1.0, 1.0))
}
