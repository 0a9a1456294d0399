use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::{DataInfo, Rect, Series, SeriesBinding};
use crate::error::{ChartError, ChartResult};

use super::line::SymbolSizer;
use super::{ChartType, LinePlotter, PlotPass, SeriesPlotter, data_limits};

/// Pixel size range bubbles are scaled into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubbleOptions {
    #[serde(default = "default_min_size")]
    pub min_size: f64,
    #[serde(default = "default_max_size")]
    pub max_size: f64,
}

impl Default for BubbleOptions {
    fn default() -> Self {
        Self {
            min_size: default_min_size(),
            max_size: default_max_size(),
        }
    }
}

impl BubbleOptions {
    pub fn validate(self) -> ChartResult<()> {
        if !self.min_size.is_finite() || !self.max_size.is_finite() || self.min_size < 0.0 {
            return Err(ChartError::InvalidData(
                "bubble sizes must be finite and >= 0".to_owned(),
            ));
        }
        if self.max_size < self.min_size {
            return Err(ChartError::InvalidData(
                "bubble max_size must be >= min_size".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_min_size() -> f64 {
    5.0
}

fn default_max_size() -> f64 {
    30.0
}

/// Maps size-binding values to pixel sizes.
///
/// Bubble area, not radius, is proportional to the value: the pixel size is
/// `min + (max - min) * sqrt((v - vmin) / (vmax - vmin))`, with the factor
/// fixed to 1 when every value is equal.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BubbleSizer {
    options: BubbleOptions,
    value_range: Option<(f64, f64)>,
}

impl BubbleSizer {
    fn size(&self, value: f64) -> f64 {
        let BubbleOptions { min_size, max_size } = self.options;
        let k = match self.value_range {
            Some((lo, hi)) if hi > lo => ((value - lo) / (hi - lo)).clamp(0.0, 1.0).sqrt(),
            _ => 1.0,
        };
        min_size + (max_size - min_size) * k
    }
}

impl SymbolSizer for BubbleSizer {
    fn enabled(&self, _series: &Series) -> bool {
        self.options.max_size > 0.0
    }

    fn size_for(&self, series: &Series, series_index: usize, point_index: usize) -> Option<f64> {
        let value = series
            .values(SeriesBinding::Size)
            .and_then(|sizes| sizes.get(point_index).copied())
            .filter(|value| value.is_finite());
        match value {
            Some(value) => Some(self.size(value)),
            None => {
                warn!(series_index, point_index, "bubble has no size value, skipping");
                None
            }
        }
    }
}

/// Scatter plotter whose symbol sizes follow the size binding.
#[derive(Debug, Clone)]
pub struct BubblePlotter {
    line: LinePlotter,
    sizer: BubbleSizer,
    log_x: bool,
    log_y: bool,
}

impl BubblePlotter {
    #[must_use]
    pub fn new(options: BubbleOptions) -> Self {
        Self {
            line: LinePlotter::new(ChartType::Bubble),
            sizer: BubbleSizer {
                options,
                value_range: None,
            },
            log_x: false,
            log_y: false,
        }
    }

    /// Logarithmic axes are not padded for bubble overflow.
    #[must_use]
    pub fn with_log_axes(mut self, log_x: bool, log_y: bool) -> Self {
        self.log_x = log_x;
        self.log_y = log_y;
        self
    }

    /// Registration radius of bubble hit areas before they are resized.
    #[must_use]
    pub fn with_symbol_size(mut self, size: f64) -> Self {
        self.line = self.line.with_symbol_size(size);
        self
    }

    #[must_use]
    pub fn options(&self) -> BubbleOptions {
        self.sizer.options
    }

    /// Size-binding range seen by the last `adjust_limits`.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.sizer.value_range
    }

    /// Pixel size for a size-binding value.
    #[must_use]
    pub fn bubble_size(&self, value: f64) -> f64 {
        self.sizer.size(value)
    }
}

impl SeriesPlotter for BubblePlotter {
    fn clear(&mut self) {
        self.line.clear();
    }

    fn adjust_limits(&mut self, data_info: &DataInfo, series: &[&Series], plot_rect: Rect) -> Rect {
        self.sizer.value_range = series
            .iter()
            .filter(|s| s.visibility.is_plotted())
            .filter_map(|s| s.values(SeriesBinding::Size))
            .flatten()
            .copied()
            .filter(|value| value.is_finite())
            .fold(None, |range, value| match range {
                Some((lo, hi)) => Some((f64::min(lo, value), f64::max(hi, value))),
                None => Some((value, value)),
            });

        let limits = data_limits(data_info);
        let max_size = self.sizer.options.max_size;
        let (mut left, mut width) = (limits.left, limits.width);
        let (mut top, mut height) = (limits.top, limits.height);

        let plot_w = plot_rect.width - max_size;
        if !self.log_x && plot_w > 0.0 {
            let pad = width / plot_w * 0.5 * max_size;
            left -= pad;
            width += 2.0 * pad;
        }
        let plot_h = plot_rect.height - max_size;
        if !self.log_y && plot_h > 0.0 {
            let pad = height / plot_h * 0.5 * max_size;
            top -= pad;
            height += 2.0 * pad;
        }

        trace!(value_range = ?self.sizer.value_range, "bubble limits adjusted");
        Rect::new(left, top, width, height)
    }

    fn plot_series(
        &mut self,
        pass: &mut PlotPass<'_>,
        series: &Series,
        series_index: usize,
        _series_count: usize,
    ) -> ChartResult<()> {
        self.line.plot_with(pass, series, series_index, &self.sizer)
    }
}
