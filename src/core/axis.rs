use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::core::geometry::Rect;
use crate::core::primitives::unix_seconds_to_datetime;
use crate::core::volume::VolumeHelper;
use crate::error::{ChartError, ChartResult};

/// Data-to-pixel mapping consumed by plotters and hit-test reporting.
pub trait AxisScale {
    /// Maps a data value to a pixel coordinate. Unmappable values yield NaN.
    fn convert(&self, value: f64) -> f64;

    /// Maps a pixel coordinate back to a data value.
    fn convert_back(&self, pixel: f64) -> f64;

    /// Logarithm base, `None` for linear axes.
    fn log_base(&self) -> Option<f64>;

    fn format_value(&self, value: f64) -> String;
}

/// How axis values are rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisFormat {
    /// Fixed decimals, or the shortest representation when `None`.
    Number { decimals: Option<usize> },
    /// `chrono` strftime pattern applied to Unix-second values.
    Date { pattern: String },
}

impl Default for AxisFormat {
    fn default() -> Self {
        Self::Number { decimals: None }
    }
}

/// Per-axis chart configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisOptions {
    #[serde(default)]
    pub log_base: Option<f64>,
    #[serde(default)]
    pub format: AxisFormat,
    /// Space categories by the series' volume values (x axis only).
    #[serde(default)]
    pub volume_weighted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearAxis {
    data_min: f64,
    data_max: f64,
    pixel_start: f64,
    pixel_end: f64,
    log_base: Option<f64>,
    format: AxisFormat,
    volume: Option<VolumeHelper>,
}

impl LinearAxis {
    pub fn new(data_min: f64, data_max: f64, pixel_start: f64, pixel_end: f64) -> ChartResult<Self> {
        if !data_min.is_finite() || !data_max.is_finite() {
            return Err(ChartError::InvalidData(
                "axis data range must be finite".to_owned(),
            ));
        }
        if !pixel_start.is_finite() || !pixel_end.is_finite() {
            return Err(ChartError::InvalidData(
                "axis pixel range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            data_min: data_min.min(data_max),
            data_max: data_min.max(data_max),
            pixel_start,
            pixel_end,
            log_base: None,
            format: AxisFormat::default(),
            volume: None,
        })
    }

    /// Horizontal axis spanning `rect` left to right.
    pub fn horizontal(data_min: f64, data_max: f64, rect: Rect) -> ChartResult<Self> {
        Self::new(data_min, data_max, rect.left, rect.right())
    }

    /// Vertical axis spanning `rect` bottom to top.
    pub fn vertical(data_min: f64, data_max: f64, rect: Rect) -> ChartResult<Self> {
        Self::new(data_min, data_max, rect.bottom(), rect.top)
    }

    pub fn with_log_base(mut self, base: Option<f64>) -> ChartResult<Self> {
        if let Some(base) = base {
            if !base.is_finite() || base <= 0.0 || base == 1.0 {
                return Err(ChartError::InvalidData(
                    "axis log base must be finite, > 0 and != 1".to_owned(),
                ));
            }
        }
        self.log_base = base;
        Ok(self)
    }

    #[must_use]
    pub fn with_format(mut self, format: AxisFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_volume_helper(mut self, helper: VolumeHelper) -> Self {
        self.volume = Some(helper);
        self
    }

    /// Applies axis options except volume weighting, which needs series data.
    pub fn with_options(self, options: &AxisOptions) -> ChartResult<Self> {
        Ok(self
            .with_log_base(options.log_base)?
            .with_format(options.format.clone()))
    }

    #[must_use]
    pub fn data_range(&self) -> (f64, f64) {
        (self.data_min, self.data_max)
    }

    #[must_use]
    pub fn pixel_range(&self) -> (f64, f64) {
        (self.pixel_start, self.pixel_end)
    }

    #[must_use]
    pub fn volume_helper(&self) -> Option<&VolumeHelper> {
        self.volume.as_ref()
    }

    fn to_linear(&self, value: f64) -> f64 {
        match self.log_base {
            Some(base) if value > 0.0 => value.ln() / base.ln(),
            Some(_) => f64::NAN,
            None => value,
        }
    }

    fn from_linear(&self, value: f64) -> f64 {
        match self.log_base {
            Some(base) => base.powf(value),
            None => value,
        }
    }

    /// Linear-space bounds. A log axis with a non-positive minimum spans one
    /// unit of log space below its maximum.
    fn linear_bounds(&self) -> (f64, f64) {
        let lo = self.to_linear(self.data_min);
        let hi = self.to_linear(self.data_max);
        match (lo.is_finite(), hi.is_finite()) {
            (true, true) => (lo, hi),
            (false, true) => (hi - 1.0, hi),
            _ => (0.0, 1.0),
        }
    }
}

impl AxisScale for LinearAxis {
    fn convert(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return f64::NAN;
        }
        let pixel_span = self.pixel_end - self.pixel_start;

        if let Some(helper) = &self.volume {
            return helper
                .convert(value, self.data_min, self.data_max)
                .map_or(f64::NAN, |fraction| self.pixel_start + fraction * pixel_span);
        }

        let value = self.to_linear(value);
        if !value.is_finite() {
            return f64::NAN;
        }
        let (lo, hi) = self.linear_bounds();
        if hi == lo {
            return self.pixel_start + 0.5 * pixel_span;
        }
        // Halved operands keep spans near `f64::MAX` finite.
        let fraction = (0.5 * value - 0.5 * lo) / (0.5 * hi - 0.5 * lo);
        self.pixel_start + fraction * pixel_span
    }

    fn convert_back(&self, pixel: f64) -> f64 {
        let pixel_span = self.pixel_end - self.pixel_start;
        if !pixel.is_finite() || pixel_span == 0.0 {
            return f64::NAN;
        }
        let fraction = (pixel - self.pixel_start) / pixel_span;

        if let Some(helper) = &self.volume {
            return helper
                .convert_back(fraction, self.data_min, self.data_max)
                .unwrap_or(f64::NAN);
        }

        let (lo, hi) = self.linear_bounds();
        self.from_linear(2.0 * (0.5 * lo + fraction * (0.5 * hi - 0.5 * lo)))
    }

    fn log_base(&self) -> Option<f64> {
        self.log_base
    }

    fn format_value(&self, value: f64) -> String {
        if !value.is_finite() {
            return String::new();
        }
        match &self.format {
            AxisFormat::Number {
                decimals: Some(decimals),
            } => format!("{value:.decimals$}"),
            AxisFormat::Number { decimals: None } => format!("{value}"),
            AxisFormat::Date { pattern } => {
                let Some(time) = unix_seconds_to_datetime(value) else {
                    return format!("{value}");
                };
                // Invalid patterns surface as fmt errors rather than panics.
                let mut text = String::new();
                match write!(text, "{}", time.format(pattern)) {
                    Ok(()) => text,
                    Err(_) => format!("{value}"),
                }
            }
        }
    }
}
