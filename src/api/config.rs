use serde::{Deserialize, Serialize};

use crate::core::{AxisOptions, Stacking};
use crate::error::{ChartError, ChartResult};
use crate::layout::LegendOptions;
use crate::plotter::{BubbleOptions, ChartType};
use crate::render::{Color, default_palette};

/// Series-based charts plot every series on axes; pie charts draw the first
/// plotted series as slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    Series,
    Pie,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margins {
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(10.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieOptions {
    /// Hole radius as a fraction of the pie radius; 0 draws a full pie.
    #[serde(default)]
    pub inner_radius: f64,
    /// Angle of the first slice edge in degrees, clockwise from 3 o'clock.
    #[serde(default = "default_start_angle")]
    pub start_angle: f64,
}

impl Default for PieOptions {
    fn default() -> Self {
        Self {
            inner_radius: 0.0,
            start_angle: default_start_angle(),
        }
    }
}

fn default_start_angle() -> f64 {
    -90.0
}

/// Chart configuration.
///
/// Serializable so hosts can persist chart setup as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default)]
    pub kind: ChartKind,
    #[serde(default)]
    pub chart_type: ChartType,
    #[serde(default)]
    pub stacking: Stacking,
    /// Swap the x and y directions.
    #[serde(default)]
    pub rotated: bool,
    #[serde(default)]
    pub interpolate_nulls: bool,
    #[serde(default = "default_symbol_size")]
    pub symbol_size: f64,
    #[serde(default)]
    pub bubble: BubbleOptions,
    #[serde(default)]
    pub pie: PieOptions,
    #[serde(default)]
    pub legend: LegendOptions,
    #[serde(default)]
    pub plot_margin: Margins,
    #[serde(default)]
    pub axis_x: AxisOptions,
    #[serde(default)]
    pub axis_y: AxisOptions,
    #[serde(default = "default_palette")]
    pub palette: Vec<Color>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            kind: ChartKind::default(),
            chart_type: ChartType::default(),
            stacking: Stacking::default(),
            rotated: false,
            interpolate_nulls: false,
            symbol_size: default_symbol_size(),
            bubble: BubbleOptions::default(),
            pie: PieOptions::default(),
            legend: LegendOptions::default(),
            plot_margin: Margins::default(),
            axis_x: AxisOptions::default(),
            axis_y: AxisOptions::default(),
            palette: default_palette(),
        }
    }
}

fn default_symbol_size() -> f64 {
    10.0
}

impl ChartConfig {
    #[must_use]
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ChartKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_stacking(mut self, stacking: Stacking) -> Self {
        self.stacking = stacking;
        self
    }

    #[must_use]
    pub fn with_rotated(mut self, rotated: bool) -> Self {
        self.rotated = rotated;
        self
    }

    #[must_use]
    pub fn with_interpolate_nulls(mut self, interpolate: bool) -> Self {
        self.interpolate_nulls = interpolate;
        self
    }

    #[must_use]
    pub fn with_symbol_size(mut self, size: f64) -> Self {
        self.symbol_size = size;
        self
    }

    #[must_use]
    pub fn with_bubble(mut self, bubble: BubbleOptions) -> Self {
        self.bubble = bubble;
        self
    }

    #[must_use]
    pub fn with_pie(mut self, pie: PieOptions) -> Self {
        self.pie = pie;
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: LegendOptions) -> Self {
        self.legend = legend;
        self
    }

    #[must_use]
    pub fn with_plot_margin(mut self, margin: Margins) -> Self {
        self.plot_margin = margin;
        self
    }

    #[must_use]
    pub fn with_axis_x(mut self, axis: AxisOptions) -> Self {
        self.axis_x = axis;
        self
    }

    #[must_use]
    pub fn with_axis_y(mut self, axis: AxisOptions) -> Self {
        self.axis_y = axis;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = palette;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        ensure_non_negative("symbol_size", self.symbol_size)?;
        ensure_non_negative("legend.item_gap", self.legend.item_gap)?;
        ensure_non_negative("legend.marker_size", self.legend.marker_size)?;
        let Margins {
            left,
            top,
            right,
            bottom,
        } = self.plot_margin;
        for (name, value) in [
            ("plot_margin.left", left),
            ("plot_margin.top", top),
            ("plot_margin.right", right),
            ("plot_margin.bottom", bottom),
        ] {
            ensure_non_negative(name, value)?;
        }
        self.bubble.validate()?;
        if !(0.0..1.0).contains(&self.pie.inner_radius) {
            return Err(ChartError::InvalidData(
                "pie.inner_radius must be in [0, 1)".to_owned(),
            ));
        }
        if !self.pie.start_angle.is_finite() {
            return Err(ChartError::InvalidData(
                "pie.start_angle must be finite".to_owned(),
            ));
        }
        for axis in [&self.axis_x, &self.axis_y] {
            if let Some(base) = axis.log_base {
                if !base.is_finite() || base <= 0.0 || base == 1.0 {
                    return Err(ChartError::InvalidData(
                        "axis log base must be finite, > 0 and != 1".to_owned(),
                    ));
                }
            }
        }
        for color in &self.palette {
            color.validate()?;
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize chart config: {e}"))
        })
    }

    /// Parses and validates a configuration.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse chart config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }
}

fn ensure_non_negative(name: &str, value: f64) -> ChartResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!(
            "{name} must be finite and >= 0"
        )))
    }
}
