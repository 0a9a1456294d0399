use serde::{Deserialize, Serialize};

use crate::core::types::DataType;
use crate::render::Color;

/// Where a series shows up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeriesVisibility {
    #[default]
    Visible,
    /// Plotted, but without a legend entry.
    PlotOnly,
    /// Legend entry only.
    LegendOnly,
    Hidden,
}

impl SeriesVisibility {
    #[must_use]
    pub fn is_plotted(self) -> bool {
        matches!(self, Self::Visible | Self::PlotOnly)
    }

    #[must_use]
    pub fn in_legend(self) -> bool {
        matches!(self, Self::Visible | Self::LegendOnly)
    }
}

/// Value arrays a series can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesBinding {
    Y,
    X,
    /// Secondary value used for bubble sizing.
    Size,
    /// Per-point weight for volume-weighted x axes.
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SymbolMarker {
    #[default]
    Dot,
    Box,
}

/// Explicit series styling. Unset colors fall back to the chart palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    #[serde(default)]
    pub fill: Option<Color>,
    #[serde(default)]
    pub stroke: Option<Color>,
    /// Fill for negative values in two-tone scatter plots.
    #[serde(default)]
    pub alt_fill: Option<Color>,
    #[serde(default)]
    pub alt_stroke: Option<Color>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Overrides the chart-level symbol size.
    #[serde(default)]
    pub symbol_size: Option<f64>,
    #[serde(default)]
    pub symbol_marker: SymbolMarker,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            alt_fill: None,
            alt_stroke: None,
            stroke_width: default_stroke_width(),
            symbol_size: None,
            symbol_marker: SymbolMarker::Dot,
        }
    }
}

fn default_stroke_width() -> f64 {
    2.0
}

/// Raw values behind one plotted point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesItem {
    pub index: usize,
    pub x: Option<f64>,
    pub y: f64,
    pub size: Option<f64>,
}

/// One data series as consumed by plotters, legend and hit-testing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub y_values: Option<Vec<f64>>,
    #[serde(default)]
    pub x_values: Option<Vec<f64>>,
    #[serde(default)]
    pub x_data_type: DataType,
    #[serde(default)]
    pub size_values: Option<Vec<f64>>,
    #[serde(default)]
    pub volumes: Option<Vec<f64>>,
    /// Category labels, used for pie slices.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub visibility: SeriesVisibility,
    #[serde(default)]
    pub style: SeriesStyle,
    /// Bound to its own y axis; excluded from stacking.
    #[serde(default)]
    pub custom_axis_y: bool,
    /// Name of the plot area hosting the series; `None` uses the first one.
    #[serde(default)]
    pub plot_area: Option<String>,
    /// The host resolves hit-testing for this series itself.
    #[serde(default)]
    pub hit_test_overridden: bool,
}

impl Series {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_y_values(mut self, values: Vec<f64>) -> Self {
        self.y_values = Some(values);
        self
    }

    #[must_use]
    pub fn with_x_values(mut self, values: Vec<f64>) -> Self {
        self.x_values = Some(values);
        self
    }

    #[must_use]
    pub fn with_x_data_type(mut self, data_type: DataType) -> Self {
        self.x_data_type = data_type;
        self
    }

    #[must_use]
    pub fn with_size_values(mut self, values: Vec<f64>) -> Self {
        self.size_values = Some(values);
        self
    }

    #[must_use]
    pub fn with_volumes(mut self, values: Vec<f64>) -> Self {
        self.volumes = Some(values);
        self
    }

    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: SeriesVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: SeriesStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_plot_area(mut self, name: impl Into<String>) -> Self {
        self.plot_area = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_custom_axis_y(mut self, custom: bool) -> Self {
        self.custom_axis_y = custom;
        self
    }

    #[must_use]
    pub fn values(&self, binding: SeriesBinding) -> Option<&[f64]> {
        match binding {
            SeriesBinding::Y => self.y_values.as_deref(),
            SeriesBinding::X => self.x_values.as_deref(),
            SeriesBinding::Size => self.size_values.as_deref(),
            SeriesBinding::Volume => self.volumes.as_deref(),
        }
    }

    #[must_use]
    pub fn data_type(&self, binding: SeriesBinding) -> DataType {
        match binding {
            SeriesBinding::X => self.x_data_type,
            _ => DataType::Number,
        }
    }

    #[must_use]
    pub fn item(&self, index: usize) -> Option<SeriesItem> {
        let y = *self.y_values.as_ref()?.get(index)?;
        Some(SeriesItem {
            index,
            x: self.x_values.as_ref().and_then(|xs| xs.get(index).copied()),
            y,
            size: self
                .size_values
                .as_ref()
                .and_then(|sizes| sizes.get(index).copied()),
        })
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}
