//! Host-facing surface: configuration and the chart orchestrator.

mod chart;
mod config;

pub use chart::{ChartCore, ChartElement, HitTestInfo, PieSlice};
pub use config::{ChartConfig, ChartKind, Margins, PieOptions};

pub use crate::core::{AxisFormat, AxisOptions, Stacking};
pub use crate::layout::{LegendOptions, LegendPosition, PlotArea, PlotAreaCollection};
pub use crate::plotter::{BubbleOptions, ChartType};
