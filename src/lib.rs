//! flexchart: rendering and interaction core for 2-D charts.
//!
//! The crate turns series data into draw calls on a pluggable
//! [`render::RenderEngine`] and keeps the hit areas of every redraw so hosts
//! can ask what lies under the pointer. Line, scatter, spline, symbol and
//! bubble plots share one plotter; pie charts are drawn by the orchestrator.
//!
//! ```
//! use flexchart::core::{Point, Series, Size};
//! use flexchart::render::RecordingEngine;
//! use flexchart::{ChartConfig, ChartCore, ChartType};
//!
//! let mut chart = ChartCore::new(ChartConfig::new(ChartType::LineSymbols))?;
//! chart.push_series(Series::new("sales").with_y_values(vec![1.0, 3.0, 2.0]));
//!
//! let mut engine = RecordingEngine::new();
//! chart.render(&mut engine, Size::new(400.0, 300.0))?;
//! let info = chart.hit_test(Point::new(-10.0, -10.0));
//! assert!(info.series_index.is_some());
//! # Ok::<(), flexchart::ChartError>(())
//! ```

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod plotter;
pub mod render;
pub mod telemetry;

pub use api::{ChartConfig, ChartCore, ChartElement, ChartKind, ChartType, HitTestInfo};
pub use error::{ChartError, ChartResult};
