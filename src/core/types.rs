use serde::{Deserialize, Serialize};

/// Value type carried by one series axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataType {
    #[default]
    Number,
    /// Unix seconds.
    Date,
    /// Category labels; plotted by ordinal.
    String,
}

/// Logical source of a plotted geometry.
///
/// Hit areas carry this as an index pair back into the series collection,
/// never as a reference to the series itself. `point_index` is `None` for
/// areas that belong to the whole series (for example a polyline).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub series_index: usize,
    pub point_index: Option<usize>,
    pub data_x: f64,
    pub data_y: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(series_index: usize, point_index: usize, data_x: f64, data_y: f64) -> Self {
        Self {
            series_index,
            point_index: Some(point_index),
            data_x,
            data_y,
        }
    }

    /// Tag for an area known only by its series.
    #[must_use]
    pub fn series_only(series_index: usize) -> Self {
        Self {
            series_index,
            point_index: None,
            data_x: f64::NAN,
            data_y: f64::NAN,
        }
    }
}
