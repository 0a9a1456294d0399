pub mod axis;
pub mod data_info;
pub mod geometry;
pub mod primitives;
pub mod series;
pub mod spline;
pub mod types;
pub mod volume;

pub use axis::{AxisFormat, AxisOptions, AxisScale, LinearAxis};
pub use data_info::{DataInfo, Stacking};
pub use geometry::{Measurement, Point, Rect, Size};
pub use series::{Series, SeriesBinding, SeriesItem, SeriesStyle, SeriesVisibility, SymbolMarker};
pub use spline::{Spline, SplinePoints};
pub use types::{DataPoint, DataType};
pub use volume::{VolumeEntry, VolumeHelper};
