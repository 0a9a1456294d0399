use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Grid layout was asked for a non-positive number of rows or columns.
    #[error("invalid plot area grid: rows={rows}, columns={columns}")]
    InvalidLayout { rows: usize, columns: usize },

    #[error("render backend failure: {0}")]
    Backend(String),
}
