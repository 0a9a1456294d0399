//! Grid layout of plot areas.
//!
//! Areas sit in rows and columns. Column widths come from the area in row 0
//! of that column and row heights from the area in column 0 of that row;
//! sizes set on other areas are ignored.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Point, Rect};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, ElementAttrs, RenderEngine};

/// Width or height specification of a plot area: a pixel number, or text
/// such as `"120"`, `"2*"` or `"*"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlotLength {
    Number(f64),
    Text(String),
}

impl From<f64> for PlotLength {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for PlotLength {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Parsed track length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridLength {
    /// One implicit star unit.
    Auto,
    Pixel(f64),
    Star(f64),
}

impl GridLength {
    #[must_use]
    pub fn parse(spec: Option<&PlotLength>) -> Self {
        match spec {
            Some(PlotLength::Number(value)) if value.is_finite() => Self::Pixel(*value),
            Some(PlotLength::Text(text)) => Self::parse_str(text),
            _ => Self::Auto,
        }
    }

    fn parse_str(text: &str) -> Self {
        let text = text.trim();
        if let Some(weight) = text.strip_suffix('*') {
            let weight = weight.trim();
            if weight.is_empty() {
                return Self::Star(1.0);
            }
            return match weight.parse::<f64>() {
                Ok(value) if value.is_finite() => Self::Star(value.max(0.0)),
                _ => Self::Auto,
            };
        }
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Self::Pixel(value),
            _ => Self::Auto,
        }
    }
}

/// Splits `total` pixels among tracks.
///
/// Pixel tracks keep their value, star tracks share what is left in
/// proportion to their weight and every auto track counts as one star.
/// Negative results are clamped to zero.
pub fn distribute_lengths(total: f64, lengths: &[GridLength]) -> ChartResult<Vec<f64>> {
    if lengths.is_empty() {
        return Err(ChartError::InvalidLayout {
            rows: 0,
            columns: 0,
        });
    }

    let mut fixed = 0.0;
    let mut stars = 0.0;
    for length in lengths {
        match *length {
            GridLength::Pixel(value) => fixed += value,
            GridLength::Star(weight) => stars += weight,
            GridLength::Auto => stars += 1.0,
        }
    }
    let unit = if stars > 0.0 {
        (total - fixed) / stars
    } else {
        0.0
    };

    Ok(lengths
        .iter()
        .map(|length| {
            let size = match *length {
                GridLength::Pixel(value) => value,
                GridLength::Star(weight) => weight * unit,
                GridLength::Auto => unit,
            };
            size.max(0.0)
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotArea {
    #[serde(default)]
    pub row: usize,
    #[serde(default)]
    pub column: usize,
    #[serde(default)]
    pub width: Option<PlotLength>,
    #[serde(default)]
    pub height: Option<PlotLength>,
    #[serde(default)]
    pub name: Option<String>,
    /// Background fill; `None` leaves the area transparent.
    #[serde(default)]
    pub fill: Option<Color>,
}

impl PlotArea {
    #[must_use]
    pub fn new(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: impl Into<PlotLength>) -> Self {
        self.width = Some(width.into());
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: impl Into<PlotLength>) -> Self {
        self.height = Some(height.into());
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }
}

/// Clip rect id registered for the plot area at `index`.
#[must_use]
pub fn plot_area_clip_id(index: usize) -> String {
    format!("plot-area-{index}")
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotAreaCollection {
    areas: Vec<PlotArea>,
}

impl PlotAreaCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, area: PlotArea) {
        self.areas.push(area);
    }

    #[must_use]
    pub fn with_area(mut self, area: PlotArea) -> Self {
        self.push(area);
        self
    }

    #[must_use]
    pub fn areas(&self) -> &[PlotArea] {
        &self.areas
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.areas
            .iter()
            .position(|area| area.name.as_deref() == Some(name))
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.areas.iter().map(|a| a.row + 1).max().unwrap_or(0)
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.areas.iter().map(|a| a.column + 1).max().unwrap_or(0)
    }

    fn column_length(&self, column: usize) -> GridLength {
        let area = self.areas.iter().find(|a| a.column == column && a.row == 0);
        GridLength::parse(area.and_then(|a| a.width.as_ref()))
    }

    fn row_length(&self, row: usize) -> GridLength {
        let area = self.areas.iter().find(|a| a.row == row && a.column == 0);
        GridLength::parse(area.and_then(|a| a.height.as_ref()))
    }

    /// Pixel rectangle of every area, in collection order.
    pub fn layout(&self, bounds: Rect) -> ChartResult<Vec<Rect>> {
        let (rows, columns) = (self.rows(), self.columns());
        if rows == 0 || columns == 0 {
            return Err(ChartError::InvalidLayout { rows, columns });
        }

        let column_lengths: Vec<GridLength> =
            (0..columns).map(|c| self.column_length(c)).collect();
        let row_lengths: Vec<GridLength> = (0..rows).map(|r| self.row_length(r)).collect();
        let widths = distribute_lengths(bounds.width, &column_lengths)?;
        let heights = distribute_lengths(bounds.height, &row_lengths)?;

        let lefts = offsets(bounds.left, &widths);
        let tops = offsets(bounds.top, &heights);
        debug!(rows, columns, areas = self.areas.len(), "plot areas laid out");

        Ok(self
            .areas
            .iter()
            .map(|area| {
                Rect::new(
                    lefts[area.column],
                    tops[area.row],
                    widths[area.column],
                    heights[area.row],
                )
            })
            .collect())
    }

    /// Draws area backgrounds and registers their clip rects.
    pub fn render(&self, engine: &mut dyn RenderEngine, rects: &[Rect]) -> ChartResult<()> {
        for (index, (area, rect)) in self.areas.iter().zip(rects).enumerate() {
            let clip_id = plot_area_clip_id(index);
            engine.add_clip_rect(*rect, &clip_id);
            if let Some(fill) = area.fill {
                engine.set_fill(Some(fill));
                engine.set_stroke(None);
                engine.draw_rect(*rect, ElementAttrs::class("plot-area"))?;
            }
        }
        Ok(())
    }

    /// Index of the area whose rectangle contains `point`.
    #[must_use]
    pub fn hit_test(point: Point, rects: &[Rect]) -> Option<usize> {
        rects.iter().position(|rect| rect.contains(point))
    }
}

fn offsets(start: f64, sizes: &[f64]) -> Vec<f64> {
    sizes
        .iter()
        .scan(start, |position, size| {
            let current = *position;
            *position += size;
            Some(current)
        })
        .collect()
}
