use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::{Point, Rect, Series, Size};
use crate::error::ChartResult;
use crate::render::{Color, ElementAttrs, RenderEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LegendPosition {
    None,
    Left,
    Top,
    #[default]
    Right,
    Bottom,
}

impl LegendPosition {
    /// Side legends stack entries in columns, top/bottom legends in rows.
    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendOptions {
    #[serde(default)]
    pub position: LegendPosition,
    /// Space between entries and between a marker and its label.
    #[serde(default = "default_item_gap")]
    pub item_gap: f64,
    #[serde(default = "default_marker_size")]
    pub marker_size: f64,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            position: LegendPosition::default(),
            item_gap: default_item_gap(),
            marker_size: default_marker_size(),
        }
    }
}

fn default_item_gap() -> f64 {
    6.0
}

fn default_marker_size() -> f64 {
    10.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

/// Flow layout of legend entries.
///
/// Entries are index aligned with their source (series or pie slices);
/// sources without an entry keep a `None` placeholder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegendLayout {
    options: LegendOptions,
    entries: Vec<Option<LegendEntry>>,
    item_rects: Vec<Option<Rect>>,
    bounds: Option<Rect>,
    /// Extent given to the last measure pass; the render pass wraps against it.
    available: Option<Size>,
}

impl LegendLayout {
    /// One entry per named series that is visible or legend-only.
    #[must_use]
    pub fn for_series(series: &[Series], palette: &[Color], options: LegendOptions) -> Self {
        let entries = series
            .iter()
            .enumerate()
            .map(|(index, s)| {
                if !s.visibility.in_legend() {
                    return None;
                }
                let label = s.display_name()?;
                Some(LegendEntry {
                    label: label.to_owned(),
                    color: s
                        .style
                        .fill
                        .or(s.style.stroke)
                        .unwrap_or_else(|| palette_color(palette, index)),
                })
            })
            .collect();
        Self::with_entries(entries, options)
    }

    /// One entry per pie slice label.
    #[must_use]
    pub fn for_slices(labels: &[String], palette: &[Color], options: LegendOptions) -> Self {
        let entries = labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                Some(LegendEntry {
                    label: label.clone(),
                    color: palette_color(palette, index),
                })
            })
            .collect();
        Self::with_entries(entries, options)
    }

    fn with_entries(entries: Vec<Option<LegendEntry>>, options: LegendOptions) -> Self {
        Self {
            options,
            entries,
            item_rects: Vec::new(),
            bounds: None,
            available: None,
        }
    }

    #[must_use]
    pub fn options(&self) -> LegendOptions {
        self.options
    }

    #[must_use]
    pub fn entries(&self) -> &[Option<LegendEntry>] {
        &self.entries
    }

    /// Entry rectangles from the last render, in chart coordinates.
    #[must_use]
    pub fn item_rects(&self) -> &[Option<Rect>] {
        &self.item_rects
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Size the legend needs when limited to `available`.
    pub fn desired_size(&mut self, engine: &mut dyn RenderEngine, available: Size) -> Size {
        self.available = Some(available);
        if self.options.position == LegendPosition::None {
            return Size::default();
        }
        self.flow_layout(engine, available).1
    }

    /// Draws the entries at the origin of `rect`, wrapping exactly as the
    /// last `desired_size` call did (or against `rect` without one).
    pub fn render(&mut self, engine: &mut dyn RenderEngine, rect: Rect) -> ChartResult<()> {
        self.item_rects.clear();
        self.bounds = None;
        if self.options.position == LegendPosition::None {
            return Ok(());
        }

        let available = self.available.unwrap_or_else(|| rect.size());
        let (positions, size) = self.flow_layout(engine, available);
        if size.width > rect.width + 0.5 || size.height > rect.height + 0.5 {
            warn!(
                needed_width = size.width,
                needed_height = size.height,
                "legend does not fit its rectangle"
            );
        }

        engine.start_group(Some("legend"), None)?;
        let (marker, gap) = (self.options.marker_size, self.options.item_gap);
        for (entry, position) in self.entries.iter().zip(&positions) {
            let (Some(entry), Some(position)) = (entry, position) else {
                self.item_rects.push(None);
                continue;
            };
            let item = Rect::new(
                rect.left + position.left,
                rect.top + position.top,
                position.width,
                position.height,
            );
            let marker_rect = Rect::new(
                item.left,
                item.top + 0.5 * (item.height - marker),
                marker,
                marker,
            );
            engine.set_fill(Some(entry.color));
            engine.set_stroke(Some(entry.color));
            engine.draw_rect(marker_rect, ElementAttrs::class("legend-marker"))?;

            let text = engine.measure_string(&entry.label, ElementAttrs::NONE);
            engine.set_fill(None);
            engine.set_stroke(None);
            engine.draw_string(
                &entry.label,
                Point::new(
                    item.left + marker + gap,
                    item.top + 0.5 * (item.height - text.height),
                ),
                ElementAttrs::class("legend-label"),
            )?;
            self.item_rects.push(Some(item));
        }
        engine.end_group()?;

        self.bounds = Some(Rect::new(rect.left, rect.top, size.width, size.height));
        trace!(entries = self.entries.len(), "legend rendered");
        Ok(())
    }

    /// Entry index under `point`, using the rectangles of the last render.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.item_rects
            .iter()
            .position(|rect| rect.is_some_and(|r| r.contains(point)))
    }

    /// Entry rectangles relative to the legend origin plus the total size.
    ///
    /// Horizontal legends fill rows up to `available.width`, vertical legends
    /// fill columns up to `available.height`.
    fn flow_layout(
        &self,
        engine: &mut dyn RenderEngine,
        available: Size,
    ) -> (Vec<Option<Rect>>, Size) {
        let vertical = self.options.position.is_vertical();
        let (marker, gap) = (self.options.marker_size, self.options.item_gap);
        let limit = if vertical {
            available.height
        } else {
            available.width
        };

        let mut positions = Vec::with_capacity(self.entries.len());
        // Main axis runs along a row (horizontal) or a column (vertical).
        let mut line_main = 0.0_f64;
        let mut line_cross = 0.0_f64;
        let mut committed_cross = 0.0_f64;
        let mut max_main = 0.0_f64;
        for entry in &self.entries {
            let Some(entry) = entry else {
                positions.push(None);
                continue;
            };
            let text = engine.measure_string(&entry.label, ElementAttrs::NONE);
            let item = Size::new(marker + gap + text.width, marker.max(text.height));
            let (main, cross) = if vertical {
                (item.height, item.width)
            } else {
                (item.width, item.height)
            };

            let offset = if line_main > 0.0 { gap } else { 0.0 };
            if line_main > 0.0 && line_main + offset + main > limit {
                max_main = max_main.max(line_main);
                committed_cross += line_cross + gap;
                line_main = 0.0;
                line_cross = 0.0;
            }
            let start = if line_main > 0.0 { line_main + gap } else { 0.0 };
            let rect = if vertical {
                Rect::new(committed_cross, start, item.width, item.height)
            } else {
                Rect::new(start, committed_cross, item.width, item.height)
            };
            positions.push(Some(rect));
            line_main = start + main;
            line_cross = line_cross.max(cross);
        }
        max_main = max_main.max(line_main);
        let total_cross = committed_cross + line_cross;

        let size = if vertical {
            Size::new(total_cross, max_main)
        } else {
            Size::new(max_main, total_cross)
        };
        (positions, size)
    }
}

fn palette_color(palette: &[Color], index: usize) -> Color {
    if palette.is_empty() {
        Color::BLACK
    } else {
        palette[index % palette.len()]
    }
}
