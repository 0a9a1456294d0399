use std::f64::consts::TAU;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::core::{
    AxisScale, DataInfo, DataPoint, DataType, LinearAxis, Point, Rect, Series, SeriesItem, Size,
    VolumeHelper,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::HitTestArena;
use crate::layout::{LegendLayout, LegendPosition, PlotAreaCollection, plot_area_clip_id};
use crate::plotter::{
    BubblePlotter, ChartType, ElementMap, ItemFormatter, LinePlotter, PlotPass, SeriesPlotter,
    data_limits,
};
use crate::render::{Color, ElementAttrs, RenderEngine};

use super::config::{ChartConfig, ChartKind};

/// Chart part under a probe point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ChartElement {
    PlotArea,
    Legend,
    /// A series line.
    Series,
    /// A point symbol, bubble or pie slice.
    SeriesSymbol,
    ChartArea,
    #[default]
    None,
}

/// Result of [`ChartCore::hit_test`].
///
/// Series fields describe the nearest data point even when the probe is not
/// on it; `distance` says how far away it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitTestInfo {
    pub point: Point,
    pub chart_element: ChartElement,
    pub plot_area: Option<usize>,
    pub series_index: Option<usize>,
    pub series_name: Option<String>,
    pub point_index: Option<usize>,
    pub x: f64,
    pub y: f64,
    pub x_formatted: String,
    pub y_formatted: String,
    pub item: Option<SeriesItem>,
    pub distance: f64,
}

impl HitTestInfo {
    fn new(point: Point) -> Self {
        Self {
            point,
            chart_element: ChartElement::None,
            plot_area: None,
            series_index: None,
            series_name: None,
            point_index: None,
            x: f64::NAN,
            y: f64::NAN,
            x_formatted: String::new(),
            y_formatted: String::new(),
            item: None,
            distance: f64::INFINITY,
        }
    }
}

/// Pie slice geometry of the last render. Angles are radians, clockwise
/// from 3 o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PieSlice {
    pub point_index: usize,
    pub value: f64,
    pub center: Point,
    pub radius: f64,
    pub inner_radius: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
}

impl PieSlice {
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        let r = point.distance_to(self.center);
        if !(r <= self.radius && r >= self.inner_radius) {
            return false;
        }
        let angle = (point.y - self.center.y).atan2(point.x - self.center.x);
        (angle - self.start_angle).rem_euclid(TAU) <= self.sweep_angle
    }
}

#[derive(Debug, Clone)]
struct AreaAxes {
    x: LinearAxis,
    y: LinearAxis,
    rect: Rect,
}

/// Chart orchestrator: owns the data and drives render passes and
/// hit-testing.
pub struct ChartCore {
    config: ChartConfig,
    series: Vec<Series>,
    plot_areas: PlotAreaCollection,
    item_formatter: Option<Box<ItemFormatter>>,
    // State of the last render pass.
    arena: HitTestArena,
    legend: LegendLayout,
    elements: ElementMap,
    area_axes: Vec<AreaAxes>,
    custom_axes: IndexMap<usize, LinearAxis>,
    series_area: Vec<usize>,
    pie_series: Option<usize>,
    pie_slices: Vec<PieSlice>,
    chart_rect: Rect,
    plot_rect: Rect,
}

impl ChartCore {
    pub fn new(config: ChartConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            series: Vec::new(),
            plot_areas: PlotAreaCollection::new(),
            item_formatter: None,
            arena: HitTestArena::new(),
            legend: LegendLayout::default(),
            elements: ElementMap::new(),
            area_axes: Vec::new(),
            custom_axes: IndexMap::new(),
            series_area: Vec::new(),
            pie_series: None,
            pie_slices: Vec::new(),
            chart_rect: Rect::default(),
            plot_rect: Rect::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ChartConfig) -> ChartResult<()> {
        config.validate()?;
        self.config = config;
        self.invalidate();
        Ok(())
    }

    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn set_series(&mut self, series: Vec<Series>) {
        debug!(count = series.len(), "set series");
        self.series = series;
        self.invalidate();
    }

    /// Appends a series and returns its index.
    pub fn push_series(&mut self, series: Series) -> usize {
        self.series.push(series);
        self.invalidate();
        self.series.len() - 1
    }

    pub fn series_mut(&mut self, index: usize) -> Option<&mut Series> {
        self.invalidate();
        self.series.get_mut(index)
    }

    #[must_use]
    pub fn plot_areas(&self) -> &PlotAreaCollection {
        &self.plot_areas
    }

    pub fn set_plot_areas(&mut self, plot_areas: PlotAreaCollection) {
        self.plot_areas = plot_areas;
        self.invalidate();
    }

    /// Installs a hook that draws symbols instead of the default marker.
    pub fn set_item_formatter(&mut self, formatter: Option<Box<ItemFormatter>>) {
        self.item_formatter = formatter;
        self.invalidate();
    }

    #[must_use]
    pub fn arena(&self) -> &HitTestArena {
        &self.arena
    }

    #[must_use]
    pub fn legend(&self) -> &LegendLayout {
        &self.legend
    }

    #[must_use]
    pub fn plot_rect(&self) -> Rect {
        self.plot_rect
    }

    #[must_use]
    pub fn pie_slices(&self) -> &[PieSlice] {
        &self.pie_slices
    }

    /// Axes of a plot area from the last render.
    #[must_use]
    pub fn axes(&self, plot_area: usize) -> Option<(&LinearAxis, &LinearAxis)> {
        self.area_axes.get(plot_area).map(|axes| (&axes.x, &axes.y))
    }

    /// Drops everything derived from the last pass so stale hit areas are
    /// never queried.
    fn invalidate(&mut self) {
        self.arena.clear(std::iter::empty());
        self.legend = LegendLayout::default();
        self.elements.clear();
        self.area_axes.clear();
        self.custom_axes.clear();
        self.series_area.clear();
        self.pie_series = None;
        self.pie_slices.clear();
    }

    /// Runs a full render pass and rebuilds the hit-test state.
    pub fn render(&mut self, engine: &mut dyn RenderEngine, size: Size) -> ChartResult<()> {
        if !size.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: size.width,
                height: size.height,
            });
        }
        debug!(
            series = self.series.len(),
            plot_areas = self.plot_areas.len(),
            kind = ?self.config.kind,
            chart_type = ?self.config.chart_type,
            "render pass started"
        );

        engine.set_viewport_size(size)?;
        engine.begin_render()?;
        self.invalidate();
        self.arena.clear(
            self.series
                .iter()
                .enumerate()
                .filter(|(_, s)| !s.hit_test_overridden)
                .map(|(index, _)| index),
        );
        self.chart_rect = Rect::new(0.0, 0.0, size.width, size.height);

        let kind = self.config.kind;
        let pie_series = match kind {
            ChartKind::Series => None,
            ChartKind::Pie => self
                .series
                .iter()
                .position(|s| s.visibility.is_plotted() && s.y_values.is_some()),
        };
        self.legend = match kind {
            ChartKind::Series => {
                LegendLayout::for_series(&self.series, &self.config.palette, self.config.legend)
            }
            ChartKind::Pie => LegendLayout::for_slices(
                &self.slice_labels(pie_series),
                &self.config.palette,
                self.config.legend,
            ),
        };

        let margin = self.config.plot_margin;
        let plot_rect = self
            .chart_rect
            .inset(margin.left, margin.top, margin.right, margin.bottom);
        self.plot_rect = self.place_legend(engine, plot_rect)?;

        match kind {
            ChartKind::Series => self.render_series(engine)?,
            ChartKind::Pie => self.render_pie(engine, pie_series)?,
        }

        engine.end_render()?;
        debug!(hit_areas = self.arena.len(), "render pass finished");
        Ok(())
    }

    /// Measures and draws the legend, returning the plot rect left over.
    fn place_legend(&mut self, engine: &mut dyn RenderEngine, plot_rect: Rect) -> ChartResult<Rect> {
        let options = self.config.legend;
        let desired = self.legend.desired_size(engine, plot_rect.size());
        if desired.width <= 0.0 || desired.height <= 0.0 {
            return Ok(plot_rect);
        }

        let gap = options.item_gap;
        let centered_top = plot_rect.top + 0.5 * (plot_rect.height - desired.height).max(0.0);
        let centered_left = plot_rect.left + 0.5 * (plot_rect.width - desired.width).max(0.0);
        let (origin, remaining) = match options.position {
            LegendPosition::None => return Ok(plot_rect),
            LegendPosition::Left => (
                Point::new(plot_rect.left, centered_top),
                plot_rect.inset(desired.width + gap, 0.0, 0.0, 0.0),
            ),
            LegendPosition::Right => (
                Point::new(plot_rect.right() - desired.width, centered_top),
                plot_rect.inset(0.0, 0.0, desired.width + gap, 0.0),
            ),
            LegendPosition::Top => (
                Point::new(centered_left, plot_rect.top),
                plot_rect.inset(0.0, desired.height + gap, 0.0, 0.0),
            ),
            LegendPosition::Bottom => (
                Point::new(centered_left, plot_rect.bottom() - desired.height),
                plot_rect.inset(0.0, 0.0, 0.0, desired.height + gap),
            ),
        };
        let legend_rect = Rect::new(origin.x, origin.y, desired.width, desired.height);
        self.legend.render(engine, legend_rect)?;
        Ok(remaining)
    }

    fn slice_labels(&self, pie_series: Option<usize>) -> Vec<String> {
        let Some(series) = pie_series.and_then(|index| self.series.get(index)) else {
            return Vec::new();
        };
        let count = series.y_values.as_ref().map_or(0, Vec::len);
        (0..count)
            .map(|i| {
                series
                    .labels
                    .as_ref()
                    .and_then(|labels| labels.get(i).cloned())
                    .unwrap_or_else(|| i.to_string())
            })
            .collect()
    }

    fn render_series(&mut self, engine: &mut dyn RenderEngine) -> ChartResult<()> {
        let rects = if self.plot_areas.is_empty() {
            engine.add_clip_rect(self.plot_rect, &plot_area_clip_id(0));
            vec![self.plot_rect]
        } else {
            let rects = self.plot_areas.layout(self.plot_rect)?;
            self.plot_areas.render(engine, &rects)?;
            rects
        };

        let config = &self.config;
        let mut plotter: Box<dyn SeriesPlotter> = match config.chart_type {
            ChartType::Bubble => Box::new(
                BubblePlotter::new(config.bubble)
                    .with_log_axes(config.axis_x.log_base.is_some(), config.axis_y.log_base.is_some())
                    .with_symbol_size(config.symbol_size),
            ),
            chart_type => Box::new(
                LinePlotter::new(chart_type)
                    .with_stacking(config.stacking)
                    .with_interpolate_nulls(config.interpolate_nulls)
                    .with_symbol_size(config.symbol_size),
            ),
        };

        self.series_area = self
            .series
            .iter()
            .map(|s| {
                s.plot_area
                    .as_deref()
                    .and_then(|name| self.plot_areas.index_of(name))
                    .filter(|&index| index < rects.len())
                    .unwrap_or(0)
            })
            .collect();

        let series_count = self.series.len();
        for (area_index, rect) in rects.iter().enumerate() {
            let members: Vec<usize> = (0..series_count)
                .filter(|&i| self.series_area[i] == area_index)
                .filter(|&i| self.series[i].visibility.is_plotted())
                .collect();
            let member_refs: Vec<&Series> = members.iter().map(|&i| &self.series[i]).collect();
            let data_info = DataInfo::analyze(&member_refs, config.stacking);

            plotter.clear();
            // Limits are padded against the pixel extent each data axis spans.
            let limit_rect = if config.rotated {
                Rect::new(rect.left, rect.top, rect.height, rect.width)
            } else {
                *rect
            };
            let mut limits = plotter.adjust_limits(&data_info, &member_refs, limit_rect);
            if !rect_is_finite(limits) {
                warn!(area_index, limits = ?limits, "padded limits overflow, using data limits");
                limits = data_limits(&data_info);
            }
            let (axis_x, axis_y) = build_axes(config, &data_info, &member_refs, limits, *rect)?;

            for &si in &members {
                let series = &self.series[si];
                if series.custom_axis_y {
                    if let Some((lo, hi)) = data_info.series_y_range(series) {
                        self.custom_axes.insert(si, value_axis(config, lo, hi, *rect)?);
                    }
                }
            }

            let clip_id = plot_area_clip_id(area_index);
            for &si in &members {
                let series = &self.series[si];
                let series_axis_y: &dyn AxisScale = self.custom_axes.get(&si).unwrap_or(&axis_y);
                let mut pass = PlotPass {
                    engine: &mut *engine,
                    axis_x: &axis_x,
                    axis_y: series_axis_y,
                    arena: &mut self.arena,
                    palette: &config.palette,
                    data_info: &data_info,
                    rotated: config.rotated,
                    clip_path: Some(&clip_id),
                    elements: &mut self.elements,
                    item_formatter: self.item_formatter.as_deref(),
                };
                plotter.plot_series(&mut pass, series, si, series_count)?;
            }

            trace!(
                area_index,
                series = members.len(),
                limits = ?limits,
                "plot area rendered"
            );
            self.area_axes.push(AreaAxes {
                x: axis_x,
                y: axis_y,
                rect: *rect,
            });
        }
        Ok(())
    }

    fn render_pie(
        &mut self,
        engine: &mut dyn RenderEngine,
        pie_series: Option<usize>,
    ) -> ChartResult<()> {
        engine.add_clip_rect(self.plot_rect, &plot_area_clip_id(0));
        let Some(series_index) = pie_series else {
            return Ok(());
        };
        let values = self.series[series_index]
            .y_values
            .as_deref()
            .unwrap_or_default();
        let total: f64 = values
            .iter()
            .filter(|v| v.is_finite())
            .map(|v| v.abs())
            .sum();
        if total <= 0.0 {
            warn!(series_index, "pie series has no non-zero values");
            return Ok(());
        }

        let rect = self.plot_rect;
        let center = rect.center();
        let radius = 0.5 * rect.width.min(rect.height);
        let inner_radius = radius * self.config.pie.inner_radius;
        let palette = &self.config.palette;
        let group_class = format!("series-{series_index}");
        engine.start_group(Some(&group_class), None)?;

        let mut angle = self.config.pie.start_angle.to_radians();
        for (point_index, &value) in values.iter().enumerate() {
            if !value.is_finite() || value == 0.0 {
                continue;
            }
            let sweep = TAU * value.abs() / total;
            let color = if palette.is_empty() {
                Color::BLACK
            } else {
                palette[point_index % palette.len()]
            };
            engine.set_fill(Some(color));
            engine.set_stroke(Some(Color::WHITE));
            engine.set_stroke_width(1.0);
            let attrs = ElementAttrs::class("pie-slice");
            if inner_radius > 0.0 {
                engine.draw_donut_segment(center, radius, inner_radius, angle, sweep, attrs)?;
            } else {
                engine.draw_pie_segment(center, radius, angle, sweep, attrs)?;
            }
            self.elements
                .entry(series_index)
                .or_default()
                .push(point_index);
            self.pie_slices.push(PieSlice {
                point_index,
                value,
                center,
                radius,
                inner_radius,
                start_angle: angle,
                sweep_angle: sweep,
            });
            angle += sweep;
        }
        engine.end_group()?;

        self.pie_series = Some(series_index);
        trace!(series_index, slices = self.pie_slices.len(), "pie rendered");
        Ok(())
    }

    /// Point index behind the `element`-th symbol drawn for a series.
    #[must_use]
    pub fn point_for_element(&self, series_index: usize, element: usize) -> Option<usize> {
        self.elements.get(&series_index)?.get(element).copied()
    }

    /// Describes what lies under `point`, using the state of the last render.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> HitTestInfo {
        let mut info = HitTestInfo::new(point);

        if let Some(entry) = self.legend.hit_test(point) {
            info.chart_element = ChartElement::Legend;
            info.distance = 0.0;
            match self.config.kind {
                ChartKind::Series => self.set_series_info(&mut info, entry),
                ChartKind::Pie => {
                    if let Some(series_index) = self.pie_series {
                        self.set_series_info(&mut info, series_index);
                    }
                    info.point_index = Some(entry);
                }
            }
            return info;
        }

        match self.config.kind {
            ChartKind::Series => self.hit_test_points(point, &mut info),
            ChartKind::Pie => self.hit_test_pie(point, &mut info),
        }
        info
    }

    /// Nearest area of one series, lines included.
    #[must_use]
    pub fn hit_test_series(&self, point: Point, series_index: usize) -> Option<HitTestInfo> {
        let hit = self.arena.hit_test_series(point, series_index)?;
        let mut info = HitTestInfo::new(point);
        info.distance = hit.distance;
        if let Some(tag) = hit.area.tag {
            self.set_point_info(&mut info, tag);
        }
        info.chart_element = if hit.distance > 0.0 {
            ChartElement::None
        } else if hit.area.is_lines() {
            ChartElement::Series
        } else {
            ChartElement::SeriesSymbol
        };
        Some(info)
    }

    fn hit_test_points(&self, point: Point, info: &mut HitTestInfo) {
        let symbol = self.arena.hit_test(point, false);
        // Lines only compete when no symbol is under the pointer.
        let hit = match symbol {
            Some(hit) if hit.distance == 0.0 => Some(hit),
            symbol => match (symbol, self.arena.hit_test(point, true)) {
                (Some(symbol), Some(line)) if line.distance < symbol.distance => Some(line),
                (None, line) => line,
                (symbol, _) => symbol,
            },
        };

        if let Some(hit) = hit {
            info.distance = hit.distance;
            if let Some(tag) = hit.area.tag {
                self.set_point_info(info, tag);
            }
            if hit.distance == 0.0 {
                info.chart_element = if hit.area.is_lines() {
                    ChartElement::Series
                } else {
                    ChartElement::SeriesSymbol
                };
                return;
            }
        }

        let rects: Vec<Rect> = self.area_axes.iter().map(|axes| axes.rect).collect();
        if let Some(area) = PlotAreaCollection::hit_test(point, &rects) {
            info.plot_area = Some(area);
            info.chart_element = ChartElement::PlotArea;
        } else if self.chart_rect.contains(point) {
            info.chart_element = ChartElement::ChartArea;
        }
    }

    fn hit_test_pie(&self, point: Point, info: &mut HitTestInfo) {
        let slice = self.pie_slices.iter().find(|slice| slice.contains(point));
        if let (Some(slice), Some(series_index)) = (slice, self.pie_series) {
            self.set_series_info(info, series_index);
            info.chart_element = ChartElement::SeriesSymbol;
            info.plot_area = Some(0);
            info.point_index = Some(slice.point_index);
            info.x = slice.point_index as f64;
            info.y = slice.value;
            info.x_formatted = self.slice_labels(Some(series_index))
                .get(slice.point_index)
                .cloned()
                .unwrap_or_default();
            info.y_formatted = format!("{}", slice.value);
            info.item = self.series[series_index].item(slice.point_index);
            info.distance = 0.0;
        } else if self.plot_rect.contains(point) {
            info.plot_area = Some(0);
            info.chart_element = ChartElement::PlotArea;
        } else if self.chart_rect.contains(point) {
            info.chart_element = ChartElement::ChartArea;
        }
    }

    fn set_series_info(&self, info: &mut HitTestInfo, series_index: usize) {
        info.series_index = Some(series_index);
        info.series_name = self
            .series
            .get(series_index)
            .and_then(Series::display_name)
            .map(str::to_owned);
    }

    fn set_point_info(&self, info: &mut HitTestInfo, tag: DataPoint) {
        let series_index = tag.series_index;
        self.set_series_info(info, series_index);
        info.point_index = tag.point_index;
        info.x = tag.data_x;
        info.y = tag.data_y;
        info.item = tag
            .point_index
            .and_then(|index| self.series.get(series_index)?.item(index));

        let area = self.series_area.get(series_index).copied();
        if let Some(axes) = area.and_then(|index| self.area_axes.get(index)) {
            info.plot_area = area;
            info.x_formatted = axes.x.format_value(tag.data_x);
            let axis_y = self.custom_axes.get(&series_index).unwrap_or(&axes.y);
            info.y_formatted = axis_y.format_value(tag.data_y);
        }
    }
}

fn rect_is_finite(rect: Rect) -> bool {
    [rect.left, rect.top, rect.right(), rect.bottom()]
        .iter()
        .all(|v| v.is_finite())
}

/// Axes of one plot area. Rotated charts run x data bottom to top and y
/// data left to right.
fn build_axes(
    config: &ChartConfig,
    data_info: &DataInfo,
    members: &[&Series],
    limits: Rect,
    rect: Rect,
) -> ChartResult<(LinearAxis, LinearAxis)> {
    let (x_min, x_max) = (limits.left, limits.right());
    let mut axis_x = if config.rotated {
        LinearAxis::vertical(x_min, x_max, rect)?
    } else {
        LinearAxis::horizontal(x_min, x_max, rect)?
    }
    .with_options(&config.axis_x)?;

    if config.axis_x.volume_weighted {
        if let Some(series) = members.iter().find(|s| s.volumes.is_some()) {
            let volumes = series.volumes.as_deref().unwrap_or_default();
            let x_data_type = if series.x_values.is_some() {
                series.x_data_type
            } else {
                data_info.x_data_type()
            };
            let x_values = data_info.series_x_values(series);
            let helper = VolumeHelper::new(
                volumes,
                Some(x_values).filter(|_| x_data_type != DataType::String),
                Some(x_min),
                Some(x_max),
                x_data_type,
            );
            if helper.has_bars() {
                axis_x = axis_x.with_volume_helper(helper);
            }
        }
    }

    let axis_y = value_axis(config, limits.top, limits.bottom(), rect)?;
    Ok((axis_x, axis_y))
}

fn value_axis(config: &ChartConfig, min: f64, max: f64, rect: Rect) -> ChartResult<LinearAxis> {
    let axis = if config.rotated {
        LinearAxis::horizontal(min, max, rect)?
    } else {
        LinearAxis::vertical(min, max, rect)?
    };
    axis.with_options(&config.axis_y)
}
