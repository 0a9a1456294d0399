use tracing::trace;

use crate::core::data_info::StackAccumulator;
use crate::core::{DataInfo, DataPoint, Point, Rect, Series, Spline, Stacking, SymbolMarker};
use crate::error::ChartResult;
use crate::interaction::{AreaHandle, HitArea};
use crate::render::{ElementAttrs, RenderEngine};

use super::{ChartType, ItemContext, PlotPass, SeriesPlotter, data_limits};

const DEFAULT_SYMBOL_SIZE: f64 = 10.0;

/// Per-point symbol sizing used by [`LinePlotter::plot_with`].
pub(crate) trait SymbolSizer {
    /// Whether symbols of this series are drawn at all.
    fn enabled(&self, series: &Series) -> bool;

    /// Rendered symbol size; `None` skips the symbol.
    fn size_for(&self, series: &Series, series_index: usize, point_index: usize) -> Option<f64>;
}

struct FixedSize(f64);

impl SymbolSizer for FixedSize {
    fn enabled(&self, series: &Series) -> bool {
        series.style.symbol_size.unwrap_or(self.0) > 0.0
    }

    fn size_for(&self, series: &Series, _series_index: usize, _point_index: usize) -> Option<f64> {
        Some(series.style.symbol_size.unwrap_or(self.0))
    }
}

#[derive(Debug, Default)]
struct Run {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

#[derive(Debug, Clone, Copy)]
struct PlottedSymbol {
    point_index: usize,
    center: Point,
    data_x: f64,
    data_y: f64,
    handle: Option<AreaHandle>,
}

/// Line, scatter and spline plotter, optionally stacked.
#[derive(Debug, Clone)]
pub struct LinePlotter {
    chart_type: ChartType,
    stacking: Stacking,
    interpolate_nulls: bool,
    symbol_size: f64,
    stack: StackAccumulator,
}

impl LinePlotter {
    #[must_use]
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            stacking: Stacking::None,
            interpolate_nulls: false,
            symbol_size: DEFAULT_SYMBOL_SIZE,
            stack: StackAccumulator::new(),
        }
    }

    #[must_use]
    pub fn with_stacking(mut self, stacking: Stacking) -> Self {
        self.stacking = stacking;
        self
    }

    /// Bridge invalid points instead of breaking the line.
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
    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    #[must_use]
    pub fn symbol_size(&self) -> f64 {
        self.symbol_size
    }

    pub(crate) fn plot_with(
        &mut self,
        pass: &mut PlotPass<'_>,
        series: &Series,
        series_index: usize,
        sizer: &dyn SymbolSizer,
    ) -> ChartResult<()> {
        let Some(ys) = series.y_values.as_deref() else {
            return Ok(());
        };
        let data_info = pass.data_info;
        let xs = data_info.series_x_values(series);
        let stacked = self.stacking.is_stacked() && !series.custom_axis_y;
        let default_size = series.style.symbol_size.unwrap_or(self.symbol_size);

        let mut runs = vec![Run::default()];
        let mut symbols = Vec::new();
        let mut gaps = 0_usize;
        for (point_index, (&x, &y)) in xs.iter().zip(ys).enumerate() {
            let pixel = if x.is_finite() && y.is_finite() {
                let plotted_y = if stacked {
                    self.stack.push(x, data_info.normalize(x, y))
                } else {
                    y
                };
                Some(pass.to_pixel(x, plotted_y)).filter(|p| p.is_finite())
            } else {
                None
            };

            let Some(pixel) = pixel else {
                gaps += 1;
                if !self.interpolate_nulls && runs.last().is_some_and(|run| !run.xs.is_empty()) {
                    runs.push(Run::default());
                }
                continue;
            };

            if let Some(run) = runs.last_mut() {
                run.xs.push(pixel.x);
                run.ys.push(pixel.y);
            }
            let area = HitArea::circle(pixel, 0.5 * default_size)
                .with_tag(DataPoint::new(series_index, point_index, x, y));
            symbols.push(PlottedSymbol {
                point_index,
                center: pixel,
                data_x: x,
                data_y: y,
                handle: pass.arena.add(area, series_index),
            });
        }

        let color = pass.palette_color(series_index);
        let stroke = series.style.stroke.unwrap_or(color);
        let fill = series.style.fill.unwrap_or(color);
        let group_class = format!("series-{series_index}");
        pass.engine.start_group(Some(&group_class), pass.clip_path)?;

        if self.chart_type.has_line() {
            let attrs = ElementAttrs::class("series-line").with_clip_path(pass.clip_path);
            for run in runs.iter().filter(|run| run.xs.len() > 1) {
                pass.engine.set_fill(None);
                pass.engine.set_stroke(Some(stroke));
                pass.engine.set_stroke_width(series.style.stroke_width);
                if self.chart_type.is_spline() {
                    pass.engine.draw_spline(&run.xs, &run.ys, attrs)?;
                    let (sx, sy) = Spline::new(&run.xs, &run.ys).calculate().into_xy();
                    pass.arena.add(HitArea::lines(&sx, &sy), series_index);
                } else {
                    pass.engine.draw_lines(&run.xs, &run.ys, attrs)?;
                    pass.arena.add(HitArea::lines(&run.xs, &run.ys), series_index);
                }
            }
        }

        let draw_symbols = self.chart_type.has_symbols() || pass.item_formatter.is_some();
        if draw_symbols && sizer.enabled(series) {
            // Scatter-style plots without a connecting line tint negative values.
            let two_tone = !self.chart_type.has_line();
            let attrs = ElementAttrs::class("series-symbol").with_clip_path(pass.clip_path);
            for symbol in &symbols {
                let Some(size) = sizer.size_for(series, series_index, symbol.point_index) else {
                    continue;
                };
                let negative = two_tone && symbol.data_y < 0.0;
                let (symbol_fill, symbol_stroke) = if negative {
                    (
                        series.style.alt_fill.unwrap_or(fill),
                        series.style.alt_stroke.unwrap_or(stroke),
                    )
                } else {
                    (fill, stroke)
                };
                pass.engine.set_fill(Some(symbol_fill));
                pass.engine.set_stroke(Some(symbol_stroke));
                pass.engine.set_stroke_width(1.0);

                match pass.item_formatter {
                    Some(hook) => hook(
                        &mut *pass.engine,
                        &ItemContext {
                            series_index,
                            point_index: symbol.point_index,
                            center: symbol.center,
                            size,
                            data_x: symbol.data_x,
                            data_y: symbol.data_y,
                        },
                    )?,
                    None => draw_symbol(
                        &mut *pass.engine,
                        series.style.symbol_marker,
                        symbol.center,
                        size,
                        attrs,
                    )?,
                }
                pass.elements
                    .entry(series_index)
                    .or_default()
                    .push(symbol.point_index);

                if size != default_size {
                    if let Some(area) = symbol.handle.and_then(|h| pass.arena.area_mut(h)) {
                        area.set_radius(0.5 * size);
                    }
                }
            }
        }

        pass.engine.end_group()?;
        trace!(
            series_index,
            points = symbols.len(),
            gaps,
            runs = runs.iter().filter(|run| run.xs.len() > 1).count(),
            "plotted series"
        );
        Ok(())
    }
}

fn draw_symbol(
    engine: &mut dyn RenderEngine,
    marker: SymbolMarker,
    center: Point,
    size: f64,
    attrs: ElementAttrs<'_>,
) -> ChartResult<()> {
    let half = 0.5 * size;
    match marker {
        SymbolMarker::Dot => engine.draw_ellipse(center, half, half, attrs),
        SymbolMarker::Box => {
            engine.draw_rect(Rect::new(center.x - half, center.y - half, size, size), attrs)
        }
    }
}

impl SeriesPlotter for LinePlotter {
    fn clear(&mut self) {
        self.stack.clear();
    }

    fn adjust_limits(&mut self, data_info: &DataInfo, _series: &[&Series], _plot_rect: Rect) -> Rect {
        data_limits(data_info)
    }

    fn plot_series(
        &mut self,
        pass: &mut PlotPass<'_>,
        series: &Series,
        series_index: usize,
        _series_count: usize,
    ) -> ChartResult<()> {
        let sizer = FixedSize(self.symbol_size);
        self.plot_with(pass, series, series_index, &sizer)
    }
}
