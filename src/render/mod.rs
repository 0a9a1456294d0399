mod primitives;
mod recording;

pub use primitives::{Color, ElementAttrs, EngineStyle, default_palette};
pub use recording::{DrawShape, RecordedDraw, RecordingEngine};

use crate::core::{Point, Rect, Size};
use crate::error::ChartResult;

/// Drawing surface consumed by plotters, legend and plot-area rendering.
///
/// The engine carries one mutable style cursor (`EngineStyle`). Callers set
/// fill/stroke explicitly before each logical group of draw calls and never
/// rely on style left behind by unrelated code.
pub trait RenderEngine {
    fn style(&self) -> &EngineStyle;
    fn style_mut(&mut self) -> &mut EngineStyle;

    fn begin_render(&mut self) -> ChartResult<()>;
    fn end_render(&mut self) -> ChartResult<()>;
    fn set_viewport_size(&mut self, size: Size) -> ChartResult<()>;

    fn draw_ellipse(
        &mut self,
        center: Point,
        rx: f64,
        ry: f64,
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()>;
    fn draw_rect(&mut self, rect: Rect, attrs: ElementAttrs<'_>) -> ChartResult<()>;
    fn draw_line(&mut self, from: Point, to: Point, attrs: ElementAttrs<'_>) -> ChartResult<()>;
    fn draw_lines(&mut self, xs: &[f64], ys: &[f64], attrs: ElementAttrs<'_>) -> ChartResult<()>;
    /// Draws a smooth curve through the given control samples.
    fn draw_spline(&mut self, xs: &[f64], ys: &[f64], attrs: ElementAttrs<'_>)
    -> ChartResult<()>;
    fn draw_polygon(&mut self, xs: &[f64], ys: &[f64], attrs: ElementAttrs<'_>)
    -> ChartResult<()>;
    /// Angles are in radians, clockwise from the positive x axis.
    fn draw_pie_segment(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        sweep_angle: f64,
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()>;
    fn draw_donut_segment(
        &mut self,
        center: Point,
        radius: f64,
        inner_radius: f64,
        start_angle: f64,
        sweep_angle: f64,
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()>;
    /// `position` is the top-left corner of the text box.
    fn draw_string(&mut self, text: &str, position: Point, attrs: ElementAttrs<'_>)
    -> ChartResult<()>;
    /// Draws text rotated by `angle` degrees around `center`.
    fn draw_string_rotated(
        &mut self,
        text: &str,
        position: Point,
        center: Point,
        angle: f64,
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()>;
    fn draw_image(&mut self, source: &str, rect: Rect, attrs: ElementAttrs<'_>) -> ChartResult<()>;
    fn measure_string(&mut self, text: &str, attrs: ElementAttrs<'_>) -> Size;

    fn start_group(&mut self, class: Option<&str>, clip_path: Option<&str>) -> ChartResult<()>;
    fn end_group(&mut self) -> ChartResult<()>;
    /// Registers a clip rectangle that later draws reference by `id`.
    fn add_clip_rect(&mut self, rect: Rect, id: &str);

    fn fill(&self) -> Option<Color> {
        self.style().fill
    }

    fn set_fill(&mut self, fill: Option<Color>) {
        self.style_mut().fill = fill;
    }

    fn stroke(&self) -> Option<Color> {
        self.style().stroke
    }

    fn set_stroke(&mut self, stroke: Option<Color>) {
        self.style_mut().stroke = stroke;
    }

    fn stroke_width(&self) -> f64 {
        self.style().stroke_width
    }

    fn set_stroke_width(&mut self, width: f64) {
        self.style_mut().stroke_width = width;
    }

    fn text_fill(&self) -> Option<Color> {
        self.style().text_fill
    }

    fn set_text_fill(&mut self, fill: Option<Color>) {
        self.style_mut().text_fill = fill;
    }

    fn font_size(&self) -> f64 {
        self.style().font_size
    }

    fn set_font_size(&mut self, size: f64) {
        self.style_mut().font_size = size;
    }

    fn font_family(&self) -> &str {
        &self.style().font_family
    }

    fn set_font_family(&mut self, family: &str) {
        family.clone_into(&mut self.style_mut().font_family);
    }
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoEngine, CairoRenderStats};
