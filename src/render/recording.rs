use indexmap::IndexMap;

use crate::core::{Point, Rect, Size};
use crate::error::{ChartError, ChartResult};
use crate::render::{ElementAttrs, EngineStyle, RenderEngine};

/// Width of one character relative to the font size in headless measurement.
const CHAR_WIDTH_RATIO: f64 = 0.6;

/// Geometry of one recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawShape {
    Ellipse {
        center: Point,
        rx: f64,
        ry: f64,
    },
    Rect(Rect),
    Line {
        from: Point,
        to: Point,
    },
    Lines(Vec<Point>),
    Spline(Vec<Point>),
    Polygon(Vec<Point>),
    PieSegment {
        center: Point,
        radius: f64,
        start_angle: f64,
        sweep_angle: f64,
    },
    DonutSegment {
        center: Point,
        radius: f64,
        inner_radius: f64,
        start_angle: f64,
        sweep_angle: f64,
    },
    Text {
        text: String,
        position: Point,
    },
    RotatedText {
        text: String,
        position: Point,
        center: Point,
        angle: f64,
    },
    Image {
        source: String,
        rect: Rect,
    },
}

/// Draw call together with the style cursor at the time it was issued.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub shape: DrawShape,
    pub style: EngineStyle,
    pub class: Option<String>,
    pub clip_path: Option<String>,
    /// Nesting depth of groups around the call.
    pub group_depth: usize,
}

/// Headless engine that records draw calls.
///
/// Used by tests and hosts that post-process geometry. It validates
/// coordinates and group balancing so invalid geometry is caught before a
/// real backend sees it.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    style: EngineStyle,
    viewport: Size,
    draws: Vec<RecordedDraw>,
    clip_rects: IndexMap<String, Rect>,
    group_depth: usize,
    rendering: bool,
    completed_renders: usize,
}

impl RecordingEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[must_use]
    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    /// Draws tagged with `class`.
    pub fn draws_with_class<'s>(&'s self, class: &'s str) -> impl Iterator<Item = &'s RecordedDraw> {
        self.draws
            .iter()
            .filter(move |draw| draw.class.as_deref() == Some(class))
    }

    #[must_use]
    pub fn clip_rect(&self, id: &str) -> Option<Rect> {
        self.clip_rects.get(id).copied()
    }

    #[must_use]
    pub fn completed_renders(&self) -> usize {
        self.completed_renders
    }

    fn record(&mut self, shape: DrawShape, attrs: ElementAttrs<'_>) -> ChartResult<()> {
        self.draws.push(RecordedDraw {
            shape,
            style: self.style.clone(),
            class: attrs.class.map(str::to_owned),
            clip_path: attrs.clip_path.map(str::to_owned),
            group_depth: self.group_depth,
        });
        Ok(())
    }
}

fn ensure_finite(values: &[f64], what: &str) -> ChartResult<()> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!(
            "{what} coordinates must be finite"
        )))
    }
}

fn zip_points(xs: &[f64], ys: &[f64], what: &str) -> ChartResult<Vec<Point>> {
    ensure_finite(xs, what)?;
    ensure_finite(ys, what)?;
    Ok(xs.iter().zip(ys).map(|(&x, &y)| Point::new(x, y)).collect())
}

impl RenderEngine for RecordingEngine {
    fn style(&self) -> &EngineStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut EngineStyle {
        &mut self.style
    }

    fn begin_render(&mut self) -> ChartResult<()> {
        self.draws.clear();
        self.clip_rects.clear();
        self.group_depth = 0;
        self.rendering = true;
        Ok(())
    }

    fn end_render(&mut self) -> ChartResult<()> {
        if self.group_depth != 0 {
            return Err(ChartError::InvalidData(format!(
                "render ended with {} open group(s)",
                self.group_depth
            )));
        }
        self.rendering = false;
        self.completed_renders += 1;
        Ok(())
    }

    fn set_viewport_size(&mut self, size: Size) -> ChartResult<()> {
        if !size.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: size.width,
                height: size.height,
            });
        }
        self.viewport = size;
        Ok(())
    }

    fn draw_ellipse(
        &mut self,
        center: Point,
        rx: f64,
        ry: f64,
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()> {
        ensure_finite(&[center.x, center.y, rx, ry], "ellipse")?;
        self.record(DrawShape::Ellipse { center, rx, ry }, attrs)
    }

    fn draw_rect(&mut self, rect: Rect, attrs: ElementAttrs<'_>) -> ChartResult<()> {
        ensure_finite(&[rect.left, rect.top, rect.width, rect.height], "rect")?;
        self.record(DrawShape::Rect(rect), attrs)
    }

    fn draw_line(&mut self, from: Point, to: Point, attrs: ElementAttrs<'_>) -> ChartResult<()> {
        ensure_finite(&[from.x, from.y, to.x, to.y], "line")?;
        self.record(DrawShape::Line { from, to }, attrs)
    }

    fn draw_lines(&mut self, xs: &[f64], ys: &[f64], attrs: ElementAttrs<'_>) -> ChartResult<()> {
        let points = zip_points(xs, ys, "polyline")?;
        self.record(DrawShape::Lines(points), attrs)
    }

    fn draw_spline(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()> {
        let points = zip_points(xs, ys, "spline")?;
        self.record(DrawShape::Spline(points), attrs)
    }

    fn draw_polygon(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()> {
        let points = zip_points(xs, ys, "polygon")?;
        self.record(DrawShape::Polygon(points), attrs)
    }

    fn draw_pie_segment(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        sweep_angle: f64,
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()> {
        ensure_finite(
            &[center.x, center.y, radius, start_angle, sweep_angle],
            "pie segment",
        )?;
        self.record(
            DrawShape::PieSegment {
                center,
                radius,
                start_angle,
                sweep_angle,
            },
            attrs,
        )
    }

    fn draw_donut_segment(
        &mut self,
        center: Point,
        radius: f64,
        inner_radius: f64,
        start_angle: f64,
        sweep_angle: f64,
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()> {
        ensure_finite(
            &[center.x, center.y, radius, inner_radius, start_angle, sweep_angle],
            "donut segment",
        )?;
        self.record(
            DrawShape::DonutSegment {
                center,
                radius,
                inner_radius,
                start_angle,
                sweep_angle,
            },
            attrs,
        )
    }

    fn draw_string(
        &mut self,
        text: &str,
        position: Point,
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()> {
        ensure_finite(&[position.x, position.y], "text")?;
        self.record(
            DrawShape::Text {
                text: text.to_owned(),
                position,
            },
            attrs,
        )
    }

    fn draw_string_rotated(
        &mut self,
        text: &str,
        position: Point,
        center: Point,
        angle: f64,
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()> {
        ensure_finite(
            &[position.x, position.y, center.x, center.y, angle],
            "rotated text",
        )?;
        self.record(
            DrawShape::RotatedText {
                text: text.to_owned(),
                position,
                center,
                angle,
            },
            attrs,
        )
    }

    fn draw_image(&mut self, source: &str, rect: Rect, attrs: ElementAttrs<'_>) -> ChartResult<()> {
        ensure_finite(&[rect.left, rect.top, rect.width, rect.height], "image")?;
        self.record(
            DrawShape::Image {
                source: source.to_owned(),
                rect,
            },
            attrs,
        )
    }

    fn measure_string(&mut self, text: &str, _attrs: ElementAttrs<'_>) -> Size {
        let font_size = self.style.font_size;
        Size::new(
            text.chars().count() as f64 * font_size * CHAR_WIDTH_RATIO,
            font_size,
        )
    }

    fn start_group(&mut self, _class: Option<&str>, _clip_path: Option<&str>) -> ChartResult<()> {
        self.group_depth += 1;
        Ok(())
    }

    fn end_group(&mut self) -> ChartResult<()> {
        self.group_depth = self.group_depth.checked_sub(1).ok_or_else(|| {
            ChartError::InvalidData("end_group called without an open group".to_owned())
        })?;
        Ok(())
    }

    fn add_clip_rect(&mut self, rect: Rect, id: &str) {
        self.clip_rects.insert(id.to_owned(), rect);
    }
}
