use std::collections::HashMap;
use std::f64::consts::PI;
use std::fs::File;

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;

use crate::core::{Point, Rect, Size, Spline};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, ElementAttrs, EngineStyle, RenderEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub shapes_drawn: usize,
    pub texts_drawn: usize,
    pub images_drawn: usize,
}

/// Cairo + Pango implementation of [`RenderEngine`] drawing onto an image
/// surface.
#[derive(Debug)]
pub struct CairoEngine {
    surface: ImageSurface,
    context: Context,
    style: EngineStyle,
    clear_color: Color,
    clip_rects: HashMap<String, Rect>,
    group_depth: usize,
    stats: CairoRenderStats,
}

impl CairoEngine {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        let surface = create_surface(width, height)?;
        let context = Context::new(&surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        Ok(Self {
            surface,
            context,
            style: EngineStyle::default(),
            clear_color: Color::WHITE,
            clip_rects: HashMap::new(),
            group_depth: 0,
            stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.stats
    }

    /// Applies the clip path referenced by `attrs` inside a saved state.
    /// Callers must pair with `restore`.
    fn save_with_clip(&self, attrs: ElementAttrs<'_>) -> ChartResult<()> {
        self.context
            .save()
            .map_err(|err| map_backend_error("failed to save cairo state", err))?;
        if let Some(rect) = attrs.clip_path.and_then(|id| self.clip_rects.get(id)) {
            self.context
                .rectangle(rect.left, rect.top, rect.width, rect.height);
            self.context.clip();
        }
        Ok(())
    }

    fn restore(&self) -> ChartResult<()> {
        self.context
            .restore()
            .map_err(|err| map_backend_error("failed to restore cairo state", err))
    }

    /// Fills then strokes the current path with the style cursor.
    fn paint_path(&mut self, fill_allowed: bool) -> ChartResult<()> {
        let context = &self.context;
        if let Some(fill) = self.style.fill.filter(|_| fill_allowed) {
            apply_color(context, fill);
            context
                .fill_preserve()
                .map_err(|err| map_backend_error("failed to fill path", err))?;
        }
        if let Some(stroke) = self.style.stroke {
            apply_color(context, stroke);
            context.set_line_width(self.style.stroke_width);
            context
                .stroke_preserve()
                .map_err(|err| map_backend_error("failed to stroke path", err))?;
        }
        context.new_path();
        self.stats.shapes_drawn += 1;
        Ok(())
    }

    fn trace_polyline(&self, xs: &[f64], ys: &[f64]) {
        for (i, (&x, &y)) in xs.iter().zip(ys).enumerate() {
            if i == 0 {
                self.context.move_to(x, y);
            } else {
                self.context.line_to(x, y);
            }
        }
    }

    fn layout_for(&self, text: &str) -> pango::Layout {
        let layout = pangocairo::functions::create_layout(&self.context);
        let description = FontDescription::from_string(&format!(
            "{} {}",
            self.style.font_family, self.style.font_size
        ));
        layout.set_font_description(Some(&description));
        layout.set_text(text);
        layout
    }

    fn show_text(&mut self, text: &str, position: Point) {
        let layout = self.layout_for(text);
        apply_color(&self.context, self.style.text_fill.unwrap_or(Color::BLACK));
        self.context.move_to(position.x, position.y);
        pangocairo::functions::show_layout(&self.context, &layout);
        self.stats.texts_drawn += 1;
    }
}

impl RenderEngine for CairoEngine {
    fn style(&self) -> &EngineStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut EngineStyle {
        &mut self.style
    }

    fn begin_render(&mut self) -> ChartResult<()> {
        self.clip_rects.clear();
        self.group_depth = 0;
        self.stats = CairoRenderStats::default();
        apply_color(&self.context, self.clear_color);
        self.context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))
    }

    fn end_render(&mut self) -> ChartResult<()> {
        while self.group_depth > 0 {
            self.end_group()?;
        }
        self.surface.flush();
        Ok(())
    }

    fn set_viewport_size(&mut self, size: Size) -> ChartResult<()> {
        if !size.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: size.width,
                height: size.height,
            });
        }
        let (width, height) = (size.width.ceil() as i32, size.height.ceil() as i32);
        if width == self.surface.width() && height == self.surface.height() {
            return Ok(());
        }
        self.surface = create_surface(width, height)?;
        self.context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        Ok(())
    }

    fn draw_ellipse(
        &mut self,
        center: Point,
        rx: f64,
        ry: f64,
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()> {
        if rx <= 0.0 || ry <= 0.0 {
            return Ok(());
        }
        self.save_with_clip(attrs)?;
        self.context
            .save()
            .map_err(|err| map_backend_error("failed to save cairo state", err))?;
        self.context.translate(center.x, center.y);
        self.context.scale(rx, ry);
        self.context.arc(0.0, 0.0, 1.0, 0.0, 2.0 * PI);
        // Restore the transform before stroking so the line width is unscaled.
        self.restore()?;
        self.paint_path(true)?;
        self.restore()
    }

    fn draw_rect(&mut self, rect: Rect, attrs: ElementAttrs<'_>) -> ChartResult<()> {
        self.save_with_clip(attrs)?;
        self.context
            .rectangle(rect.left, rect.top, rect.width, rect.height);
        self.paint_path(true)?;
        self.restore()
    }

    fn draw_line(&mut self, from: Point, to: Point, attrs: ElementAttrs<'_>) -> ChartResult<()> {
        self.save_with_clip(attrs)?;
        self.context.move_to(from.x, from.y);
        self.context.line_to(to.x, to.y);
        self.paint_path(false)?;
        self.restore()
    }

    fn draw_lines(&mut self, xs: &[f64], ys: &[f64], attrs: ElementAttrs<'_>) -> ChartResult<()> {
        if xs.len().min(ys.len()) < 2 {
            return Ok(());
        }
        self.save_with_clip(attrs)?;
        self.trace_polyline(xs, ys);
        self.paint_path(false)?;
        self.restore()
    }

    fn draw_spline(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()> {
        let (sx, sy) = Spline::new(xs, ys).calculate().into_xy();
        self.draw_lines(&sx, &sy, attrs)
    }

    fn draw_polygon(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()> {
        if xs.len().min(ys.len()) < 3 {
            return Ok(());
        }
        self.save_with_clip(attrs)?;
        self.trace_polyline(xs, ys);
        self.context.close_path();
        self.paint_path(true)?;
        self.restore()
    }

    fn draw_pie_segment(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        sweep_angle: f64,
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()> {
        self.save_with_clip(attrs)?;
        self.context.move_to(center.x, center.y);
        self.context
            .arc(center.x, center.y, radius, start_angle, start_angle + sweep_angle);
        self.context.close_path();
        self.paint_path(true)?;
        self.restore()
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
        let end_angle = start_angle + sweep_angle;
        self.save_with_clip(attrs)?;
        self.context
            .arc(center.x, center.y, radius, start_angle, end_angle);
        self.context
            .arc_negative(center.x, center.y, inner_radius, end_angle, start_angle);
        self.context.close_path();
        self.paint_path(true)?;
        self.restore()
    }

    fn draw_string(
        &mut self,
        text: &str,
        position: Point,
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()> {
        self.save_with_clip(attrs)?;
        self.show_text(text, position);
        self.restore()
    }

    fn draw_string_rotated(
        &mut self,
        text: &str,
        position: Point,
        center: Point,
        angle: f64,
        attrs: ElementAttrs<'_>,
    ) -> ChartResult<()> {
        self.save_with_clip(attrs)?;
        self.context.translate(center.x, center.y);
        self.context.rotate(angle.to_radians());
        self.context.translate(-center.x, -center.y);
        self.show_text(text, position);
        self.restore()
    }

    fn draw_image(&mut self, source: &str, rect: Rect, attrs: ElementAttrs<'_>) -> ChartResult<()> {
        let mut file = File::open(source)
            .map_err(|err| ChartError::Backend(format!("failed to open image `{source}`: {err}")))?;
        let image = ImageSurface::create_from_png(&mut file)
            .map_err(|err| ChartError::Backend(format!("failed to decode image `{source}`: {err}")))?;
        if image.width() <= 0 || image.height() <= 0 {
            return Ok(());
        }

        self.save_with_clip(attrs)?;
        self.context.translate(rect.left, rect.top);
        self.context.scale(
            rect.width / f64::from(image.width()),
            rect.height / f64::from(image.height()),
        );
        self.context
            .set_source_surface(&image, 0.0, 0.0)
            .map_err(|err| map_backend_error("failed to set image source", err))?;
        self.context
            .paint()
            .map_err(|err| map_backend_error("failed to paint image", err))?;
        self.stats.images_drawn += 1;
        self.restore()
    }

    fn measure_string(&mut self, text: &str, _attrs: ElementAttrs<'_>) -> Size {
        let (width, height) = self.layout_for(text).pixel_size();
        Size::new(f64::from(width), f64::from(height))
    }

    fn start_group(&mut self, _class: Option<&str>, clip_path: Option<&str>) -> ChartResult<()> {
        self.save_with_clip(ElementAttrs {
            class: None,
            clip_path,
        })?;
        self.group_depth += 1;
        Ok(())
    }

    fn end_group(&mut self) -> ChartResult<()> {
        if self.group_depth == 0 {
            return Err(ChartError::InvalidData(
                "end_group called without an open group".to_owned(),
            ));
        }
        self.group_depth -= 1;
        self.restore()
    }

    fn add_clip_rect(&mut self, rect: Rect, id: &str) {
        self.clip_rects.insert(id.to_owned(), rect);
    }
}

fn create_surface(width: i32, height: i32) -> ChartResult<ImageSurface> {
    if width <= 0 || height <= 0 {
        return Err(ChartError::InvalidData(
            "cairo surface size must be > 0".to_owned(),
        ));
    }
    ImageSurface::create(Format::ARgb32, width, height)
        .map_err(|err| map_backend_error("failed to create cairo surface", err))
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}
