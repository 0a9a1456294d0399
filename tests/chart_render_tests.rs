use flexchart::api::{LegendOptions, LegendPosition, Margins, PlotArea, PlotAreaCollection};
use flexchart::core::{AxisOptions, Point, Rect, Series, SeriesVisibility, Size};
use flexchart::error::ChartError;
use flexchart::plotter::{ItemContext, ItemFormatter, Stacking};
use flexchart::render::{DrawShape, ElementAttrs, RecordingEngine, RenderEngine};
use flexchart::{ChartConfig, ChartCore, ChartType};

fn bare_config(chart_type: ChartType) -> ChartConfig {
    ChartConfig::new(chart_type)
        .with_legend(LegendOptions {
            position: LegendPosition::None,
            ..LegendOptions::default()
        })
        .with_plot_margin(Margins::uniform(0.0))
}

fn render(chart: &mut ChartCore, width: f64, height: f64) -> RecordingEngine {
    let mut engine = RecordingEngine::new();
    chart
        .render(&mut engine, Size::new(width, height))
        .expect("render");
    engine
}

fn symbol_centers(engine: &RecordingEngine) -> Vec<Point> {
    engine
        .draws_with_class("series-symbol")
        .filter_map(|draw| match draw.shape {
            DrawShape::Ellipse { center, .. } => Some(center),
            _ => None,
        })
        .collect()
}

fn assert_point(actual: Point, x: f64, y: f64) {
    assert!((actual.x - x).abs() <= 1e-9, "x of {actual:?}");
    assert!((actual.y - y).abs() <= 1e-9, "y of {actual:?}");
}

#[test]
fn line_with_symbols_draws_polyline_and_markers_inside_plot_clip() {
    let mut chart = ChartCore::new(bare_config(ChartType::LineSymbols)).expect("chart");
    chart.push_series(Series::new("a").with_y_values(vec![0.0, 10.0]));
    let engine = render(&mut chart, 100.0, 100.0);

    assert_eq!(engine.completed_renders(), 1);
    assert_eq!(engine.clip_rect("plot-area-0"), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));

    let lines: Vec<_> = engine.draws_with_class("series-line").collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].clip_path.as_deref(), Some("plot-area-0"));
    match &lines[0].shape {
        DrawShape::Lines(points) => {
            assert_eq!(points.len(), 2);
            assert_point(points[0], 0.0, 100.0);
            assert_point(points[1], 100.0, 0.0);
        }
        other => panic!("unexpected shape {other:?}"),
    }

    let centers = symbol_centers(&engine);
    assert_eq!(centers.len(), 2);
    assert_point(centers[1], 100.0, 0.0);
    assert_eq!(chart.arena().len(), 3);
}

#[test]
fn plain_line_draws_no_symbols_and_spline_smooths_the_run() {
    let mut chart = ChartCore::new(bare_config(ChartType::Line)).expect("chart");
    chart.push_series(Series::new("a").with_y_values(vec![0.0, 10.0, 5.0, 8.0, 2.0]));
    let engine = render(&mut chart, 400.0, 100.0);
    assert_eq!(engine.draws_with_class("series-symbol").count(), 0);

    chart
        .set_config(bare_config(ChartType::Spline))
        .expect("config");
    let engine = render(&mut chart, 400.0, 100.0);
    let spline = engine
        .draws_with_class("series-line")
        .next()
        .expect("spline draw");
    assert!(matches!(&spline.shape, DrawShape::Spline(points) if points.len() == 5));

    let areas = chart.arena().areas(0).expect("tracked");
    let lines = areas.iter().filter(|area| area.is_lines()).count();
    assert_eq!(lines, 1);
    assert_eq!(areas.len(), 6);
}

#[test]
fn invalid_points_split_lines_unless_interpolated() {
    let series = Series::new("gappy").with_y_values(vec![1.0, f64::NAN, 3.0, 4.0]);

    let mut chart = ChartCore::new(bare_config(ChartType::Line)).expect("chart");
    chart.push_series(series.clone());
    let engine = render(&mut chart, 300.0, 100.0);
    let runs: Vec<usize> = engine
        .draws_with_class("series-line")
        .filter_map(|draw| match &draw.shape {
            DrawShape::Lines(points) => Some(points.len()),
            _ => None,
        })
        .collect();
    assert_eq!(runs, vec![2]);

    let mut chart =
        ChartCore::new(bare_config(ChartType::Line).with_interpolate_nulls(true)).expect("chart");
    chart.push_series(series);
    let engine = render(&mut chart, 300.0, 100.0);
    let runs: Vec<usize> = engine
        .draws_with_class("series-line")
        .filter_map(|draw| match &draw.shape {
            DrawShape::Lines(points) => Some(points.len()),
            _ => None,
        })
        .collect();
    assert_eq!(runs, vec![3]);
}

#[test]
fn stacked_series_sit_on_cumulative_values() {
    let mut chart = ChartCore::new(
        bare_config(ChartType::LineSymbols).with_stacking(Stacking::Stacked),
    )
    .expect("chart");
    chart.set_series(vec![
        Series::new("a").with_y_values(vec![1.0, 2.0]),
        Series::new("b").with_y_values(vec![3.0, 4.0]),
    ]);
    let engine = render(&mut chart, 100.0, 100.0);

    let (_, y_axis) = chart.axes(0).expect("axes");
    assert_eq!(y_axis.data_range(), (1.0, 6.0));

    let centers = symbol_centers(&engine);
    assert_eq!(centers.len(), 4);
    assert_point(centers[0], 0.0, 100.0);
    assert_point(centers[1], 100.0, 80.0);
    assert_point(centers[2], 0.0, 40.0);
    assert_point(centers[3], 100.0, 0.0);
}

#[test]
fn hundred_percent_stacking_normalizes_each_x() {
    let mut chart = ChartCore::new(
        bare_config(ChartType::LineSymbols).with_stacking(Stacking::Stacked100pc),
    )
    .expect("chart");
    chart.set_series(vec![
        Series::new("a").with_y_values(vec![1.0, 2.0]),
        Series::new("b").with_y_values(vec![3.0, 4.0]),
    ]);
    let engine = render(&mut chart, 100.0, 100.0);

    let (_, y_axis) = chart.axes(0).expect("axes");
    let (lo, hi) = y_axis.data_range();
    assert!((lo - 0.25).abs() <= 1e-12);
    assert!((hi - 1.0).abs() <= 1e-12);

    let centers = symbol_centers(&engine);
    assert_point(centers[0], 0.0, 100.0);
    assert!((centers[1].y - (100.0 - (2.0 / 6.0 - 0.25) / 0.75 * 100.0)).abs() <= 1e-9);
    assert_point(centers[2], 0.0, 0.0);
    assert_point(centers[3], 100.0, 0.0);
}

#[test]
fn custom_axis_series_use_their_own_value_range() {
    let mut chart = ChartCore::new(
        bare_config(ChartType::LineSymbols).with_stacking(Stacking::Stacked),
    )
    .expect("chart");
    chart.set_series(vec![
        Series::new("main").with_y_values(vec![0.0, 10.0]),
        Series::new("secondary")
            .with_y_values(vec![2000.0, 1000.0])
            .with_custom_axis_y(true),
    ]);
    let engine = render(&mut chart, 100.0, 100.0);

    let (_, y_axis) = chart.axes(0).expect("axes");
    assert_eq!(y_axis.data_range(), (0.0, 10.0));
    let centers = symbol_centers(&engine);
    assert_point(centers[2], 0.0, 0.0);
    assert_point(centers[3], 100.0, 100.0);
}

#[test]
fn series_are_routed_to_named_plot_areas() {
    let mut chart = ChartCore::new(bare_config(ChartType::LineSymbols)).expect("chart");
    chart.set_plot_areas(
        PlotAreaCollection::new()
            .with_area(PlotArea::new(0, 0).with_name("top"))
            .with_area(PlotArea::new(1, 0).with_name("bottom")),
    );
    chart.set_series(vec![
        Series::new("a").with_y_values(vec![0.0, 10.0]),
        Series::new("b")
            .with_y_values(vec![0.0, 100.0])
            .with_plot_area("bottom"),
    ]);
    let engine = render(&mut chart, 100.0, 200.0);

    assert_eq!(engine.clip_rect("plot-area-1"), Some(Rect::new(0.0, 100.0, 100.0, 100.0)));
    let (_, bottom_y) = chart.axes(1).expect("bottom axes");
    assert_eq!(bottom_y.data_range(), (0.0, 100.0));

    let centers = symbol_centers(&engine);
    assert_point(centers[1], 100.0, 0.0);
    assert_point(centers[2], 0.0, 200.0);
    assert_point(centers[3], 100.0, 100.0);

    let bottom_clips = engine
        .draws_with_class("series-symbol")
        .filter(|draw| draw.clip_path.as_deref() == Some("plot-area-1"))
        .count();
    assert_eq!(bottom_clips, 2);
}

#[test]
fn volume_weighted_x_axis_spaces_points_by_volume() {
    let config = bare_config(ChartType::Scatter).with_axis_x(AxisOptions {
        volume_weighted: true,
        ..AxisOptions::default()
    });
    let mut chart = ChartCore::new(config).expect("chart");
    chart.push_series(
        Series::new("v")
            .with_y_values(vec![1.0, 2.0, 3.0])
            .with_volumes(vec![1.0, 1.0, 2.0]),
    );
    let engine = render(&mut chart, 100.0, 100.0);

    let centers = symbol_centers(&engine);
    assert_point(centers[0], 0.0, 100.0);
    assert!((centers[1].x - 40.0).abs() <= 1e-9);
    assert!((centers[2].x - 100.0).abs() <= 1e-9);
}

#[test]
fn volume_weighted_single_category_is_centered() {
    let config = bare_config(ChartType::Scatter).with_axis_x(AxisOptions {
        volume_weighted: true,
        ..AxisOptions::default()
    });
    let mut chart = ChartCore::new(config).expect("chart");
    chart.push_series(
        Series::new("v")
            .with_y_values(vec![5.0])
            .with_volumes(vec![10.0]),
    );
    let engine = render(&mut chart, 100.0, 100.0);

    let centers = symbol_centers(&engine);
    assert_eq!(centers.len(), 1);
    assert_point(centers[0], 50.0, 50.0);
    assert_eq!(chart.arena().len(), 1);
}

#[test]
fn overflowing_value_span_still_renders() {
    let mut chart = ChartCore::new(bare_config(ChartType::LineSymbols)).expect("chart");
    chart.push_series(Series::new("extreme").with_y_values(vec![1e308, -1e308]));
    let engine = render(&mut chart, 100.0, 100.0);

    let centers = symbol_centers(&engine);
    assert_eq!(centers.len(), 2);
    assert!((centers[0].x - 0.0).abs() <= 1e-9);
    assert!((centers[1].x - 100.0).abs() <= 1e-9);
    assert!(centers[0].y.is_finite() && centers[0].y < 0.0);
    assert!(centers[1].y.is_finite() && centers[1].y > 100.0);
    assert!(chart.arena().len() >= 2);
}

#[test]
fn item_formatter_replaces_symbols_and_maps_elements_to_points() {
    let mut chart = ChartCore::new(bare_config(ChartType::Line)).expect("chart");
    chart.push_series(Series::new("a").with_y_values(vec![1.0, f64::NAN, 3.0]));
    let formatter: Box<ItemFormatter> =
        Box::new(|engine: &mut dyn RenderEngine, item: &ItemContext| {
            let half = 0.5 * item.size;
            engine.draw_rect(
                Rect::new(item.center.x - half, item.center.y - half, item.size, item.size),
                ElementAttrs::class("custom-item"),
            )
        });
    chart.set_item_formatter(Some(formatter));
    let engine = render(&mut chart, 100.0, 100.0);

    assert_eq!(engine.draws_with_class("custom-item").count(), 2);
    assert_eq!(engine.draws_with_class("series-symbol").count(), 0);
    assert_eq!(chart.point_for_element(0, 0), Some(0));
    assert_eq!(chart.point_for_element(0, 1), Some(2));
    assert_eq!(chart.point_for_element(0, 2), None);
}

#[test]
fn hidden_and_overridden_series_register_no_hit_areas() {
    let mut chart = ChartCore::new(bare_config(ChartType::Scatter)).expect("chart");
    chart.set_series(vec![
        Series::new("hidden")
            .with_y_values(vec![1.0, 2.0])
            .with_visibility(SeriesVisibility::Hidden),
        Series {
            hit_test_overridden: true,
            ..Series::new("custom hit").with_y_values(vec![1.0, 2.0])
        },
        Series::new("shown").with_y_values(vec![1.0, 2.0]),
    ]);
    let engine = render(&mut chart, 100.0, 100.0);

    assert_eq!(engine.draws_with_class("series-symbol").count(), 4);
    assert_eq!(chart.arena().areas(0).map(<[_]>::len), Some(0));
    assert!(!chart.arena().is_tracked(1));
    assert_eq!(chart.arena().areas(2).map(<[_]>::len), Some(2));
}

#[test]
fn legend_takes_space_from_the_plot_rect() {
    let config = ChartConfig::new(ChartType::Line).with_plot_margin(Margins::uniform(0.0));
    let mut chart = ChartCore::new(config).expect("chart");
    chart.push_series(Series::new("abc").with_y_values(vec![1.0, 2.0]));
    let engine = render(&mut chart, 200.0, 100.0);

    let legend = chart.legend().bounds().expect("legend drawn");
    assert!((legend.right() - 200.0).abs() <= 1e-9);
    let plot = chart.plot_rect();
    assert!((plot.right() - (legend.left - chart.config().legend.item_gap)).abs() <= 1e-9);
    assert_eq!(engine.draws_with_class("legend-marker").count(), 1);
}

#[test]
fn empty_chart_renders_without_series_draws() {
    let mut chart = ChartCore::new(bare_config(ChartType::LineSymbols)).expect("chart");
    let engine = render(&mut chart, 100.0, 100.0);
    assert!(engine.draws_with_class("series-line").next().is_none());
    assert!(chart.arena().is_empty());
    assert!(chart.axes(0).is_some());
}

#[test]
fn invalid_viewport_is_rejected() {
    let mut chart = ChartCore::new(bare_config(ChartType::Line)).expect("chart");
    let mut engine = RecordingEngine::new();
    let err = chart
        .render(&mut engine, Size::new(0.0, 50.0))
        .expect_err("zero width");
    assert!(matches!(err, ChartError::InvalidViewport { .. }));
    assert_eq!(engine.completed_renders(), 0);
}
