use approx::assert_relative_eq;
use flexchart::api::{LegendOptions, LegendPosition, Margins};
use flexchart::core::{Point, Series, SeriesStyle, Size};
use flexchart::plotter::{BubbleOptions, BubblePlotter};
use flexchart::render::{Color, DrawShape, RecordingEngine};
use flexchart::{ChartConfig, ChartCore, ChartElement, ChartType};

fn bare_config(chart_type: ChartType) -> ChartConfig {
    ChartConfig::new(chart_type)
        .with_legend(LegendOptions {
            position: LegendPosition::None,
            ..LegendOptions::default()
        })
        .with_plot_margin(Margins::uniform(0.0))
}

fn bubbles(engine: &RecordingEngine) -> Vec<(Point, f64)> {
    engine
        .draws_with_class("series-symbol")
        .filter_map(|draw| match draw.shape {
            DrawShape::Ellipse { center, rx, .. } => Some((center, rx)),
            _ => None,
        })
        .collect()
}

#[test]
fn bubble_area_scales_with_size_value() {
    let plotter = BubblePlotter::new(BubbleOptions::default());
    assert_relative_eq!(plotter.bubble_size(0.0), 30.0);

    let mut chart = ChartCore::new(bare_config(ChartType::Bubble)).expect("chart");
    chart.push_series(
        Series::new("b")
            .with_y_values(vec![0.0, 10.0, 5.0])
            .with_size_values(vec![1.0, 5.0, 2.0]),
    );
    let mut engine = RecordingEngine::new();
    chart
        .render(&mut engine, Size::new(130.0, 130.0))
        .expect("render");

    let drawn = bubbles(&engine);
    assert_eq!(drawn.len(), 3);
    assert_relative_eq!(2.0 * drawn[0].1, 5.0);
    assert_relative_eq!(2.0 * drawn[1].1, 30.0);
    // sqrt(1/4) of the size span above the minimum
    assert_relative_eq!(2.0 * drawn[2].1, 17.5);
}

#[test]
fn limits_are_padded_so_largest_bubble_fits() {
    let mut chart = ChartCore::new(bare_config(ChartType::Bubble)).expect("chart");
    chart.push_series(
        Series::new("b")
            .with_y_values(vec![0.0, 10.0])
            .with_size_values(vec![1.0, 4.0]),
    );
    let mut engine = RecordingEngine::new();
    chart
        .render(&mut engine, Size::new(130.0, 130.0))
        .expect("render");

    let (x_axis, y_axis) = chart.axes(0).expect("axes");
    let (x_min, x_max) = x_axis.data_range();
    let (y_min, y_max) = y_axis.data_range();
    assert_relative_eq!(x_min, -0.15, epsilon = 1e-12);
    assert_relative_eq!(x_max, 1.15, epsilon = 1e-12);
    assert_relative_eq!(y_min, -1.5, epsilon = 1e-12);
    assert_relative_eq!(y_max, 11.5, epsilon = 1e-12);

    let drawn = bubbles(&engine);
    assert_relative_eq!(drawn[0].0.x, 15.0, epsilon = 1e-9);
    assert_relative_eq!(drawn[0].0.y, 115.0, epsilon = 1e-9);
    assert_relative_eq!(drawn[1].0.x, 115.0, epsilon = 1e-9);
    assert_relative_eq!(drawn[1].0.y, 15.0, epsilon = 1e-9);
}

#[test]
fn hit_areas_follow_rendered_bubble_size() {
    let mut chart = ChartCore::new(bare_config(ChartType::Bubble)).expect("chart");
    chart.push_series(
        Series::new("b")
            .with_y_values(vec![0.0, 10.0])
            .with_size_values(vec![1.0, 4.0]),
    );
    let mut engine = RecordingEngine::new();
    chart
        .render(&mut engine, Size::new(130.0, 130.0))
        .expect("render");

    let big = chart.hit_test(Point::new(129.0, 15.0));
    assert_eq!(big.chart_element, ChartElement::SeriesSymbol);
    assert_eq!(big.point_index, Some(1));

    let small = chart.hit_test(Point::new(19.0, 115.0));
    assert_eq!(small.chart_element, ChartElement::PlotArea);
    assert_eq!(small.point_index, Some(0));
    assert_relative_eq!(small.distance, 1.5, epsilon = 1e-9);
}

#[test]
fn bubble_without_size_value_is_skipped_but_stays_hit_testable() {
    let mut chart = ChartCore::new(bare_config(ChartType::Bubble)).expect("chart");
    chart.push_series(
        Series::new("b")
            .with_y_values(vec![0.0, 10.0])
            .with_size_values(vec![1.0]),
    );
    let mut engine = RecordingEngine::new();
    chart
        .render(&mut engine, Size::new(130.0, 130.0))
        .expect("render");

    let drawn = bubbles(&engine);
    assert_eq!(drawn.len(), 1);
    assert_relative_eq!(2.0 * drawn[0].1, 30.0);

    let info = chart.hit_test(Point::new(119.0, 15.0));
    assert_eq!(info.chart_element, ChartElement::SeriesSymbol);
    assert_eq!(info.point_index, Some(1));
    assert_eq!(chart.point_for_element(0, 0), Some(0));
    assert_eq!(chart.point_for_element(0, 1), None);
}

#[test]
fn scatter_negative_values_use_alternate_colors() {
    let alt = Color::from_rgb8(200, 0, 0);
    let mut chart = ChartCore::new(bare_config(ChartType::Scatter)).expect("chart");
    chart.push_series(Series::new("s").with_y_values(vec![-1.0, 1.0]).with_style(
        SeriesStyle {
            alt_fill: Some(alt),
            ..SeriesStyle::default()
        },
    ));
    let mut engine = RecordingEngine::new();
    chart
        .render(&mut engine, Size::new(100.0, 100.0))
        .expect("render");

    let fills: Vec<_> = engine
        .draws_with_class("series-symbol")
        .map(|draw| draw.style.fill)
        .collect();
    assert_eq!(fills[0], Some(alt));
    assert_eq!(fills[1], Some(chart.config().palette[0]));
}

#[test]
fn bubble_options_are_validated() {
    assert!(
        BubbleOptions {
            min_size: 20.0,
            max_size: 10.0
        }
        .validate()
        .is_err()
    );
    let config = bare_config(ChartType::Bubble).with_bubble(BubbleOptions {
        min_size: -1.0,
        max_size: 10.0,
    });
    assert!(ChartCore::new(config).is_err());
}
