use flexchart::api::{AxisFormat, LegendOptions, LegendPosition, Margins};
use flexchart::core::{AxisOptions, Point, Series, Size};
use flexchart::render::RecordingEngine;
use flexchart::{ChartConfig, ChartCore, ChartElement, ChartType};

fn bare_config(chart_type: ChartType) -> ChartConfig {
    ChartConfig::new(chart_type)
        .with_legend(LegendOptions {
            position: LegendPosition::None,
            ..LegendOptions::default()
        })
        .with_plot_margin(Margins::uniform(0.0))
}

fn rendered(config: ChartConfig, series: Vec<Series>) -> ChartCore {
    let mut chart = ChartCore::new(config).expect("chart");
    chart.set_series(series);
    let mut engine = RecordingEngine::new();
    chart
        .render(&mut engine, Size::new(100.0, 100.0))
        .expect("render");
    chart
}

#[test]
fn probe_on_symbol_reports_point_and_formatted_values() {
    let config = bare_config(ChartType::LineSymbols).with_axis_y(AxisOptions {
        format: AxisFormat::Number { decimals: Some(2) },
        ..AxisOptions::default()
    });
    let chart = rendered(config, vec![Series::new("sales").with_y_values(vec![0.0, 10.0])]);

    let info = chart.hit_test(Point::new(98.0, 2.0));
    assert_eq!(info.chart_element, ChartElement::SeriesSymbol);
    assert_eq!(info.series_index, Some(0));
    assert_eq!(info.series_name.as_deref(), Some("sales"));
    assert_eq!(info.point_index, Some(1));
    assert_eq!(info.distance, 0.0);
    assert_eq!((info.x, info.y), (1.0, 10.0));
    assert_eq!(info.x_formatted, "1");
    assert_eq!(info.y_formatted, "10.00");
    assert_eq!(info.plot_area, Some(0));
    assert_eq!(info.item.map(|item| item.y), Some(10.0));
}

#[test]
fn probe_on_line_between_symbols_reports_series() {
    let chart = rendered(
        bare_config(ChartType::LineSymbols),
        vec![Series::new("a").with_y_values(vec![0.0, 10.0])],
    );

    let info = chart.hit_test(Point::new(50.0, 50.0));
    assert_eq!(info.chart_element, ChartElement::Series);
    assert_eq!(info.series_index, Some(0));
    assert_eq!(info.point_index, None);
    assert_eq!(info.distance, 0.0);
}

#[test]
fn probe_near_data_reports_plot_area_and_nearest_distance() {
    let chart = rendered(
        bare_config(ChartType::LineSymbols),
        vec![Series::new("a").with_y_values(vec![0.0, 10.0])],
    );

    let info = chart.hit_test(Point::new(50.0, 20.0));
    assert_eq!(info.chart_element, ChartElement::PlotArea);
    assert_eq!(info.series_index, Some(0));
    assert!((info.distance - 30.0 / 2.0_f64.sqrt()).abs() <= 1e-9);

    let outside = chart.hit_test(Point::new(150.0, 150.0));
    assert_eq!(outside.chart_element, ChartElement::None);
    assert!(outside.distance > 0.0);
}

#[test]
fn scatter_probe_ignores_lines_and_picks_nearest_symbol() {
    let chart = rendered(
        bare_config(ChartType::Scatter),
        vec![
            Series::new("a").with_y_values(vec![0.0, 10.0]),
            Series::new("b").with_y_values(vec![10.0, 0.0]),
        ],
    );

    let info = chart.hit_test(Point::new(3.0, 3.0));
    assert_eq!(info.chart_element, ChartElement::SeriesSymbol);
    assert_eq!(info.series_index, Some(1));
    assert_eq!(info.point_index, Some(0));
}

#[test]
fn rotated_chart_keeps_logical_coordinates() {
    let chart = rendered(
        bare_config(ChartType::LineSymbols).with_rotated(true),
        vec![Series::new("a").with_y_values(vec![0.0, 10.0, 5.0])],
    );

    let info = chart.hit_test(Point::new(100.0, 50.0));
    assert_eq!(info.chart_element, ChartElement::SeriesSymbol);
    assert_eq!(info.point_index, Some(1));
    assert_eq!((info.x, info.y), (1.0, 10.0));

    let (x_axis, y_axis) = chart.axes(0).expect("axes");
    assert_eq!(x_axis.pixel_range(), (100.0, 0.0));
    assert_eq!(y_axis.pixel_range(), (0.0, 100.0));
}

#[test]
fn stacked_symbols_report_raw_values() {
    let chart = rendered(
        bare_config(ChartType::LineSymbols).with_stacking(flexchart::api::Stacking::Stacked),
        vec![
            Series::new("a").with_y_values(vec![1.0, 2.0]),
            Series::new("b").with_y_values(vec![3.0, 4.0]),
        ],
    );

    let info = chart.hit_test(Point::new(0.0, 40.0));
    assert_eq!(info.series_index, Some(1));
    assert_eq!(info.point_index, Some(0));
    assert_eq!(info.y, 3.0);
}

#[test]
fn custom_axis_values_are_formatted_with_series_axis() {
    let config = bare_config(ChartType::Scatter).with_axis_y(AxisOptions {
        format: AxisFormat::Number { decimals: Some(1) },
        ..AxisOptions::default()
    });
    let chart = rendered(
        config,
        vec![
            Series::new("main").with_y_values(vec![0.0, 10.0]),
            Series::new("secondary")
                .with_y_values(vec![2000.0, 1000.0])
                .with_custom_axis_y(true),
        ],
    );

    let info = chart.hit_test(Point::new(0.0, 0.0));
    assert_eq!(info.series_index, Some(1));
    assert_eq!(info.y, 2000.0);
    assert_eq!(info.y_formatted, "2000.0");
}

#[test]
fn legend_probe_reports_series() {
    let config = ChartConfig::new(ChartType::Line).with_plot_margin(Margins::uniform(0.0));
    let chart = rendered(
        config,
        vec![
            Series::new("first").with_y_values(vec![1.0, 2.0]),
            Series::new("second").with_y_values(vec![2.0, 1.0]),
        ],
    );

    let entry = chart.legend().item_rects()[1].expect("second entry");
    let info = chart.hit_test(entry.center());
    assert_eq!(info.chart_element, ChartElement::Legend);
    assert_eq!(info.series_index, Some(1));
    assert_eq!(info.series_name.as_deref(), Some("second"));
}

#[test]
fn per_series_probe_includes_lines() {
    let chart = rendered(
        bare_config(ChartType::LineSymbols),
        vec![
            Series::new("a").with_y_values(vec![0.0, 10.0]),
            Series::new("b").with_y_values(vec![10.0, 0.0]),
        ],
    );

    let info = chart
        .hit_test_series(Point::new(50.0, 50.0), 0)
        .expect("series 0");
    assert_eq!(info.series_index, Some(0));
    assert_eq!(info.chart_element, ChartElement::Series);
    assert!(chart.hit_test_series(Point::new(50.0, 50.0), 5).is_none());
}

#[test]
fn changing_data_discards_previous_hit_areas() {
    let mut chart = rendered(
        bare_config(ChartType::Scatter),
        vec![Series::new("a").with_y_values(vec![0.0, 10.0])],
    );
    assert!(chart.hit_test(Point::new(0.0, 100.0)).series_index.is_some());

    chart.set_series(vec![Series::new("b").with_y_values(vec![5.0])]);
    assert!(chart.arena().is_empty());
    let info = chart.hit_test(Point::new(0.0, 100.0));
    assert_eq!(info.series_index, None);
    assert_ne!(info.chart_element, ChartElement::SeriesSymbol);
}
