use flexchart::core::{AxisFormat, AxisOptions, AxisScale, DataType, LinearAxis, Rect, VolumeHelper};

#[test]
fn vertical_axis_grows_upwards() {
    let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
    let axis = LinearAxis::vertical(0.0, 10.0, rect).expect("axis");

    assert!((axis.convert(0.0) - 100.0).abs() <= 1e-9);
    assert!((axis.convert(10.0) - 0.0).abs() <= 1e-9);
    assert!((axis.convert_back(25.0) - 7.5).abs() <= 1e-9);
}

#[test]
fn degenerate_range_maps_to_center() {
    let axis = LinearAxis::horizontal(3.0, 3.0, Rect::new(10.0, 0.0, 100.0, 10.0)).expect("axis");
    assert!((axis.convert(3.0) - 60.0).abs() <= 1e-9);
}

#[test]
fn log_axis_maps_decades_evenly_and_rejects_non_positive_values() {
    let axis = LinearAxis::horizontal(1.0, 1000.0, Rect::new(0.0, 0.0, 300.0, 10.0))
        .expect("axis")
        .with_log_base(Some(10.0))
        .expect("log base");

    assert!((axis.convert(10.0) - 100.0).abs() <= 1e-9);
    assert!((axis.convert(100.0) - 200.0).abs() <= 1e-9);
    assert!(axis.convert(0.0).is_nan());
    assert!(axis.convert(-5.0).is_nan());
    assert!((axis.convert_back(200.0) - 100.0).abs() <= 1e-6);
}

#[test]
fn invalid_axis_setup_is_rejected() {
    let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert!(LinearAxis::horizontal(f64::NAN, 1.0, rect).is_err());

    let axis = LinearAxis::horizontal(0.0, 1.0, rect).expect("axis");
    assert!(axis.clone().with_log_base(Some(1.0)).is_err());
    assert!(axis.clone().with_log_base(Some(-2.0)).is_err());
    assert!(axis.with_log_base(None).is_ok());
}

#[test]
fn axis_formats_numbers_and_dates() {
    let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
    let fixed = LinearAxis::horizontal(0.0, 1.0, rect)
        .expect("axis")
        .with_format(AxisFormat::Number { decimals: Some(2) });
    assert_eq!(fixed.format_value(1.5), "1.50");
    assert_eq!(fixed.format_value(f64::NAN), "");

    let dates = LinearAxis::horizontal(0.0, 1.0, rect)
        .expect("axis")
        .with_options(&AxisOptions {
            format: AxisFormat::Date {
                pattern: "%Y-%m-%d".to_owned(),
            },
            ..AxisOptions::default()
        })
        .expect("options");
    assert_eq!(dates.format_value(1_700_438_400.0), "2023-11-20");
}

#[test]
fn volume_weighted_axis_spaces_categories_by_volume() {
    let rect = Rect::new(0.0, 0.0, 400.0, 10.0);
    let helper = VolumeHelper::new(&[1.0, 3.0], None, None, None, DataType::Number);
    let axis = LinearAxis::horizontal(-0.5, 1.5, rect)
        .expect("axis")
        .with_volume_helper(helper);

    assert!((axis.convert(0.0) - 50.0).abs() <= 1e-9);
    assert!((axis.convert(1.0) - 250.0).abs() <= 1e-9);
    assert!((axis.convert_back(250.0) - 1.0).abs() <= 1e-9);
    assert!(axis.volume_helper().is_some());
}
