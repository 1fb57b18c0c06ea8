//! Pipeline integration tests
//!
//! Windowing, indicator and trend properties checked through the public
//! API, plus end-to-end detection on a synthetic series approaching a
//! transition.

mod common;

use ews_core::{
    run_ews, ErrorKind, EwsConfig, EwsPipeline, IndicatorCalculator, IndicatorCategory,
    IndicatorKind, IndicatorRegistry, IndicatorSelection, IndicatorSequence, PValueMethod,
    TimeSeries,
};
use ews_stats::rolling_window;
use ndarray::Array1;
use proptest::prelude::*;
use rstest::rstest;

const REFERENCE: [f64; 10] = [2.0, 3.0, 4.0, 6.0, 7.0, 8.0, 5.0, 9.0, 10.0, 20.0];

fn sequence(values: &[f64]) -> IndicatorSequence {
    IndicatorSequence {
        indicator: "autocorrelation".to_string(),
        variable: 0,
        values: values.to_vec(),
    }
}

// === Windowing ===

#[test]
fn test_window_rows_are_slices() {
    let series: Array1<f64> = (0..12).map(|x| x as f64 * 1.5).collect();
    let windows = rolling_window(&series, 25.0).unwrap();

    assert_eq!(windows.dim(), (10, 3));
    for i in 0..10 {
        assert_eq!(windows.row(i), series.slice(ndarray::s![i..i + 3]));
    }
}

#[test]
fn test_window_rejects_two_dimensional_input() {
    let series = TimeSeries::univariate(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    let err = rolling_window(series.as_array(), 50.0).unwrap_err();
    assert!(matches!(err, ews_stats::StatsError::InvalidInput(_)));
}

// === Indicators ===

#[test]
fn test_core_indicator_values() {
    let series = TimeSeries::from_columns(
        (0..5).map(|t| t as f64).collect(),
        vec![
            vec![5.0, 5.0, 5.0, 5.0, 5.0],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![-2.0, -1.0, 0.0, 1.0, 2.0],
        ],
    )
    .unwrap();
    let table = IndicatorCalculator::new()
        .compute(&series, &IndicatorSelection::core())
        .unwrap();

    let variance = &table["variance"];
    assert_eq!(variance[0], 0.0);
    assert!((variance[1] - 2.0).abs() < 1e-12);

    assert!(table["skewness"][2].abs() < 1e-12);
    assert!(table["autocorrelation"][0].is_nan());
}

#[test]
fn test_linear_series_autocorrelation() {
    let series = TimeSeries::univariate((1..=10).map(|x| x as f64).collect()).unwrap();
    let table = IndicatorCalculator::new()
        .compute(
            &series,
            &IndicatorSelection::from_kinds([IndicatorKind::Autocorrelation]),
        )
        .unwrap();

    assert!((table["autocorrelation"][0] - 1.0).abs() < 1e-12);
}

#[test]
fn test_calculator_is_idempotent() {
    let series = common::slowing_down(120, 3);
    let calculator = IndicatorCalculator::new();
    let selection = IndicatorSelection::all_builtin();

    let first = calculator.compute(&series, &selection).unwrap();
    let second = calculator.compute(&series, &selection).unwrap();

    assert_eq!(first.len(), IndicatorKind::ALL.len());
    for (id, values) in &first {
        let bits: Vec<u64> = values.iter().map(|v| v.to_bits()).collect();
        let again: Vec<u64> = second[id].iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits, again, "indicator {id} changed between calls");
    }
}

// === Trend ===

#[test]
fn test_reference_trend() {
    let trend = sequence(&REFERENCE).trend(PValueMethod::Auto).unwrap();

    assert!((trend.tau - 0.8667).abs() < 1e-3);
    assert!(trend.p_value < 0.01);
}

#[test]
fn test_single_value_trend_fails() {
    let err = sequence(&[0.4]).trend(PValueMethod::Auto).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_permutation_changes_trend() {
    let ordered = sequence(&REFERENCE).trend(PValueMethod::Auto).unwrap();

    let mut permuted = REFERENCE;
    permuted.swap(0, 9);
    permuted.swap(3, 6);
    let shuffled = sequence(&permuted).trend(PValueMethod::Auto).unwrap();

    assert_ne!(ordered.tau, shuffled.tau);
    assert_ne!(ordered.p_value, shuffled.p_value);
}

// === Pipeline ===

#[test]
fn test_detects_slowing_down() {
    let series = common::slowing_down(400, 42);
    let report = run_ews(&series, 50.0, &IndicatorSelection::core()).unwrap();

    assert_eq!(report.window_count, 201);
    for id in ["autocorrelation", "variance"] {
        let trend = report.trend(0, id).unwrap();
        assert!(trend.tau > 0.7, "{id}: tau = {}", trend.tau);
        assert!(trend.p_value < 1e-3, "{id}: p = {}", trend.p_value);
        assert_eq!(trend.method, PValueMethod::Asymptotic);
    }
}

#[test]
fn test_multivariate_keys() {
    let noise = common::white_noise(60, 9);
    let series = TimeSeries::from_columns(
        (0..60).map(|t| t as f64 * 0.5).collect(),
        vec![noise.clone(), noise.iter().map(|v| v * 2.0).collect()],
    )
    .unwrap()
    .with_names(vec!["temperature", "salinity"])
    .unwrap();

    let report = run_ews(&series, 40.0, &IndicatorSelection::core()).unwrap();
    assert_eq!(report.len(), 6);
    assert_eq!(report.get(1, "skewness").unwrap().variable_name, "salinity");

    // Scaling a variable leaves the rank trend of its variance unchanged
    let a = report.trend(0, "variance").unwrap();
    let b = report.trend(1, "variance").unwrap();
    assert_eq!(a.tau, b.tau);

    let keys: Vec<_> = report.trends().into_keys().collect();
    assert_eq!(keys.len(), 6);
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_config_driven_pipeline() {
    let config = EwsConfig::from_toml(
        r#"
        [window]
        size_percent = 30.0

        [indicators]
        selected = ["standard_deviation", "kurtosis", "density_ratio", "return_rate"]

        [trend]
        alpha = 0.01
        "#,
    )
    .unwrap();
    let pipeline = EwsPipeline::new(config).unwrap();
    let report = pipeline.run(&common::slowing_down(200, 5)).unwrap();

    assert_eq!(report.window_length, 60);
    assert_eq!(report.alpha, 0.01);
    assert_eq!(report.len(), 4);
    assert!(report.trend(0, "standard_deviation").unwrap().tau > 0.0);
    assert!(report.trend(0, "variance").is_none());
}

#[test]
fn test_flat_series_has_no_memory_signal() {
    // A population sitting at carrying capacity
    let series = TimeSeries::univariate(vec![0.013; 40]).unwrap();
    let selection = IndicatorSelection::from_kinds([
        IndicatorKind::Autocorrelation,
        IndicatorKind::Ar1,
        IndicatorKind::Variance,
    ]);
    let report = run_ews(&series, 50.0, &selection).unwrap();

    for id in ["autocorrelation", "ar1"] {
        let result = report.get(0, id).unwrap();
        assert!(
            result.sequence.values.iter().all(|v| v.is_nan()),
            "{id}: {:?}",
            &result.sequence.values[..3]
        );
        assert!(result.trend.is_degenerate());
    }
    let variance = report.get(0, "variance").unwrap();
    assert!(variance.sequence.values.iter().all(|&v| v == 0.0));
    assert!(report.signals().is_empty());
}

#[test]
fn test_custom_indicator_in_pipeline() {
    let mut registry = IndicatorRegistry::new();
    registry.register_fn("window_max", "Window Maximum", IndicatorCategory::Custom, |col| {
        col.fold(f64::NEG_INFINITY, |a, &b| a.max(b))
    });
    let config =
        EwsConfig::new().with_indicators(IndicatorSelection::new().with("window_max"));
    let pipeline = EwsPipeline::with_registry(config, registry).unwrap();

    let series = TimeSeries::univariate((0..20).map(|t| t as f64).collect()).unwrap();
    let report = pipeline.run(&series).unwrap();

    let result = report.get(0, "window_max").unwrap();
    assert_eq!(result.sequence.values[0], 9.0);
    assert_eq!(result.trend.tau, 1.0);
}

#[test]
fn test_significant_filter() {
    let report = run_ews(
        &common::slowing_down(300, 7),
        50.0,
        &IndicatorSelection::core(),
    )
    .unwrap();
    let significant: Vec<&str> = report
        .significant(0.01)
        .into_iter()
        .map(|r| r.sequence.indicator.as_str())
        .collect();

    assert!(significant.contains(&"variance"));
}

#[rstest]
#[case(0.0)]
#[case(-5.0)]
#[case(150.0)]
#[case(f64::NAN)]
fn test_invalid_window_percentage(#[case] percent: f64) {
    let series = TimeSeries::univariate(vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    let err = run_ews(&series, percent, &IndicatorSelection::core()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[rstest]
#[case(IndicatorKind::Autocorrelation)]
#[case(IndicatorKind::Variance)]
#[case(IndicatorKind::Skewness)]
#[case(IndicatorKind::Kurtosis)]
#[case(IndicatorKind::CoefficientOfVariation)]
#[case(IndicatorKind::Ar1)]
fn test_each_indicator_runs(#[case] kind: IndicatorKind) {
    let series = common::slowing_down(80, 11);
    let report = run_ews(&series, 50.0, &IndicatorSelection::from_kinds([kind])).unwrap();

    let result = report.get(0, kind.id()).unwrap();
    assert_eq!(result.sequence.len(), report.window_count);
}

#[test]
fn test_window_too_small_for_series() {
    let series = TimeSeries::univariate(vec![1.0, 2.0, 3.0]).unwrap();
    let err = run_ews(&series, 10.0, &IndicatorSelection::core()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

proptest! {
    #[test]
    fn prop_sequences_cover_every_window(
        values in proptest::collection::vec(-50.0f64..50.0, 8..80),
        percent in 10.0f64..90.0,
    ) {
        let n = values.len();
        let series = TimeSeries::univariate(values).unwrap();
        match run_ews(&series, percent, &IndicatorSelection::core()) {
            Ok(report) => {
                prop_assert_eq!(report.window_count, n - report.window_length + 1);
                for result in report.results.values() {
                    prop_assert_eq!(result.sequence.len(), report.window_count);
                    if !result.trend.is_degenerate() {
                        prop_assert!((-1.0..=1.0).contains(&result.trend.tau));
                    }
                }
            }
            Err(e) => prop_assert_eq!(e.kind(), ErrorKind::InvalidParameter),
        }
    }
}
