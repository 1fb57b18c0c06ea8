//! Kendall trend report for a set of indicator sequences, followed by a
//! full pipeline run on a synthetic series that slows down over time.
//!
//! Run with `RUST_LOG=debug cargo run -p ews-core --example trend_report`.

use ews_core::{
    EwsConfig, EwsPipeline, EwsResult, IndicatorKind, IndicatorSelection, IndicatorSequence,
    PValueMethod, TimeSeries,
};
use tracing_subscriber::EnvFilter;

fn main() -> EwsResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Precomputed indicator sequences, one value per window
    let sequences = [
        ("AR", IndicatorKind::Ar1),
        ("ACF", IndicatorKind::Autocorrelation),
        ("SD", IndicatorKind::StandardDeviation),
        ("SK", IndicatorKind::Skewness),
        ("KU", IndicatorKind::Kurtosis),
        ("DENSITYRATIO", IndicatorKind::DensityRatio),
        ("RETURNRATE", IndicatorKind::ReturnRate),
        ("CV", IndicatorKind::CoefficientOfVariation),
    ];
    let values = vec![2.0, 3.0, 4.0, 6.0, 7.0, 8.0, 5.0, 9.0, 10.0, 20.0];

    for (label, kind) in sequences {
        let sequence = IndicatorSequence {
            indicator: kind.id().to_string(),
            variable: 0,
            values: values.clone(),
        };
        let trend = sequence.trend(PValueMethod::Auto)?;
        println!(
            "Kt{label} (Tau,p_value): {:.4}, {:.4}",
            trend.tau, trend.p_value
        );
    }

    // AR(1) with a coefficient ramping towards 1
    let n = 500;
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut x = 0.0;
    let series: Vec<f64> = (0..n)
        .map(|t| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let shock = (state >> 11) as f64 / (1u64 << 53) as f64 - 0.5;
            let phi = 0.2 + 0.75 * t as f64 / n as f64;
            x = phi * x + shock;
            x
        })
        .collect();
    let series = TimeSeries::univariate(series)?.with_names(vec!["population"])?;

    let config = EwsConfig::new()
        .with_window_percent(50.0)
        .with_indicators(IndicatorSelection::all_builtin());
    let report = EwsPipeline::new(config)?.run(&series)?;

    println!(
        "\n{} windows of {} observations",
        report.window_count, report.window_length
    );
    for result in report.results.values() {
        println!(
            "{:>26}: tau = {:+.4}, p = {:.3e} ({:?})",
            result.sequence.indicator, result.trend.tau, result.trend.p_value, result.trend.method
        );
    }

    let signals: Vec<&str> = report
        .signals()
        .into_iter()
        .map(|r| r.sequence.indicator.as_str())
        .collect();
    println!("\nSignificant at alpha = {}: {:?}", report.alpha, signals);

    Ok(())
}
