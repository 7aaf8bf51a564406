use approx::assert_relative_eq;
use card_forecast::evaluation::{evaluate, evaluate_values};
use card_forecast::{ForecastResult, PipelineError};
use chrono::NaiveDate;
use rstest::rstest;

fn forecast(values: &[f64]) -> ForecastResult {
    let points = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            (
                NaiveDate::from_ymd_opt(2024, i as u32 + 1, 1).unwrap(),
                *v,
            )
        })
        .collect();
    ForecastResult::new("Predicción", "test", points).unwrap()
}

#[rstest]
#[case(vec![10.0, 20.0, 30.0], vec![12.0, 18.0, 33.0])]
#[case(vec![5.0, 5.0, 5.0, 5.0], vec![4.0, 6.0, 5.0, 5.5])]
#[case(vec![1.0], vec![100.0])]
#[case(vec![100.0, 90.0, 80.0, 70.0, 60.0, 50.0], vec![50.0, 60.0, 70.0, 80.0, 90.0, 100.0])]
fn test_metric_properties(#[case] actuals: Vec<f64>, #[case] predicted: Vec<f64>) {
    let report = evaluate(&forecast(&predicted), &actuals).unwrap();

    assert!(report.mse.is_finite() && report.mse >= 0.0);
    assert_relative_eq!(report.rmse, report.mse.sqrt());
    assert!(report.mae >= 0.0);
    assert!(report.r2 <= 1.0);
    assert_eq!(report.window, predicted.len());
}

#[test]
fn test_perfect_forecast() {
    let report = evaluate_values(&[3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(report.mse, 0.0);
    assert_eq!(report.mae, 0.0);
    assert_eq!(report.r2, 1.0);
}

#[test]
fn test_short_actuals_fail() {
    let err = evaluate(&forecast(&[1.0, 2.0, 3.0]), &[1.0, 2.0]).unwrap_err();
    assert!(matches!(err, PipelineError::EvaluationFailure(_)));
}

#[test]
fn test_non_finite_actuals_fail() {
    let err = evaluate_values(&[1.0], &[f64::NAN]).unwrap_err();
    assert!(matches!(err, PipelineError::EvaluationFailure(_)));
}
