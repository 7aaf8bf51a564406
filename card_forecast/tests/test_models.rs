use card_forecast::models::{
    ExponentialSmoothing, FileModelRepository, ForecastingModel, HoltLinear, LinearTrend,
    ModelArtifact, ModelFile, ModelRepository, MovingAverage, SeasonalNaive,
};
use card_forecast::PipelineError;
use rstest::rstest;
use tempfile::TempDir;

fn artifacts() -> Vec<ModelArtifact> {
    vec![
        ModelArtifact::SimpleExpSmoothing(ExponentialSmoothing::new(104.0).unwrap()),
        ModelArtifact::HoltLinear(HoltLinear::new(100.0, 1.5, Some(0.9)).unwrap()),
        ModelArtifact::MovingAverage(MovingAverage::new(vec![100.0, 102.0, 104.0]).unwrap()),
        ModelArtifact::SeasonalNaive(SeasonalNaive::new(vec![1.0, 2.0, 3.0, 4.0]).unwrap()),
        ModelArtifact::LinearTrend(LinearTrend::new(50.0, 0.5, 36).unwrap()),
    ]
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(12)]
#[case(24)]
fn test_saved_models_predict_horizon_points(#[case] horizon: usize) {
    let dir = TempDir::new().unwrap();
    let repo = FileModelRepository::new(dir.path());

    for (i, artifact) in artifacts().into_iter().enumerate() {
        let reference = format!("model_{}", i);
        ModelFile::new(&reference, artifact)
            .save_json(dir.path().join(format!("{}.json", reference)))
            .unwrap();

        let model = repo.load_model(&reference).unwrap();
        let predictions = model.predict(horizon).unwrap();

        assert_eq!(model.name(), reference);
        assert_eq!(predictions.len(), horizon);
        assert!(predictions.iter().all(|p| p.value.is_finite()));
    }
}

#[test]
fn test_hand_written_artifact() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("modelTesis_Produbanco.json"),
        r#"{"name": "modelTesis_Produbanco",
            "model": {"kind": "holt_linear", "level": 2000.0, "trend": 10.0}}"#,
    )
    .unwrap();

    let repo = FileModelRepository::new(dir.path());
    let model = repo.load_model("modelTesis_Produbanco").unwrap();
    let values: Vec<f64> = model.predict(3).unwrap().iter().map(|p| p.value).collect();

    assert_eq!(values, vec![2010.0, 2020.0, 2030.0]);
}

#[test]
fn test_missing_model_is_model_not_found() {
    let dir = TempDir::new().unwrap();
    let repo = FileModelRepository::new(dir.path());

    let err = repo.load_model("datos_deploy/modelTesis_Nadie").unwrap_err();
    assert!(matches!(
        err,
        PipelineError::ModelNotFound { ref reference, .. }
            if reference == "datos_deploy/modelTesis_Nadie"
    ));
}

#[rstest]
#[case::not_json("this is not json")]
#[case::unknown_kind(r#"{"name": "x", "model": {"kind": "arima", "p": 1}}"#)]
#[case::invalid_state(r#"{"name": "x", "model": {"kind": "moving_average", "window": []}}"#)]
fn test_unreadable_model_is_model_not_found(#[case] contents: &str) {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.json"), contents).unwrap();

    let repo = FileModelRepository::new(dir.path());
    assert!(matches!(
        repo.load_model("broken"),
        Err(PipelineError::ModelNotFound { .. })
    ));
}

#[test]
fn test_linear_trend_origin_overflow_is_prediction_failure() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("trend.json"),
        r#"{"name": "trend", "model": {"kind": "linear_trend", "intercept": 1.0, "slope": 0.0, "origin": 9223372036854775807}}"#,
    )
    .unwrap();

    let model = FileModelRepository::new(dir.path())
        .load_model("trend")
        .unwrap();
    assert!(matches!(
        model.predict(3),
        Err(PipelineError::PredictionFailure(_))
    ));
}
