use card_forecast::{PipelineError, Stage};
use forecast_math::MathError;

#[test]
fn test_error_display() {
    let error = PipelineError::ModelNotFound {
        reference: "datos_deploy/modelTesis_Todo".to_string(),
        reason: "No such file or directory".to_string(),
    };
    let error_string = format!("{}", error);

    assert!(error_string.contains("Model not found"));
    assert!(error_string.contains("modelTesis_Todo"));
}

#[test]
fn test_user_messages() {
    let model = PipelineError::ModelNotFound {
        reference: "m".to_string(),
        reason: "gone".to_string(),
    };
    let data = PipelineError::DataNotFound {
        reference: "d".to_string(),
        reason: "gone".to_string(),
    };
    let prediction = PipelineError::PredictionFailure("boom".to_string());

    assert_eq!(
        model.user_message(),
        "Modelo no encontrado. Verifique la ruta y vuelva a intentarlo."
    );
    assert_eq!(
        data.user_message(),
        "Datos no encontrados. Verifique la ruta y vuelva a intentarlo."
    );
    assert_eq!(
        prediction.user_message(),
        "Ha ocurrido un error durante la predicción: boom"
    );
}

#[test]
fn test_every_kind_maps_to_a_stage() {
    let cases = [
        (PipelineError::PredictionFailure(String::new()), Stage::Generation),
        (PipelineError::EvaluationFailure(String::new()), Stage::Evaluation),
        (PipelineError::MergeInconsistency(String::new()), Stage::Merge),
        (PipelineError::Config(String::new()), Stage::Selection),
    ];

    for (error, stage) in cases {
        assert_eq!(error.stage(), stage);
        assert!(!error.user_message().is_empty());
    }
}

#[test]
fn test_result_mapping() {
    let result: Result<f64, MathError> = Err(MathError::InsufficientData("empty".to_string()));
    let mapped = result.map_err(PipelineError::from);

    if let Err(PipelineError::EvaluationFailure(msg)) = mapped {
        assert!(msg.contains("empty"));
    } else {
        panic!("Wrong error variant");
    }
}
