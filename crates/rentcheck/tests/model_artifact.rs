use std::sync::Arc;

use rentcheck::workflows::investment::{
    ClassifierError, FeatureSchema, FinancialAssumptions, ForestModel, InvestmentClassifier,
    ModelLoadError, ScoringService,
};

const MODEL_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/model.json");

#[test]
fn fixture_model_is_trained_on_standard_columns() {
    let model = ForestModel::from_path(MODEL_FIXTURE).expect("fixture model loads");

    assert_eq!(model.tree_count(), 3);
    assert_eq!(model.feature_names(), FeatureSchema::standard().columns());
}

#[test]
fn model_for_other_zip_set_is_rejected_at_startup() {
    let model = ForestModel::from_path(MODEL_FIXTURE).expect("fixture model loads");
    let schema = FeatureSchema::new(["33304", "33305"]).expect("valid zips");

    let err = match ScoringService::from_model(
        Arc::new(model),
        Arc::new(schema),
        FinancialAssumptions::default(),
    ) {
        Err(err) => err,
        Ok(_) => panic!("schema drift must not produce a service"),
    };
    assert!(matches!(err, ClassifierError::SchemaMismatch { .. }));
}

#[test]
fn missing_model_file_is_io_error() {
    let err = ForestModel::from_path("/nonexistent/rentcheck/model.json").expect_err("missing");
    assert!(matches!(err, ModelLoadError::Io(_)));
}

#[test]
fn malformed_artifacts_are_rejected() {
    let not_json = ForestModel::from_reader("{ trees: ".as_bytes()).expect_err("bad json");
    assert!(matches!(not_json, ModelLoadError::Json(_)));

    let no_trees = r#"{ "feature_names": ["price"], "trees": [] }"#;
    let err = ForestModel::from_reader(no_trees.as_bytes()).expect_err("empty ensemble");
    assert!(matches!(err, ModelLoadError::Empty));

    let cycle = r#"{
        "feature_names": ["price"],
        "trees": [{ "nodes": [
            { "split": { "feature": 0, "threshold": 1.0, "left": 0, "right": 1 } },
            { "leaf": { "label": 1 } }
        ] }]
    }"#;
    let err = ForestModel::from_reader(cycle.as_bytes()).expect_err("self edge");
    assert!(matches!(err, ModelLoadError::BackwardEdge { .. }));

    let three_class = r#"{
        "feature_names": ["price"],
        "trees": [{ "nodes": [{ "leaf": { "label": 2 } }] }]
    }"#;
    let err = ForestModel::from_reader(three_class.as_bytes()).expect_err("non-binary");
    assert!(matches!(err, ModelLoadError::NonBinaryLabel { .. }));
}
