use super::common::*;
use std::sync::Arc;

use crate::workflows::investment::classifier::ClassifierError;
use crate::workflows::investment::domain::{ScoringNotice, ScoringStage, Verdict};
use crate::workflows::investment::features::{FeatureError, FeatureSchema, UnsupportedZipPolicy};
use crate::workflows::investment::financials::{FinancialAssumptions, FinancialError};
use crate::workflows::investment::scoring::{ScoringError, ScoringOutcome, ScoringService};

#[test]
fn scenario_a_reports_napkin_math_and_model_verdict() {
    let (service, model) = build_service(0);

    let outcome = service
        .score(Some(scenario_a_listing()))
        .expect("scoring succeeds");
    assert_eq!(outcome.stage(), ScoringStage::Reported);
    let report = outcome.into_report().expect("report produced");

    approx(report.est_rent, 2700.0);
    approx(report.metrics.monthly_expenses, 1350.0);
    approx(report.metrics.loan_amount, 225_000.0);
    approx(report.metrics.mortgage_payment, 1208.25);
    approx(report.metrics.cash_flow, 141.75);
    approx(report.metrics.cash_invested, 75_000.0);
    approx(report.metrics.annual_cash_flow, 1701.0);
    assert!((report.metrics.coc_return - 2.27).abs() < 0.01);
    assert_eq!(report.rule_verdict, Verdict::GoodBuy);
    assert_eq!(report.model_verdict, Verdict::Avoid);
    assert!(report.zip_supported);
    assert_eq!(report.address, "500 E Las Olas Blvd, Fort Lauderdale, FL 33304");
    assert_eq!(model.calls(), 1);
}

#[test]
fn classifier_sees_the_reported_rent_and_one_hot_zip() {
    let (service, model) = build_service(1);

    let report = service
        .score(Some(scenario_a_listing()))
        .expect("scoring succeeds")
        .into_report()
        .expect("report produced");

    let row = model.last_row().expect("classifier invoked");
    assert_eq!(row.len(), 13);
    assert_eq!(row[0], 300_000.0);
    assert_eq!(row[1], 3.0);
    assert_eq!(row[2], 2.0);
    assert_eq!(row[3], report.est_rent);
    assert_eq!(&row[4..], &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(report.model_verdict, Verdict::GoodBuy);
    assert!(report.verdicts_agree());
}

#[test]
fn scenario_b_unsupported_zip_still_reaches_classifier() {
    let (service, model) = build_service(1);

    let report = service
        .score(Some(scenario_b_listing()))
        .expect("scoring succeeds")
        .into_report()
        .expect("report produced");

    let row = model.last_row().expect("classifier invoked");
    assert_eq!(row[0], 100_000.0);
    approx(row[3], 900.0);
    assert!(row[4..].iter().all(|value| *value == 0.0));
    assert!(!report.zip_supported);
    assert_eq!(
        report.notices,
        vec![ScoringNotice::UnsupportedZipCode {
            zip_code: "99999".to_string()
        }]
    );
    assert_eq!(report.rule_verdict, Verdict::GoodBuy);
}

#[test]
fn scenario_c_absent_listing_short_circuits() {
    let (service, model) = build_service(1);

    let outcome = service.score(None).expect("no-data is not an error");

    assert_eq!(outcome, ScoringOutcome::NoData);
    assert_eq!(outcome.stage(), ScoringStage::Failed);
    assert!(outcome.report().is_none());
    assert_eq!(model.calls(), 0);
}

#[test]
fn reject_policy_stops_before_the_classifier() {
    let schema = FeatureSchema::standard().with_policy(UnsupportedZipPolicy::Reject);
    let (service, model) = build_service_with_schema(schema, 1);

    let result = service.score(Some(scenario_b_listing()));

    assert_eq!(
        result,
        Err(ScoringError::Feature(FeatureError::UnsupportedZipCode {
            zip_code: "99999".to_string()
        }))
    );
    assert_eq!(model.calls(), 0);
}

#[test]
fn non_finite_price_is_rejected_before_featurizing() {
    let (service, model) = build_service(1);
    let mut listing = scenario_a_listing();
    listing.price = f64::INFINITY;

    let error = service.score(Some(listing)).expect_err("price rejected");

    assert!(matches!(
        error,
        ScoringError::Financial(FinancialError::NonFinite { field: "price", .. })
    ));
    assert!(!error.is_fatal());
    assert_eq!(model.calls(), 0);
}

#[test]
fn schema_drift_is_caught_at_construction() {
    let trained = FeatureSchema::new(["33304", "33305"]).expect("schema builds");
    let model = Arc::new(RecordingClassifier::new(&trained, 1));

    let result = ScoringService::from_model(
        model,
        Arc::new(FeatureSchema::standard()),
        FinancialAssumptions::default(),
    );

    assert!(matches!(result, Err(ClassifierError::SchemaMismatch { .. })));
}

#[test]
fn non_binary_model_output_is_fatal() {
    let (service, _) = build_service(7);

    let error = service
        .score(Some(scenario_a_listing()))
        .expect_err("label rejected");

    assert_eq!(
        error,
        ScoringError::Classifier(ClassifierError::UnexpectedLabel(7))
    );
    assert!(error.is_fatal());
}

#[test]
fn custom_assumptions_flow_into_rule_verdict() {
    let schema = Arc::new(FeatureSchema::standard());
    let model = Arc::new(RecordingClassifier::new(&schema, 1));
    let pessimistic = FinancialAssumptions {
        rent_yield_rate: 0.006,
        ..FinancialAssumptions::default()
    };
    let service =
        ScoringService::from_model(model, schema, pessimistic).expect("schema matches");

    let report = service
        .score(Some(scenario_a_listing()))
        .expect("scoring succeeds")
        .into_report()
        .expect("report produced");

    approx(report.est_rent, 1800.0);
    assert!(report.metrics.cash_flow < 0.0);
    assert_eq!(report.rule_verdict, Verdict::Avoid);
    assert_eq!(report.model_verdict, Verdict::GoodBuy);
    assert_eq!(service.assumptions(), &pessimistic);
}

#[test]
fn shared_service_scores_concurrently() {
    let (service, model) = build_service(1);
    let service = Arc::new(service);

    let handles: Vec<_> = (0..8)
        .map(|index| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                let mut listing = scenario_a_listing();
                listing.price += f64::from(index) * 1_000.0;
                service
                    .score(Some(listing))
                    .expect("scoring succeeds")
                    .into_report()
                    .expect("report produced")
            })
        })
        .collect();

    for handle in handles {
        let report = handle.join().expect("thread completes");
        assert_eq!(report.model_verdict, Verdict::GoodBuy);
    }
    assert_eq!(model.calls(), 8);
}
