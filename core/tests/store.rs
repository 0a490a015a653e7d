//! Saved-model persistence tests.

use carbon_verify_core::{
    cadence::VerificationFrequency,
    engine::calculate_project_financials,
    error::VerifyError,
    inputs::{ProjectType, VerificationInputs},
    model::VerificationFinancialModel,
    store::ModelStore,
};
use chrono::NaiveDate;

fn store() -> ModelStore {
    let store = ModelStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn model(name: &str, frequency: VerificationFrequency) -> VerificationFinancialModel {
    let inputs = VerificationInputs {
        project_name:            name.into(),
        project_type:            ProjectType::SoilCarbon,
        annual_tonnes:           8_000.0,
        price_per_tonne:         60.0,
        variable_cost_per_tonne: 25.0,
        annual_fixed_costs:      150_000.0,
        cost_of_financing:       0.1,
        verification_frequency:  frequency,
        project_start_date:      NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        project_duration:        3,
        carbon_price_growth:     Some(0.03),
        operational_ramp:        Some(vec![0.5, 0.9]),
        seasonality_factors:     None,
        discount_rate:           Some(0.1),
    };
    calculate_project_financials(&inputs).expect("model")
}

#[test]
fn saved_model_loads_back() {
    let store = store();
    let original = model("Prairie Soil", VerificationFrequency::Quarterly);

    let id = store.save_model(&original, "user-1", Some("first pass"), &[]).unwrap();
    let loaded = store.require_model(&id).unwrap();

    assert_eq!(loaded.inputs, original.inputs);
    assert_eq!(loaded.monthly_projections.len(), original.monthly_projections.len());
    assert_eq!(loaded.verification_events.len(), original.verification_events.len());
    assert_eq!(loaded.payback_period, original.payback_period);
    assert_eq!(
        loaded.comparison.recommended_frequency,
        original.comparison.recommended_frequency
    );
    assert!((loaded.total_project_revenue - original.total_project_revenue).abs() < 1e-6);
    assert!((loaded.npv - original.npv).abs() < 1e-6);
}

#[test]
fn list_is_scoped_to_user_and_keeps_tags() {
    let store = store();
    let tags = vec!["pilot".to_string(), "kenya".to_string()];

    let first = store
        .save_model(&model("A", VerificationFrequency::Monthly), "alice", None, &tags)
        .unwrap();
    let second = store
        .save_model(&model("B", VerificationFrequency::Annual), "alice", Some("annual"), &[])
        .unwrap();
    store
        .save_model(&model("C", VerificationFrequency::Monthly), "bob", None, &[])
        .unwrap();

    let listed = store.list_models("alice").unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].model_id, first);
    assert_eq!(listed[0].tags, tags);
    assert_eq!(listed[0].project_type, "soil_carbon");
    assert_eq!(listed[0].description, None);
    assert_eq!(listed[1].model_id, second);
    assert_eq!(listed[1].verification_frequency, "annual");
    assert_eq!(listed[1].description.as_deref(), Some("annual"));

    assert!(store.list_models("carol").unwrap().is_empty());
    assert_eq!(store.model_count().unwrap(), 3);
}

#[test]
fn missing_model_is_reported() {
    let store = store();
    assert!(store.load_model("no-such-id").unwrap().is_none());

    match store.require_model("no-such-id") {
        Err(VerifyError::ModelNotFound { model_id }) => assert_eq!(model_id, "no-such-id"),
        other => panic!("expected ModelNotFound, got {other:?}"),
    }
}

#[test]
fn delete_removes_only_the_target() {
    let store = store();
    let keep = store
        .save_model(&model("Keep", VerificationFrequency::Monthly), "u", None, &[])
        .unwrap();
    let drop = store
        .save_model(&model("Drop", VerificationFrequency::Monthly), "u", None, &[])
        .unwrap();

    assert!(store.delete_model(&drop).unwrap());
    assert!(!store.delete_model(&drop).unwrap());
    assert!(store.load_model(&drop).unwrap().is_none());
    assert!(store.load_model(&keep).unwrap().is_some());
    assert_eq!(store.model_count().unwrap(), 1);
}

#[test]
fn migrate_is_idempotent() {
    let store = store();
    store.migrate().expect("second migration");
    assert_eq!(store.model_count().unwrap(), 0);
}
