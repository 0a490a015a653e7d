//! Structural rejections and tolerated malformations.

use carbon_verify_core::{
    cadence::VerificationFrequency,
    engine::calculate_project_financials,
    error::VerifyError,
    inputs::{ProjectType, VerificationInputs},
};
use chrono::NaiveDate;

fn inputs() -> VerificationInputs {
    VerificationInputs {
        project_name:            "Errors".into(),
        project_type:            ProjectType::Other,
        annual_tonnes:           12_000.0,
        price_per_tonne:         100.0,
        variable_cost_per_tonne: 50.0,
        annual_fixed_costs:      120_000.0,
        cost_of_financing:       0.12,
        verification_frequency:  VerificationFrequency::Quarterly,
        project_start_date:      NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        project_duration:        2,
        carbon_price_growth:     None,
        operational_ramp:        None,
        seasonality_factors:     None,
        discount_rate:           None,
    }
}

fn assert_invalid(inputs: &VerificationInputs, needle: &str) {
    match calculate_project_financials(inputs) {
        Err(VerifyError::InvalidConfiguration { reason }) => {
            assert!(reason.contains(needle), "reason '{reason}' should mention '{needle}'");
        }
        other => panic!("expected InvalidConfiguration, got {other:?}"),
    }
}

#[test]
fn zero_duration_is_rejected() {
    let mut i = inputs();
    i.project_duration = 0;
    assert_invalid(&i, "projectDuration");
}

#[test]
fn non_finite_numbers_are_rejected() {
    let mut i = inputs();
    i.price_per_tonne = f64::NAN;
    assert_invalid(&i, "pricePerTonne");

    let mut i = inputs();
    i.annual_fixed_costs = f64::INFINITY;
    assert_invalid(&i, "annualFixedCosts");

    let mut i = inputs();
    i.discount_rate = Some(f64::NEG_INFINITY);
    assert_invalid(&i, "discountRate");
}

#[test]
fn negative_multipliers_are_rejected() {
    let mut i = inputs();
    i.operational_ramp = Some(vec![0.5, -0.1]);
    assert_invalid(&i, "multiplier");

    let mut i = inputs();
    let mut factors = vec![1.0; 12];
    factors[7] = f64::NAN;
    i.seasonality_factors = Some(factors);
    assert_invalid(&i, "multiplier");
}

#[test]
fn total_price_collapse_is_rejected() {
    let mut i = inputs();
    i.carbon_price_growth = Some(-1.0);
    assert_invalid(&i, "carbonPriceGrowth");
}

/// Out-of-range but computable inputs are the caller's concern.
#[test]
fn range_violations_still_compute() {
    let mut i = inputs();
    i.cost_of_financing = 2.5;
    i.price_per_tonne = 5_000.0;
    assert!(!i.validate().is_empty());

    let model = calculate_project_financials(&i).unwrap();
    assert_eq!(model.monthly_projections.len(), 24);
}

#[test]
fn wrong_length_seasonality_is_ignored() {
    let _ = env_logger::builder().is_test(true).try_init();
    let baseline = calculate_project_financials(&inputs()).unwrap();

    let mut i = inputs();
    i.seasonality_factors = Some(vec![3.0; 7]);
    let model = calculate_project_financials(&i).unwrap();

    assert_eq!(model.monthly_projections, baseline.monthly_projections);
}

#[test]
fn extra_ramp_years_are_ignored() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut short = inputs();
    short.operational_ramp = Some(vec![0.4, 0.8]);
    let mut long = inputs();
    long.operational_ramp = Some(vec![0.4, 0.8, 0.1, 0.1]);

    let a = calculate_project_financials(&short).unwrap();
    let b = calculate_project_financials(&long).unwrap();
    assert_eq!(a.monthly_projections, b.monthly_projections);
    assert_eq!(a.total_project_revenue, b.total_project_revenue);
}

#[test]
fn errors_render_their_reason() {
    let err = VerifyError::invalid("projectDuration must be at least one year");
    assert!(err.to_string().contains("projectDuration"));

    let err = VerifyError::ModelNotFound { model_id: "abc".into() };
    assert!(err.to_string().contains("abc"));
}
