//! Climate-risk score tests.

use carbon_verify_core::{
    cadence::VerificationFrequency,
    config::EngineConfig,
    engine::{calculate_project_financials, FinancialEngine},
    error::VerifyError,
    inputs::{ProjectType, VerificationInputs},
    risk::climate_risk_score,
};
use chrono::NaiveDate;

fn inputs(project_type: ProjectType, frequency: VerificationFrequency) -> VerificationInputs {
    VerificationInputs {
        project_name:            "Risk".into(),
        project_type,
        annual_tonnes:           5_000.0,
        price_per_tonne:         150.0,
        variable_cost_per_tonne: 80.0,
        annual_fixed_costs:      200_000.0,
        cost_of_financing:       0.15,
        verification_frequency:  frequency,
        project_start_date:      NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        project_duration:        2,
        carbon_price_growth:     None,
        operational_ramp:        None,
        seasonality_factors:     None,
        discount_rate:           None,
    }
}

/// More frequent verification never raises the score.
#[test]
fn score_is_monotonic_in_verification_frequency() {
    for project_type in ProjectType::ALL {
        let scores: Vec<f64> = VerificationFrequency::ALL
            .into_iter()
            .map(|f| calculate_project_financials(&inputs(project_type, f)).unwrap().climate_risk_score)
            .collect();

        for pair in scores.windows(2) {
            assert!(
                pair[0] <= pair[1],
                "{project_type}: scores not monotonic {scores:?}"
            );
        }
    }
}

#[test]
fn score_is_bounded() {
    let config = EngineConfig::builtin();
    for project_type in ProjectType::ALL {
        for frequency in VerificationFrequency::ALL {
            let score = climate_risk_score(&config.risk, project_type, frequency);
            assert!((0.0..=1.0).contains(&score), "{project_type}/{frequency}: {score}");
        }
    }
}

#[test]
fn builtin_weights_combine_type_and_cadence() {
    let config = EngineConfig::builtin();
    let score = |t, f| climate_risk_score(&config.risk, t, f);

    assert!((score(ProjectType::Reforestation, VerificationFrequency::Annual) - 0.7).abs() < 1e-12);
    assert!((score(ProjectType::Biochar, VerificationFrequency::Monthly) - 0.14).abs() < 1e-12);
    assert!(
        score(ProjectType::Reforestation, VerificationFrequency::Monthly)
            > score(ProjectType::Biochar, VerificationFrequency::Monthly)
    );
}

#[test]
fn unknown_type_uses_default_base_risk() {
    let mut config = EngineConfig::builtin();
    config.risk.base_risk.remove(&ProjectType::Dac);

    let score = climate_risk_score(&config.risk, ProjectType::Dac, VerificationFrequency::Annual);
    assert!((score - config.risk.default_base_risk).abs() < 1e-12);
}

#[test]
fn custom_risk_config_flows_through_engine() {
    let mut config = EngineConfig::builtin();
    config.risk.base_risk.insert(ProjectType::Biochar, 0.9);
    let engine = FinancialEngine::new(config).unwrap();

    let model = engine
        .calculate(&inputs(ProjectType::Biochar, VerificationFrequency::Annual))
        .unwrap();
    assert!((model.climate_risk_score - 0.9).abs() < 1e-12);
}

#[test]
fn check_rejects_non_monotonic_factors() {
    let mut config = EngineConfig::builtin();
    config
        .risk
        .frequency_factors
        .insert(VerificationFrequency::Monthly, 0.95);

    let err = config.risk.check().unwrap_err();
    assert!(matches!(err, VerifyError::InvalidConfiguration { .. }), "{err}");
}

#[test]
fn check_rejects_out_of_range_and_missing_values() {
    let mut config = EngineConfig::builtin();
    config.risk.base_risk.insert(ProjectType::Beccs, 1.5);
    assert!(config.risk.check().is_err());

    let mut config = EngineConfig::builtin();
    config
        .risk
        .frequency_factors
        .remove(&VerificationFrequency::SemiAnnual);
    assert!(config.risk.check().is_err());

    assert!(EngineConfig::builtin().risk.check().is_ok());
}

#[test]
fn engine_rejects_non_monotonic_risk_config() {
    let mut config = EngineConfig::builtin();
    config.risk.frequency_factors.insert(VerificationFrequency::Monthly, 1.0);
    config.risk.frequency_factors.insert(VerificationFrequency::Annual, 0.5);

    match FinancialEngine::new(config) {
        Err(VerifyError::InvalidConfiguration { reason }) => {
            assert!(reason.contains("frequencyFactor"), "{reason}");
        }
        Err(other) => panic!("expected InvalidConfiguration, got {other}"),
        Ok(engine) => {
            let monthly = engine
                .calculate(&inputs(ProjectType::Biochar, VerificationFrequency::Monthly))
                .unwrap()
                .climate_risk_score;
            let annual = engine
                .calculate(&inputs(ProjectType::Biochar, VerificationFrequency::Annual))
                .unwrap()
                .climate_risk_score;
            panic!("engine accepted non-monotonic factors: monthly={monthly} annual={annual}");
        }
    }
}
