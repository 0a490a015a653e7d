//! Climate-risk score.
//!
//! score = clamp(base_risk(project_type) × frequency_factor(cadence), 0, 1)
//!
//! Frequency factors are non-decreasing from monthly to annual (enforced by
//! `ClimateRiskConfig::check`), so verifying more often never raises the score.

use crate::{
    cadence::VerificationFrequency,
    config::ClimateRiskConfig,
    inputs::ProjectType,
};

pub fn climate_risk_score(
    config: &ClimateRiskConfig,
    project_type: ProjectType,
    frequency: VerificationFrequency,
) -> f64 {
    let base = config.base_risk(project_type);
    let factor = config.frequency_factor(frequency);
    let score = base * factor;
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        config.default_base_risk.clamp(0.0, 1.0)
    }
}
