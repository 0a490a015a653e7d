use crate::{
    cadence::VerificationFrequency,
    error::{VerifyError, VerifyResult},
    inputs::{ProjectType, VerificationInputs},
    types::{Money, Tonnes},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Climate risk model ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateRiskConfig {
    /// Base risk per project type, in [0, 1].
    pub base_risk: BTreeMap<ProjectType, f64>,
    /// Used for any project type missing from `base_risk`.
    pub default_base_risk: f64,
    /// Multiplier per cadence, in [0, 1], non-decreasing monthly → annual.
    pub frequency_factors: BTreeMap<VerificationFrequency, f64>,
}

impl ClimateRiskConfig {
    pub fn base_risk(&self, project_type: ProjectType) -> f64 {
        self.base_risk
            .get(&project_type)
            .copied()
            .unwrap_or(self.default_base_risk)
    }

    pub fn frequency_factor(&self, frequency: VerificationFrequency) -> f64 {
        self.frequency_factors.get(&frequency).copied().unwrap_or(1.0)
    }

    /// Reject values that would break the score's [0, 1] bound or its
    /// monotonicity in verification frequency.
    pub fn check(&self) -> VerifyResult<()> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);

        if !in_unit(self.default_base_risk) {
            return Err(VerifyError::invalid(format!(
                "defaultBaseRisk {} outside [0, 1]",
                self.default_base_risk
            )));
        }
        for (project_type, &risk) in &self.base_risk {
            if !in_unit(risk) {
                return Err(VerifyError::invalid(format!(
                    "baseRisk for {project_type} is {risk}, outside [0, 1]"
                )));
            }
        }

        let mut previous: Option<(VerificationFrequency, f64)> = None;
        for frequency in VerificationFrequency::ALL {
            let factor = self.frequency_factors.get(&frequency).copied().ok_or_else(|| {
                VerifyError::invalid(format!("frequencyFactors is missing '{frequency}'"))
            })?;
            if !in_unit(factor) {
                return Err(VerifyError::invalid(format!(
                    "frequencyFactor for {frequency} is {factor}, outside [0, 1]"
                )));
            }
            if let Some((prev_freq, prev_factor)) = previous {
                if factor < prev_factor {
                    return Err(VerifyError::invalid(format!(
                        "frequencyFactor for {frequency} ({factor}) is below {prev_freq} ({prev_factor}); \
                         less frequent verification must not lower risk"
                    )));
                }
            }
            previous = Some((frequency, factor));
        }
        Ok(())
    }
}

// ── Project-type defaults ──────────────────────────────────────────

/// Suggested starting parameters for a project type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDefaults {
    pub project_type:            ProjectType,
    pub annual_tonnes:           Tonnes,
    pub price_per_tonne:         Money,
    pub variable_cost_per_tonne: Money,
    pub annual_fixed_costs:      Money,
    pub cost_of_financing:       f64,
    pub verification_frequency:  VerificationFrequency,
    pub project_duration:        u32,
    pub discount_rate:           f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_price_growth:     Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operational_ramp:        Option<Vec<f64>>,
}

impl ProjectDefaults {
    /// Generic starting point, before any per-type override.
    fn generic(project_type: ProjectType) -> Self {
        Self {
            project_type,
            annual_tonnes:           10_000.0,
            price_per_tonne:         100.0,
            variable_cost_per_tonne: 70.0,
            annual_fixed_costs:      200_000.0,
            cost_of_financing:       0.15,
            verification_frequency:  VerificationFrequency::Monthly,
            project_duration:        10,
            discount_rate:           0.12,
            carbon_price_growth:     None,
            operational_ramp:        None,
        }
    }

    pub fn into_inputs(self, project_name: &str, project_start_date: NaiveDate) -> VerificationInputs {
        VerificationInputs {
            project_name:            project_name.to_string(),
            project_type:            self.project_type,
            annual_tonnes:           self.annual_tonnes,
            price_per_tonne:         self.price_per_tonne,
            variable_cost_per_tonne: self.variable_cost_per_tonne,
            annual_fixed_costs:      self.annual_fixed_costs,
            cost_of_financing:       self.cost_of_financing,
            verification_frequency:  self.verification_frequency,
            project_start_date,
            project_duration:        self.project_duration,
            carbon_price_growth:     self.carbon_price_growth,
            operational_ramp:        self.operational_ramp,
            seasonality_factors:     None,
            discount_rate:           Some(self.discount_rate),
        }
    }
}

// ── Comparison insights ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightThresholds {
    /// Payback within the first this-many months (month index below it)
    /// earns an "early payback" insight.
    pub early_payback_months: usize,
    /// Peak working capital above this share of annual production value
    /// is flagged as a financing risk.
    pub high_debt_revenue_share: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            early_payback_months:    6,
            high_debt_revenue_share: 0.5,
        }
    }
}

// ── File layouts ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct ProjectDefaultsFile {
    defaults: Vec<ProjectDefaults>,
}

// ── Engine config ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub risk:             ClimateRiskConfig,
    pub project_defaults: BTreeMap<ProjectType, ProjectDefaults>,
    pub insights:         InsightThresholds,
}

impl EngineConfig {
    /// Load from the data/ directory.
    /// In tests, use EngineConfig::builtin().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let risk_path = format!("{data_dir}/risk/climate_risk.json");
        let risk_content = std::fs::read_to_string(&risk_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {risk_path}: {e}"))?;
        let risk: ClimateRiskConfig = serde_json::from_str(&risk_content)?;
        risk.check()
            .map_err(|e| anyhow::anyhow!("{risk_path}: {e}"))?;

        let defaults_path = format!("{data_dir}/defaults/project_defaults.json");
        let defaults_content = std::fs::read_to_string(&defaults_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {defaults_path}: {e}"))?;
        let defaults_file: ProjectDefaultsFile = serde_json::from_str(&defaults_content)?;
        let project_defaults = defaults_file
            .defaults
            .into_iter()
            .map(|d| (d.project_type, d))
            .collect();

        let insights_path = format!("{data_dir}/insights/insight_thresholds.json");
        let insights_content = std::fs::read_to_string(&insights_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {insights_path}: {e}"))?;
        let insights: InsightThresholds = serde_json::from_str(&insights_content)?;

        log::info!("Loaded engine config from {data_dir}");

        Ok(Self {
            risk,
            project_defaults,
            insights,
        })
    }

    /// Config with hardcoded defaults. Matches the shipped data/ files.
    pub fn builtin() -> Self {
        let risk = ClimateRiskConfig {
            base_risk: [
                (ProjectType::Biochar, 0.2),
                (ProjectType::Reforestation, 0.7),
                (ProjectType::SoilCarbon, 0.6),
                (ProjectType::Dac, 0.3),
                (ProjectType::Beccs, 0.4),
                (ProjectType::Other, 0.5),
            ]
            .into(),
            default_base_risk: 0.5,
            frequency_factors: [
                (VerificationFrequency::Monthly, 0.70),
                (VerificationFrequency::Quarterly, 0.80),
                (VerificationFrequency::SemiAnnual, 0.90),
                (VerificationFrequency::Annual, 1.00),
            ]
            .into(),
        };

        let biochar = ProjectDefaults {
            annual_tonnes:           5_000.0,
            price_per_tonne:         150.0,
            variable_cost_per_tonne: 80.0,
            annual_fixed_costs:      200_000.0,
            carbon_price_growth:     Some(0.05),
            ..ProjectDefaults::generic(ProjectType::Biochar)
        };
        let reforestation = ProjectDefaults {
            annual_tonnes:           25_000.0,
            price_per_tonne:         80.0,
            variable_cost_per_tonne: 30.0,
            annual_fixed_costs:      500_000.0,
            carbon_price_growth:     Some(0.03),
            operational_ramp:        Some(vec![0.2, 0.5, 0.8, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
            ..ProjectDefaults::generic(ProjectType::Reforestation)
        };
        let soil_carbon = ProjectDefaults {
            annual_tonnes:           15_000.0,
            price_per_tonne:         90.0,
            variable_cost_per_tonne: 40.0,
            annual_fixed_costs:      300_000.0,
            operational_ramp:        Some(vec![0.3, 0.7, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
            ..ProjectDefaults::generic(ProjectType::SoilCarbon)
        };
        let dac = ProjectDefaults {
            annual_tonnes:           1_000.0,
            price_per_tonne:         400.0,
            variable_cost_per_tonne: 200.0,
            annual_fixed_costs:      2_000_000.0,
            carbon_price_growth:     Some(0.08),
            ..ProjectDefaults::generic(ProjectType::Dac)
        };
        let beccs = ProjectDefaults {
            annual_tonnes:           50_000.0,
            price_per_tonne:         120.0,
            variable_cost_per_tonne: 60.0,
            annual_fixed_costs:      5_000_000.0,
            ..ProjectDefaults::generic(ProjectType::Beccs)
        };
        let other = ProjectDefaults::generic(ProjectType::Other);

        Self {
            risk,
            project_defaults: [biochar, reforestation, soil_carbon, dac, beccs, other]
                .into_iter()
                .map(|d| (d.project_type, d))
                .collect(),
            insights: InsightThresholds::default(),
        }
    }

    /// Defaults for a project type, falling back to the generic profile.
    pub fn defaults_for(&self, project_type: ProjectType) -> ProjectDefaults {
        self.project_defaults
            .get(&project_type)
            .cloned()
            .unwrap_or_else(|| ProjectDefaults::generic(project_type))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::builtin()
    }
}
