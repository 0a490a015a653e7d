//! Caller-supplied project economics and the schema checks the HTTP layer
//! applied before handing them to the engine.
//!
//! The engine does not call `validate()` itself. It assumes ranges were
//! checked upstream and only rejects structural contradictions.

use crate::{
    cadence::VerificationFrequency,
    error::{VerifyError, VerifyResult},
    types::{Money, Tonnes, MONTHS_PER_YEAR},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_PROJECT_NAME_LEN: usize = 200;
pub const MAX_PROJECT_DURATION_YEARS: u32 = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Biochar,
    Reforestation,
    SoilCarbon,
    Dac,
    Beccs,
    Other,
}

impl ProjectType {
    pub const ALL: [ProjectType; 6] = [
        ProjectType::Biochar,
        ProjectType::Reforestation,
        ProjectType::SoilCarbon,
        ProjectType::Dac,
        ProjectType::Beccs,
        ProjectType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Biochar       => "biochar",
            Self::Reforestation => "reforestation",
            Self::SoilCarbon    => "soil_carbon",
            Self::Dac           => "dac",
            Self::Beccs         => "beccs",
            Self::Other         => "other",
        }
    }

    /// Nature-based removals carry seasonal and climate-driven verification risk.
    pub fn is_nature_based(&self) -> bool {
        matches!(self, Self::Reforestation | Self::SoilCarbon)
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectType {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| VerifyError::invalid(format!("unknown project type '{s}'")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationInputs {
    pub project_name: String,
    pub project_type: ProjectType,

    // Production
    pub annual_tonnes:   Tonnes,
    pub price_per_tonne: Money,

    // Cost structure
    pub variable_cost_per_tonne: Money,
    pub annual_fixed_costs:      Money,
    /// Annualized rate charged on the working-capital balance.
    pub cost_of_financing:       f64,

    pub verification_frequency: VerificationFrequency,

    // Timeline
    pub project_start_date: NaiveDate,
    /// Whole years.
    pub project_duration:   u32,

    // Advanced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_price_growth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operational_ramp:    Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonality_factors: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_rate:       Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field:   String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl VerificationInputs {
    /// Check every field against its documented range.
    /// Returns one issue per violation; empty means valid.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let name_len = self.project_name.chars().count();
        if name_len == 0 {
            issues.push(issue("projectName", "must not be empty"));
        } else if name_len > MAX_PROJECT_NAME_LEN {
            issues.push(issue(
                "projectName",
                format!("must be at most {MAX_PROJECT_NAME_LEN} characters"),
            ));
        }

        check_range(&mut issues, "annualTonnes", self.annual_tonnes, 1.0, 10_000_000.0);
        check_range(&mut issues, "pricePerTonne", self.price_per_tonne, 1.0, 1_000.0);
        check_range(&mut issues, "variableCostPerTonne", self.variable_cost_per_tonne, 0.0, 1_000.0);
        check_range(&mut issues, "annualFixedCosts", self.annual_fixed_costs, 0.0, 100_000_000.0);
        check_range(&mut issues, "costOfFinancing", self.cost_of_financing, 0.0, 1.0);

        if self.project_duration < 1 || self.project_duration > MAX_PROJECT_DURATION_YEARS {
            issues.push(issue(
                "projectDuration",
                format!("must be between 1 and {MAX_PROJECT_DURATION_YEARS} years"),
            ));
        }

        if let Some(growth) = self.carbon_price_growth {
            check_range(&mut issues, "carbonPriceGrowth", growth, -0.5, 0.5);
        }
        if let Some(rate) = self.discount_rate {
            check_range(&mut issues, "discountRate", rate, 0.0, 1.0);
        }

        if let Some(ramp) = &self.operational_ramp {
            if ramp.len() > self.project_duration as usize {
                issues.push(issue(
                    "operationalRamp",
                    format!("has {} entries for a {}-year project", ramp.len(), self.project_duration),
                ));
            }
            for (year, &multiplier) in ramp.iter().enumerate() {
                check_range(&mut issues, &format!("operationalRamp[{year}]"), multiplier, 0.0, 2.0);
            }
        }

        if let Some(factors) = &self.seasonality_factors {
            if factors.len() != MONTHS_PER_YEAR {
                issues.push(issue(
                    "seasonalityFactors",
                    format!("must have exactly {MONTHS_PER_YEAR} entries, got {}", factors.len()),
                ));
            }
            for (month, &factor) in factors.iter().enumerate() {
                check_range(&mut issues, &format!("seasonalityFactors[{month}]"), factor, 0.0, 3.0);
            }
        }

        issues
    }

    /// Consume the inputs, failing with every validation issue at once.
    pub fn validated(self) -> VerifyResult<Self> {
        let issues = self.validate();
        if issues.is_empty() {
            return Ok(self);
        }
        let reason = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(VerifyError::invalid(reason))
    }

    pub fn total_months(&self) -> VerifyResult<usize> {
        (self.project_duration as usize)
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or_else(|| {
                VerifyError::computation(format!(
                    "projectDuration {} overflows the month count",
                    self.project_duration
                ))
            })
    }

    /// Full-ramp annual production value at the starting price.
    pub fn annual_production_value(&self) -> Money {
        self.annual_tonnes * self.price_per_tonne
    }
}

fn issue(field: &str, message: impl Into<String>) -> ValidationIssue {
    ValidationIssue {
        field:   field.to_string(),
        message: message.into(),
    }
}

fn check_range(issues: &mut Vec<ValidationIssue>, field: &str, value: f64, min: f64, max: f64) {
    if !value.is_finite() {
        issues.push(issue(field, "must be a finite number"));
    } else if value < min || value > max {
        issues.push(issue(field, format!("must be between {min} and {max}, got {value}")));
    }
}
