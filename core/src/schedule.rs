//! Production schedule and price path (phases 1 and 2).
//!
//! Optional ramp and seasonality lists are resolved once into fixed lookups
//! with a 1.0 fallback, so the monthly loop never branches on presence.

use crate::{
    inputs::VerificationInputs,
    types::{Money, ProjectYear, Tonnes, MONTHS_PER_YEAR},
};

#[derive(Debug, Clone)]
pub struct ProductionSchedule {
    base_monthly_tonnes: Tonnes,
    ramp:                Vec<f64>,
    seasonality:         [f64; MONTHS_PER_YEAR],
    base_price:          Money,
    price_growth:        f64,
}

impl ProductionSchedule {
    pub fn from_inputs(inputs: &VerificationInputs) -> Self {
        let duration = inputs.project_duration as usize;

        let mut ramp = inputs.operational_ramp.clone().unwrap_or_default();
        if ramp.len() > duration {
            log::warn!(
                "{}: operational ramp has {} entries for a {duration}-year project; extra years ignored",
                inputs.project_name,
                ramp.len()
            );
            ramp.truncate(duration);
        }

        let mut seasonality = [1.0; MONTHS_PER_YEAR];
        match inputs.seasonality_factors.as_deref() {
            Some(factors) if factors.len() == MONTHS_PER_YEAR => {
                seasonality.copy_from_slice(factors);
            }
            Some(factors) => {
                log::warn!(
                    "{}: expected {MONTHS_PER_YEAR} seasonality factors, got {}; seasonality ignored",
                    inputs.project_name,
                    factors.len()
                );
            }
            None => {}
        }

        Self {
            base_monthly_tonnes: inputs.annual_tonnes / MONTHS_PER_YEAR as f64,
            ramp,
            seasonality,
            base_price:   inputs.price_per_tonne,
            price_growth: inputs.carbon_price_growth.unwrap_or(0.0),
        }
    }

    /// Ramp multiplier for a project year; 1.0 (full ramp) past the list.
    pub fn ramp_multiplier(&self, year: ProjectYear) -> f64 {
        self.ramp.get(year).copied().unwrap_or(1.0)
    }

    pub fn seasonality_multiplier(&self, calendar_month: usize) -> f64 {
        self.seasonality
            .get(calendar_month)
            .copied()
            .unwrap_or(1.0)
    }

    pub fn tonnes_produced(&self, year: ProjectYear, calendar_month: usize) -> Tonnes {
        self.base_monthly_tonnes
            * self.ramp_multiplier(year)
            * self.seasonality_multiplier(calendar_month)
    }

    /// Escalated unit price: base × (1 + growth)^year.
    pub fn effective_price(&self, year: ProjectYear) -> Money {
        let exponent = i32::try_from(year).unwrap_or(i32::MAX);
        self.base_price * (1.0 + self.price_growth).powi(exponent)
    }
}
