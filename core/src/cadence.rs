//! Verification cadence: how often accumulated production closes into
//! recognized, saleable revenue.
//!
//! Closing months are 0-indexed calendar months within each project year,
//! counted from the project start date (not the calendar year):
//!   monthly      every month
//!   quarterly    2, 5, 8, 11
//!   semi-annual  5, 11
//!   annual       11
//!
//! The last month of the project always closes as well; that rule lives in
//! the projection loop, not here.

use crate::{
    error::{VerifyError, VerifyResult},
    types::MONTHS_PER_YEAR,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationFrequency {
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl VerificationFrequency {
    /// Every cadence, most frequent first.
    /// Comparison and tie-breaking rely on this order.
    pub const ALL: [VerificationFrequency; 4] = [
        VerificationFrequency::Monthly,
        VerificationFrequency::Quarterly,
        VerificationFrequency::SemiAnnual,
        VerificationFrequency::Annual,
    ];

    /// Length of one recognition period in months.
    pub fn period_months(&self) -> usize {
        match self {
            Self::Monthly    => 1,
            Self::Quarterly  => 3,
            Self::SemiAnnual => 6,
            Self::Annual     => MONTHS_PER_YEAR,
        }
    }

    pub fn periods_per_year(&self) -> usize {
        MONTHS_PER_YEAR / self.period_months()
    }

    /// Whether a recognition period closes at `calendar_month` (0..12).
    pub fn is_closing_month(&self, calendar_month: usize) -> VerifyResult<bool> {
        let remainder = (calendar_month + 1)
            .checked_rem(self.period_months())
            .ok_or_else(|| {
                VerifyError::computation(format!("{self} cadence has a zero-length period"))
            })?;
        Ok(remainder == 0)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly    => "monthly",
            Self::Quarterly  => "quarterly",
            Self::SemiAnnual => "semi-annual",
            Self::Annual     => "annual",
        }
    }
}

impl fmt::Display for VerificationFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VerificationFrequency {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| VerifyError::invalid(format!("unknown verification frequency '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closing_months(freq: VerificationFrequency) -> Vec<usize> {
        (0..MONTHS_PER_YEAR)
            .filter(|&cm| freq.is_closing_month(cm).unwrap())
            .collect()
    }

    #[test]
    fn closing_months_per_cadence() {
        assert_eq!(closing_months(VerificationFrequency::Monthly), (0..12).collect::<Vec<_>>());
        assert_eq!(closing_months(VerificationFrequency::Quarterly), vec![2, 5, 8, 11]);
        assert_eq!(closing_months(VerificationFrequency::SemiAnnual), vec![5, 11]);
        assert_eq!(closing_months(VerificationFrequency::Annual), vec![11]);
    }

    #[test]
    fn periods_per_year_matches_closing_months() {
        for freq in VerificationFrequency::ALL {
            assert_eq!(freq.periods_per_year(), closing_months(freq).len(), "{freq}");
        }
    }

    #[test]
    fn wire_names_round_trip() {
        for freq in VerificationFrequency::ALL {
            let json = serde_json::to_string(&freq).unwrap();
            assert_eq!(json, format!("\"{}\"", freq.as_str()));
            assert_eq!(freq.as_str().parse::<VerificationFrequency>().unwrap(), freq);
        }
        assert!("weekly".parse::<VerificationFrequency>().is_err());
    }
}
