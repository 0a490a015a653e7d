//! Shared primitive types used across the entire engine.

/// A 0-based month offset from the project start date.
pub type MonthIndex = usize;

/// A 0-based project year (month / 12).
pub type ProjectYear = usize;

/// A currency-agnostic monetary amount.
pub type Money = f64;

/// Carbon credit volume in tonnes of CO2e.
pub type Tonnes = f64;

/// A stable, unique identifier for a saved model.
pub type ModelId = String;

pub const MONTHS_PER_YEAR: usize = 12;
