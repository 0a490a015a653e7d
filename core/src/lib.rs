//! Carbon verification financial engine.
//!
//! Simulates a carbon-removal project month by month (production, revenue
//! recognition on the verification cadence, costs, working capital and its
//! financing), then compares all four cadences and summarizes ROI, payback,
//! NPV and climate risk.
//!
//! Entry point: [`engine::calculate_project_financials`] or
//! [`engine::FinancialEngine::calculate`] with a loaded [`config::EngineConfig`].

pub mod cadence;
pub mod calendar;
pub mod comparison;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod inputs;
pub mod metrics;
pub mod model;
pub mod projection;
pub mod risk;
pub mod schedule;
pub mod store;
pub mod types;
