//! Medi-Check core: an adaptive injury questionnaire and a wait-time estimator that ranks
//! nearby care options for the resulting diagnosis.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
