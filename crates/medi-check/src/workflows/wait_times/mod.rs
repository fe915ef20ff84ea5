//! Care-option wait-time estimation with severity weighting and a shared queue backlog.

mod calculator;
pub mod domain;
pub mod queue;
mod registry;
pub mod router;
mod treatments;

#[cfg(test)]
mod tests;

pub use calculator::{
    cheapest_option, fastest_option, rank_by_wait, WaitTimeCalculator, WaitTimeReport,
};
pub use domain::{
    format_wait, AgeBand, CareOption, CareOptionType, Cost, CostRule, Severity, TreatmentProfile,
    WaitEstimate, MIN_WAIT_MINUTES,
};
pub use queue::{QueueSeed, QueueStore, SharedQueueState};
pub use registry::CareOptionRegistry;
pub use router::{wait_time_router, QueueJoinRequest, WaitTimeRequest};
pub use treatments::TreatmentCatalog;
