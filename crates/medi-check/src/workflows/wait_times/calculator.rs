use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{CareOption, Severity, TreatmentProfile, WaitEstimate, MIN_WAIT_MINUTES};
use super::queue::{QueueSeed, QueueStore, SharedQueueState};
use super::registry::CareOptionRegistry;
use super::treatments::TreatmentCatalog;

/// Estimates per-option waits for a diagnosis and records queue joins.
pub struct WaitTimeCalculator<Q = SharedQueueState> {
    registry: Arc<CareOptionRegistry>,
    treatments: Arc<TreatmentCatalog>,
    queue: Arc<Q>,
}

impl WaitTimeCalculator<SharedQueueState> {
    /// Standard registry and treatment table with an empty, process-local queue.
    pub fn standard() -> Self {
        let registry = Arc::new(CareOptionRegistry::standard());
        let queue = Arc::new(SharedQueueState::seeded(&registry, QueueSeed::default()));
        Self::new(registry, Arc::new(TreatmentCatalog::standard()), queue)
    }
}

impl<Q> WaitTimeCalculator<Q>
where
    Q: QueueStore + 'static,
{
    pub fn new(
        registry: Arc<CareOptionRegistry>,
        treatments: Arc<TreatmentCatalog>,
        queue: Arc<Q>,
    ) -> Self {
        Self {
            registry,
            treatments,
            queue,
        }
    }

    pub fn registry(&self) -> &CareOptionRegistry {
        &self.registry
    }

    pub fn treatments(&self) -> &TreatmentCatalog {
        &self.treatments
    }

    /// Estimates for every registered option, quoting costs without a patient age.
    pub fn calculate_wait_times(&self, diagnosis: &str) -> Vec<WaitEstimate> {
        self.calculate_wait_times_for_age(diagnosis, None)
    }

    /// Estimates for every registered option in registry order.
    ///
    /// An unknown diagnosis yields no estimates. Each wait is the option's live load plus its
    /// accumulated queue, scaled by the diagnosis severity and floored at [`MIN_WAIT_MINUTES`].
    pub fn calculate_wait_times_for_age(
        &self,
        diagnosis: &str,
        age: Option<u8>,
    ) -> Vec<WaitEstimate> {
        let Some(profile) = self.treatments.get(diagnosis) else {
            warn!(diagnosis, "treatment profile not found; no wait estimates produced");
            return Vec::new();
        };

        self.registry
            .options()
            .iter()
            .map(|option| self.estimate(option, profile, age))
            .collect()
    }

    fn estimate(
        &self,
        option: &CareOption,
        profile: &TreatmentProfile,
        age: Option<u8>,
    ) -> WaitEstimate {
        let queued = self.queue.queued(&option.name);
        WaitEstimate {
            care_option: option.name.clone(),
            option_type: option.option_type,
            wait_minutes: adjusted_wait(
                option.live_wait_minutes,
                queued.unwrap_or(0),
                profile.severity,
            ),
            cost: option.cost_rule.quote(&profile.diagnosis, age),
            can_join_queue: queued.is_some(),
        }
    }

    /// Adds the diagnosis' expected treatment time to the option's shared backlog.
    ///
    /// Returns `false`, leaving state untouched, when the diagnosis has no treatment profile
    /// or the option is not tracked by the queue store.
    pub fn add_to_queue(&self, care_option: &str, diagnosis: &str) -> bool {
        let Some(profile) = self.treatments.get(diagnosis) else {
            warn!(care_option, diagnosis, "queue join rejected: unknown diagnosis");
            return false;
        };

        if self.queue.enqueue(care_option, profile.expected_minutes) {
            info!(
                care_option,
                diagnosis,
                added_minutes = profile.expected_minutes,
                "joined care option queue"
            );
            true
        } else {
            warn!(care_option, diagnosis, "queue join rejected: unknown care option");
            false
        }
    }

    pub fn queued_minutes(&self, care_option: &str) -> Option<u32> {
        self.queue.queued(care_option)
    }

    pub fn queue_snapshot(&self) -> BTreeMap<String, u32> {
        self.queue.snapshot()
    }

    pub fn fastest_option<'a>(&self, estimates: &'a [WaitEstimate]) -> Option<&'a WaitEstimate> {
        fastest_option(estimates)
    }

    pub fn cheapest_option<'a>(&self, estimates: &'a [WaitEstimate]) -> Option<&'a WaitEstimate> {
        cheapest_option(estimates)
    }

    /// Ranked estimates plus the fastest and cheapest picks, stamped with the time of calculation.
    pub fn report(&self, diagnosis: &str, age: Option<u8>) -> WaitTimeReport {
        let estimates = rank_by_wait(self.calculate_wait_times_for_age(diagnosis, age));
        let fastest = fastest_option(&estimates).cloned();
        let cheapest = cheapest_option(&estimates).cloned();

        WaitTimeReport {
            diagnosis: diagnosis.to_string(),
            generated_at: Utc::now(),
            estimates,
            fastest,
            cheapest,
        }
    }
}

/// Snapshot of a wait-time calculation handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitTimeReport {
    pub diagnosis: String,
    pub generated_at: DateTime<Utc>,
    pub estimates: Vec<WaitEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fastest: Option<WaitEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheapest: Option<WaitEstimate>,
}

pub(crate) fn adjusted_wait(live_minutes: u32, queued_minutes: u32, severity: Severity) -> u32 {
    let total = u64::from(live_minutes) + u64::from(queued_minutes);
    let scaled = total * u64::from(severity.wait_percent()) / 100;
    u32::try_from(scaled)
        .unwrap_or(u32::MAX)
        .max(MIN_WAIT_MINUTES)
}

/// Lowest wait; the earliest estimate wins ties.
pub fn fastest_option(estimates: &[WaitEstimate]) -> Option<&WaitEstimate> {
    estimates.iter().min_by_key(|estimate| estimate.wait_minutes)
}

/// Lowest comparable price (free counts as zero); described prices are skipped.
pub fn cheapest_option(estimates: &[WaitEstimate]) -> Option<&WaitEstimate> {
    estimates
        .iter()
        .filter_map(|estimate| estimate.cost.amount_cents().map(|cents| (cents, estimate)))
        .min_by_key(|(cents, _)| *cents)
        .map(|(_, estimate)| estimate)
}

/// Stable ascending sort by wait, so equal waits keep registry order.
pub fn rank_by_wait(mut estimates: Vec<WaitEstimate>) -> Vec<WaitEstimate> {
    estimates.sort_by_key(|estimate| estimate.wait_minutes);
    estimates
}
