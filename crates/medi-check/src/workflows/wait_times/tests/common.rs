use std::collections::BTreeMap;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::wait_times::{
    AgeBand, CareOption, CareOptionRegistry, CareOptionType, CostRule, QueueStore, Severity,
    SharedQueueState, TreatmentCatalog, TreatmentProfile, WaitEstimate, WaitTimeCalculator,
};

pub(super) const GENERAL: &str = "General Hospital";
pub(super) const PRIVATE: &str = "Private Clinic";
pub(super) const CORNER_GP: &str = "Corner GP";

pub(super) fn registry() -> CareOptionRegistry {
    CareOptionRegistry::new(vec![
        CareOption {
            name: GENERAL.to_string(),
            option_type: CareOptionType::Public,
            live_wait_minutes: 100,
            cost_rule: CostRule::described("Free for residents"),
        },
        CareOption {
            name: PRIVATE.to_string(),
            option_type: CareOptionType::Private,
            live_wait_minutes: 30,
            cost_rule: CostRule::AgeBanded {
                bands: vec![AgeBand::new(0, None, 12000)],
            },
        },
        CareOption {
            name: CORNER_GP.to_string(),
            option_type: CareOptionType::Gp,
            live_wait_minutes: 10,
            cost_rule: CostRule::AgeBanded {
                bands: vec![AgeBand::new(0, Some(17), 0), AgeBand::new(18, None, 4500)],
            },
        },
    ])
}

pub(super) fn profile(diagnosis: &str, expected_minutes: u32, severity: Severity) -> TreatmentProfile {
    TreatmentProfile {
        diagnosis: diagnosis.to_string(),
        expected_minutes,
        variability_minutes: expected_minutes / 3,
        severity,
    }
}

pub(super) fn treatments() -> TreatmentCatalog {
    TreatmentCatalog::new(vec![
        profile("Sprain", 25, Severity::Low),
        profile("Dislocation", 45, Severity::Medium),
        profile("Burn", 60, Severity::High),
        profile("Arrest", 90, Severity::Critical),
        profile("Checkup", 0, Severity::Low),
    ])
    .expect("fixture treatments are unique")
}

/// Calculator whose queue starts every option at `baseline` minutes.
pub(super) fn calculator(baseline: u32) -> WaitTimeCalculator<SharedQueueState> {
    let registry = registry();
    let queue = SharedQueueState::from_backlog(registry.names().map(|name| (name, baseline)));
    WaitTimeCalculator::new(Arc::new(registry), Arc::new(treatments()), Arc::new(queue))
}

pub(super) fn wait_for(estimates: &[WaitEstimate], care_option: &str) -> u32 {
    estimates
        .iter()
        .find(|estimate| estimate.care_option == care_option)
        .map(|estimate| estimate.wait_minutes)
        .expect("estimate present for option")
}

/// Store that tracks every option but refuses to record joins.
#[derive(Default)]
pub(super) struct FrozenQueue;

impl QueueStore for FrozenQueue {
    fn queued(&self, _care_option: &str) -> Option<u32> {
        Some(0)
    }

    fn enqueue(&self, _care_option: &str, _minutes: u32) -> bool {
        false
    }

    fn snapshot(&self) -> BTreeMap<String, u32> {
        BTreeMap::new()
    }
}

pub(super) fn frozen_calculator() -> WaitTimeCalculator<FrozenQueue> {
    WaitTimeCalculator::new(
        Arc::new(registry()),
        Arc::new(treatments()),
        Arc::new(FrozenQueue),
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
