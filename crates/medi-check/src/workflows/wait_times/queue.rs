use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::registry::CareOptionRegistry;

/// Accumulated queue backlog per care option, shared by every caller of a calculator.
pub trait QueueStore: Send + Sync {
    /// Current backlog in minutes, or `None` if the option is not tracked.
    fn queued(&self, care_option: &str) -> Option<u32>;
    /// Adds `minutes` to the option's backlog; `false` if the option is not tracked.
    fn enqueue(&self, care_option: &str, minutes: u32) -> bool;
    fn snapshot(&self) -> BTreeMap<String, u32>;
}

/// Initial backlog policy applied when a queue store is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum QueueSeed {
    Fixed { minutes: u32 },
    Random { max_minutes: u32 },
}

impl Default for QueueSeed {
    fn default() -> Self {
        QueueSeed::Fixed { minutes: 0 }
    }
}

impl QueueSeed {
    fn initial_minutes<R: Rng>(&self, rng: &mut R) -> u32 {
        match *self {
            QueueSeed::Fixed { minutes } => minutes,
            QueueSeed::Random { max_minutes } if max_minutes > 0 => rng.gen_range(0..max_minutes),
            QueueSeed::Random { .. } => 0,
        }
    }
}

/// In-process store holding one atomic counter per care option.
///
/// The key set is fixed at construction, so joins never need a map-wide lock and concurrent
/// joins on the same option cannot lose updates.
#[derive(Debug, Default)]
pub struct SharedQueueState {
    queues: HashMap<String, AtomicU32>,
}

impl SharedQueueState {
    pub fn seeded(registry: &CareOptionRegistry, seed: QueueSeed) -> Self {
        let mut rng = rand::thread_rng();
        Self::from_backlog(
            registry
                .names()
                .map(|name| (name.to_string(), seed.initial_minutes(&mut rng))),
        )
    }

    pub fn from_backlog<I, S>(backlog: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let queues = backlog
            .into_iter()
            .map(|(name, minutes)| (name.into(), AtomicU32::new(minutes)))
            .collect();
        Self { queues }
    }
}

impl QueueStore for SharedQueueState {
    fn queued(&self, care_option: &str) -> Option<u32> {
        self.queues
            .get(care_option)
            .map(|counter| counter.load(Ordering::Acquire))
    }

    fn enqueue(&self, care_option: &str, minutes: u32) -> bool {
        match self.queues.get(care_option) {
            Some(counter) => counter
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                    Some(current.saturating_add(minutes))
                })
                .is_ok(),
            None => false,
        }
    }

    fn snapshot(&self) -> BTreeMap<String, u32> {
        self.queues
            .iter()
            .map(|(name, counter)| (name.clone(), counter.load(Ordering::Acquire)))
            .collect()
    }
}
