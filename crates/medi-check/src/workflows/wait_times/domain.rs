use serde::{Deserialize, Serialize};
use std::fmt;

/// Floor applied to every computed wait so an estimate is never zero or negative.
pub const MIN_WAIT_MINUTES: u32 = 5;

/// Static classification of a care option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareOptionType {
    Public,
    Private,
    Gp,
}

impl CareOptionType {
    pub fn label(self) -> &'static str {
        match self {
            CareOptionType::Public => "public",
            CareOptionType::Private => "private",
            CareOptionType::Gp => "gp",
        }
    }
}

/// Triage tier attached to a treatment profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Share of the queued wait a patient at this tier actually waits, in percent.
    pub fn wait_percent(self) -> u32 {
        match self {
            Severity::Low => 100,
            Severity::Medium => 80,
            Severity::High => 50,
            Severity::Critical => 20,
        }
    }

    pub fn multiplier(self) -> f32 {
        self.wait_percent() as f32 / 100.0
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// Expected treatment effort and urgency for a named diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentProfile {
    pub diagnosis: String,
    pub expected_minutes: u32,
    pub variability_minutes: u32,
    pub severity: Severity,
}

/// Inclusive age band priced either free (`fee_cents == 0`) or at a flat fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBand {
    pub min_age: u8,
    pub max_age: Option<u8>,
    pub fee_cents: u32,
}

impl AgeBand {
    pub fn new(min_age: u8, max_age: Option<u8>, fee_cents: u32) -> Self {
        Self {
            min_age,
            max_age,
            fee_cents,
        }
    }

    pub fn contains(&self, age: u8) -> bool {
        age >= self.min_age && self.max_age.map_or(true, |max| age <= max)
    }
}

/// Pricing rule attached to a care option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostRule {
    Described {
        text: String,
    },
    AgeBanded {
        bands: Vec<AgeBand>,
    },
    ConditionMatched {
        keyword: String,
        fee_cents: u32,
        otherwise: String,
    },
}

impl CostRule {
    pub fn described(text: impl Into<String>) -> Self {
        CostRule::Described { text: text.into() }
    }

    pub fn quote(&self, diagnosis: &str, age: Option<u8>) -> Cost {
        match self {
            CostRule::Described { text } => Cost::Description(text.clone()),
            CostRule::AgeBanded { bands } => {
                let matched = age.and_then(|age| bands.iter().find(|band| band.contains(age)));
                match matched {
                    Some(band) => Cost::from_cents(band.fee_cents),
                    None => band_range(bands),
                }
            }
            CostRule::ConditionMatched {
                keyword,
                fee_cents,
                otherwise,
            } => {
                if diagnosis
                    .to_ascii_lowercase()
                    .contains(&keyword.to_ascii_lowercase())
                {
                    Cost::from_cents(*fee_cents)
                } else {
                    Cost::Description(otherwise.clone())
                }
            }
        }
    }
}

fn band_range(bands: &[AgeBand]) -> Cost {
    let min = bands.iter().map(|band| band.fee_cents).min();
    let max = bands.iter().map(|band| band.fee_cents).max();
    match (min, max) {
        (Some(min), Some(max)) if min == max => Cost::from_cents(min),
        (Some(min), Some(max)) => Cost::Description(format!(
            "{} to {} depending on age",
            Cost::from_cents(min),
            Cost::from_cents(max)
        )),
        _ => Cost::Description("Pricing unavailable".to_string()),
    }
}

/// Quoted price. Only `Free` and `Fee` are comparable across options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cost {
    Free,
    Fee { cents: u32 },
    Description(String),
}

impl Cost {
    pub fn from_cents(cents: u32) -> Self {
        if cents == 0 {
            Cost::Free
        } else {
            Cost::Fee { cents }
        }
    }

    pub fn amount_cents(&self) -> Option<u32> {
        match self {
            Cost::Free => Some(0),
            Cost::Fee { cents } => Some(*cents),
            Cost::Description(_) => None,
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Free => write!(f, "Free"),
            Cost::Fee { cents } => write!(f, "${}.{:02}", cents / 100, cents % 100),
            Cost::Description(text) => write!(f, "{text}"),
        }
    }
}

/// Static facility entry from the care-option registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareOption {
    pub name: String,
    pub option_type: CareOptionType,
    /// Ambient facility load before any queue joins, in minutes.
    pub live_wait_minutes: u32,
    pub cost_rule: CostRule,
}

/// Computed wait and cost for one care option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitEstimate {
    pub care_option: String,
    pub option_type: CareOptionType,
    pub wait_minutes: u32,
    pub cost: Cost,
    pub can_join_queue: bool,
}

/// Renders minutes as `"1h 5m"` or `"45m"`.
pub fn format_wait(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}
