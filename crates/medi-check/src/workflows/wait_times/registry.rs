use super::domain::{AgeBand, CareOption, CareOptionType, CostRule};

/// Fixed list of care options the calculator estimates for, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareOptionRegistry {
    options: Vec<CareOption>,
}

impl CareOptionRegistry {
    pub fn new(options: Vec<CareOption>) -> Self {
        Self { options }
    }

    /// Wellington-area facilities with their typical live load and published fees.
    pub fn standard() -> Self {
        Self::new(vec![
            CareOption {
                name: "Wellington Hospital".to_string(),
                option_type: CareOptionType::Public,
                live_wait_minutes: 324,
                cost_rule: CostRule::described(
                    "Free (NZ residents/ACC approved); full treatment costs for non-residents",
                ),
            },
            CareOption {
                name: "Wakefield Hospital".to_string(),
                option_type: CareOptionType::Private,
                live_wait_minutes: 118,
                cost_rule: CostRule::described(
                    "Available upon request; prepayment required, additional charges may apply",
                ),
            },
            CareOption {
                name: "City Medical Centre".to_string(),
                option_type: CareOptionType::Gp,
                live_wait_minutes: 75,
                cost_rule: CostRule::AgeBanded {
                    bands: vec![
                        AgeBand::new(0, Some(13), 0),
                        AgeBand::new(14, Some(17), 6000),
                        AgeBand::new(18, Some(64), 7800),
                        AgeBand::new(65, None, 6800),
                    ],
                },
            },
            CareOption {
                name: "Wellington After Hours Medical Centre".to_string(),
                option_type: CareOptionType::Gp,
                live_wait_minutes: 265,
                cost_rule: CostRule::ConditionMatched {
                    keyword: "fracture".to_string(),
                    fee_cents: 6500,
                    otherwise: "Varies by condition; reduced charges for high-needs groups"
                        .to_string(),
                },
            },
            CareOption {
                name: "Wakefield Health Centre".to_string(),
                option_type: CareOptionType::Gp,
                live_wait_minutes: 40,
                cost_rule: CostRule::AgeBanded {
                    bands: vec![
                        AgeBand::new(0, Some(13), 0),
                        AgeBand::new(14, Some(17), 4000),
                        AgeBand::new(18, Some(24), 5300),
                        AgeBand::new(25, Some(64), 5700),
                        AgeBand::new(65, None, 5300),
                    ],
                },
            },
        ])
    }

    pub fn options(&self) -> &[CareOption] {
        &self.options
    }

    pub fn get(&self, name: &str) -> Option<&CareOption> {
        self.options.iter().find(|option| option.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.options.iter().map(|option| option.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
