use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A yes/no symptom question at a fixed position in the catalog's question list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomQuestion {
    pub index: usize,
    pub text: String,
}

/// Named condition with one symptom flag per catalog question, aligned by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    pub symptoms: Vec<bool>,
}

impl Condition {
    pub fn new(name: impl Into<String>, symptoms: Vec<bool>) -> Self {
        Self {
            name: name.into(),
            symptoms,
        }
    }

    pub fn has_symptom(&self, index: usize) -> bool {
        self.symptoms.get(index).copied().unwrap_or(false)
    }
}

/// Immutable questions plus the conditions that answer them.
///
/// Construction guarantees every condition carries exactly one flag per question and that
/// condition names are unique. Identical symptom vectors are allowed; they surface later as
/// an unresolved multi-candidate outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionCatalog {
    pub(super) questions: Vec<SymptomQuestion>,
    pub(super) conditions: Vec<Condition>,
}

impl ConditionCatalog {
    pub fn new<Q, S>(questions: Q, conditions: Vec<Condition>) -> Result<Self, CatalogError>
    where
        Q: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let questions: Vec<SymptomQuestion> = questions
            .into_iter()
            .enumerate()
            .map(|(index, text)| SymptomQuestion {
                index,
                text: text.into(),
            })
            .collect();

        if questions.is_empty() {
            return Err(CatalogError::MissingQuestions);
        }

        let mut seen = HashSet::new();
        for condition in &conditions {
            if condition.symptoms.len() != questions.len() {
                return Err(CatalogError::SymptomCount {
                    condition: condition.name.clone(),
                    expected: questions.len(),
                    found: condition.symptoms.len(),
                });
            }
            if !seen.insert(condition.name.as_str()) {
                return Err(CatalogError::DuplicateCondition(condition.name.clone()));
            }
        }

        Ok(Self {
            questions,
            conditions,
        })
    }

    pub fn questions(&self) -> &[SymptomQuestion] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&SymptomQuestion> {
        self.questions.get(index)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn condition(&self, name: &str) -> Option<&Condition> {
        self.conditions.iter().find(|condition| condition.name == name)
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Failure raised while building or loading reference catalogs.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog defines no symptom questions")]
    MissingQuestions,
    #[error("condition '{condition}' has {found} symptom values, expected {expected}")]
    SymptomCount {
        condition: String,
        expected: usize,
        found: usize,
    },
    #[error("condition '{condition}' has unreadable value '{value}' for question '{column}'")]
    InvalidSymptom {
        condition: String,
        column: String,
        value: String,
    },
    #[error("condition '{0}' is listed more than once")]
    DuplicateCondition(String),
    #[error("treatment profile '{0}' is invalid")]
    InvalidTreatment(String),
}
