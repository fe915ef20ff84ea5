//! Adaptive yes/no questionnaire that narrows a condition catalog to a single diagnosis.

mod catalog;
pub mod domain;
mod engine;

pub use domain::{CatalogError, Condition, ConditionCatalog, SymptomQuestion};
pub use engine::{
    AssessmentOutcome, Diagnosis, DiagnosisSession, SessionState, MULTIPLE_MATCHES_LABEL,
    NO_MATCH_LABEL,
};
