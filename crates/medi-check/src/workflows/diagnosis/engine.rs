use super::domain::{Condition, ConditionCatalog, SymptomQuestion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

pub const NO_MATCH_LABEL: &str = "No matching diagnosis found";
pub const MULTIPLE_MATCHES_LABEL: &str =
    "Multiple possible diagnoses - recommend professional evaluation";

/// Result of [`DiagnosisSession::diagnosis`] once the candidate set has collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Diagnosis {
    Condition(String),
    NoMatch,
}

impl Diagnosis {
    pub fn label(&self) -> &str {
        match self {
            Diagnosis::Condition(name) => name,
            Diagnosis::NoMatch => NO_MATCH_LABEL,
        }
    }
}

/// Where a questionnaire run currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Converged,
    Exhausted,
    QuestionsEnded,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SessionState::Active)
    }
}

/// Terminal answer handed to the wait-time side of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "names", rename_all = "snake_case")]
pub enum AssessmentOutcome {
    Diagnosed(String),
    NoMatch,
    MultiplePossible(Vec<String>),
}

impl AssessmentOutcome {
    /// Diagnosis string used for treatment lookups. Sentinel labels never match a profile.
    pub fn label(&self) -> &str {
        match self {
            AssessmentOutcome::Diagnosed(name) => name,
            AssessmentOutcome::NoMatch => NO_MATCH_LABEL,
            AssessmentOutcome::MultiplePossible(_) => MULTIPLE_MATCHES_LABEL,
        }
    }
}

/// Candidate-elimination state for one questionnaire run over a shared catalog.
#[derive(Debug, Clone)]
pub struct DiagnosisSession {
    catalog: Arc<ConditionCatalog>,
    candidates: Vec<usize>,
    asked: BTreeSet<usize>,
}

impl DiagnosisSession {
    pub fn new(catalog: Arc<ConditionCatalog>) -> Self {
        let candidates = (0..catalog.len()).collect();
        Self {
            catalog,
            candidates,
            asked: BTreeSet::new(),
        }
    }

    /// Restores the full candidate set and forgets every asked question.
    pub fn reset(&mut self) {
        self.candidates = (0..self.catalog.len()).collect();
        self.asked.clear();
    }

    pub fn catalog(&self) -> &ConditionCatalog {
        &self.catalog
    }

    pub fn best_question(&self) -> Option<&SymptomQuestion> {
        self.best_question_index()
            .and_then(|index| self.catalog.question(index))
    }

    pub fn best_question_index(&self) -> Option<usize> {
        select_question(&self.catalog, &self.candidates, &self.asked)
    }

    /// Filters candidates on the currently best question and marks it asked.
    ///
    /// Returns the question index that was applied, or `None` when no discriminating question
    /// remains (in which case nothing changes). Callers must answer the question most recently
    /// returned by [`Self::best_question`]; the selection is recomputed here, not cached.
    pub fn answer_question(&mut self, answer: bool) -> Option<usize> {
        let index = self.best_question_index()?;
        let catalog = &self.catalog;
        self.candidates
            .retain(|position| catalog.conditions()[*position].has_symptom(index) == answer);
        self.asked.insert(index);

        debug!(
            question = index,
            answer,
            remaining = self.candidates.len(),
            "applied questionnaire answer"
        );
        Some(index)
    }

    pub fn diagnosis(&self) -> Option<Diagnosis> {
        match self.candidates.as_slice() {
            [] => Some(Diagnosis::NoMatch),
            [only] => Some(Diagnosis::Condition(
                self.catalog.conditions()[*only].name.clone(),
            )),
            _ => None,
        }
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Condition> + '_ {
        self.candidates
            .iter()
            .map(move |position| &self.catalog.conditions()[*position])
    }

    pub fn asked_questions(&self) -> &BTreeSet<usize> {
        &self.asked
    }

    /// Share of catalog questions already asked, as a percentage.
    pub fn progress(&self) -> f64 {
        let total = self.catalog.question_count();
        if total == 0 {
            return 0.0;
        }
        self.asked.len() as f64 / total as f64 * 100.0
    }

    pub fn state(&self) -> SessionState {
        match self.candidates.len() {
            0 => SessionState::Exhausted,
            1 => SessionState::Converged,
            _ if self.best_question_index().is_none() => SessionState::QuestionsEnded,
            _ => SessionState::Active,
        }
    }

    /// Resolves a terminal state into the outcome the caller acts on; `None` while active.
    pub fn outcome(&self) -> Option<AssessmentOutcome> {
        match self.state() {
            SessionState::Active => None,
            SessionState::Exhausted => Some(AssessmentOutcome::NoMatch),
            SessionState::Converged => self.candidates().next().map(|condition| {
                AssessmentOutcome::Diagnosed(condition.name.clone())
            }),
            SessionState::QuestionsEnded => Some(AssessmentOutcome::MultiplePossible(
                self.candidates()
                    .map(|condition| condition.name.clone())
                    .collect(),
            )),
        }
    }
}

/// Picks the unasked question whose yes/no split over `candidates` is closest to even.
///
/// Only questions that actually split the set qualify: a question every candidate answers the
/// same way is skipped. Ties go to the lowest index.
pub(crate) fn select_question(
    catalog: &ConditionCatalog,
    candidates: &[usize],
    asked: &BTreeSet<usize>,
) -> Option<usize> {
    let total = candidates.len();
    if total == 0 {
        return None;
    }

    let mut best: Option<(usize, usize)> = None;
    for index in (0..catalog.question_count()).filter(|index| !asked.contains(index)) {
        let ones = candidates
            .iter()
            .filter(|position| catalog.conditions()[**position].has_symptom(index))
            .count();
        let zeros = total - ones;
        let imbalance = ones.abs_diff(zeros);

        if imbalance >= total {
            continue;
        }
        if best.map_or(true, |(_, current)| imbalance < current) {
            best = Some((index, imbalance));
        }
    }

    best.map(|(index, _)| index)
}
