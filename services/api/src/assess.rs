use crate::demo::{render_outcome, render_report};
use crate::infra::{build_calculator, load_condition_catalog};
use clap::Args;
use medi_check::config::AppConfig;
use medi_check::error::AppError;
use medi_check::workflows::diagnosis::{AssessmentOutcome, DiagnosisSession};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct AssessArgs {
    /// Patient age, used to quote age-banded fees
    #[arg(long)]
    pub(crate) age: Option<u8>,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = Arc::new(load_condition_catalog(&config.catalogs)?);
    let calculator = build_calculator(&config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut session = DiagnosisSession::new(catalog);
    let outcome = run_questionnaire(&mut session, stdin.lock(), &mut out)?;
    render_outcome(&mut out, &outcome)?;

    let report = calculator.report(outcome.label(), args.age);
    render_report(&mut out, &report)?;
    Ok(())
}

/// Asks the best question until the session reaches a terminal state.
///
/// Unrecognised replies re-prompt without touching the session. Input ending early is an
/// `UnexpectedEof` error.
pub(crate) fn run_questionnaire<R, W>(
    session: &mut DiagnosisSession,
    mut input: R,
    out: &mut W,
) -> io::Result<AssessmentOutcome>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        if let Some(outcome) = session.outcome() {
            return Ok(outcome);
        }
        let Some(question) = session.best_question() else {
            // outcome() is only None while a question remains
            return Ok(AssessmentOutcome::NoMatch);
        };

        write!(
            out,
            "[{:>3.0}%] {} [y/n] ",
            session.progress(),
            question.text
        )?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "questionnaire ended before a diagnosis was reached",
            ));
        }

        match parse_answer(&line) {
            Some(answer) => {
                session.answer_question(answer);
            }
            None => writeln!(out, "Please answer 'y' or 'n'.")?,
        }
    }
}

pub(crate) fn parse_answer(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medi_check::workflows::diagnosis::ConditionCatalog;
    use std::io::Cursor;

    fn session() -> DiagnosisSession {
        DiagnosisSession::new(Arc::new(ConditionCatalog::standard()))
    }

    fn scripted_answers(condition: &str) -> String {
        let catalog = ConditionCatalog::standard();
        let target = catalog.condition(condition).expect("condition exists").clone();
        let mut probe = session();
        let mut script = String::new();
        while probe.outcome().is_none() {
            let index = probe.best_question_index().expect("question available");
            let answer = target.has_symptom(index);
            script.push_str(if answer { "yes\n" } else { "n\n" });
            probe.answer_question(answer);
        }
        script
    }

    #[test]
    fn parses_common_replies() {
        assert_eq!(parse_answer(" Y \n"), Some(true));
        assert_eq!(parse_answer("no"), Some(false));
        assert_eq!(parse_answer("maybe"), None);
        assert_eq!(parse_answer(""), None);
    }

    #[test]
    fn truthful_answers_reach_the_condition() {
        let condition = "Orthopedic Injuries: Dislocation";
        let mut session = session();
        let mut out = Vec::new();

        let outcome = run_questionnaire(
            &mut session,
            Cursor::new(scripted_answers(condition)),
            &mut out,
        )
        .expect("questionnaire completes");

        assert_eq!(outcome, AssessmentOutcome::Diagnosed(condition.to_string()));
        let transcript = String::from_utf8(out).expect("utf8");
        assert!(transcript.contains("[y/n]"));
        assert!(transcript.contains("[  0%]"));
    }

    #[test]
    fn unrecognised_replies_reprompt() {
        let mut session = session();
        let mut out = Vec::new();
        let script = format!("perhaps\n{}", scripted_answers("No Injury"));

        let outcome =
            run_questionnaire(&mut session, Cursor::new(script), &mut out).expect("completes");

        assert_eq!(outcome, AssessmentOutcome::Diagnosed("No Injury".to_string()));
        let transcript = String::from_utf8(out).expect("utf8");
        assert_eq!(transcript.matches("Please answer").count(), 1);
    }

    #[test]
    fn early_end_of_input_is_an_error() {
        let mut session = session();
        let mut out = Vec::new();

        let err = run_questionnaire(&mut session, Cursor::new("y\n"), &mut out)
            .expect_err("input ran out");

        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(session.asked_questions().len(), 1);
    }
}
