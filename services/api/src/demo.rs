use crate::infra::{build_calculator, load_condition_catalog};
use clap::Args;
use medi_check::config::AppConfig;
use medi_check::error::AppError;
use medi_check::workflows::diagnosis::{AssessmentOutcome, ConditionCatalog, DiagnosisSession};
use medi_check::workflows::wait_times::{
    format_wait, QueueStore, WaitTimeCalculator, WaitTimeReport,
};
use std::io::{self, Write};
use std::sync::Arc;

const DEFAULT_DEMO_CONDITION: &str = "Orthopedic Injuries: Sprains and Strains";

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Diagnosis name as listed in the treatment table
    #[arg(long)]
    pub(crate) diagnosis: String,
    /// Patient age, used to quote age-banded fees
    #[arg(long)]
    pub(crate) age: Option<u8>,
    /// Join this care option's queue after printing the estimates
    #[arg(long)]
    pub(crate) join: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Catalog condition whose symptoms drive the scripted answers
    #[arg(long)]
    pub(crate) condition: Option<String>,
    /// Patient age, used to quote age-banded fees
    #[arg(long)]
    pub(crate) age: Option<u8>,
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let calculator = build_calculator(&config)?;
    let stdout = io::stdout();
    write_estimate(&calculator, &args, &mut stdout.lock())?;
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = Arc::new(load_condition_catalog(&config.catalogs)?);
    let calculator = build_calculator(&config)?;
    let stdout = io::stdout();
    write_demo(&calculator, catalog, &args, &mut stdout.lock())?;
    Ok(())
}

pub(crate) fn write_estimate<Q, W>(
    calculator: &WaitTimeCalculator<Q>,
    args: &EstimateArgs,
    out: &mut W,
) -> io::Result<()>
where
    Q: QueueStore + 'static,
    W: Write,
{
    let report = calculator.report(&args.diagnosis, args.age);
    render_report(out, &report)?;

    if let Some(option) = &args.join {
        join_and_refresh(calculator, option, &args.diagnosis, args.age, out)?;
    }
    Ok(())
}

pub(crate) fn write_demo<Q, W>(
    calculator: &WaitTimeCalculator<Q>,
    catalog: Arc<ConditionCatalog>,
    args: &DemoArgs,
    out: &mut W,
) -> io::Result<()>
where
    Q: QueueStore + 'static,
    W: Write,
{
    let name = args
        .condition
        .as_deref()
        .unwrap_or(DEFAULT_DEMO_CONDITION);
    let Some(condition) = catalog.condition(name).cloned() else {
        writeln!(out, "Unknown condition '{name}'. Available conditions:")?;
        for condition in catalog.conditions() {
            writeln!(out, "  - {}", condition.name)?;
        }
        return Ok(());
    };

    writeln!(out, "Medi-Check demo answering as: {}", condition.name)?;
    let mut session = DiagnosisSession::new(catalog);
    while session.outcome().is_none() {
        let Some(question) = session.best_question() else {
            break;
        };
        let answer = condition.has_symptom(question.index);
        writeln!(
            out,
            "  Q: {} -> {}",
            question.text,
            if answer { "yes" } else { "no" }
        )?;
        session.answer_question(answer);
    }

    let outcome = session.outcome().unwrap_or(AssessmentOutcome::NoMatch);
    render_outcome(out, &outcome)?;

    let report = calculator.report(outcome.label(), args.age);
    render_report(out, &report)?;

    if let Some(fastest) = &report.fastest {
        join_and_refresh(calculator, &fastest.care_option, outcome.label(), args.age, out)?;
    }
    Ok(())
}

fn join_and_refresh<Q, W>(
    calculator: &WaitTimeCalculator<Q>,
    care_option: &str,
    diagnosis: &str,
    age: Option<u8>,
    out: &mut W,
) -> io::Result<()>
where
    Q: QueueStore + 'static,
    W: Write,
{
    if calculator.add_to_queue(care_option, diagnosis) {
        writeln!(out, "\nJoined the queue at {care_option}. Updated estimates:")?;
        render_report(out, &calculator.report(diagnosis, age))
    } else {
        writeln!(
            out,
            "\nCould not join the queue at {care_option} for '{diagnosis}'."
        )
    }
}

pub(crate) fn render_outcome<W: Write>(out: &mut W, outcome: &AssessmentOutcome) -> io::Result<()> {
    writeln!(out, "\nAssessment: {}", outcome.label())?;
    if let AssessmentOutcome::MultiplePossible(names) = outcome {
        for name in names {
            writeln!(out, "  - {name}")?;
        }
    }
    Ok(())
}

pub(crate) fn render_report<W: Write>(out: &mut W, report: &WaitTimeReport) -> io::Result<()> {
    if report.estimates.is_empty() {
        return writeln!(
            out,
            "No wait-time estimates available for '{}'.",
            report.diagnosis
        );
    }

    writeln!(out, "Estimated waits for {}:", report.diagnosis)?;
    let fastest = report
        .fastest
        .as_ref()
        .map(|estimate| estimate.care_option.as_str());
    for estimate in &report.estimates {
        let marker = if Some(estimate.care_option.as_str()) == fastest {
            "  <- fastest"
        } else {
            ""
        };
        writeln!(
            out,
            "  {:<28} {:<8} {:>7}  {}{}",
            estimate.care_option,
            estimate.option_type.label(),
            format_wait(estimate.wait_minutes),
            estimate.cost,
            marker
        )?;
    }
    if let Some(cheapest) = &report.cheapest {
        writeln!(out, "Cheapest quoted option: {} ({})", cheapest.care_option, cheapest.cost)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        write(&mut out).expect("output renders");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn estimate_lists_options_and_marks_fastest() {
        let calculator = WaitTimeCalculator::standard();
        let args = EstimateArgs {
            diagnosis: "Orthopedic Injuries: Sprains and Strains".to_string(),
            age: Some(30),
            join: None,
        };

        let output = render(|out| write_estimate(&calculator, &args, out));

        assert!(output.contains("Estimated waits for Orthopedic Injuries: Sprains and Strains"));
        assert_eq!(output.matches("<- fastest").count(), 1);
        assert!(output.contains("Wakefield Health Centre"));
        assert!(output.contains("5h 24m"));
    }

    #[test]
    fn estimate_with_join_prints_updated_waits() {
        let calculator = WaitTimeCalculator::standard();
        let args = EstimateArgs {
            diagnosis: "Orthopedic Injuries: Dislocation".to_string(),
            age: None,
            join: Some("Wakefield Hospital".to_string()),
        };

        let output = render(|out| write_estimate(&calculator, &args, out));

        assert!(output.contains("Joined the queue at Wakefield Hospital"));
        assert_eq!(calculator.queued_minutes("Wakefield Hospital"), Some(45));
    }

    #[test]
    fn unknown_diagnosis_prints_no_estimates() {
        let calculator = WaitTimeCalculator::standard();
        let args = EstimateArgs {
            diagnosis: "unknown-diagnosis".to_string(),
            age: None,
            join: Some("Wakefield Hospital".to_string()),
        };

        let output = render(|out| write_estimate(&calculator, &args, out));

        assert!(output.contains("No wait-time estimates available for 'unknown-diagnosis'"));
        assert!(output.contains("Could not join the queue"));
        assert_eq!(calculator.queued_minutes("Wakefield Hospital"), Some(0));
    }

    #[test]
    fn demo_diagnoses_and_joins_fastest_queue() {
        let calculator = WaitTimeCalculator::standard();
        let catalog = Arc::new(ConditionCatalog::standard());
        let args = DemoArgs {
            condition: Some("Burns and Cold Injuries: Frostbite".to_string()),
            age: Some(40),
        };

        let output = render(|out| write_demo(&calculator, catalog, &args, out));

        assert!(output.contains("Assessment: Burns and Cold Injuries: Frostbite"));
        assert!(output.contains("Joined the queue at"));
        let joined: u32 = calculator.queue_snapshot().values().sum();
        assert_eq!(joined, 35);
    }

    #[test]
    fn demo_lists_conditions_for_unknown_name() {
        let calculator = WaitTimeCalculator::standard();
        let catalog = Arc::new(ConditionCatalog::standard());
        let args = DemoArgs {
            condition: Some("Hiccups".to_string()),
            age: None,
        };

        let output = render(|out| write_demo(&calculator, catalog, &args, out));

        assert!(output.contains("Unknown condition 'Hiccups'"));
        assert!(output.contains("  - No Injury"));
        assert!(calculator.queue_snapshot().values().all(|minutes| *minutes == 0));
    }
}
