use crate::assess::{run_assess, AssessArgs};
use crate::demo::{run_demo, run_estimate, DemoArgs, EstimateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use medi_check::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Medi-Check",
    about = "Injury triage questionnaire and care-option wait-time estimates",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Answer the questionnaire on stdin and see estimated waits for the result
    Assess(AssessArgs),
    /// Estimate waits for a known diagnosis, optionally joining a queue
    Estimate(EstimateArgs),
    /// Scripted run that answers as a chosen condition and joins the fastest queue
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args),
        Command::Estimate(args) => run_estimate(args),
        Command::Demo(args) => run_demo(args),
    }
}
