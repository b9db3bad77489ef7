use crate::commands::{run_analyze, run_batch, run_score, AnalyzeArgs, BatchArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rentcheck::config::AppConfig;
use rentcheck::error::AppError;
use rentcheck::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "RentCheck",
    about = "Score rental listings with napkin math and a trained buy/avoid classifier",
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
    /// Look up a listing by URL, score it, and print the report
    Analyze(AnalyzeArgs),
    /// Score explicit listing attributes
    Score(ScoreArgs),
    /// Score every row of a listings CSV and write a summary CSV to stdout
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ModelArgs {
    /// Classifier model JSON; overrides RENTCHECK_MODEL_PATH
    #[arg(long = "model")]
    pub(crate) path: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    execute(Cli::parse()).await
}

async fn execute(cli: Cli) -> Result<(), AppError> {
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Analyze(args) => run_analyze(config, args).await,
        Command::Score(args) => run_score(config, args),
        Command::Batch(args) => run_batch(config, args),
    }
}
