use crate::cli::ModelArgs;
use crate::infra::{listing_source, load_scoring_service};
use clap::Args;
use rentcheck::config::{AppConfig, ConfigError};
use rentcheck::error::AppError;
use rentcheck::workflows::investment::{
    write_summary_csv, InvestmentClassifier, ListingAttributes, ScoringOutcome, ScoringReport,
    ScoringService, SummaryRow,
};
use rentcheck::workflows::listings::{ListingCsvImporter, ListingImport};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Zillow listing URL to look up
    #[arg(long)]
    pub(crate) url: String,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Listing price in dollars
    #[arg(long)]
    pub(crate) price: f64,
    #[arg(long)]
    pub(crate) beds: u32,
    /// Bathroom count; halves allowed (2.5)
    #[arg(long)]
    pub(crate) baths: f64,
    /// Five-digit zip code
    #[arg(long)]
    pub(crate) zip: String,
    #[arg(long)]
    pub(crate) address: Option<String>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Listings CSV with Address,Price,Beds,Baths,Zip columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

pub(crate) async fn run_analyze(config: AppConfig, args: AnalyzeArgs) -> Result<(), AppError> {
    let service = load_scoring_service(&config.scoring, args.model.path)?;
    let source = listing_source(&config.retrieval)?.ok_or(ConfigError::MissingApiKey)?;

    let listing = source.fetch(&args.url).await?;
    let outcome = service.score(listing)?;
    print_outcome(outcome, args.json);
    Ok(())
}

pub(crate) fn run_score(config: AppConfig, args: ScoreArgs) -> Result<(), AppError> {
    let service = load_scoring_service(&config.scoring, args.model.path)?;

    let mut listing = ListingAttributes::new(args.price, args.beds, args.baths, args.zip);
    if let Some(address) = args.address {
        listing = listing.with_address(address);
    }

    let outcome = service.score(Some(listing))?;
    print_outcome(outcome, args.json);
    Ok(())
}

pub(crate) fn run_batch(config: AppConfig, args: BatchArgs) -> Result<(), AppError> {
    let service = load_scoring_service(&config.scoring, args.model.path)?;
    let import = ListingCsvImporter::from_path(&args.csv)?;

    let rows = score_batch(&service, import)?;
    write_summary_csv(std::io::stdout().lock(), &rows)?;
    Ok(())
}

/// Rows with bad inputs are skipped with a note on stderr; classifier defects abort the batch.
fn score_batch<C>(
    service: &ScoringService<C>,
    import: ListingImport,
) -> Result<Vec<SummaryRow>, AppError>
where
    C: InvestmentClassifier + ?Sized,
{
    for rejected in &import.rejected {
        eprintln!("skipping line {}: {}", rejected.line, rejected.reason);
    }

    let mut rows = Vec::with_capacity(import.listings.len());
    for listing in import.listings {
        let address = listing.address.clone();
        match service.score(Some(listing)) {
            Ok(outcome) => {
                if let Some(report) = outcome.report() {
                    rows.push(report.summary_row());
                }
            }
            Err(err) if err.is_fatal() => return Err(err.into()),
            Err(err) => eprintln!("skipping {}: {}", address, err),
        }
    }
    Ok(rows)
}

fn print_outcome(outcome: ScoringOutcome, as_json: bool) {
    let Some(report) = outcome.into_report() else {
        println!("Could not retrieve property info.");
        return;
    };

    if as_json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("Report payload unavailable: {}", err),
        }
    } else {
        print!("{}", render_report(&report));
    }
}

fn render_report(report: &ScoringReport) -> String {
    let metrics = &report.metrics;
    let mut out = String::new();
    let _ = writeln!(out, "Property: {}", report.address);
    let _ = writeln!(
        out,
        "- ${:.0} | {} bd / {} ba | zip {}",
        report.price, report.beds, report.baths, report.zip_code
    );
    let _ = writeln!(out, "Estimated Monthly Rent: ${:.2}", metrics.est_rent);
    let _ = writeln!(out, "Monthly Mortgage: ${:.2}", metrics.mortgage_payment);
    let _ = writeln!(out, "Monthly Expenses: ${:.2}", metrics.monthly_expenses);
    let _ = writeln!(out, "Monthly Cash Flow: ${:.2}", metrics.cash_flow);
    let _ = writeln!(out, "Cash on Cash Return: {:.2}%", metrics.coc_return);
    let _ = writeln!(out, "Napkin Rating: {}", report.rule_label);
    let _ = writeln!(out, "{}", report.model_label);
    for notice in &report.notices {
        let _ = writeln!(out, "Note: {}", notice.summary());
    }
    out
}
