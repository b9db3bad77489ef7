use super::domain::{ListingAttributes, ScoringNotice, Verdict};
use super::financials::FinancialMetrics;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// Terminal artifact of one scoring request, handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringReport {
    pub address: String,
    pub price: f64,
    pub beds: u32,
    pub baths: f64,
    pub zip_code: String,
    pub zip_supported: bool,
    pub est_rent: f64,
    pub metrics: FinancialMetrics,
    pub rule_verdict: Verdict,
    pub rule_label: &'static str,
    pub model_verdict: Verdict,
    pub model_label: &'static str,
    pub notices: Vec<ScoringNotice>,
    pub scored_at: DateTime<Utc>,
}

impl ScoringReport {
    pub(crate) fn assemble(
        listing: ListingAttributes,
        metrics: FinancialMetrics,
        zip_supported: bool,
        model_verdict: Verdict,
    ) -> Self {
        let rule_verdict = metrics.rule_verdict();
        // Same normalization the feature schema matches against.
        let zip_code = listing.zip_code.trim().to_string();
        let mut notices = Vec::new();
        if !zip_supported {
            notices.push(ScoringNotice::UnsupportedZipCode {
                zip_code: zip_code.clone(),
            });
        }

        Self {
            address: listing.address,
            price: listing.price,
            beds: listing.beds,
            baths: listing.baths,
            zip_code,
            zip_supported,
            est_rent: metrics.est_rent,
            metrics,
            rule_verdict,
            rule_label: rule_verdict.label(),
            model_verdict,
            model_label: model_verdict.model_label(),
            notices,
            scored_at: Utc::now(),
        }
    }

    /// Whether the napkin rule and the model reached the same call.
    pub fn verdicts_agree(&self) -> bool {
        self.rule_verdict == self.model_verdict
    }

    pub fn summary_row(&self) -> SummaryRow {
        SummaryRow {
            address: self.address.clone(),
            price: round_cents(self.price),
            est_rent: round_cents(self.est_rent),
            cash_flow: round_cents(self.metrics.cash_flow),
            coc_return: round_cents(self.metrics.coc_return),
            napkin_rating: self.rule_label,
            ml_prediction: self.model_label,
        }
    }
}

/// Flat one-line view of a report, in the column layout of the summary export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Est. Rent")]
    pub est_rent: f64,
    #[serde(rename = "Cash Flow")]
    pub cash_flow: f64,
    #[serde(rename = "CoC Return (%)")]
    pub coc_return: f64,
    #[serde(rename = "Napkin Rating")]
    pub napkin_rating: &'static str,
    #[serde(rename = "ML Prediction")]
    pub ml_prediction: &'static str,
}

/// Writes summary rows as CSV with a header line.
pub fn write_summary_csv<W: Write>(writer: W, rows: &[SummaryRow]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
