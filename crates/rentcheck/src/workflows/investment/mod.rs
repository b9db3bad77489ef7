//! Rental investment scoring: napkin-math cash flow alongside a trained
//! buy/avoid classifier, merged into a single report per listing.

pub mod classifier;
pub mod domain;
pub mod features;
pub mod financials;
pub mod report;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use classifier::{
    ClassifierAdapter, ClassifierError, DecisionTree, ForestModel, InvestmentClassifier,
    ModelLoadError, TreeNode,
};
pub use domain::{ListingAttributes, ScoringNotice, ScoringStage, Verdict};
pub use features::{FeatureError, FeatureSchema, FeatureVector, UnsupportedZipPolicy};
pub use financials::{AssumptionError, FinancialAssumptions, FinancialError, FinancialMetrics};
pub use report::{write_summary_csv, ScoringReport, SummaryRow};
pub use scoring::{scoring_router, ScoreRequest, ScoringError, ScoringOutcome, ScoringService};
