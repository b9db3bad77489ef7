use std::sync::Arc;

use tracing::{debug, warn};

use super::super::classifier::{ClassifierAdapter, ClassifierError, InvestmentClassifier};
use super::super::domain::{ListingAttributes, ScoringStage};
use super::super::features::{FeatureError, FeatureSchema};
use super::super::financials::{FinancialAssumptions, FinancialError};
use super::super::report::ScoringReport;

/// Result of one scoring request.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringOutcome {
    Reported(Box<ScoringReport>),
    /// Retrieval produced nothing usable; no component was invoked.
    NoData,
}

impl ScoringOutcome {
    pub fn stage(&self) -> ScoringStage {
        match self {
            ScoringOutcome::Reported(_) => ScoringStage::Reported,
            ScoringOutcome::NoData => ScoringStage::Failed,
        }
    }

    pub fn report(&self) -> Option<&ScoringReport> {
        match self {
            ScoringOutcome::Reported(report) => Some(report.as_ref()),
            ScoringOutcome::NoData => None,
        }
    }

    pub fn into_report(self) -> Option<ScoringReport> {
        match self {
            ScoringOutcome::Reported(report) => Some(*report),
            ScoringOutcome::NoData => None,
        }
    }
}

/// Error raised while scoring a listing that was actually retrieved.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Financial(#[from] FinancialError),
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

impl ScoringError {
    /// Classifier failures indicate a deployment defect rather than bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ScoringError::Classifier(_))
    }
}

/// Orchestrates calculator, feature builder, and classifier for one listing.
///
/// Holds only read-only, process-wide state, so a single instance can be shared
/// across concurrent requests behind an `Arc`.
pub struct ScoringService<C: ?Sized> {
    assumptions: FinancialAssumptions,
    classifier: ClassifierAdapter<C>,
}

impl<C> ScoringService<C>
where
    C: InvestmentClassifier + ?Sized,
{
    pub fn new(classifier: ClassifierAdapter<C>, assumptions: FinancialAssumptions) -> Self {
        Self {
            assumptions,
            classifier,
        }
    }

    pub fn from_model(
        model: Arc<C>,
        schema: Arc<FeatureSchema>,
        assumptions: FinancialAssumptions,
    ) -> Result<Self, ClassifierError> {
        let classifier = ClassifierAdapter::new(model, schema)?;
        Ok(Self::new(classifier, assumptions))
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.classifier.schema()
    }

    pub fn assumptions(&self) -> &FinancialAssumptions {
        &self.assumptions
    }

    pub fn score(
        &self,
        listing: Option<ListingAttributes>,
    ) -> Result<ScoringOutcome, ScoringError> {
        debug!(stage = ScoringStage::Idle.label(), "scoring request received");

        let Some(listing) = listing else {
            warn!(
                stage = ScoringStage::Failed.label(),
                "listing retrieval returned no data"
            );
            return Ok(ScoringOutcome::NoData);
        };
        debug!(
            stage = ScoringStage::Retrieved.label(),
            address = %listing.address,
            price = listing.price,
            zip_code = %listing.zip_code,
            "listing retrieved"
        );

        // est_rent is always the calculator's figure.
        let metrics = self
            .assumptions
            .compute(listing.price, listing.beds, listing.baths)?;
        let features = self.schema().build(&listing, metrics.est_rent)?;
        debug!(
            stage = ScoringStage::Featurized.label(),
            est_rent = metrics.est_rent,
            zip_supported = features.zip_supported(),
            "listing featurized"
        );
        if !features.zip_supported() {
            warn!(zip_code = %listing.zip_code, "zip code outside supported set; indicators left at 0");
        }

        let model_verdict = self.classifier.predict(&features)?;
        let rule_verdict = metrics.rule_verdict();
        debug!(
            stage = ScoringStage::Scored.label(),
            rule = rule_verdict.label(),
            model = model_verdict.label(),
            "verdicts ready"
        );

        let report = ScoringReport::assemble(
            listing,
            metrics,
            features.zip_supported(),
            model_verdict,
        );
        debug!(
            stage = ScoringStage::Reported.label(),
            agree = report.verdicts_agree(),
            "listing scored"
        );

        Ok(ScoringOutcome::Reported(Box::new(report)))
    }
}
