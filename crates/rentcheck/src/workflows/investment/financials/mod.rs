mod config;

pub use config::{AssumptionError, FinancialAssumptions};

use super::domain::Verdict;
use serde::{Deserialize, Serialize};

const MONTHS_PER_YEAR: f64 = 12.0;
const MORTGAGE_RATE_BASIS: f64 = 100_000.0;

/// Deterministic cash-flow estimate derived from the purchase price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub est_rent: f64,
    pub monthly_expenses: f64,
    pub loan_amount: f64,
    pub mortgage_payment: f64,
    pub cash_flow: f64,
    pub cash_invested: f64,
    pub annual_cash_flow: f64,
    pub coc_return: f64,
}

impl FinancialMetrics {
    /// Napkin rule: a deal is a good buy only with strictly positive monthly cash flow.
    pub fn rule_verdict(&self) -> Verdict {
        if self.cash_flow > 0.0 {
            Verdict::GoodBuy
        } else {
            Verdict::Avoid
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum FinancialError {
    #[error("{field} must be a finite number (got {value})")]
    NonFinite { field: &'static str, value: f64 },
    #[error("price must not be negative (got {0})")]
    NegativePrice(f64),
}

impl FinancialAssumptions {
    /// Runs the napkin math for a listing.
    ///
    /// `beds` and `baths` do not enter the formula today but are part of the
    /// signature so callers pass the same attributes the feature schema sees.
    /// Non-finite inputs are rejected rather than coerced.
    pub fn compute(
        &self,
        price: f64,
        _beds: u32,
        baths: f64,
    ) -> Result<FinancialMetrics, FinancialError> {
        ensure_finite("price", price)?;
        ensure_finite("baths", baths)?;
        if price < 0.0 {
            return Err(FinancialError::NegativePrice(price));
        }

        let est_rent = price * self.rent_yield_rate;
        let monthly_expenses = est_rent * self.expense_ratio;
        let loan_amount = price * self.loan_to_value;
        let mortgage_payment = (loan_amount / MORTGAGE_RATE_BASIS) * self.rate_per_100k;
        let cash_flow = est_rent - monthly_expenses - mortgage_payment;
        let cash_invested = price * self.down_payment_ratio();
        let annual_cash_flow = cash_flow * MONTHS_PER_YEAR;
        let coc_return = if cash_invested != 0.0 {
            (annual_cash_flow / cash_invested) * 100.0
        } else {
            0.0
        };

        let metrics = FinancialMetrics {
            est_rent,
            monthly_expenses,
            loan_amount,
            mortgage_payment,
            cash_flow,
            cash_invested,
            annual_cash_flow,
            coc_return,
        };

        // Extreme assumptions can still overflow the derived values.
        for (field, value) in [
            ("est_rent", metrics.est_rent),
            ("mortgage_payment", metrics.mortgage_payment),
            ("cash_flow", metrics.cash_flow),
            ("coc_return", metrics.coc_return),
        ] {
            ensure_finite(field, value)?;
        }

        Ok(metrics)
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), FinancialError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FinancialError::NonFinite { field, value })
    }
}
