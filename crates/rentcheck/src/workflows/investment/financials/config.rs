use serde::{Deserialize, Serialize};

/// Tunable constants behind the napkin-math estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialAssumptions {
    /// Monthly rent as a fraction of purchase price.
    pub rent_yield_rate: f64,
    /// Share of rent consumed by operating expenses.
    pub expense_ratio: f64,
    pub loan_to_value: f64,
    /// Monthly mortgage payment per 100k borrowed.
    pub rate_per_100k: f64,
}

impl Default for FinancialAssumptions {
    fn default() -> Self {
        Self {
            rent_yield_rate: 0.009,
            expense_ratio: 0.5,
            loan_to_value: 0.75,
            rate_per_100k: 537.0,
        }
    }
}

impl FinancialAssumptions {
    /// Down payment share; always the complement of the loan-to-value ratio.
    pub fn down_payment_ratio(&self) -> f64 {
        1.0 - self.loan_to_value
    }

    pub fn validate(&self) -> Result<(), AssumptionError> {
        let rates = [
            ("rent_yield_rate", self.rent_yield_rate),
            ("expense_ratio", self.expense_ratio),
            ("loan_to_value", self.loan_to_value),
            ("rate_per_100k", self.rate_per_100k),
        ];

        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(AssumptionError::InvalidRate { name, value });
            }
        }

        if self.loan_to_value > 1.0 {
            return Err(AssumptionError::LoanToValueOutOfRange(self.loan_to_value));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssumptionError {
    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidRate { name: &'static str, value: f64 },
    #[error("loan_to_value must lie within [0, 1] (got {0})")]
    LoanToValueOutOfRange(f64),
}
