use super::domain::ListingAttributes;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Numeric columns that precede the zip indicators in every vector.
pub const BASE_COLUMNS: [&str; 4] = ["price", "beds", "baths", "est_rent"];
pub const ZIP_COLUMN_PREFIX: &str = "zipcode_";

/// Zip codes the bundled investment model was trained on (Fort Lauderdale, FL).
pub const DEFAULT_SUPPORTED_ZIPCODES: [&str; 9] = [
    "33304", "33305", "33306", "33308", "33309", "33311", "33312", "33315", "33316",
];

/// What to do with a listing whose zip code has no indicator column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedZipPolicy {
    /// Leave every indicator at 0 and flag the listing in the report.
    #[default]
    ZeroIndicators,
    /// Refuse to featurize the listing.
    Reject,
}

impl UnsupportedZipPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zero" | "zero_indicators" | "passthrough" => Some(Self::ZeroIndicators),
            "reject" | "error" => Some(Self::Reject),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureError {
    #[error("zip code '{0}' must be exactly five ASCII digits")]
    InvalidZipCode(String),
    #[error("zip code '{0}' is listed more than once")]
    DuplicateZipCode(String),
    #[error("zip code '{zip_code}' is not in the supported set")]
    UnsupportedZipCode { zip_code: String },
    #[error("feature '{field}' is not a finite number")]
    NonFinite { field: &'static str },
}

/// Closed, ordered column layout shared by the builder and the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    zipcodes: Vec<String>,
    columns: Vec<String>,
    policy: UnsupportedZipPolicy,
}

impl FeatureSchema {
    pub fn new<I, S>(zipcodes: I) -> Result<Self, FeatureError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();

        for zip in zipcodes {
            let zip = zip.as_ref().trim();
            if zip.len() != 5 || !zip.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(FeatureError::InvalidZipCode(zip.to_string()));
            }
            if !seen.insert(zip.to_string()) {
                return Err(FeatureError::DuplicateZipCode(zip.to_string()));
            }
            ordered.push(zip.to_string());
        }

        let columns = BASE_COLUMNS
            .iter()
            .map(|column| column.to_string())
            .chain(
                ordered
                    .iter()
                    .map(|zip| format!("{ZIP_COLUMN_PREFIX}{zip}")),
            )
            .collect();

        Ok(Self {
            zipcodes: ordered,
            columns,
            policy: UnsupportedZipPolicy::default(),
        })
    }

    pub fn standard() -> Self {
        Self::new(DEFAULT_SUPPORTED_ZIPCODES).expect("bundled zip codes are valid")
    }

    pub fn with_policy(mut self, policy: UnsupportedZipPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UnsupportedZipPolicy {
        self.policy
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn zip_index(&self, zip_code: &str) -> Option<usize> {
        let zip_code = zip_code.trim();
        self.zipcodes.iter().position(|zip| zip == zip_code)
    }

    /// Featurizes a listing using the rent estimate already produced by the
    /// financial calculator, so the classifier and the report see the same value.
    pub fn build(
        &self,
        listing: &ListingAttributes,
        est_rent: f64,
    ) -> Result<FeatureVector, FeatureError> {
        if !listing.price.is_finite() {
            return Err(FeatureError::NonFinite { field: "price" });
        }
        if !listing.baths.is_finite() {
            return Err(FeatureError::NonFinite { field: "baths" });
        }
        if !est_rent.is_finite() {
            return Err(FeatureError::NonFinite { field: "est_rent" });
        }

        let matched_zip = self.zip_index(&listing.zip_code);
        if matched_zip.is_none() && self.policy == UnsupportedZipPolicy::Reject {
            return Err(FeatureError::UnsupportedZipCode {
                zip_code: listing.zip_code.trim().to_string(),
            });
        }

        let mut zip_indicators = vec![0.0; self.zipcodes.len()];
        if let Some(index) = matched_zip {
            zip_indicators[index] = 1.0;
        }

        Ok(FeatureVector {
            price: listing.price,
            beds: f64::from(listing.beds),
            baths: listing.baths,
            est_rent,
            zip_indicators,
            matched_zip,
        })
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::standard()
    }
}

/// One listing expressed in the schema's column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    price: f64,
    beds: f64,
    baths: f64,
    est_rent: f64,
    zip_indicators: Vec<f64>,
    #[serde(skip)]
    matched_zip: Option<usize>,
}

impl FeatureVector {
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn beds(&self) -> f64 {
        self.beds
    }

    pub fn baths(&self) -> f64 {
        self.baths
    }

    pub fn est_rent(&self) -> f64 {
        self.est_rent
    }

    pub fn zip_indicators(&self) -> &[f64] {
        &self.zip_indicators
    }

    pub fn zip_supported(&self) -> bool {
        self.matched_zip.is_some()
    }

    pub fn len(&self) -> usize {
        BASE_COLUMNS.len() + self.zip_indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn values(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(self.len());
        values.extend([self.price, self.beds, self.baths, self.est_rent]);
        values.extend_from_slice(&self.zip_indicators);
        values
    }

    /// Pairs each value with its column name from the schema that built it.
    pub fn named<'a>(&self, schema: &'a FeatureSchema) -> Vec<(&'a str, f64)> {
        schema
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values())
            .collect()
    }
}
