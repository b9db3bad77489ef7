use serde::{Deserialize, Deserializer, Serialize};

pub const UNKNOWN_ZIP_CODE: &str = "00000";
pub const UNKNOWN_ADDRESS: &str = "Unknown Address";

/// Raw listing attributes as delivered by the retrieval collaborator.
///
/// Missing or null numeric fields zero-fill; a missing zip code or address falls
/// back to the placeholders the listing feed itself uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingAttributes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub beds: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub baths: f64,
    #[serde(default = "default_zip_code", deserialize_with = "zip_code_or_placeholder")]
    pub zip_code: String,
    #[serde(default = "default_address", deserialize_with = "address_or_placeholder")]
    pub address: String,
}

impl ListingAttributes {
    pub fn new(price: f64, beds: u32, baths: f64, zip_code: impl Into<String>) -> Self {
        Self {
            price,
            beds,
            baths,
            zip_code: zip_code.into(),
            address: default_address(),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }
}

fn default_zip_code() -> String {
    UNKNOWN_ZIP_CODE.to_string()
}

fn default_address() -> String {
    UNKNOWN_ADDRESS.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn zip_code_or_placeholder<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .filter(|zip| !zip.trim().is_empty())
        .unwrap_or_else(default_zip_code))
}

fn address_or_placeholder<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .filter(|address| !address.trim().is_empty())
        .unwrap_or_else(default_address))
}

/// Buy/avoid call produced independently by the napkin rule and by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    GoodBuy,
    Avoid,
}

impl Verdict {
    pub const fn label(self) -> &'static str {
        match self {
            Self::GoodBuy => "Good Buy",
            Self::Avoid => "Avoid",
        }
    }

    pub const fn model_label(self) -> &'static str {
        match self {
            Self::GoodBuy => "ML Predicts Good Buy",
            Self::Avoid => "ML Predicts Avoid",
        }
    }
}

/// Stages a single scoring request moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStage {
    Idle,
    Retrieved,
    Featurized,
    Scored,
    Reported,
    Failed,
}

impl ScoringStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Retrieved => "Retrieved",
            Self::Featurized => "Featurized",
            Self::Scored => "Scored",
            Self::Reported => "Reported",
            Self::Failed => "Failed",
        }
    }
}

/// Non-fatal observations attached to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringNotice {
    UnsupportedZipCode { zip_code: String },
}

impl ScoringNotice {
    pub fn summary(&self) -> String {
        match self {
            ScoringNotice::UnsupportedZipCode { zip_code } => format!(
                "zip code {zip_code} is outside the supported set; all zip indicators left at 0"
            ),
        }
    }
}
