use super::{parse_amount, ListingSource, RetrievalError};
use crate::workflows::investment::domain::{UNKNOWN_ADDRESS, UNKNOWN_ZIP_CODE};
use crate::workflows::investment::ListingAttributes;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_HASDATA_ENDPOINT: &str = "https://api.hasdata.com/scrape/zillow/property";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Zillow property lookups through the HasData scraping API.
#[derive(Debug, Clone)]
pub struct HasDataClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HasDataClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, RetrievalError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl ListingSource for HasDataClient {
    async fn fetch(&self, listing_url: &str) -> Result<Option<ListingAttributes>, RetrievalError> {
        let listing_url = listing_url.trim();
        if listing_url.is_empty() {
            return Err(RetrievalError::EmptyUrl);
        }

        info!(%listing_url, "requesting listing from HasData");
        let response = self
            .client
            .get(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .query(&[("url", listing_url)])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(%status, %listing_url, "listing lookup returned no data");
            return Ok(None);
        }

        let body = response.text().await?;
        parse_property_response(&body)
    }
}

/// Extracts listing attributes from a HasData property payload.
///
/// Returns `Ok(None)` when the payload has no usable `property` object. Missing
/// numeric fields zero-fill; the zip code is taken from `address.zipcode`
/// whether it arrives as a number or a string.
pub fn parse_property_response(body: &str) -> Result<Option<ListingAttributes>, RetrievalError> {
    let payload: Value = serde_json::from_str(body)?;
    let property = match payload.get("property") {
        Some(Value::Object(map)) if !map.is_empty() => map,
        _ => return Ok(None),
    };

    let price = property.get("price").and_then(number).unwrap_or(0.0);
    let beds = property
        .get("beds")
        .and_then(number)
        .filter(|beds| *beds >= 0.0)
        .map(|beds| beds.round() as u32)
        .unwrap_or(0);
    let baths = property.get("baths").and_then(number).unwrap_or(0.0);

    let zip_code = match property.get("address").and_then(|address| address.get("zipcode")) {
        Some(Value::String(zip)) if !zip.trim().is_empty() => zip.trim().to_string(),
        Some(Value::Number(zip)) => zip.to_string(),
        _ => UNKNOWN_ZIP_CODE.to_string(),
    };

    let address = property
        .get("addressRaw")
        .and_then(Value::as_str)
        .filter(|raw| !raw.trim().is_empty())
        .unwrap_or(UNKNOWN_ADDRESS)
        .to_string();

    Ok(Some(ListingAttributes {
        price,
        beds,
        baths,
        zip_code,
        address,
    }))
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => parse_amount(raw),
        _ => None,
    }
}
