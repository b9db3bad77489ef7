use super::parse_amount;
use crate::workflows::investment::domain::{UNKNOWN_ADDRESS, UNKNOWN_ZIP_CODE};
use crate::workflows::investment::ListingAttributes;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum ListingImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ListingImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingImportError::Io(err) => write!(f, "failed to read listings file: {}", err),
            ListingImportError::Csv(err) => write!(f, "invalid listings CSV data: {}", err),
        }
    }
}

impl std::error::Error for ListingImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListingImportError::Io(err) => Some(err),
            ListingImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ListingImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ListingImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Outcome of reading a listings CSV: the usable rows plus the ones that were set aside.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListingImport {
    pub listings: Vec<ListingAttributes>,
    pub rejected: Vec<RejectedRow>,
}

/// A CSV row that could not be turned into listing attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub line: u64,
    pub reason: String,
}

/// Reads batches of listings from a CSV export with
/// `Address,Price,Beds,Baths,Zip` columns. Blank cells zero-fill.
///
/// Only I/O failures and an unreadable header abort the import; a malformed
/// row lands in [`ListingImport::rejected`] and reading continues.
pub struct ListingCsvImporter;

impl ListingCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ListingImport, ListingImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ListingImport, ListingImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut import = ListingImport::default();

        for result in csv_reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => {
                    import.rejected.push(RejectedRow {
                        line: err.position().map(|pos| pos.line()).unwrap_or_default(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            let parsed = record
                .deserialize::<ListingRow>(Some(&headers))
                .map_err(|err| err.to_string())
                .and_then(ListingRow::into_listing);
            match parsed {
                Ok(listing) => import.listings.push(listing),
                Err(reason) => import.rejected.push(RejectedRow { line, reason }),
            }
        }

        Ok(import)
    }
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    #[serde(rename = "Address", default, deserialize_with = "empty_string_as_none")]
    address: Option<String>,
    #[serde(rename = "Price", default, deserialize_with = "empty_string_as_none")]
    price: Option<String>,
    #[serde(rename = "Beds", default, deserialize_with = "empty_string_as_none")]
    beds: Option<String>,
    #[serde(rename = "Baths", default, deserialize_with = "empty_string_as_none")]
    baths: Option<String>,
    #[serde(rename = "Zip", default, deserialize_with = "empty_string_as_none")]
    zip: Option<String>,
}

impl ListingRow {
    fn into_listing(self) -> Result<ListingAttributes, String> {
        let price = amount("Price", self.price.as_deref())?;
        let beds = amount("Beds", self.beds.as_deref())?;
        if beds < 0.0 || beds > f64::from(u32::MAX) {
            return Err(format!("Beds value {beds} is out of range"));
        }
        let baths = amount("Baths", self.baths.as_deref())?;

        Ok(ListingAttributes {
            price,
            beds: beds.round() as u32,
            baths,
            zip_code: self.zip.unwrap_or_else(|| UNKNOWN_ZIP_CODE.to_string()),
            address: self.address.unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
        })
    }
}

fn amount(column: &str, raw: Option<&str>) -> Result<f64, String> {
    match raw {
        None => Ok(0.0),
        Some(raw) => parse_amount(raw).ok_or_else(|| format!("{column} '{raw}' is not a number")),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_rows_and_zero_fills_blanks() {
        let csv = "Address,Price,Beds,Baths,Zip\n\
123 Las Olas Blvd,300000,3,2,33304\n\
,185000,,,\n";

        let import = ListingCsvImporter::from_reader(csv.as_bytes()).expect("import succeeds");
        let listings = import.listings;

        assert!(import.rejected.is_empty());
        assert_eq!(listings.len(), 2);
        assert_eq!(
            listings[0],
            ListingAttributes::new(300_000.0, 3, 2.0, "33304").with_address("123 Las Olas Blvd")
        );
        assert_eq!(listings[1].price, 185_000.0);
        assert_eq!(listings[1].beds, 0);
        assert_eq!(listings[1].zip_code, UNKNOWN_ZIP_CODE);
        assert_eq!(listings[1].address, UNKNOWN_ADDRESS);
    }

    #[test]
    fn formatted_numbers_match_the_listing_feed() {
        let csv = "Address,Price,Beds,Baths,Zip\n\
2 Elm St,\"$250,000\",3.0,2.5,33316\n";

        let import = ListingCsvImporter::from_reader(csv.as_bytes()).expect("import succeeds");

        assert!(import.rejected.is_empty());
        assert_eq!(
            import.listings,
            vec![ListingAttributes::new(250_000.0, 3, 2.5, "33316").with_address("2 Elm St")]
        );
    }

    #[test]
    fn bad_row_is_set_aside_and_later_rows_still_import() {
        let csv = "Address,Price,Beds,Baths,Zip\n\
1 Main St,300000,3,2,33304\n\
Somewhere,cheap,3,2,33304\n\
Short Row,100000\n\
2 Elm St,100000,2,1,33316\n";

        let import = ListingCsvImporter::from_reader(csv.as_bytes()).expect("import succeeds");

        let addresses: Vec<&str> = import
            .listings
            .iter()
            .map(|listing| listing.address.as_str())
            .collect();
        assert_eq!(addresses, vec!["1 Main St", "2 Elm St"]);

        assert_eq!(import.rejected.len(), 2);
        assert_eq!(import.rejected[0].line, 3);
        assert!(import.rejected[0].reason.contains("Price 'cheap'"));
        assert_eq!(import.rejected[1].line, 4);
    }
}
