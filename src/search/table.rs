//! Result table normalization
//!
//! Turns the flattened connector output into table rows: a numeric price
//! column is derived and rows are deduplicated by URL, first occurrence wins.

use crate::connectors::Listing;
use serde::Serialize;
use std::collections::HashSet;

/// One row of the result table
///
/// Field order is the column order of the CSV export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub title: Option<String>,
    pub price: Option<String>,
    pub mileage: Option<String>,
    pub location: Option<String>,
    pub url: String,
    pub source: String,
    /// Price parsed from `price`, when it contains a usable number
    pub price_num: Option<f64>,
}

impl From<Listing> for ResultRow {
    fn from(listing: Listing) -> Self {
        let price_num = parse_price(listing.price.as_deref());
        Self {
            title: listing.title,
            price: listing.price,
            mileage: listing.mileage,
            location: listing.location,
            url: listing.url,
            source: listing.source,
            price_num,
        }
    }
}

/// Ordered, URL-unique listing rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Normalizes listings into a table
    ///
    /// Listings keep their accumulation order; a listing whose URL was
    /// already seen is dropped.
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        let mut seen = HashSet::new();
        let rows = listings
            .into_iter()
            .filter(|listing| seen.insert(listing.url.clone()))
            .map(ResultRow::from)
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRow> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a ResultRow;
    type IntoIter = std::slice::Iter<'a, ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Derives a numeric price from source-formatted text
///
/// Every character other than digits and `.` is stripped before parsing.
/// Text that leaves nothing parseable yields `None`.
///
/// ```
/// use car_finder::search::parse_price;
///
/// assert_eq!(parse_price(Some("$12,345")), Some(12345.0));
/// assert_eq!(parse_price(Some("Contact for price")), None);
/// assert_eq!(parse_price(None), None);
/// ```
pub fn parse_price(raw: Option<&str>) -> Option<f64> {
    let cleaned: String = raw?
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok()
}
