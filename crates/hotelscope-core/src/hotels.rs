//! Domain types shared by the scraper, the server, and the CLI.
//!
//! A scrape produces [`ListingRow`]s (raw text per hotel card), which the
//! field cleaners turn into [`CleanedRow`]s collected in a [`ResultTable`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw text fields pulled from one listing block, before cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRow {
    pub name: String,
    pub address: String,
    /// First five characters of the distance text, e.g. `"1.2 k"` or `"850 m"`.
    pub distance_raw: String,
    pub rating_raw: String,
    pub comment: String,
    pub price_raw: String,
}

/// A cleaned price in TWD.
///
/// Prices scraped from text are always whole numbers; the fractional form
/// only appears when a caller hands the cleaner an already-numeric float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Whole(i64),
    Fractional(f64),
}

impl Price {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Price::Whole(v) => v as f64,
            Price::Fractional(v) => v,
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Price::Whole(v) => std::fmt::Display::fmt(v, f),
            Price::Fractional(v) => std::fmt::Display::fmt(v, f),
        }
    }
}

/// A listing after the field cleaners ran.
///
/// `None` in `distance_km` or `rating` is the missing-value marker: the
/// source text could not be parsed, which is distinct from a real zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRow {
    pub name: String,
    pub address: String,
    pub distance_km: Option<f64>,
    pub rating: Option<f64>,
    pub comment: String,
    pub price_twd: Price,
}

/// Cleaned rows in scrape order. Duplicates across pages are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<CleanedRow>,
}

impl ResultTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: CleanedRow) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[CleanedRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CleanedRow> {
        self.rows.iter()
    }
}

impl FromIterator<CleanedRow> for ResultTable {
    fn from_iter<I: IntoIterator<Item = CleanedRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a CleanedRow;
    type IntoIter = std::slice::Iter<'a, CleanedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("location must not be empty")]
    EmptyLocation,

    #[error("invalid {field} date \"{value}\": expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("check-out {checkout} must be after check-in {checkin}")]
    CheckoutNotAfterCheckin {
        checkin: NaiveDate,
        checkout: NaiveDate,
    },
}

/// One search: where, and for which nights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub location: String,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

impl SearchQuery {
    /// Validates raw user input into a query.
    ///
    /// # Errors
    ///
    /// - [`QueryError::EmptyLocation`] when `location` is blank.
    /// - [`QueryError::InvalidDate`] when a date is not ISO `YYYY-MM-DD`.
    /// - [`QueryError::CheckoutNotAfterCheckin`] when the stay is zero or negative nights.
    pub fn new(location: &str, checkin: &str, checkout: &str) -> Result<Self, QueryError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(QueryError::EmptyLocation);
        }

        let checkin = parse_iso_date("checkin", checkin)?;
        let checkout = parse_iso_date("checkout", checkout)?;
        if checkout <= checkin {
            return Err(QueryError::CheckoutNotAfterCheckin { checkin, checkout });
        }

        Ok(Self {
            location: location.to_owned(),
            checkin,
            checkout,
        })
    }

    #[must_use]
    pub fn checkin_iso(&self) -> String {
        self.checkin.format("%Y-%m-%d").to_string()
    }

    #[must_use]
    pub fn checkout_iso(&self) -> String {
        self.checkout.format("%Y-%m-%d").to_string()
    }
}

fn parse_iso_date(field: &'static str, value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| QueryError::InvalidDate {
        field,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str) -> CleanedRow {
        CleanedRow {
            name: name.to_owned(),
            address: "Zhongzheng, Taipei".to_owned(),
            distance_km: Some(1.2),
            rating: None,
            comment: "Very good".to_owned(),
            price_twd: Price::Whole(2400),
        }
    }

    #[test]
    fn search_query_trims_location_and_parses_dates() {
        let query = SearchQuery::new("  Taipei ", "2023-12-01", "2023-12-02").unwrap();
        assert_eq!(query.location, "Taipei");
        assert_eq!(query.checkin_iso(), "2023-12-01");
        assert_eq!(query.checkout_iso(), "2023-12-02");
    }

    #[test]
    fn search_query_rejects_blank_location() {
        let err = SearchQuery::new("   ", "2023-12-01", "2023-12-02").unwrap_err();
        assert_eq!(err, QueryError::EmptyLocation);
    }

    #[test]
    fn search_query_rejects_non_iso_date() {
        let err = SearchQuery::new("Taipei", "12/01/2023", "2023-12-02").unwrap_err();
        assert!(matches!(err, QueryError::InvalidDate { field: "checkin", .. }));
    }

    #[test]
    fn search_query_rejects_checkout_on_checkin_day() {
        let err = SearchQuery::new("Taipei", "2023-12-01", "2023-12-01").unwrap_err();
        assert!(matches!(err, QueryError::CheckoutNotAfterCheckin { .. }));
    }

    #[test]
    fn result_table_keeps_insertion_order_and_duplicates() {
        let table: ResultTable = vec![row("A"), row("B"), row("A")].into_iter().collect();
        let names: Vec<&str> = table.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "A"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn missing_values_serialize_as_null() {
        let json = serde_json::to_value(row("A")).unwrap();
        assert!(json["rating"].is_null());
        assert_eq!(json["price_twd"], 2400);
    }

    #[test]
    fn price_as_f64_widens_whole_values() {
        assert!((Price::Whole(1500).as_f64() - 1500.0).abs() < f64::EPSILON);
        assert!((Price::Fractional(99.5).as_f64() - 99.5).abs() < f64::EPSILON);
    }
}
