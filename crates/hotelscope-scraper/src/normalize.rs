//! Field cleaners turning raw listing text into numbers.
//!
//! Distance and rating are best-effort: text that does not parse becomes
//! `None` (the missing-value marker) so the row still reaches the chart.
//! Price is load-bearing for the chart's x axis, so a bad price is an error
//! that fails the whole scrape instead of being papered over.

use hotelscope_core::{CleanedRow, ListingRow, Price};

use crate::error::PriceError;

const CURRENCY_CODE: &str = "TWD";

/// Converts a distance snippet to kilometres.
///
/// Text containing a `k` is read as kilometres (`"1.2 km"`, and the
/// truncated `"1.2 k"` the extractor produces). Anything else is read as
/// metres and divided by 1000 (`"850 m"`).
#[must_use]
pub fn clean_distance(raw: &str) -> Option<f64> {
    if raw.contains('k') {
        let value = raw.replace("km", "").replace('k', "");
        value.trim().parse::<f64>().ok()
    } else {
        let value = raw.replace('m', "");
        value.trim().parse::<f64>().ok().map(|metres| metres / 1000.0)
    }
}

/// Parses a review score such as `"8.7"`.
#[must_use]
pub fn clean_rating(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// A price as handed to [`clean_price`]: either already numeric or scraped text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawPrice<'a> {
    Whole(i64),
    Fractional(f64),
    Text(&'a str),
}

impl From<i64> for RawPrice<'_> {
    fn from(value: i64) -> Self {
        RawPrice::Whole(value)
    }
}

impl From<i32> for RawPrice<'_> {
    fn from(value: i32) -> Self {
        RawPrice::Whole(i64::from(value))
    }
}

impl From<f64> for RawPrice<'_> {
    fn from(value: f64) -> Self {
        RawPrice::Fractional(value)
    }
}

impl<'a> From<&'a str> for RawPrice<'a> {
    fn from(value: &'a str) -> Self {
        RawPrice::Text(value)
    }
}

/// Cleans a price into TWD.
///
/// Numeric input is returned unchanged. Text has the `TWD` prefix and
/// thousands separators removed and must then be a whole number.
///
/// # Errors
///
/// Returns [`PriceError`] when the remaining text is not an integer.
pub fn clean_price<'a>(raw: impl Into<RawPrice<'a>>) -> Result<Price, PriceError> {
    match raw.into() {
        RawPrice::Whole(value) => Ok(Price::Whole(value)),
        RawPrice::Fractional(value) => Ok(Price::Fractional(value)),
        RawPrice::Text(text) => {
            let digits = text.replace(CURRENCY_CODE, "").replace(',', "");
            digits
                .trim()
                .parse::<i64>()
                .map(Price::Whole)
                .map_err(|_| PriceError {
                    raw: text.to_owned(),
                })
        }
    }
}

/// Applies all three cleaners to one extracted row.
///
/// # Errors
///
/// Propagates [`PriceError`] from [`clean_price`].
pub fn clean_row(row: ListingRow) -> Result<CleanedRow, PriceError> {
    let price_twd = clean_price(row.price_raw.as_str())?;
    Ok(CleanedRow {
        distance_km: clean_distance(&row.distance_raw),
        rating: clean_rating(&row.rating_raw),
        price_twd,
        name: row.name,
        address: row.address,
        comment: row.comment,
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
