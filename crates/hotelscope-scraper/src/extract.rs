//! Listing extraction from one rendered search-results page.
//!
//! Each hotel card is a `property-card-container` block. A block without a
//! title marks the end of real listings on the page (the site pads short
//! last pages with placeholder cards), so extraction stops there. A block
//! with a title but any other field missing is reported as a
//! [`ListingError`] and skipped.

use hotelscope_core::ListingRow;
use scraper::{ElementRef, Html, Selector};

use crate::error::{ListingError, ScraperError};

const CARD: &str = r#"div[data-testid="property-card-container"]"#;
const TITLE: &str = r#"div[data-testid="title"]"#;
const ADDRESS: &str = r#"span[data-testid="address"]"#;
const DISTANCE: &str = r#"span[data-testid="distance"]"#;
const RATING: &str = r#"div[class="a3b8729ab1 d86cee9b25"]"#;
const COMMENT: &str = r#"div[class="a3b8729ab1 e6208ee469 cb2cbb3ccb"]"#;
const PRICE: &str = r#"span[data-testid="price-and-discounted-price"]"#;
const TOTAL_COUNT: &str = "div.d8f77e681c";

/// Characters of the distance text kept on the row ("1.2 km from centre" -> "1.2 k").
const DISTANCE_PREFIX_CHARS: usize = 5;

/// The results header reads like "Taipei: 512 properties found"; the count
/// sits in a fixed window counted back from the end of the text.
const TOTAL_WINDOW_FROM_END: usize = 20;
const TOTAL_WINDOW_END_FROM_END: usize = 17;

/// Compiled CSS selectors for the search-results markup.
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    card: Selector,
    title: Selector,
    address: Selector,
    distance: Selector,
    rating: Selector,
    comment: Selector,
    price: Selector,
    total_count: Selector,
}

impl ListingSelectors {
    /// Compiles the selectors for the booking site's current markup.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Selector`] if a selector fails to parse.
    pub fn compile() -> Result<Self, ScraperError> {
        Ok(Self {
            card: parse_selector(CARD)?,
            title: parse_selector(TITLE)?,
            address: parse_selector(ADDRESS)?,
            distance: parse_selector(DISTANCE)?,
            rating: parse_selector(RATING)?,
            comment: parse_selector(COMMENT)?,
            price: parse_selector(PRICE)?,
            total_count: parse_selector(TOTAL_COUNT)?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ScraperError> {
    Selector::parse(selector).map_err(|e| ScraperError::Selector {
        selector: selector.to_owned(),
        reason: e.to_string(),
    })
}

/// Extracts one result per listing block, in document order, stopping at
/// the first block without a title.
#[must_use]
pub fn extract_listings(
    document: &Html,
    selectors: &ListingSelectors,
) -> Vec<Result<ListingRow, ListingError>> {
    let mut results = Vec::new();

    for card in document.select(&selectors.card) {
        let Some(title) = card.select(&selectors.title).next() else {
            break;
        };
        results.push(extract_card(card, title, selectors));
    }

    results
}

fn extract_card(
    card: ElementRef<'_>,
    title: ElementRef<'_>,
    selectors: &ListingSelectors,
) -> Result<ListingRow, ListingError> {
    let name = element_text(title).trim().to_owned();

    let field = |selector: &Selector, field: &'static str| -> Result<String, ListingError> {
        card.select(selector)
            .next()
            .map(element_text)
            .ok_or_else(|| ListingError::MissingField {
                name: name.clone(),
                field,
            })
    };

    let address = field(&selectors.address, "address")?;
    let distance = field(&selectors.distance, "distance")?;
    let rating = field(&selectors.rating, "rating")?;
    let comment = field(&selectors.comment, "comment")?;
    let price = field(&selectors.price, "price")?;

    let distance_raw: String = distance.chars().take(DISTANCE_PREFIX_CHARS).collect();

    Ok(ListingRow {
        address: address.trim().to_owned(),
        distance_raw: distance_raw.trim().to_owned(),
        rating_raw: rating.trim().to_owned(),
        comment: comment.trim().to_owned(),
        price_raw: price.trim().to_owned(),
        name,
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Reads the site's reported total number of listings for the search.
///
/// Returns `None` when the header is absent or its count window does not
/// hold a number; the caller treats that as the end of results.
#[must_use]
pub fn read_total_count(document: &Html, selectors: &ListingSelectors) -> Option<usize> {
    let header = document.select(&selectors.total_count).next()?;
    let text = element_text(header);
    let chars: Vec<char> = text.trim().chars().collect();

    let end = chars.len().checked_sub(TOTAL_WINDOW_END_FROM_END)?;
    let start = chars.len().saturating_sub(TOTAL_WINDOW_FROM_END);
    let window: String = chars[start..end].iter().collect();
    window.trim().parse::<usize>().ok()
}

/// Tally of one page's extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageExtraction {
    pub rows: Vec<ListingRow>,
    pub succeeded: usize,
    pub failed: usize,
}

impl PageExtraction {
    /// Splits per-listing results into kept rows and an error count.
    #[must_use]
    pub fn tally(results: Vec<Result<ListingRow, ListingError>>) -> Self {
        let mut page = Self::default();
        for result in results {
            match result {
                Ok(row) => {
                    page.rows.push(row);
                    page.succeeded += 1;
                }
                Err(error) => {
                    tracing::debug!(%error, "skipping listing");
                    page.failed += 1;
                }
            }
        }
        page
    }

    /// Listings the page accounted for, kept or skipped.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
