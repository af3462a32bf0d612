//! Offset pagination over the search-results pages.
//!
//! The site serves 25 listings per page and reports the total number of
//! matches in a header. The controller keeps fetching at increasing offsets
//! until the listings it has processed (kept or skipped) reach that total,
//! or the header disappears.
//!
//! Two guards bound the loop: a hard page cap, and a stall check that aborts
//! when consecutive pages contribute no listings while the header still
//! claims more remain.

use std::future::Future;
use std::time::Duration;

use hotelscope_core::{AppConfig, ListingRow, ResultTable, SearchQuery};
use scraper::Html;
use serde::Serialize;

use crate::error::ScraperError;
use crate::extract::{extract_listings, read_total_count, ListingSelectors, PageExtraction};
use crate::normalize::clean_row;

/// Listings per results page; also the offset step.
pub const PAGE_SIZE: usize = 25;

const DEFAULT_MAX_PAGES: usize = 40;
const DEFAULT_STALL_LIMIT: usize = 2;

/// Something that can return the raw HTML of one results page.
///
/// [`crate::BookingClient`] is the production implementation; tests drive
/// the controller with scripted pages.
pub trait PageSource {
    fn fetch_page(
        &self,
        query: &SearchQuery,
        offset: usize,
    ) -> impl Future<Output = Result<String, ScraperError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationOptions {
    /// Hard cap on fetched pages.
    pub max_pages: usize,
    /// Consecutive empty pages tolerated before giving up.
    pub stall_limit: usize,
    /// Pause before every page after the first.
    pub inter_request_delay_ms: u64,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            stall_limit: DEFAULT_STALL_LIMIT,
            inter_request_delay_ms: 0,
        }
    }
}

impl PaginationOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            stall_limit: DEFAULT_STALL_LIMIT,
            inter_request_delay_ms: config.inter_request_delay_ms,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeStats {
    pub pages: usize,
    pub extracted: usize,
    pub extraction_errors: usize,
    /// Total the site reported on the last page that carried the header.
    pub reported_total: Option<usize>,
}

/// Result of a full scrape: the cleaned table plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeReport {
    pub table: ResultTable,
    pub stats: ScrapeStats,
}

/// Fetches every results page for `query` and returns the raw rows.
///
/// # Errors
///
/// - Any fetch error from `source`; there is no partial result.
/// - [`ScraperError::NotConverged`] when `stall_limit` consecutive pages
///   yield no listings while the reported total is still unmet.
/// - [`ScraperError::PaginationLimit`] when `max_pages` pages were fetched
///   without finishing.
pub async fn scrape_listings<S>(
    source: &S,
    query: &SearchQuery,
    selectors: &ListingSelectors,
    options: &PaginationOptions,
) -> Result<(Vec<ListingRow>, ScrapeStats), ScraperError>
where
    S: PageSource + Sync,
{
    let mut rows: Vec<ListingRow> = Vec::new();
    let mut stats = ScrapeStats::default();
    let mut offset = 0usize;
    let mut stalled_pages = 0usize;

    loop {
        if stats.pages >= options.max_pages {
            return Err(ScraperError::PaginationLimit {
                max_pages: options.max_pages,
            });
        }

        if stats.pages > 0 && options.inter_request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(options.inter_request_delay_ms)).await;
        }

        let body = source.fetch_page(query, offset).await?;
        stats.pages += 1;

        let (page, total) = inspect_page(&body, selectors);
        let processed = page.processed();
        stats.extracted += page.succeeded;
        stats.extraction_errors += page.failed;
        rows.extend(page.rows);

        tracing::info!(
            location = %query.location,
            offset,
            rows = page.succeeded,
            errors = page.failed,
            total = ?total,
            "scraped results page"
        );

        let Some(total) = total else {
            break;
        };
        stats.reported_total = Some(total);
        offset += PAGE_SIZE;

        if stats.extracted + stats.extraction_errors >= total {
            break;
        }

        if processed == 0 {
            stalled_pages += 1;
            if stalled_pages >= options.stall_limit {
                return Err(ScraperError::NotConverged {
                    pages: stats.pages,
                    stalled_pages,
                });
            }
        } else {
            stalled_pages = 0;
        }
    }

    Ok((rows, stats))
}

/// Parses one page and extracts everything the controller needs, so the
/// non-`Send` document never lives across an `.await`.
fn inspect_page(body: &str, selectors: &ListingSelectors) -> (PageExtraction, Option<usize>) {
    let document = Html::parse_document(body);
    let page = PageExtraction::tally(extract_listings(&document, selectors));
    let total = read_total_count(&document, selectors);
    (page, total)
}

/// Runs a whole scrape for one query: paginate, then clean the aggregated
/// rows once.
///
/// # Errors
///
/// Everything [`scrape_listings`] returns, plus [`ScraperError::Price`] if
/// any kept row has a price that is not a whole number.
pub async fn scrape_hotels<S>(
    source: &S,
    query: &SearchQuery,
    options: &PaginationOptions,
) -> Result<ScrapeReport, ScraperError>
where
    S: PageSource + Sync,
{
    let selectors = ListingSelectors::compile()?;
    let (rows, stats) = scrape_listings(source, query, &selectors, options).await?;

    let table = rows
        .into_iter()
        .map(clean_row)
        .collect::<Result<ResultTable, _>>()?;

    tracing::info!(
        location = %query.location,
        pages = stats.pages,
        rows = table.len(),
        errors = stats.extraction_errors,
        "scrape complete"
    );

    Ok(ScrapeReport { table, stats })
}
