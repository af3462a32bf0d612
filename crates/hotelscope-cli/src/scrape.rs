//! `scrape` command: one search, printed to stdout.

use std::fmt::Write as _;

use hotelscope_core::{build_chart, AppConfig, ResultTable, SearchQuery};
use hotelscope_scraper::{scrape_hotels, BookingClient, PaginationOptions};

use crate::OutputFormat;

/// Runs a scrape for the given location and dates and prints the result.
///
/// # Errors
///
/// Returns an error if the input does not validate, the client cannot be
/// built, or the scrape itself fails.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    location: &str,
    checkin: &str,
    checkout: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let query = SearchQuery::new(location, checkin, checkout)?;
    let client = BookingClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build booking client: {e}"))?;

    let report = scrape_hotels(&client, &query, &PaginationOptions::from_app_config(config)).await?;
    tracing::info!(
        pages = report.stats.pages,
        rows = report.table.len(),
        skipped = report.stats.extraction_errors,
        reported_total = ?report.stats.reported_total,
        "scrape finished"
    );

    let output = match format {
        OutputFormat::Table => render_table(&report.table),
        OutputFormat::Json => serde_json::to_string_pretty(&report.table)?,
        OutputFormat::Chart => serde_json::to_string_pretty(&build_chart(&report.table))?,
    };
    println!("{output}");
    Ok(())
}

/// Renders rows as a fixed-width table; missing values print as `-`.
pub(crate) fn render_table(table: &ResultTable) -> String {
    let name_width = table
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("name".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:>10}  {:>8}  {:>6}  comment",
        "name", "price_twd", "km", "rating"
    );

    for row in table {
        let distance = row
            .distance_km
            .map_or_else(|| "-".to_owned(), |d| format!("{d:.2}"));
        let rating = row
            .rating
            .map_or_else(|| "-".to_owned(), |r| format!("{r:.1}"));
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>10}  {:>8}  {:>6}  {}",
            row.name, row.price_twd, distance, rating, row.comment
        );
    }

    let _ = write!(out, "Total Hotels: {}", table.len());
    out
}
