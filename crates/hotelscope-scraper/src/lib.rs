pub mod client;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pagination;
mod rate_limit;

pub use client::BookingClient;
pub use error::{ListingError, PriceError, ScraperError};
pub use extract::{extract_listings, read_total_count, ListingSelectors, PageExtraction};
pub use normalize::{clean_distance, clean_price, clean_rating, clean_row, RawPrice};
pub use pagination::{
    scrape_hotels, scrape_listings, PageSource, PaginationOptions, ScrapeReport, ScrapeStats,
    PAGE_SIZE,
};
