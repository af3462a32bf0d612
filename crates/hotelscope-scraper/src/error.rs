use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("invalid selector \"{selector}\": {reason}")]
    Selector { selector: String, reason: String },

    #[error(transparent)]
    Price(#[from] PriceError),

    #[error("scrape did not converge: {stalled_pages} consecutive pages without listings after {pages} pages")]
    NotConverged { pages: usize, stalled_pages: usize },

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },
}

/// Why a single listing block was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    #[error("listing \"{name}\" is missing its {field} element")]
    MissingField { name: String, field: &'static str },
}

/// Price text that could not be read as a whole number of TWD.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable price \"{raw}\"")]
pub struct PriceError {
    pub raw: String,
}
