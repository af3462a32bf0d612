use axum::{
    extract::{Query, State},
    Extension, Json,
};
use hotelscope_core::{build_chart, ChartSpec, SearchQuery};
use hotelscope_scraper::{scrape_hotels, ScrapeStats, ScraperError};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct ChartParams {
    pub location: Option<String>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ChartData {
    pub chart: ChartSpec,
    pub stats: ScrapeStats,
}

pub(super) async fn hotel_chart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ChartParams>,
) -> Result<Json<ApiResponse<ChartData>>, ApiError> {
    let query = SearchQuery::new(
        params.location.as_deref().unwrap_or_default(),
        params.checkin.as_deref().unwrap_or_default(),
        params.checkout.as_deref().unwrap_or_default(),
    )
    .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let report = {
        let _guard = state.scrape_lock.lock().await;
        tracing::info!(
            location = %query.location,
            checkin = %query.checkin,
            checkout = %query.checkout,
            "starting scrape"
        );
        scrape_hotels(&state.client, &query, &state.pagination)
            .await
            .map_err(|e| map_scraper_error(req_id.0.clone(), &e))?
    };

    Ok(Json(ApiResponse {
        data: ChartData {
            chart: build_chart(&report.table),
            stats: report.stats,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn map_scraper_error(request_id: String, error: &ScraperError) -> ApiError {
    tracing::error!(error = %error, "scrape failed");
    let code = match error {
        ScraperError::NotConverged { .. } | ScraperError::PaginationLimit { .. } => {
            "not_converged"
        }
        ScraperError::Http(_)
        | ScraperError::RateLimited { .. }
        | ScraperError::UnexpectedStatus { .. }
        | ScraperError::Price(_) => "upstream_error",
        ScraperError::InvalidBaseUrl { .. } | ScraperError::Selector { .. } => "internal_error",
    };
    ApiError::new(request_id, code, error.to_string())
}
