mod hotels;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use hotelscope_core::AppConfig;
use hotelscope_scraper::{BookingClient, PaginationOptions};
use serde::Serialize;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::{request_id, RequestId};

const DASHBOARD_HTML: &str = include_str!("../../assets/index.html");

#[derive(Clone)]
pub struct AppState {
    pub client: BookingClient,
    pub pagination: PaginationOptions,
    /// Held for the duration of a scrape so only one runs at a time.
    pub scrape_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(client: BookingClient, pagination: PaginationOptions) -> Self {
        Self {
            client,
            pagination,
            scrape_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn from_app_config(config: &AppConfig) -> anyhow::Result<Self> {
        let client = BookingClient::from_app_config(config)?;
        Ok(Self::new(client, PaginationOptions::from_app_config(config)))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_error" | "not_converged" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/api/v1/health", get(health))
        .route("/api/v1/hotels/chart", get(hotels::hotel_chart))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_app(base_url: &str) -> Router {
        let client = BookingClient::new(base_url, 5, "hotelscope-test/0.1", 0, 0).expect("client");
        build_app(AppState::new(client, PaginationOptions::default()))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, serde_json::from_slice(&body).expect("json parse"))
    }

    fn listing_page(count: usize) -> String {
        let cards: String = (0..count)
            .map(|i| {
                format!(
                    r#"<div data-testid="property-card-container">
                         <div data-testid="title">Hotel {i}</div>
                         <span data-testid="address">Taipei</span>
                         <span data-testid="distance">1.{i} km from centre</span>
                         <div class="a3b8729ab1 d86cee9b25">9.0</div>
                         <div class="a3b8729ab1 e6208ee469 cb2cbb3ccb">Wonderful</div>
                         <span data-testid="price-and-discounted-price">TWD 3,200</span>
                       </div>"#
                )
            })
            .collect();
        format!(
            r#"<html><body><div class="d8f77e681c">Taipei: {count:>3} properties found</div>{cards}</body></html>"#
        )
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_not_converged_maps_to_bad_gateway() {
        let response = ApiError::new("req-1", "not_converged", "stalled").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn health_reports_ok_with_request_id() {
        let (status, json) = get_json(test_app("http://127.0.0.1:9"), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
        assert!(json["meta"]["request_id"].as_str().is_some());
    }

    #[tokio::test]
    async fn dashboard_serves_form_and_chart_container() {
        let response = test_app("http://127.0.0.1:9")
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let html = String::from_utf8(body.to_vec()).expect("utf8");
        assert!(html.contains("Hotel Data Dashboard"));
        assert!(html.contains(r#"id="location-input""#));
        assert!(html.contains(r#"id="scrape-button""#));
        assert!(html.contains(r#"id="graph-content""#));
    }

    #[tokio::test]
    async fn chart_rejects_missing_location() {
        let (status, json) = get_json(
            test_app("http://127.0.0.1:9"),
            "/api/v1/hotels/chart?checkin=2023-12-01&checkout=2023-12-02",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn chart_rejects_bad_date() {
        let (status, json) = get_json(
            test_app("http://127.0.0.1:9"),
            "/api/v1/hotels/chart?location=Taipei&checkin=tomorrow&checkout=2023-12-02",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn chart_returns_figure_for_scraped_hotels() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/searchresults.zh-tw.html"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(listing_page(3), "text/html"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (status, json) = get_json(
            test_app(&server.uri()),
            "/api/v1/hotels/chart?location=Taipei&checkin=2023-12-01&checkout=2023-12-02",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let chart = &json["data"]["chart"];
        assert_eq!(chart["layout"]["title"]["text"], "Total Hotels: 3");
        assert_eq!(chart["data"][0]["x"].as_array().map(Vec::len), Some(3));
        assert_eq!(chart["data"][0]["customdata"][2][0], "Hotel 2");
        assert_eq!(json["data"]["stats"]["pages"], 1);
    }

    #[tokio::test]
    async fn chart_reports_upstream_failure_as_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/searchresults.zh-tw.html"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let (status, json) = get_json(
            test_app(&server.uri()),
            "/api/v1/hotels/chart?location=Taipei&checkin=2023-12-01&checkout=2023-12-02",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "upstream_error");
    }
}
