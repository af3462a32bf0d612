use super::*;

fn client(base_url: &str) -> BookingClient {
    BookingClient::new(base_url, 5, "hotelscope-test/0.1", 0, 0).expect("client should build")
}

fn query(location: &str) -> SearchQuery {
    SearchQuery::new(location, "2023-12-01", "2023-12-02").unwrap()
}

#[test]
fn search_url_carries_fixed_and_query_params() {
    let url = client("https://www.booking.com").search_url(&query("Taipei"), 0);
    assert_eq!(
        url,
        "https://www.booking.com/searchresults.zh-tw.html?ss=Taipei&checkin=2023-12-01&checkout=2023-12-02&group_adults=2&selected_currency=TWD&lang=en-us&soz=1&order=distance_from_search&offset=0"
    );
}

#[test]
fn search_url_advances_offset() {
    let url = client("https://www.booking.com").search_url(&query("Taipei"), 50);
    assert!(url.ends_with("&offset=50"), "unexpected url: {url}");
}

#[test]
fn search_url_encodes_location() {
    let url = client("https://www.booking.com").search_url(&query("New Taipei & Keelung"), 0);
    assert!(
        url.contains("ss=New+Taipei+%26+Keelung&"),
        "unexpected url: {url}"
    );
}

#[test]
fn search_url_keeps_custom_port() {
    let url = client("http://127.0.0.1:8080").search_url(&query("Tainan"), 25);
    assert!(url.starts_with("http://127.0.0.1:8080/searchresults.zh-tw.html?ss=Tainan&"));
}

#[test]
fn new_rejects_unparseable_base_url() {
    let err = BookingClient::new("not a url", 5, "ua", 0, 0).unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidBaseUrl { .. }),
        "expected InvalidBaseUrl, got: {err:?}"
    );
}

#[test]
fn default_headers_point_referer_at_site_index() {
    let base = Url::parse("https://www.booking.com").unwrap();
    let headers = default_headers(&base).unwrap();
    assert_eq!(
        headers.get(reqwest::header::REFERER).unwrap(),
        "https://www.booking.com/index.en-gb.html"
    );
    assert_eq!(headers.get("dnt").unwrap(), "1");
    assert_eq!(headers.get(reqwest::header::PRAGMA).unwrap(), "no-cache");
}
