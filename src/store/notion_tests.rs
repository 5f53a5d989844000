//! Tests for `NotionSettings` request building.

use super::NotionSettings;

fn settings() -> NotionSettings {
    NotionSettings::new(
        url::Url::parse("https://api.notion.com/v1/").unwrap(),
        "secret_abc",
        "2022-06-28",
        "db123",
    )
    .unwrap()
}

#[test]
fn query_request_targets_database_query() {
    let request = settings().query_request().unwrap();

    assert_eq!(request.method, http::Method::POST);
    assert_eq!(
        request.url.as_str(),
        "https://api.notion.com/v1/databases/db123/query"
    );
}

#[test]
fn page_request_targets_page() {
    let request = settings().page_request("rec_1").unwrap();

    assert_eq!(request.method, http::Method::PATCH);
    assert_eq!(request.url.as_str(), "https://api.notion.com/v1/pages/rec_1");
}

#[test]
fn page_id_cannot_escape_its_segment() {
    let request = settings().page_request("../users/me").unwrap();

    assert_eq!(
        request.url.as_str(),
        "https://api.notion.com/v1/pages/..%2Fusers%2Fme"
    );
}

#[test]
fn base_without_trailing_slash_is_extended() {
    let settings = NotionSettings::new(
        url::Url::parse("http://127.0.0.1:9000/v1").unwrap(),
        "t",
        "2022-06-28",
        "db",
    )
    .unwrap();

    let request = settings.page_request("p").unwrap();

    assert_eq!(request.url.as_str(), "http://127.0.0.1:9000/v1/pages/p");
}

#[test]
fn requests_carry_auth_and_version_headers() {
    let request = settings().query_request().unwrap();

    assert_eq!(
        request.headers.get(http::header::AUTHORIZATION).unwrap(),
        "Bearer secret_abc"
    );
    assert_eq!(request.headers.get("notion-version").unwrap(), "2022-06-28");
}

#[test]
fn token_with_newline_is_rejected() {
    let result = NotionSettings::new(
        url::Url::parse("https://api.notion.com/v1/").unwrap(),
        "bad\ntoken",
        "2022-06-28",
        "db",
    );

    assert!(result.is_err());
}

#[test]
fn debug_output_hides_token() {
    let debug = format!("{:?}", settings());

    assert!(debug.contains("db123"));
    assert!(!debug.contains("secret_abc"));
}
