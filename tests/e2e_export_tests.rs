//! End-to-end tests for the JSON and CSV downloads

mod common;

use common::*;
use reqwest::StatusCode;
use video_catalog_server::export::{parse_csv, parse_json};

fn header(response: &reqwest::Response, name: &str) -> String {
    response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("missing {} header", name))
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_download_json_is_attachment_of_filtered_spots() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.download_json("eminem", "izvodac").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(header(&response, "content-type").starts_with("application/json"));
    assert_eq!(
        header(&response, "content-disposition"),
        "attachment; filename=\"filtered_data.json\""
    );

    let bytes = response.bytes().await.unwrap();
    let spots = parse_json(&bytes).unwrap();
    let expected: Vec<_> = test_spots()
        .into_iter()
        .filter(|s| s.id == SPOT_1_ID || s.id == SPOT_5_ID)
        .collect();
    assert_eq!(spots, expected);
}

#[tokio::test]
async fn test_download_csv_round_trips_records() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.download_csv("", "all").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(header(&response, "content-type").starts_with("text/csv"));
    assert_eq!(
        header(&response, "content-disposition"),
        "attachment; filename=\"filtered_data.csv\""
    );

    let bytes = response.bytes().await.unwrap();
    assert_eq!(parse_csv(&bytes).unwrap(), test_spots());
}

#[tokio::test]
async fn test_download_with_no_matches_is_header_only() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let csv = client.download_csv("zzz", "all").await.text().await.unwrap();
    assert_eq!(csv.lines().count(), 1);
    assert!(csv.starts_with("id,"));

    let json = client.download_json("zzz", "all").await.bytes().await.unwrap();
    assert!(parse_json(&json).unwrap().is_empty());
}

#[tokio::test]
async fn test_download_with_unknown_attribute_is_rejected() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    assert_eq!(
        client.download_csv("x", "rowid").await.status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        client.download_json("x", "rowid").await.status(),
        StatusCode::BAD_REQUEST
    );
}
