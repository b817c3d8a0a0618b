#![cfg(feature = "web")]

mod common;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use common::*;
use tower::ServiceExt;
use traffic_dashboard::app::{AppState, router};
use traffic_dashboard::labels::{Labels, Locale};
use traffic_dashboard::loader::LoadOptions;

const BOUNDARY: &str = "XTRAFFICBOUNDARY";
const LIMIT: usize = 1024 * 1024;

fn app_with_limit(limit: usize) -> Router {
    let state = AppState::new(Locale::En, Labels::english(), LoadOptions::default()).unwrap();
    router(state, limit)
}

fn app() -> Router {
    app_with_limit(LIMIT)
}

fn multipart(files: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, bytes) in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\n",
                name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload(uri: &str, files: &[(&str, Vec<u8>)]) -> Request<Body> {
    let body = multipart(files);
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::CONTENT_LENGTH, body.len().to_string())
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn report_json(files: &[(&str, Vec<u8>)]) -> serde_json::Value {
    let response = app().oneshot(upload("/api/report", files)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_str(&body_text(response).await).unwrap()
}

#[tokio::test]
async fn landing_page_shows_upload_form() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Traffic Simulation Analysis Dashboard"));
    assert!(html.contains("name=\"files\""));
    assert!(html.contains("Waiting for file upload..."));
}

#[tokio::test]
async fn report_json_combines_uploaded_files() {
    let value = report_json(&[
        ("morning.xlsx", report_bytes(&standard_report())),
        ("evening.xlsx", report_bytes(&intervals_only_report())),
    ])
    .await;

    assert_eq!(value["status"], "processed");
    assert_eq!(value["files"], 2);
    assert_eq!(value["message"], "2 file(s) processed successfully!");
    assert!(value["warning"].is_null());

    let records = value["records"].as_array().unwrap();
    assert_eq!(records.len(), 7);
    // Uploads are processed in file name order
    assert_eq!(records[0]["Source_File"], "evening.xlsx");
    assert_eq!(records[0]["Section"], "EB");
    assert_eq!(records[1]["Source_File"], "morning.xlsx");
    assert_eq!(records[1]["Section"], "NWB");
    assert_eq!(records[1]["Direction"], "Sentido Norte");

    let summary = value["summary"].as_array().unwrap();
    assert_eq!(summary.len(), 2);
    assert!(summary.iter().all(|r| r["Interval"] == "Summary"));
}

#[tokio::test]
async fn report_json_warns_when_no_summary_rows() {
    let value = report_json(&[("partial.xlsx", report_bytes(&intervals_only_report()))]).await;

    assert_eq!(value["status"], "processed");
    assert_eq!(value["warning"], "No 'Summary' row was found in the processed files.");
    assert!(value["summary"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn report_json_fails_when_nothing_is_extracted() {
    let value = report_json(&[
        ("inventory.xlsx", report_bytes(&unrelated_report())),
        ("notes.txt", b"Summary".to_vec()),
    ])
    .await;

    assert_eq!(value["status"], "failed");
    assert_eq!(
        value["message"],
        "The files could not be processed. Check their format and content."
    );
    assert!(value["warning"].is_null());
    assert!(value["records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn empty_file_input_is_waiting_not_failed() {
    let value = report_json(&[("", Vec::new())]).await;
    assert_eq!(value["status"], "waiting");
    assert_eq!(value["files"], 0);
    assert_eq!(value["message"], "Waiting for file upload...");
    assert!(value["warning"].is_null());

    let response = app()
        .oneshot(upload("/report", &[("", Vec::new())]))
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains("<p class=\"info\">Waiting for file upload...</p>"));
    assert!(!html.contains("class=\"error\""));
}

#[tokio::test]
async fn report_json_keeps_placeholder_summary_rows() {
    let value = report_json(&[("placeholders.xlsx", report_bytes(&placeholder_report()))]).await;

    assert_eq!(value["status"], "processed");
    assert!(value["warning"].is_null());
    let summary = value["summary"].as_array().unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0]["Direction"], "Sentido Norte");
    assert!(summary[0]["Stop_Time_min"].is_null());
}

#[tokio::test]
async fn report_page_renders_tables_and_charts() {
    let response = app()
        .oneshot(upload(
            "/report",
            &[("morning.xlsx", report_bytes(&standard_report()))],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("1 file(s) processed successfully!"));
    assert!(html.contains("Summary Results"));
    assert!(html.contains("<svg"));
    assert!(html.contains("Sentido Norte"));
    assert!(html.contains("Full Data"));
}

#[tokio::test]
async fn report_page_shows_failure_message() {
    let response = app()
        .oneshot(upload("/report", &[("broken.xls", b"not a workbook".to_vec())]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("The files could not be processed."));
    assert!(!html.contains("Summary Results"));
    assert!(!html.contains("<svg"));
}

#[tokio::test]
async fn csv_export_uses_display_headers() {
    let response = app()
        .oneshot(upload(
            "/export/csv",
            &[("morning.xlsx", report_bytes(&standard_report()))],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("resultados.csv")
    );

    let csv = body_text(response).await;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Section,Direction,Interval,Total Delay (min),Avg Delay (s/veh),Stop Time (min),Avg Stop Time (s/veh),Stops,Avg Stops/veh,File"
    );
    assert_eq!(lines.count(), 6);
}

#[tokio::test]
async fn xlsx_export_returns_workbook() {
    let response = app()
        .oneshot(upload(
            "/export/xlsx",
            &[("morning.xlsx", report_bytes(&standard_report()))],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let response = app_with_limit(64)
        .oneshot(upload(
            "/api/report",
            &[("morning.xlsx", report_bytes(&standard_report()))],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
