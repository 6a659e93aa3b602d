/*
 *  tests/status_client.rs
 *
 *  StatusClient against a local HTTP server standing in for the receiver
 *
 *  stratux-screen - receiver status at a glance
 *  (c) 2026 Stratux Screen contributors
 */

use std::time::Duration;

use axum::{
    http::{header, HeaderMap, StatusCode, Version},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use stratux_screen::config::StatusConfig;
use stratux_screen::status::{AcquisitionError, StatusClient, StatusSource};

fn status_body() -> Value {
    json!({
        "Version": "v1.6r1-eu032",
        "UAT_messages_last_minute": 240,
        "UAT_messages_max": 240,
        "ES_messages_last_minute": 1870,
        "ES_messages_max": 2301,
        "CPUTemp": 51.54,
        "GPS_satellites_locked": 9,
        "GPS_satellites_seen": 12,
        "GPS_satellites_tracked": 15,
        "GPS_solution": "3D GPS + SBAS (WAAS)",
        "Uptime": 3712000
    })
}

fn towers_body() -> Value {
    json!({
        "(41.24,-95.97)": {"Lat": 41.24, "Lng": -95.97, "Messages_last_minute": 57},
        "(40.81,-96.68)": {"Lat": 40.81, "Lng": -96.68, "Messages_last_minute": 0},
        "(41.59,-93.62)": {"Lat": 41.59, "Lng": -93.62, "Messages_last_minute": 3}
    })
}

/// Serve `router` on an ephemeral port and return its base URL
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: String) -> StatusClient {
    StatusClient::new(&StatusConfig {
        base_url,
        timeout_ms: 500,
        connect_timeout_ms: 500,
    })
    .unwrap()
}

fn healthy_towers() -> axum::routing::MethodRouter {
    get(|| async { Json(towers_body()) })
}

#[tokio::test]
async fn test_snapshot_merges_both_resources() {
    let base = serve(
        Router::new()
            .route("/getStatus", get(|| async { Json(status_body()) }))
            .route("/getTowers", healthy_towers()),
    )
    .await;

    let snapshot = client(base).fetch_snapshot().await.unwrap();
    assert_eq!(snapshot.uat_messages_last_minute, 240);
    assert_eq!(snapshot.uat_messages_max, 240);
    assert_eq!(snapshot.es_messages_last_minute, 1870);
    assert_eq!(snapshot.es_messages_max, 2301);
    assert_eq!(snapshot.cpu_temperature, 51.54);
    assert_eq!(snapshot.gps_satellites_locked, 9);
    assert_eq!(snapshot.gps_satellites_seen, 12);
    assert_eq!(snapshot.gps_satellites_tracked, 15);
    assert_eq!(snapshot.tower_count, 2);
    assert!(snapshot.has_waas());
}

#[tokio::test]
async fn test_requests_are_plain_http1_json() {
    let base = serve(
        Router::new()
            .route(
                "/getStatus",
                get(|version: Version, headers: HeaderMap| async move {
                    let accepts_json = headers
                        .get(header::ACCEPT)
                        .is_some_and(|v| v == "application/json");
                    if version == Version::HTTP_11 && accepts_json {
                        Ok(Json(status_body()))
                    } else {
                        Err(StatusCode::BAD_REQUEST)
                    }
                }),
            )
            .route("/getTowers", healthy_towers()),
    )
    .await;

    assert!(client(base).fetch_snapshot().await.is_ok());
}

#[tokio::test]
async fn test_tower_count_recomputed_each_fetch() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let base = serve(
        Router::new()
            .route("/getStatus", get(|| async { Json(status_body()) }))
            .route(
                "/getTowers",
                get(move || {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if n == 0 {
                            Json(towers_body())
                        } else {
                            Json(json!({"(41.24,-95.97)": {"Messages_last_minute": 0}}))
                        }
                    }
                }),
            ),
    )
    .await;

    let client = client(base);
    assert_eq!(client.fetch_snapshot().await.unwrap().tower_count, 2);
    assert_eq!(client.fetch_snapshot().await.unwrap().tower_count, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_lenient_numbers_and_null_towers() {
    let base = serve(
        Router::new()
            .route(
                "/getStatus",
                get(|| async {
                    Json(json!({
                        "UAT_messages_last_minute": "12",
                        "UAT_messages_max": 30.0,
                        "ES_messages_last_minute": 0,
                        "ES_messages_max": 0,
                        "CPUTemp": "44.5",
                        "GPS_satellites_locked": 0,
                        "GPS_satellites_seen": 0,
                        "GPS_satellites_tracked": 0,
                        "GPS_solution": ""
                    }))
                }),
            )
            .route("/getTowers", get(|| async { Json(Value::Null) })),
    )
    .await;

    let snapshot = client(base).fetch_snapshot().await.unwrap();
    assert_eq!(snapshot.uat_messages_last_minute, 12);
    assert_eq!(snapshot.uat_messages_max, 30);
    assert_eq!(snapshot.cpu_temperature, 44.5);
    assert_eq!(snapshot.tower_count, 0);
    assert!(!snapshot.has_waas());
}

#[tokio::test]
async fn test_server_error_is_request_error() {
    let base = serve(
        Router::new()
            .route("/getStatus", get(|| async { Json(status_body()) }))
            .route("/getTowers", get(|| async { StatusCode::INTERNAL_SERVER_ERROR })),
    )
    .await;

    match client(base).fetch_snapshot().await {
        Err(AcquisitionError::Request { url, .. }) => assert!(url.ends_with("/getTowers")),
        other => panic!("expected request error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let base = serve(
        Router::new()
            .route("/getStatus", get(|| async { "{\"UAT_messages_last_minute\": 4" }))
            .route("/getTowers", healthy_towers()),
    )
    .await;

    match client(base).fetch_snapshot().await {
        Err(AcquisitionError::Decode { url, .. }) => assert!(url.ends_with("/getStatus")),
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_field_is_decode_error() {
    let base = serve(
        Router::new()
            .route(
                "/getStatus",
                get(|| async {
                    let mut body = status_body();
                    body.as_object_mut().unwrap().remove("GPS_solution");
                    Json(body)
                }),
            )
            .route("/getTowers", healthy_towers()),
    )
    .await;

    let err = client(base).fetch_snapshot().await.unwrap_err();
    assert!(matches!(err, AcquisitionError::Decode { .. }));
    assert!(err.to_string().contains("/getStatus"));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let base = serve(
        Router::new()
            .route(
                "/getStatus",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Json(status_body())
                }),
            )
            .route("/getTowers", healthy_towers()),
    )
    .await;

    let started = std::time::Instant::now();
    let err = client(base).fetch_snapshot().await.unwrap_err();
    assert!(matches!(err, AcquisitionError::Request { .. }));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_nothing_listening_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{}", addr)).fetch_snapshot().await.unwrap_err();
    assert!(matches!(err, AcquisitionError::Request { .. }));
}
