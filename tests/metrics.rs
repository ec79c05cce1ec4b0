// tests/metrics.rs
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

// Build the full in-process app with the Prometheus recorder installed.
async fn build_app() -> Router {
    std::env::set_var(safecommute::ENV_METRICS_ENABLED, "1");
    std::env::remove_var(safecommute::ai_adapter::ENV_TEST_MODE);
    safecommute::app()
        .await
        .expect("app() should build Router in tests")
}

fn evaluate_payload() -> &'static str {
    r#"{"routes":[{"id":"a","name":"A","metrics":{"safety":90,"balance":80,"speed":70}},{"id":"b","name":"B"}]}"#
}

#[serial_test::serial]
#[tokio::test]
async fn metrics_endpoint_contains_scoring_series() {
    let app = build_app().await;

    let resp = app
        .clone()
        .oneshot(
            Request::post("/evaluate")
                .header("content-type", "application/json")
                .body(Body::from(evaluate_payload()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    // axum::body::to_bytes requires an explicit limit
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    let text = String::from_utf8(body.to_vec()).unwrap();

    for needle in [
        "evaluations_total",
        "routes_scored_total",
        "evaluate_duration_ms",
    ] {
        assert!(
            text.contains(needle),
            "expected metric '{needle}' in /metrics output"
        );
    }
}

#[serial_test::serial]
#[tokio::test]
async fn app_can_be_built_twice() {
    // The recorder is process-global; a second app reuses it.
    let first = build_app().await;
    let second = build_app().await;

    for app in [first, second] {
        let resp = app
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
