use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, EchoedRequest, JSON_BODY};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_method_path_and_body() {
    let resp = app()
        .oneshot(json_request("POST", "/echo", r#"{"test":"test"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: EchoedRequest = body_json(resp).await;
    assert_eq!(echoed.method, "POST");
    assert_eq!(echoed.path, "/echo");
    assert_eq!(echoed.query, None);
    assert_eq!(echoed.body, r#"{"test":"test"}"#);
    assert_eq!(echoed.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn echo_reflects_query_string() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/echo?a=1&a=2&q=hello+world")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    let echoed: EchoedRequest = body_json(resp).await;
    assert_eq!(echoed.method, "GET");
    assert_eq!(echoed.query.as_deref(), Some("a=1&a=2&q=hello+world"));
    assert!(echoed.body.is_empty());
}

#[tokio::test]
async fn echo_keeps_repeated_header_values_in_order() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/echo")
                .header("X-Multi", "one")
                .header("X-Multi", "two")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    let echoed: EchoedRequest = body_json(resp).await;
    assert_eq!(
        echoed.headers.get("x-multi"),
        Some(&vec!["one".to_string(), "two".to_string()])
    );
}

#[tokio::test]
async fn echo_accepts_extension_methods() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("PURGE")
                .uri("/echo")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: EchoedRequest = body_json(resp).await;
    assert_eq!(echoed.method, "PURGE");
}

// --- json ---

#[tokio::test]
async fn json_returns_fixed_body_with_content_type() {
    let resp = app()
        .oneshot(Request::builder().uri("/json").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(http::header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(body_bytes(resp).await, JSON_BODY.as_bytes());
}

// --- large ---

#[tokio::test]
async fn large_returns_requested_payload_size() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/large?size=20000")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["test"].as_str().unwrap().len(), 20000);
}

#[tokio::test]
async fn large_without_size_returns_empty_string() {
    let resp = app()
        .oneshot(Request::builder().uri("/large").body(String::new()).unwrap())
        .await
        .unwrap();

    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["test"], "");
}

// --- status ---

#[tokio::test]
async fn status_returns_requested_code_with_empty_body() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/status/418")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn status_rejects_non_numeric_code() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/status/teapot")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delay ---

#[tokio::test(start_paused = true)]
async fn delay_holds_response_for_requested_time() {
    let started = tokio::time::Instant::now();
    let resp = app()
        .oneshot(Request::builder().uri("/delay/1500").body(String::new()).unwrap())
        .await
        .unwrap();

    assert!(started.elapsed() >= std::time::Duration::from_millis(1500));
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, JSON_BODY.as_bytes());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app()
        .oneshot(Request::builder().uri("/nope").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
