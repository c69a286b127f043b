//! End-to-end checks of the HTTP generation endpoint.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use pipeline_forge::config::ServerConfig;
use pipeline_forge::model::{EditorSession, Signal};
use pipeline_forge::server::{create_router, TEXT_PLAIN_UTF8};
use pipeline_forge::{Category, ComponentRegistry};

async fn post_generate(body: String) -> (StatusCode, Option<String>, String) {
    let router = create_router(&ServerConfig::default());
    let request = Request::builder()
        .method("POST")
        .uri("/generate_yaml")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_edited_model_renders_over_http() {
    let registry = ComponentRegistry::builtin();
    let mut session = EditorSession::new(&registry);
    session.add(Category::Receiver, "otlp");
    session.add(Category::Processor, "batch");
    session.add(Category::Exporter, "debug");
    session.switch_signal(Signal::Metrics);
    session.add(Category::Receiver, "otlp");
    session.add(Category::Exporter, "prometheus");

    let local = session.render();
    let body = serde_json::json!({ "pipeline_data": session.pipelines() }).to_string();
    let (status, content_type, text) = post_generate(body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(TEXT_PLAIN_UTF8));
    assert_eq!(text, local);
    assert!(text.contains("    metrics:\n      receivers: [otlp]\n      exporters: [prometheus]\n"));
}

#[tokio::test]
async fn test_failures_are_comment_lines() {
    let cases = [
        ("", "# Error generating YAML: request body is not valid JSON"),
        ("\"text\"", "# Error generating YAML: request body must be a JSON object"),
        (
            r#"{"pipeline_data":"{not json"}"#,
            "# Error generating YAML: pipeline_data is not valid JSON",
        ),
    ];

    for (body, expected) in cases {
        let (status, _, text) = post_generate(body.to_string()).await;
        assert_eq!(status, StatusCode::OK, "body {body:?}");
        assert_eq!(text, expected, "body {body:?}");
    }
}

#[tokio::test]
async fn test_empty_model_over_http() {
    let (status, _, text) = post_generate(r#"{"pipeline_data":{"pipelines":{}}}"#.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "# Add components to your pipeline to generate config\n");
}
