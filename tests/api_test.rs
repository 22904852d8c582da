mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{FakeModel, TestEnv, FAKE_VIDEO};

async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.oneshot(request).await.expect("request");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body").to_vec();
    (status, headers, body)
}

fn post_learn(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/learn")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("json body")
}

#[tokio::test]
async fn test_health() {
    let env = TestEnv::new();
    let (status, _, body) = send(env.router(FakeModel::new("")), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    let value = json_body(&body);
    assert_eq!(value["status"], "healthy");
    assert!(value["timestamp"].is_string());
}

#[tokio::test]
async fn test_learn_builds_blocks_playground_and_videos() {
    let env = TestEnv::new();
    let model = FakeModel::new("# Linear functions\n1. Slope\n2. Intercept\n3. History of lines").visual(&["Slope"]);
    let app = env.router(model);

    let (status, _, body) = send(
        app.clone(),
        post_learn(json!({"topic": "linear functions", "user_preferences": "I want to see visual examples"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));

    let value = json_body(&body);
    assert_eq!(value["main_topic"], "linear functions");
    assert_eq!(value["components"], json!(["Slope", "Intercept", "History of lines"]));

    let blocks = value["learning_blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 3);
    for (i, block) in blocks.iter().enumerate() {
        assert_eq!(block["id"], i + 1);
        assert!(block.get("failed").is_none());
    }
    assert_eq!(blocks[1]["text_content"], "## Intercept\n\n- key idea");
    assert!(blocks[1]["visualization_path"].is_null());
    let video_path = blocks[0]["visualization_path"].as_str().unwrap().to_string();

    // 1 个总览 + 每个学习块 2 个单元格
    let cells = value["playground"]["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 7);
    assert_eq!(cells[2]["cell_type"], "code");
    assert_eq!(value["playground"]["nbformat"], 4);

    // notebook 可以通过接口取回，内容与响应一致
    let playground_path = value["playground_path"].as_str().unwrap();
    let (status, headers, body) = send(app.clone(), get(&format!("/notebook/{}", playground_path))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(json_body(&body), value["playground"]);

    // 视频可以通过接口取回
    let (status, headers, body) = send(app, get(&format!("/visualization/{}", video_path))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "video/mp4");
    assert_eq!(body, FAKE_VIDEO);

    // 学习块存档已写入
    let archives: Vec<_> = std::fs::read_dir(&env.config.blocks_dir).unwrap().collect();
    assert_eq!(archives.len(), 1);
}

#[tokio::test]
async fn test_learn_blank_topic_is_bad_request() {
    let env = TestEnv::new();
    let (status, _, body) = send(env.router(FakeModel::new("1. A")), post_learn(json!({"topic": "   "}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["detail"], "Topic must not be empty");
}

#[tokio::test]
async fn test_learn_invalid_body_reports_detail() {
    let env = TestEnv::new();
    let app = env.router(FakeModel::new("1. A"));

    let (status, _, body) = send(app.clone(), post_learn(json!({"user_preferences": "x"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail = json_body(&body)["detail"].as_str().unwrap().to_string();
    assert!(detail.contains("topic"), "{}", detail);

    let request = Request::builder()
        .method("POST")
        .uri("/learn")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json_body(&body)["detail"].is_string());
}

#[tokio::test]
async fn test_learn_without_components_is_bad_request() {
    let env = TestEnv::new();
    let model = FakeModel::new("# Nothing useful\n**none**\n");
    let (status, _, body) = send(env.router(model), post_learn(json!({"topic": "???"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(&body)["detail"],
        "No learning components could be generated for this topic"
    );
}

#[tokio::test]
async fn test_learn_fails_when_most_components_fail() {
    let env = TestEnv::new();
    let model = FakeModel::new("1. A\n2. B\n3. C").failing(&["A", "C"]);
    let (status, _, body) = send(env.router(model), post_learn(json!({"topic": "letters"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = json_body(&body)["detail"].as_str().unwrap().to_string();
    assert!(detail.starts_with("Too many components failed"), "{}", detail);
    assert!(detail.contains("(2/3)"));
}

#[tokio::test]
async fn test_learn_keeps_failed_component_as_error_block() {
    let env = TestEnv::new();
    let model = FakeModel::new("1. A\n2. B\n3. C").failing(&["B"]);
    let (status, _, body) = send(env.router(model), post_learn(json!({"topic": "letters"}))).await;

    assert_eq!(status, StatusCode::OK);
    let value = json_body(&body);
    let text = value["learning_blocks"][1]["text_content"].as_str().unwrap();
    assert!(text.starts_with("Error processing this component:"), "{}", text);
    assert!(text.contains("upstream timeout for B"));
}

#[tokio::test]
async fn test_learn_with_subtopics_skips_breakdown() {
    let env = TestEnv::new();
    let model = FakeModel::failing_breakdown("breakdown must not be called");
    let (status, _, body) = send(
        env.router(model),
        post_learn(json!({"topic": "data structures", "subtopics": "stacks, queues"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));
    assert_eq!(json_body(&body)["components"], json!(["stacks", "queues"]));
}

#[tokio::test]
async fn test_learn_breakdown_error_is_server_error() {
    let env = TestEnv::new();
    let model = FakeModel::failing_breakdown("connection refused");
    let (status, _, body) = send(env.router(model), post_learn(json!({"topic": "vectors"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = json_body(&body)["detail"].as_str().unwrap().to_string();
    assert!(detail.starts_with("Error processing request:"), "{}", detail);
    assert!(detail.contains("connection refused"));
}

#[tokio::test]
async fn test_visualization_errors() {
    let env = TestEnv::new();
    std::fs::write(env.config.visualizations_dir.join("notes.txt"), b"hello").unwrap();
    std::fs::write(env.dir.path().join("secret.mp4"), b"secret").unwrap();
    let app = env.router(FakeModel::new(""));

    let (status, _, body) = send(app.clone(), get("/visualization/missing.mp4")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body)["detail"], "Visualization file not found");

    let (status, _, body) = send(app.clone(), get("/visualization/notes.txt")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["detail"], "File is not an MP4 video");

    let (status, _, _) = send(app, get("/visualization/sub/../../secret.mp4")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_visualization_range_request() {
    let env = TestEnv::new();
    std::fs::write(env.config.visualizations_dir.join("clip.mp4"), FAKE_VIDEO).unwrap();
    let app = env.router(FakeModel::new(""));

    let request = Request::builder()
        .uri("/visualization/clip.mp4")
        .header(header::RANGE, "bytes=0-9")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(app.clone(), request).await;

    assert_eq!(status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(body, b"0123456789");
    assert_eq!(headers[header::CONTENT_LENGTH], "10");
    assert_eq!(
        headers[header::CONTENT_RANGE],
        format!("bytes 0-9/{}", FAKE_VIDEO.len()).as_str()
    );

    // 多段 Range 不支持，忽略后返回完整文件
    let request = Request::builder()
        .uri("/visualization/clip.mp4")
        .header(header::RANGE, "bytes=0-1,4-5")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, FAKE_VIDEO);
    assert_eq!(headers[header::CONTENT_LENGTH], FAKE_VIDEO.len().to_string().as_str());
    assert!(headers.get(header::CONTENT_RANGE).is_none());

    let request = Request::builder()
        .uri("/visualization/clip.mp4")
        .header(header::RANGE, "bytes=9999-")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(app, request).await;
    assert_eq!(status, StatusCode::RANGE_NOT_SATISFIABLE);
}

#[tokio::test]
async fn test_notebook_errors() {
    let env = TestEnv::new();
    let app = env.router(FakeModel::new(""));

    let (status, _, body) = send(app.clone(), get("/notebook/missing.ipynb")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body)["detail"], "Notebook file not found");

    let (status, _, _) = send(app, get("/notebook/notes.txt")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let env = TestEnv::new();
    let (status, _, body) = send(env.router(FakeModel::new("")), get("/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body)["detail"], "Not Found");
}
