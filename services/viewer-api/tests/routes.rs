use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bmxp_viewer::ViewerConfig;
use http_body_util::BodyExt;
use std::fs;
use std::sync::Arc;
use tower::ServiceExt;
use viewer_api::{data_dirs, router, AppState};

const SUITE: &str = r#"{
    "name": "sorting",
    "benchmarks": {
        "std": {"desc": "std::sort", "results": "std.json", "src": "src/std.cpp"},
        "radix": {"desc": "radix sort", "results": "radix.json"}
    }
}"#;

const STD_RESULTS: &str = r#"{
    "context": {"num_cpus": 8},
    "benchmarks": [
        {"name": "BM_sort&lt;int&gt;/64", "iterations": 1000, "real_time": 20.0, "cpu_time": 19.0, "bytes_per_second": 2000000},
        {"name": "BM_sort&lt;int&gt;/128", "iterations": 500, "real_time": 40.0, "cpu_time": 38.0, "bytes_per_second": 4000000}
    ]
}"#;

fn app(dir: &tempfile::TempDir) -> Router {
    let root = dir.path();
    fs::create_dir_all(root.join("bm")).unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("bm/specs.json"), SUITE).unwrap();
    fs::write(root.join("bm/std.json"), STD_RESULTS).unwrap();
    fs::write(root.join("bm/radix.json"), "{broken").unwrap();
    fs::write(root.join("src/std.cpp"), "BENCHMARK(BM_sort);").unwrap();

    let config = ViewerConfig {
        data_root: root.display().to_string(),
        static_dir: root.join("static").display().to_string(),
        settle_timeout_ms: 5_000,
        ..ViewerConfig::default()
    };
    let fetcher = config.fetcher().unwrap();
    router(Arc::new(AppState::new(config, fetcher)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn index_without_bm_lists_benchmarks_only() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get(app(&dir), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Benchmarks: sorting"));
    assert!(body.contains("href=\"?bm=std\""));
    assert!(!body.contains("id=\"bm-results-std\""));
}

#[tokio::test]
async fn index_with_bm_renders_one_panel() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get(app(&dir), "/?bm=std&dbg=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("id=\"bm-results-std\""));
    assert!(!body.contains("id=\"bm-results-radix\""));
    assert!(body.contains("BENCHMARK(BM_sort);"));
    assert!(body.contains("<pre id=\"dbg\">"));
    assert!(body.contains("bm/std.json: got response!"));
}

#[tokio::test]
async fn index_with_unknown_bm_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get(app(&dir), "/?bm=bogus").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"]["code"], "MISSING_BENCHMARK");
    assert!(json["meta"]["timestamp"].is_string());
}

#[tokio::test]
async fn all_page_shows_every_panel_with_one_separator() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get(app(&dir), "/all").await;
    assert_eq!(status, StatusCode::OK);
    let std_at = body.find("id=\"bm-results-std\"").unwrap();
    let radix_at = body.find("id=\"bm-results-radix\"").unwrap();
    assert!(std_at < radix_at);
    assert_eq!(body.matches("class=\"bm-sep\"").count(), 1);
    assert!(body.contains("href=\"#bm-results-radix\""));
}

#[tokio::test]
async fn api_suite_keeps_document_order() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get(app(&dir), "/api/suite").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["name"], "sorting");
    assert_eq!(json["benchmarks"][0]["key"], "std");
    assert_eq!(json["benchmarks"][1]["key"], "radix");
    assert_eq!(json["benchmarks"][1]["name"], "radix");
}

#[tokio::test]
async fn api_benchmark_returns_panel_view_model() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get(app(&dir), "/api/benchmarks/std").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["tables"].as_array().unwrap().len(), 2);
    assert_eq!(json["charts"].as_array().unwrap().len(), 5);
    assert_eq!(json["code"]["language"], "c++");
}

#[tokio::test]
async fn api_benchmark_errors() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get(app(&dir), "/api/benchmarks/radix").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("LOAD_FAILED"));

    let (status, _) = get(app(&dir), "/api/benchmarks/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn data_root_files_are_served() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get(app(&dir), "/bm/specs.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("sorting"));
}

#[tokio::test]
async fn private_data_root_files_are_not_served() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);
    fs::write(dir.path().join(".env"), "BMXP_PORT=9000").unwrap();
    fs::write(dir.path().join("bmxp.toml"), "port = 9000").unwrap();

    for uri in ["/.env", "/bmxp.toml", "/src/std.cpp"] {
        let (status, _) = get(app.clone(), uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
    let (status, _) = get(app, "/bm/std.json").await;
    assert_eq!(status, StatusCode::OK);
}

#[test]
fn served_dirs_follow_suite_and_results_locations() {
    let config = ViewerConfig::default();
    assert_eq!(data_dirs(&config), ["bm"]);

    let config = ViewerConfig {
        spec_path: "suite/specs.json".to_string(),
        results_prefix: "suite/runs/".to_string(),
        ..ViewerConfig::default()
    };
    assert_eq!(data_dirs(&config), ["suite"]);

    let config = ViewerConfig {
        spec_path: "specs.json".to_string(),
        results_prefix: "../outside".to_string(),
        ..ViewerConfig::default()
    };
    assert!(data_dirs(&config).is_empty());

    let config = ViewerConfig {
        spec_path: "static/specs.json".to_string(),
        results_prefix: "results".to_string(),
        ..ViewerConfig::default()
    };
    assert_eq!(data_dirs(&config), ["results"]);
}
