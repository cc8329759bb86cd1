//! HTTP-level tests for the session endpoints.
//!
//! These spin the real router on an ephemeral port and exercise the flows
//! that stay inside the process: job-info save/overwrite/read, the
//! question generator's input validation, and the health check. Flows
//! that round-trip through external APIs are covered by the unit tests
//! of their parsing and aggregation logic.

use std::net::SocketAddr;
use std::sync::Arc;

use interview_harness::config::Config;
use interview_harness::retriever;
use interview_harness::server;

fn test_config() -> Config {
    toml::from_str(
        r#"[db]
host = "localhost"
dbname = "interviews"
user = "ivh"

[server]
bind = "127.0.0.1:0"
"#,
    )
    .unwrap()
}

async fn spawn_server() -> SocketAddr {
    let router = server::app(Arc::new(test_config()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_health() {
    let addr = spawn_server().await;
    let body: serde_json::Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert!(!body["version"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_job_info_before_any_save() {
    let addr = spawn_server().await;
    let body: serde_json::Value = reqwest::get(format!("http://{}/get-job-info", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["message"], "No job info saved yet.");
    assert!(body.get("job_info").is_none());
}

#[tokio::test]
async fn test_job_info_roundtrip_and_overwrite() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let first = serde_json::json!({
        "candidate_name": "Ada",
        "job_role": "Backend Engineer",
        "company_name": "Acme",
        "job_description": "Design and operate APIs.",
        "other_details": "Remote"
    });

    let saved: serde_json::Value = client
        .post(format!("http://{}/save-job-info", addr))
        .json(&first)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(saved["message"], "Job details saved");
    assert_eq!(saved["data"]["job_role"], "Backend Engineer");

    let fetched: serde_json::Value = client
        .get(format!("http://{}/get-job-info", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["job_info"], first);

    // Second save overwrites the first.
    let second = serde_json::json!({
        "candidate_name": "Ada",
        "job_role": "Data Engineer",
        "company_name": "Initech",
        "job_description": "Pipelines.",
    });
    client
        .post(format!("http://{}/save-job-info", addr))
        .json(&second)
        .send()
        .await
        .unwrap();

    let fetched: serde_json::Value = client
        .get(format!("http://{}/get-job-info", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["job_info"]["job_role"], "Data Engineer");
    assert_eq!(fetched["job_info"]["company_name"], "Initech");
}

#[tokio::test]
async fn test_generate_problems_without_job_info_is_error_object() {
    let addr = spawn_server().await;
    let body: serde_json::Value = reqwest::get(format!("http://{}/generate-problems", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let obj = body.as_object().unwrap();
    assert_eq!(obj.len(), 1);
    assert_eq!(obj["error"], "Missing job role or company name.");
}

#[tokio::test]
async fn test_retrieve_context_degrades_to_empty_when_embedding_fails() {
    // With no API key the embedding step fails before any database work;
    // retrieval must swallow that and hand back an empty list.
    std::env::remove_var("GOOGLE_API_KEY");
    let config = test_config();
    let chunks = retriever::retrieve_context(&config, "best interview tips", 5).await;
    assert!(chunks.is_empty());
}

#[tokio::test]
async fn test_upload_without_file_field_is_error_object() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let form = reqwest::multipart::Form::new().text("note", "no file here");
    let body: serde_json::Value = client
        .post(format!("http://{}/upload", addr))
        .multipart(form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(body["error"].as_str().unwrap().contains("audio"));
}
