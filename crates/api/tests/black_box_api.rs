use std::sync::Arc;
use std::time::Duration;

use callsight_api::app::{build_app, services::build_services};
use callsight_infra::AppConfig;
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, local-only pipeline, ephemeral port.
        let config = AppConfig::from_lookup(|_| None).expect("default config");
        let app = build_app(Arc::new(build_services(&config)));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn submit(client: &reqwest::Client, base_url: &str, body: serde_json::Value) -> String {
    let res = client
        .post(format!("{}/insights", base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let v: serde_json::Value = res.json().await.unwrap();
    v["job_id"].as_str().unwrap().to_string()
}

async fn poll_until_complete(
    client: &reqwest::Client,
    base_url: &str,
    job_id: &str,
) -> serde_json::Value {
    // The worker runs in the background; poll briefly until it lands.
    for _ in 0..100 {
        let v: serde_json::Value = client
            .get(format!("{}/insights/{}", base_url, job_id))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        match v["state"].as_str() {
            Some("complete") => return v,
            Some("processing") | Some("no-change") => {}
            other => panic!("unexpected poll state {other:?}"),
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("job {job_id} did not complete within timeout");
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", server.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn submit_then_poll_delivers_a_local_report_once() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let job_id = submit(
        &client,
        &server.base_url,
        json!({"metric_id": "revenue_growth", "current_value": 12.5}),
    )
    .await;

    let done = poll_until_complete(&client, &server.base_url, &job_id).await;
    let report = &done["report"];
    assert_eq!(report["success"], true);
    assert_eq!(report["source"], "fallback-local");
    assert_eq!(report["metric_id"], "revenue_growth");
    assert!(report["body"].as_str().unwrap().contains("$25,000 below target"));

    let again: serde_json::Value = client
        .get(format!("{}/insights/{}", server.base_url, job_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(again, json!({"state": "unknown"}));

    let stats: serde_json::Value = client
        .get(format!("{}/insights/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["submitted"], 1);
    assert_eq!(stats["delivered"], 1);
}

#[tokio::test]
async fn flat_history_context_reaches_the_report() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let job_id = submit(
        &client,
        &server.base_url,
        json!({
            "metric_id": "customer_satisfaction",
            "current_value": 4.2,
            "context": {"historical_trends": [4.2, 4.2, 4.2, 4.2, 4.2]}
        }),
    )
    .await;

    let done = poll_until_complete(&client, &server.base_url, &job_id).await;
    assert!(
        done["report"]["body"]
            .as_str()
            .unwrap()
            .contains("no variance in historical data")
    );
}

#[tokio::test]
async fn malformed_context_completes_with_error_report() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let job_id = submit(
        &client,
        &server.base_url,
        json!({
            "metric_id": "call_volume",
            "current_value": 2800,
            "context": {"ai_enabled": "sometimes"}
        }),
    )
    .await;

    let done = poll_until_complete(&client, &server.base_url, &job_id).await;
    assert_eq!(done["report"]["success"], false);
    assert_eq!(done["report"]["source"], "error");
}

#[tokio::test]
async fn invalid_metric_is_rejected() {
    let server = TestServer::spawn().await;
    let res = reqwest::Client::new()
        .post(format!("{}/insights", server.base_url))
        .json(&json!({"metric_id": "", "current_value": 1}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let v: serde_json::Value = res.json().await.unwrap();
    assert_eq!(v["error"], "invalid_metric");
}

#[tokio::test]
async fn unknown_job_polls_as_unknown() {
    let server = TestServer::spawn().await;
    let v: serde_json::Value = reqwest::get(format!("{}/insights/never-submitted", server.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(v, json!({"state": "unknown"}));
}
