//! Runs in its own process so the global Prometheus recorder installed here
//! is the one the router records into.

use lexeval_cli::api::create_router;
use lexeval_cli::api::handlers::AppState;
use lexeval_core::document::Document;
use lexeval_core::expansion::SynonymTable;
use lexeval_core::retrieval::Retriever;
use lexeval_core::storage::Corpus;
use lexeval_core::text::Normalizer;
use lexeval_core::PipelineConfig;
use std::sync::Arc;

async fn spawn_app() -> String {
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install recorder");

    let corpus = Corpus::new([Document::new("known", "Graph methods", "", vec![])]);
    let retriever = Retriever::new(
        Arc::new(corpus),
        Arc::new(SynonymTable::empty()),
        Normalizer::default(),
        PipelineConfig::default(),
    );
    let app = create_router(AppState::new(Arc::new(retriever), prometheus_handle));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_request_metrics_use_route_templates() {
    let base_url = spawn_app().await;
    let client = reqwest::Client::new();

    for i in 0..5 {
        let resp = client
            .get(format!("{}/documents/missing-{}", base_url, i))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }
    client
        .get(format!("{}/documents/known", base_url))
        .send()
        .await
        .unwrap();
    client
        .get(format!("{}/synonyms/anything-{}", base_url, 7))
        .send()
        .await
        .unwrap();
    client
        .get(format!("{}/no/such/route/{}", base_url, 42))
        .send()
        .await
        .unwrap();

    let body = client
        .get(format!("{}/metrics", base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    let request_series: Vec<&str> = body
        .lines()
        .filter(|l| l.starts_with("http_requests_total{"))
        .collect();
    assert!(!request_series.is_empty());
    for line in &request_series {
        assert!(!line.contains("missing-"), "raw path leaked into labels: {line}");
        assert!(!line.contains("anything-"), "raw path leaked into labels: {line}");
        assert!(!line.contains("/no/such/route"), "raw path leaked into labels: {line}");
    }

    let not_found: Vec<&&str> = request_series
        .iter()
        .filter(|l| l.contains(r#"path="/documents/:id""#) && l.contains(r#"status="404""#))
        .collect();
    assert_eq!(not_found.len(), 1);
    assert!(not_found[0].ends_with(" 5"));
    assert!(request_series
        .iter()
        .any(|l| l.contains(r#"path="/synonyms/:term""#)));
    assert!(request_series.iter().any(|l| l.contains(r#"path="unmatched""#)));
}
