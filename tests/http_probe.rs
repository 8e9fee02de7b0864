use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use cloudsniff::parallel_executor::{ParallelConfig, ParallelProbeExecutor};
use cloudsniff::probe::{HttpProber, ProbeExecutor};
use cloudsniff::url_space::{ProbeMethod, ProbeTarget, Provider};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn target(url: String) -> ProbeTarget {
    ProbeTarget::new(Provider::SelfHosted, url)
}

fn prober() -> HttpProber {
    HttpProber::new(Duration::from_secs(5)).expect("client builds")
}

#[tokio::test]
async fn completed_exchange_records_status_headers_and_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bucket"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-amz-bucket-region", "us-east-1")
                .set_body_string("<ListBucketResult></ListBucketResult>"),
        )
        .mount(&server)
        .await;

    let outcome = prober().probe(&target(format!("{}/bucket", server.uri()))).await;

    assert_eq!(outcome.status_code, Some(200));
    assert!(outcome.accessible);
    assert_eq!(outcome.size, "<ListBucketResult></ListBucketResult>".len());
    assert_eq!(
        outcome.headers.get("x-amz-bucket-region").map(String::as_str),
        Some("us-east-1")
    );
    assert!(outcome.error.is_none());
    assert!(outcome.response_time > 0.0);
}

#[tokio::test]
async fn large_listing_size_counts_every_byte() {
    let server = MockServer::start().await;
    let body = "<Contents><Key>object</Key></Contents>".repeat(8_192);
    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
        .mount(&server)
        .await;

    let outcome = prober().probe(&target(format!("{}/listing", server.uri()))).await;

    assert_eq!(outcome.status_code, Some(200));
    assert_eq!(outcome.size, body.len());
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn client_errors_are_accessible_server_errors_are_not() {
    let server = MockServer::start().await;
    Mock::given(path("/private"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let prober = prober();
    let forbidden = prober.probe(&target(format!("{}/private", server.uri()))).await;
    let broken = prober.probe(&target(format!("{}/broken", server.uri()))).await;

    assert_eq!(forbidden.status_code, Some(403));
    assert!(forbidden.accessible);
    assert_eq!(broken.status_code, Some(500));
    assert!(!broken.accessible);
}

#[tokio::test]
async fn redirects_are_followed() {
    let server = MockServer::start().await;
    Mock::given(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&server)
        .await;

    let outcome = prober().probe(&target(format!("{}/old", server.uri()))).await;
    assert_eq!(outcome.status_code, Some(200));
    assert_eq!(outcome.size, 5);
}

#[tokio::test]
async fn head_probe_has_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/bucket"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let head = target(format!("{}/bucket", server.uri())).with_method(ProbeMethod::Head);
    let outcome = prober().probe(&head).await;
    assert_eq!(outcome.status_code, Some(200));
    assert_eq!(outcome.method, ProbeMethod::Head);
    assert_eq!(outcome.size, 0);
}

#[tokio::test]
async fn timeout_becomes_failed_outcome() {
    let server = MockServer::start().await;
    Mock::given(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let prober = HttpProber::new(Duration::from_millis(300)).expect("client builds");
    let outcome = prober.probe(&target(format!("{}/slow", server.uri()))).await;

    assert_eq!(outcome.status_code, None);
    assert!(!outcome.accessible);
    assert_eq!(outcome.response_time, 0.0);
    assert!(outcome.error.unwrap().starts_with("timeout"));
}

#[tokio::test]
async fn refused_connection_becomes_failed_outcome() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let outcome = prober().probe(&target(format!("http://127.0.0.1:{port}/bucket"))).await;
    assert_eq!(outcome.status_code, None);
    assert!(!outcome.accessible);
    assert!(outcome.headers.is_empty());
    assert!(outcome.error.is_some());
}

#[tokio::test]
async fn pool_with_real_prober_returns_one_outcome_per_url() {
    let server = MockServer::start().await;
    Mock::given(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(path("/denied"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let mut targets = Vec::new();
    for _ in 0..5 {
        targets.push(target(format!("{}/ok", server.uri())));
        targets.push(target(format!("{}/denied", server.uri())));
        targets.push(target(format!("{}/missing", server.uri())));
    }

    let pool = ParallelProbeExecutor::new(
        ParallelConfig {
            workers: 4,
            ..ParallelConfig::default()
        },
        Arc::new(prober()),
    );
    let outcomes = pool.probe_all(targets).await;

    assert_eq!(outcomes.len(), 15);
    let count = |status: u16| outcomes.iter().filter(|o| o.status_code == Some(status)).count();
    assert_eq!(count(200), 5);
    assert_eq!(count(403), 5);
    // wiremock answers unmatched requests with 404
    assert_eq!(count(404), 5);
    assert!(outcomes.iter().all(|o| o.accessible));
}
