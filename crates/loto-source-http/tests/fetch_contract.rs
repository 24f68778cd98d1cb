//! Contract Test: HTTP Fetching
//!
//! Runs the fetcher against a local mock server.
//!
//! Constraints verified:
//! - Only 200 OK yields a body
//! - Non-OK statuses, timeouts and refused connections are connectivity errors
//! - The User-Agent header is sent
//! - A fetched page flows through the pipeline into a draw

use loto_core::config::LotoConfig;
use loto_core::{ConnectivityCause, Error, PageFetcher, Pipeline};
use loto_source_http::HttpPageFetcher;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UA: &str = "loto-test-agent/1.0";

fn fetcher_for(server: &MockServer, timeout: Duration) -> HttpPageFetcher {
    HttpPageFetcher::new(format!("{}/loto", server.uri()), timeout, UA).expect("valid fetcher")
}

#[tokio::test]
async fn ok_response_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loto"))
        .and(header("user-agent", UA))
        .respond_with(ResponseTemplate::new(200).set_body_string("<span>7</span>"))
        .expect(1)
        .mount(&server)
        .await;

    let body = fetcher_for(&server, Duration::from_secs(5))
        .fetch()
        .await
        .expect("200 OK");
    assert_eq!(body, "<span>7</span>");
}

#[tokio::test]
async fn non_ok_statuses_are_connectivity_errors() {
    for status in [404u16, 500, 204, 301] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let err = fetcher_for(&server, Duration::from_secs(5))
            .fetch()
            .await
            .expect_err("non-OK status");

        match err {
            Error::Connectivity { cause, .. } => {
                assert_eq!(cause, ConnectivityCause::Status(status), "status {}", status)
            }
            other => panic!("expected connectivity error, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<span>1</span>")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = fetcher_for(&server, Duration::from_millis(200))
        .fetch()
        .await
        .expect_err("request exceeds timeout");

    assert!(
        matches!(
            err,
            Error::Connectivity {
                cause: ConnectivityCause::Timeout,
                ..
            }
        ),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
async fn refused_connection_is_a_connectivity_error() {
    let server = MockServer::start().await;
    let url = format!("{}/loto", server.uri());
    drop(server);

    let fetcher = HttpPageFetcher::new(url, Duration::from_secs(2), UA).unwrap();
    let err = fetcher.fetch().await.expect_err("nothing listening");
    assert!(matches!(err, Error::Connectivity { .. }), "unexpected error: {:?}", err);
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn fetched_page_becomes_a_draw() {
    let server = MockServer::start().await;
    let page = "<html><body>\
        <span>2</span><span>5</span><span>26</span><span>32</span>\
        <span>44</span><span>10</span><span>2024</span>\
        </body></html>";
    Mock::given(method("GET"))
        .and(path("/loto"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    let pipeline = Pipeline::from_config(
        Box::new(fetcher_for(&server, Duration::from_secs(5))),
        &LotoConfig::default(),
    )
    .unwrap();

    let draw = pipeline.refresh().await.expect("draw extracted");
    assert_eq!(draw.summary(), "2 - 5 - 26 - 32 - 44 * 10");
}
