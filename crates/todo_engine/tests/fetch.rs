use std::time::Duration;

use todo_core::{FetchTarget, RunConfig, Sequence, TargetGenerator};
use todo_engine::{CancellationToken, FailureKind, FetchSettings, Fetcher, ReqwestFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BODY: &str = r#"{"userId":1,"id":2,"title":"quis ut nam facilis","completed":false}"#;

fn fetcher(settings: FetchSettings) -> ReqwestFetcher {
    ReqwestFetcher::new(settings).expect("client builds")
}

#[tokio::test]
async fn fetcher_returns_exact_body_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos/2"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(BODY, "application/json"))
        .mount(&server)
        .await;

    let mut targets = Sequence::Even.generator(format!("{}/todos", server.uri()));
    let output = fetcher(FetchSettings::default())
        .fetch(&targets.next_target(), &CancellationToken::new())
        .await
        .expect("fetch ok");

    assert_eq!(output.status, 200);
    assert_eq!(output.bytes.as_ref(), BODY.as_bytes());
}

#[tokio::test]
async fn fetcher_fails_uniformly_on_non_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let fetcher = fetcher(FetchSettings::default());
    let cancel = CancellationToken::new();

    for (route, code) in [("missing", 404), ("broken", 503), ("empty", 204)] {
        let target = FetchTarget::new(format!("{}/{route}", server.uri()));
        let err = fetcher.fetch(&target, &cancel).await.unwrap_err();
        assert_eq!(err.kind, FailureKind::NonSuccessStatus(code));
        assert!(!err.kind.is_transport());
    }
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string(BODY),
        )
        .mount(&server)
        .await;

    let config = RunConfig {
        http_timeout: Duration::from_millis(50),
        ..RunConfig::default()
    };
    let fetcher = fetcher(FetchSettings::from_config(&config));
    let target = FetchTarget::new(format!("{}/slow", server.uri()));

    let err = fetcher
        .fetch(&target, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
    assert!(err.kind.is_transport());
}

#[tokio::test]
async fn cancelled_token_skips_the_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BODY))
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let target = FetchTarget::new(format!("{}/todos/2", server.uri()));

    let err = fetcher(FetchSettings::default())
        .fetch(&target, &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Cancelled);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn cancellation_aborts_a_blocked_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(5))
                .set_body_string(BODY),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let target = FetchTarget::new(format!("{}/todos/2", server.uri()));
    let err = fetcher(FetchSettings::default())
        .fetch(&target, &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Cancelled);
}

#[tokio::test]
async fn invalid_target_is_rejected_before_sending() {
    let target = FetchTarget::new("not a url/2");
    let err = fetcher(FetchSettings::default())
        .fetch(&target, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Length", "11")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let target = FetchTarget::new(format!("{}/large", server.uri()));

    let err = fetcher(settings)
        .fetch(&target, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}
