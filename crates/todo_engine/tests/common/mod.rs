#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;
use serde_json::json;
use todo_core::{FetchTarget, StepGenerator, TargetGenerator};
use todo_engine::{CancellationToken, FailureKind, FetchError, FetchOutput, Fetcher};
use wiremock::{Request, Respond, ResponseTemplate};

pub fn todo_body(id: i64) -> serde_json::Value {
    json!({
        "userId": 1,
        "id": id,
        "title": format!("todo {id}"),
        "completed": id % 4 == 0,
    })
}

fn id_from_path(path: &str) -> i64 {
    path.rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .unwrap_or(-1)
}

/// Answers every request with a todo whose id is the last path segment.
#[derive(Default)]
pub struct EchoTodo {
    pub delay: Option<Duration>,
}

impl Respond for EchoTodo {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let template =
            ResponseTemplate::new(200).set_body_json(todo_body(id_from_path(request.url.path())));
        match self.delay {
            Some(delay) => template.set_delay(delay),
            None => template,
        }
    }
}

/// Serves `ok` successful todos, then 404 for everything after.
pub struct FailAfter {
    ok: usize,
    served: AtomicUsize,
}

impl FailAfter {
    pub fn new(ok: usize) -> Self {
        Self {
            ok,
            served: AtomicUsize::new(0),
        }
    }
}

impl Respond for FailAfter {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        if self.served.fetch_add(1, Ordering::SeqCst) < self.ok {
            ResponseTemplate::new(200).set_body_json(todo_body(id_from_path(request.url.path())))
        } else {
            ResponseTemplate::new(404)
        }
    }
}

/// In-process fetcher. Sleeps per target so completion order can be
/// arranged independently of dispatch order.
pub struct StubFetcher {
    delay_for: fn(i64) -> Duration,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub seen: Mutex<Vec<String>>,
    body_for: fn(i64) -> Vec<u8>,
}

impl StubFetcher {
    pub fn new(delay_for: fn(i64) -> Duration) -> Self {
        Self {
            delay_for,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            body_for: |id| todo_body(id).to_string().into_bytes(),
        }
    }

    pub fn with_body(mut self, body_for: fn(i64) -> Vec<u8>) -> Self {
        self.body_for = body_for;
        self
    }
}

#[async_trait::async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(
        &self,
        target: &FetchTarget,
        cancel: &CancellationToken,
    ) -> Result<FetchOutput, FetchError> {
        self.seen.lock().unwrap().push(target.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let id = id_from_path(target.as_str());
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(FetchError {
                kind: FailureKind::Cancelled,
                message: "cancelled".into(),
            }),
            _ = tokio::time::sleep((self.delay_for)(id)) => Ok(FetchOutput {
                bytes: Bytes::from((self.body_for)(id)),
                status: 200,
            }),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Counts how often the orchestrator asked for a target.
pub struct CountingGenerator {
    inner: StepGenerator,
    pub calls: usize,
}

impl CountingGenerator {
    pub fn new(inner: StepGenerator) -> Self {
        Self { inner, calls: 0 }
    }
}

impl TargetGenerator for CountingGenerator {
    fn next_target(&mut self) -> FetchTarget {
        self.calls += 1;
        self.inner.next_target()
    }
}

pub fn ids(report: &todo_engine::RunReport) -> Vec<i64> {
    report
        .store
        .iter()
        .map(|(_, item)| item.external_id)
        .collect()
}
