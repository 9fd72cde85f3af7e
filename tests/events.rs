use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use graceful::{
    Config, Coordinator, Event, EventKind, OperationError, Operations, Scope, Subscribe,
};
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    fn snapshot(&self) -> Vec<Event> {
        let mut events = self.events.lock().unwrap().clone();
        events.sort_by_key(|e| e.seq);
        events
    }

    fn kinds(&self) -> Vec<EventKind> {
        self.snapshot().into_iter().map(|e| e.kind).collect()
    }

    async fn wait_for(&self, kind: EventKind) -> Vec<Event> {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if self.events.lock().unwrap().iter().any(|e| e.kind == kind) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("{kind:?} never observed; got {:?}", self.kinds()));
        self.snapshot()
    }
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

struct Exploding;

#[async_trait]
impl Subscribe for Exploding {
    async fn on_event(&self, _event: &Event) {
        panic!("subscriber bug");
    }

    fn name(&self) -> &'static str {
        "exploding"
    }
}

fn coordinator(timeout: Duration, subs: Vec<Arc<dyn Subscribe>>) -> Coordinator {
    Coordinator::builder(Config::default().with_timeout(timeout))
        .with_subscribers(subs)
        .build()
}

fn position(events: &[Event], kind: EventKind, op: Option<&str>) -> usize {
    events
        .iter()
        .position(|e| e.kind == kind && (op.is_none() || e.operation.as_deref() == op))
        .unwrap_or_else(|| panic!("missing {kind:?} for {op:?}"))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_successful_run_event_order() {
    let recorder = Arc::new(Recorder::default());
    let coord = coordinator(Duration::from_secs(1), vec![recorder.clone() as Arc<dyn Subscribe>]);

    let ops = Operations::new()
        .with("cache", |_scope: Scope| async { Ok::<(), OperationError>(()) })
        .with("db", |_scope: Scope| async {
            Err::<(), _>(OperationError::fail("connection reset"))
        });

    let token = CancellationToken::new();
    let (done, _errors) = coord.start(token.clone(), ops).unwrap();
    token.cancel();
    done.wait().await;

    let events = recorder.wait_for(EventKind::RunCompleted).await;
    assert_eq!(events.first().map(|e| e.kind), Some(EventKind::ShutdownRequested));
    assert_eq!(events.last().map(|e| e.kind), Some(EventKind::RunCompleted));
    assert_eq!(events[0].reason.as_deref(), Some("token"));
    assert_eq!(events[0].timeout_ms, Some(1000));

    let started = position(&events, EventKind::OperationStarting, Some("cache"));
    let stopped = position(&events, EventKind::OperationStopped, Some("cache"));
    assert!(started < stopped);

    let failed = position(&events, EventKind::OperationFailed, Some("db"));
    assert_eq!(events[failed].reason.as_deref(), Some("operation failed: connection reset"));

    position(&events, EventKind::AllStoppedWithin, None);
    assert!(!events.iter().any(|e| e.kind == EventKind::DeadlineExceeded));
    assert_eq!(events.last().unwrap().reason.as_deref(), Some("failures=1"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_deadline_event_names_pending_operations() {
    let recorder = Arc::new(Recorder::default());
    let coord = coordinator(Duration::from_millis(50), vec![recorder.clone() as Arc<dyn Subscribe>]);

    let ops = Operations::new()
        .with("fast", |_scope: Scope| async { Ok::<(), OperationError>(()) })
        .with("slow", |scope: Scope| async move {
            scope.run_until(tokio::time::sleep(Duration::from_secs(5))).await
        });

    let token = CancellationToken::new();
    let (done, mut errors) = coord.start(token.clone(), ops).unwrap();
    token.cancel();
    done.wait().await;

    let events = recorder.wait_for(EventKind::RunCompleted).await;
    let deadline = position(&events, EventKind::DeadlineExceeded, None);
    assert_eq!(events[deadline].reason.as_deref(), Some("slow"));
    assert_eq!(events[deadline].timeout_ms, Some(50));
    assert!(!events.iter().any(|e| e.kind == EventKind::AllStoppedWithin));

    let failures = errors.drain();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].operation.as_ref(), "slow");
    assert_eq!(failures[0].error, OperationError::DeadlineExceeded);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_dropped_handles_still_run_operations() {
    let recorder = Arc::new(Recorder::default());
    let coord = coordinator(Duration::from_secs(1), vec![recorder.clone() as Arc<dyn Subscribe>]);

    let ops = Operations::new().with("flush", |_scope: Scope| async {
        Err::<(), _>(OperationError::fail("nobody is listening"))
    });

    let token = CancellationToken::new();
    drop(coord.start(token.clone(), ops).unwrap());
    token.cancel();

    let events = recorder.wait_for(EventKind::RunCompleted).await;
    position(&events, EventKind::ShutdownRequested, None);
    position(&events, EventKind::OperationStarting, Some("flush"));
    let failed = position(&events, EventKind::OperationFailed, Some("flush"));
    assert_eq!(
        events[failed].reason.as_deref(),
        Some("operation failed: nobody is listening")
    );
    assert!(!events.iter().any(|e| e.kind == EventKind::FailureDropped));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_panicking_subscriber_is_isolated() {
    let recorder = Arc::new(Recorder::default());
    let coord = coordinator(
        Duration::from_secs(1),
        vec![Arc::new(Exploding) as Arc<dyn Subscribe>, recorder.clone()],
    );

    let ops = Operations::new().with("ok", |_scope: Scope| async { Ok::<(), OperationError>(()) });

    let token = CancellationToken::new();
    let (done, mut errors) = coord.start(token.clone(), ops).unwrap();
    token.cancel();
    done.wait().await;

    let events = recorder.wait_for(EventKind::SubscriberPanicked).await;
    let panicked = position(&events, EventKind::SubscriberPanicked, Some("exploding"));
    assert!(events[panicked]
        .reason
        .as_deref()
        .is_some_and(|r| r.contains("subscriber bug")));
    recorder.wait_for(EventKind::RunCompleted).await;
    assert!(errors.try_recv().is_none());
}

#[cfg(feature = "logging")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_log_writer_consumes_run_events() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("graceful=debug"))
        .with_test_writer()
        .try_init();

    let recorder = Arc::new(Recorder::default());
    let coord = coordinator(
        Duration::from_millis(20),
        vec![Arc::new(graceful::LogWriter::default()) as Arc<dyn Subscribe>, recorder.clone()],
    );
    let ops = Operations::new().with("slow", |scope: Scope| async move {
        scope.run_until(std::future::pending::<()>()).await
    });

    let token = CancellationToken::new();
    let (done, _errors) = coord.start(token.clone(), ops).unwrap();
    token.cancel();
    done.wait().await;

    recorder.wait_for(EventKind::RunCompleted).await;
}
