//! Loading/error state shared by every call of one `DataAccess`

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use shared::ApiEnvelope;
use tokio::sync::watch;

/// Observable request state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
    /// At least one call is in flight
    pub loading: bool,
    /// Message of the last call that failed, cleared by the next success
    pub error: Option<String>,
}

/// Publishes [`RequestState`] to any number of subscribers
///
/// Clones share the same state.
#[derive(Debug, Clone)]
pub struct RequestTracker {
    state: Arc<watch::Sender<RequestState>>,
    in_flight: Arc<AtomicUsize>,
}

impl RequestTracker {
    pub fn new() -> Self {
        let (state, _) = watch::channel(RequestState::default());
        Self {
            state: Arc::new(state),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Current state
    pub fn state(&self) -> RequestState {
        self.state.borrow().clone()
    }

    /// Receiver that wakes on every change
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    /// Number of calls currently in flight
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Mark a call as started; settle the returned guard when it ends
    pub fn begin(&self) -> CallGuard {
        // Counter updates happen under the channel's write lock so that
        // `loading` always agrees with the counter
        self.state.send_modify(|state| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            state.loading = true;
        });
        CallGuard {
            tracker: self.clone(),
            settled: false,
        }
    }

    fn finish(&self, error: Option<Option<String>>) {
        self.state.send_modify(|state| {
            let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
            state.loading = remaining > 0;
            if let Some(error) = error {
                state.error = error;
            }
        });
    }
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// One in-flight call
///
/// Dropping an unsettled guard (the future was cancelled) only releases
/// `loading`; the last error is kept.
#[derive(Debug)]
#[must_use = "settle the guard when the call completes"]
pub struct CallGuard {
    tracker: RequestTracker,
    settled: bool,
}

impl CallGuard {
    /// Record the outcome of the call
    pub fn settle<T>(mut self, envelope: &ApiEnvelope<T>) {
        self.settled = true;
        self.tracker
            .finish(Some(envelope.error_message().map(str::to_string)));
    }
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        if !self.settled {
            self.tracker.finish(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_loading_follows_in_flight_count() {
        let tracker = RequestTracker::new();
        let a = tracker.begin();
        let b = tracker.begin();
        assert_eq!(tracker.in_flight(), 2);

        a.settle(&ApiEnvelope::<Value>::failure(404, "Load not found"));
        let state = tracker.state();
        assert!(state.loading, "second call still running");
        assert_eq!(state.error.as_deref(), Some("Load not found"));

        b.settle(&ApiEnvelope::ok(Value::Null));
        assert_eq!(tracker.state(), RequestState::default());
    }

    #[test]
    fn test_dropped_guard_keeps_error() {
        let tracker = RequestTracker::new();
        tracker
            .begin()
            .settle(&ApiEnvelope::<Value>::failure(500, "Failed to fetch load list"));
        drop(tracker.begin());

        let state = tracker.state();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Failed to fetch load list"));
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let tracker = RequestTracker::new();
        let mut rx = tracker.subscribe();

        let guard = tracker.begin();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().loading);

        guard.settle(&ApiEnvelope::ok(Value::Null));
        rx.changed().await.unwrap();
        assert!(!rx.borrow().loading);
    }
}
