//! Display observers: a log-backed floor indicator and a recording panel
//! for tests.
//!
//! These are thin consumers of the event channel — the scheduling core does
//! not depend on them. [`RecordingPanel`] is shipped in the library (not
//! behind `cfg(test)`) so integration tests and downstream users can assert
//! on event streams without writing their own capture observer.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use log::info;

use crate::calls::{CarId, Floor};
use crate::events::{ElevatorEvent, ElevatorObserver, EventKind};

/// Floor indicator for one car, rendered through the `log` facade.
///
/// Mirrors a lobby display: it shows a single car's progress and ignores
/// events from other cars.
#[derive(Clone, Copy, Debug)]
pub struct FloorDisplay {
    floor: Floor,
    car: CarId,
}

impl FloorDisplay {
    /// Creates a display mounted at `floor`, tracking `car`.
    pub fn new(floor: Floor, car: CarId) -> Self {
        Self { floor, car }
    }
}

impl ElevatorObserver for FloorDisplay {
    fn on_event(&self, event: &ElevatorEvent) {
        if event.car != self.car {
            return;
        }
        match event.kind {
            EventKind::Moving => info!(
                "display@{}: car {} passing floor {} ({})",
                self.floor, event.car, event.floor, event.direction
            ),
            EventKind::Arrived => info!(
                "display@{}: car {} arrived at floor {}",
                self.floor, event.car, event.floor
            ),
            EventKind::DoorOpen => info!(
                "display@{}: car {} doors open at floor {}",
                self.floor, event.car, event.floor
            ),
            EventKind::Idle => info!(
                "display@{}: car {} idle at floor {}",
                self.floor, event.car, event.floor
            ),
        }
    }
}

/// Observer that records every event it sees, for assertions in tests.
///
/// Subscribe it behind an [`Arc`](std::sync::Arc) and keep a clone to read
/// from:
///
/// ```rust
/// use std::sync::Arc;
/// use rs_liftz::{ObserverRegistry, RecordingPanel};
///
/// let registry = ObserverRegistry::new();
/// let panel = Arc::new(RecordingPanel::new());
/// registry.subscribe(Box::new(Arc::clone(&panel)));
/// assert!(panel.events().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct RecordingPanel {
    events: Mutex<Vec<ElevatorEvent>>,
}

impl RecordingPanel {
    /// Creates an empty panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, in arrival order.
    pub fn events(&self) -> Vec<ElevatorEvent> {
        self.events.lock().expect("recording panel poisoned").clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().expect("recording panel poisoned").len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops everything recorded so far.
    pub fn clear(&self) {
        self.events.lock().expect("recording panel poisoned").clear();
    }

    /// Blocks until `pred` holds over the recorded events or `timeout`
    /// elapses; returns whether the predicate held.
    ///
    /// Polling granularity is a few milliseconds — intended for tests that
    /// wait on real worker threads.
    pub fn wait_for<F>(&self, timeout: Duration, pred: F) -> bool
    where
        F: Fn(&[ElevatorEvent]) -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            {
                let events = self.events.lock().expect("recording panel poisoned");
                if pred(&events) {
                    return true;
                }
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }
}

impl ElevatorObserver for RecordingPanel {
    fn on_event(&self, event: &ElevatorEvent) {
        self.events
            .lock()
            .expect("recording panel poisoned")
            .push(*event);
    }
}
