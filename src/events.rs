//! State-change events and the observer channel.
//!
//! Cars publish an [`ElevatorEvent`] for every transition: one `Moving` per
//! single-floor step, `Arrived` at each stop, `DoorOpen` after the arrival
//! settle, and `Idle` when a car parks with empty queues. Events fan out
//! synchronously to every registered observer, in registration order.
//!
//! Observers run on the publishing car's worker thread, so they should do
//! quick work (update a display, push into a channel) and return.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rs_liftz::{ElevatorEvent, ObserverRegistry, RecordingPanel};
//!
//! let registry = ObserverRegistry::new();
//! let panel = Arc::new(RecordingPanel::new());
//! let id = registry.subscribe(Box::new(Arc::clone(&panel)));
//!
//! // ... cars publish through the registry ...
//!
//! assert!(registry.unsubscribe(id));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::calls::{CarId, Direction, Floor};

// ============================================================================
// Events
// ============================================================================

/// Kind of car state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventKind {
    /// The car completed a single-floor move.
    Moving,
    /// The car reached a stop.
    Arrived,
    /// The doors opened at a stop.
    DoorOpen,
    /// The car parked with both queues empty.
    Idle,
}

/// Immutable notification of a car state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElevatorEvent {
    /// Car the transition belongs to.
    pub car: CarId,
    /// Floor at the time of the transition.
    pub floor: Floor,
    /// Sweep direction at the time of the transition.
    pub direction: Direction,
    /// What happened.
    pub kind: EventKind,
}

// ============================================================================
// Observers
// ============================================================================

/// Receives car state-change notifications.
///
/// Implementations must be `Send + Sync`: events arrive on car worker
/// threads, and several cars may publish concurrently.
pub trait ElevatorObserver: Send + Sync {
    /// Called once per transition, in the order described in the module docs.
    fn on_event(&self, event: &ElevatorEvent);
}

impl<T: ElevatorObserver + ?Sized> ElevatorObserver for Arc<T> {
    fn on_event(&self, event: &ElevatorEvent) {
        (**self).on_event(event)
    }
}

/// Token returned by [`ObserverRegistry::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered list of subscribers with synchronous fan-out.
///
/// Notification order is registration order. The registry lock is separate
/// from any car lock, so subscribing never contends with scheduling.
pub struct ObserverRegistry {
    observers: Mutex<Vec<(SubscriptionId, Box<dyn ElevatorObserver>)>>,
    next_id: AtomicU64,
}

impl ObserverRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Adds an observer; it will receive every event published after this
    /// call returns.
    pub fn subscribe(&self, observer: Box<dyn ElevatorObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers
            .lock()
            .expect("observer registry poisoned")
            .push((id, observer));
        id
    }

    /// Removes the observer registered under `id`. Returns whether anything
    /// was removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.lock().expect("observer registry poisoned");
        let before = observers.len();
        observers.retain(|(sub, _)| *sub != id);
        observers.len() != before
    }

    /// Number of current subscribers.
    pub fn len(&self) -> usize {
        self.observers
            .lock()
            .expect("observer registry poisoned")
            .len()
    }

    /// Whether the registry has no subscribers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `event` to every subscriber, in registration order.
    pub fn publish(&self, event: ElevatorEvent) {
        let observers = self.observers.lock().expect("observer registry poisoned");
        for (_, observer) in observers.iter() {
            observer.on_event(&event);
        }
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
