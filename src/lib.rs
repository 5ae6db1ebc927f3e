//! # rs-liftz
//!
//! A multi-car elevator dispatch engine: independently running cars, each
//! sweeping its pending stops LOOK-style, coordinated by a dispatcher that
//! assigns hall calls through a pluggable cost heuristic.
//!
//! ## Features
//!
//! - **LOOK scheduling**: each car serves all same-direction stops in floor
//!   order before reversing, never skipping or re-ordering work
//! - **Pluggable selection**: hall calls are routed by a [`SelectionStrategy`]
//!   — nearest-match or weighted cost-penalty, swappable at runtime
//! - **One worker per car**: cars move concurrently; producers and each
//!   car's loop serialize through a single per-car critical section
//! - **Event observers**: every move, arrival, door cycle, and idle
//!   transition fans out synchronously to registered observers
//!
//! ## Architecture
//!
//! - `calls` - Request vocabulary: directions, hall/car calls, rejections
//! - `car` - Per-car LOOK state machine (pure, unit-testable)
//! - `strategy` - Car selection policies and penalty weights
//! - `events` - Event types and the observer registry
//! - `panels` - Display observers, including a recording test double
//! - `config` - Construction-time configuration
//! - `dispatcher` - Call routing and worker lifecycle
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use rs_liftz::{
//!     CallDirection, Dispatcher, EventKind, RecordingPanel, SystemConfig,
//! };
//!
//! let config = SystemConfig::default()
//!     .with_num_cars(2)
//!     .with_num_floors(10)
//!     .with_floor_travel(Duration::from_millis(1))
//!     .with_arrival_settle(Duration::from_millis(1))
//!     .with_door_open(Duration::from_millis(1));
//! let dispatcher = Dispatcher::new(config).unwrap();
//!
//! // Watch the bank through an observer
//! let panel = Arc::new(RecordingPanel::new());
//! dispatcher.subscribe(Box::new(Arc::clone(&panel)));
//!
//! // A hall call is assigned to the best car...
//! let car = dispatcher.submit_hall_call(5, CallDirection::Up).unwrap();
//!
//! // ...which eventually arrives and opens its doors
//! assert!(panel.wait_for(Duration::from_secs(5), |events| {
//!     events
//!         .iter()
//!         .any(|e| e.car == car && e.floor == 5 && e.kind == EventKind::DoorOpen)
//! }));
//!
//! dispatcher.shutdown();
//! ```

#![warn(missing_docs)]

/// Request vocabulary: directions, calls, outcomes, and rejections.
pub mod calls;
/// Per-car LOOK scheduling state machine.
pub mod car;
/// Construction-time configuration.
pub mod config;
/// Call routing and worker lifecycle.
pub mod dispatcher;
/// Event types and the observer registry.
pub mod events;
/// Display observers and the recording test double.
pub mod panels;
/// Car selection strategies for hall-call dispatch.
pub mod strategy;

mod worker;

// Re-exports for convenience
pub use calls::{
    CallDirection, CarCall, CarId, ConfigError, Direction, Floor, HallCall, RejectReason,
    RequestOutcome,
};
pub use car::{Car, CarState, StopOutcome};
pub use config::SystemConfig;
pub use dispatcher::Dispatcher;
pub use events::{ElevatorEvent, ElevatorObserver, EventKind, ObserverRegistry, SubscriptionId};
pub use panels::{FloorDisplay, RecordingPanel};
pub use strategy::{CostPenalty, NearestCar, PenaltyWeights, SelectionStrategy, StrategyKind};
