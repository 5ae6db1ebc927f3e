//! Call types and rejection reasons for the dispatch engine.
//!
//! This module defines the request vocabulary shared by the dispatcher,
//! the cars, and the selection strategies.
//!
//! # Hall calls vs car calls
//!
//! The two request kinds deliberately carry different information:
//!
//! - [`HallCall`]: made from a floor, outside any cabin. Carries the desired
//!   travel direction so a strategy can prefer cars already sweeping that way.
//! - [`CarCall`]: made from inside a specific cabin. Names only a destination
//!   floor — the passenger has already chosen their car, so no strategy runs.
//!
//! # Direction types
//!
//! A car can be [`Idle`](Direction::Idle); a hall call cannot ask for "idle".
//! [`CallDirection`] exists so that an idle hall call is unrepresentable,
//! rather than a runtime validation case.
//!
//! ```rust
//! use rs_liftz::{CallDirection, Direction};
//!
//! // An idle car serves calls in either direction
//! assert!(Direction::Idle.matches(CallDirection::Up));
//! assert!(Direction::Idle.matches(CallDirection::Down));
//!
//! // A moving car only matches its own sweep
//! assert!(Direction::Up.matches(CallDirection::Up));
//! assert!(!Direction::Up.matches(CallDirection::Down));
//! ```

use core::fmt;

/// A building floor. Valid floors are `0..=max_floor` for the configured
/// building; validation happens at the dispatch boundary.
pub type Floor = u8;

/// Stable identifier of a car, assigned densely from 0 at startup.
pub type CarId = usize;

// ============================================================================
// Directions
// ============================================================================

/// Travel state of a car.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    /// Sweeping upward through its pending stops.
    Up,
    /// Sweeping downward through its pending stops.
    Down,
    /// No pending stops in either queue.
    #[default]
    Idle,
}

impl Direction {
    /// Whether a car in this state can serve a call in `call` direction
    /// without reversing: either it is already sweeping that way, or it is
    /// idle and free to start.
    pub fn matches(self, call: CallDirection) -> bool {
        self == Direction::Idle || self == call.into()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
            Direction::Idle => f.write_str("idle"),
        }
    }
}

/// Direction requested by a hall call. Unlike [`Direction`] there is no
/// idle variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CallDirection {
    /// The caller wants to travel up.
    Up,
    /// The caller wants to travel down.
    Down,
}

impl From<CallDirection> for Direction {
    fn from(call: CallDirection) -> Self {
        match call {
            CallDirection::Up => Direction::Up,
            CallDirection::Down => Direction::Down,
        }
    }
}

impl fmt::Display for CallDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallDirection::Up => f.write_str("up"),
            CallDirection::Down => f.write_str("down"),
        }
    }
}

// ============================================================================
// Calls
// ============================================================================

/// A request made from a floor, outside any cabin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HallCall {
    /// Floor the call was made from.
    pub floor: Floor,
    /// Desired travel direction.
    pub direction: CallDirection,
}

/// A request made from inside a specific cabin, naming only a destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarCall {
    /// Car whose cabin panel was pressed.
    pub car: CarId,
    /// Destination floor.
    pub floor: Floor,
}

// ============================================================================
// Outcomes and rejections
// ============================================================================

/// What happened to an accepted stop request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The floor was added to the car's pending stops.
    Enqueued,
    /// The floor was already pending; stops are per-floor, so this is a no-op.
    AlreadyQueued,
    /// The car is already at the requested floor; nothing to do.
    AlreadyHere,
}

/// Why a call was rejected. Rejections happen before any state mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// The requested floor is outside the building.
    FloorOutOfRange {
        /// The rejected floor.
        floor: Floor,
        /// Highest floor in the building.
        max_floor: Floor,
    },
    /// A car call addressed a car id that does not exist.
    UnknownCar(CarId),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::FloorOutOfRange { floor, max_floor } => {
                write!(f, "floor {floor} outside valid range 0..={max_floor}")
            }
            RejectReason::UnknownCar(id) => write!(f, "no car with id {id}"),
        }
    }
}

impl std::error::Error for RejectReason {}

/// Fatal construction-time configuration problems. Unlike [`RejectReason`]
/// these are not recoverable at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A dispatcher needs at least one car.
    NoCars,
    /// A building needs at least two floors for any call to make sense.
    TooFewFloors,
    /// Travel and door delays must be nonzero so shutdown can interrupt them.
    ZeroDelay(&'static str),
    /// The strategy identifier is not one of the known strategies.
    UnknownStrategy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoCars => f.write_str("at least one car is required"),
            ConfigError::TooFewFloors => f.write_str("at least two floors are required"),
            ConfigError::ZeroDelay(which) => write!(f, "{which} delay must be nonzero"),
            ConfigError::UnknownStrategy(name) => write!(f, "unknown selection strategy {name:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}
