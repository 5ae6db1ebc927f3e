//! Per-car LOOK scheduling state: directional stop queues and the
//! direction decision logic.
//!
//! [`Car`] is a plain synchronous state machine — it never sleeps, spawns,
//! or locks. The worker thread (see the dispatcher) drives it one step at a
//! time inside the per-car critical section, which keeps every transition
//! unit-testable without timing.
//!
//! # Queue discipline
//!
//! A car keeps two ordered stop sets: `up_queue` (floors above the current
//! floor, served ascending) and `down_queue` (floors below, served
//! descending). While work remains in the active direction the car never
//! reverses — the classic LOOK policy — so same-direction stops are served
//! in floor order, never skipped or re-ordered.
//!
//! Stops are de-duplicated per floor: a stop means "the car will stop at
//! this floor", which covers any number of waiting passengers.
//!
//! # Example
//!
//! ```rust
//! use rs_liftz::{Car, Direction, RequestOutcome};
//!
//! let mut car = Car::new(0, 9);
//! assert_eq!(car.direction(), Direction::Idle);
//!
//! // First request points the idle car at the work
//! assert_eq!(car.add_request(5), Ok(RequestOutcome::Enqueued));
//! assert_eq!(car.direction(), Direction::Up);
//! assert_eq!(car.next_stop(), Some(5));
//! ```

use std::collections::BTreeSet;

use log::{debug, warn};

use crate::calls::{CarId, Direction, Floor, RejectReason, RequestOutcome};

// ============================================================================
// Car
// ============================================================================

/// LOOK-scan state of a single car: position, sweep direction, and the two
/// directional stop queues.
///
/// Invariant: `direction == Idle` exactly when both queues are empty, at
/// every point where the owning critical section is released.
#[derive(Debug)]
pub struct Car {
    id: CarId,
    max_floor: Floor,
    current_floor: Floor,
    direction: Direction,
    up_queue: BTreeSet<Floor>,
    down_queue: BTreeSet<Floor>,
}

impl Car {
    /// Creates a car parked at floor 0, idle, with empty queues.
    pub fn new(id: CarId, max_floor: Floor) -> Self {
        Self {
            id,
            max_floor,
            current_floor: 0,
            direction: Direction::Idle,
            up_queue: BTreeSet::new(),
            down_queue: BTreeSet::new(),
        }
    }

    /// This car's stable id.
    pub fn id(&self) -> CarId {
        self.id
    }

    /// Highest floor this car serves.
    pub fn max_floor(&self) -> Floor {
        self.max_floor
    }

    /// The floor the car is currently at (cars are never mid-floor between
    /// steps).
    pub fn current_floor(&self) -> Floor {
        self.current_floor
    }

    /// Current sweep direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether any stop is pending in either queue.
    pub fn has_pending(&self) -> bool {
        !self.up_queue.is_empty() || !self.down_queue.is_empty()
    }

    /// Queue a stop at `floor`.
    ///
    /// Out-of-range floors are rejected before any state mutation. A floor
    /// equal to the current floor is a no-op ([`RequestOutcome::AlreadyHere`])
    /// and in particular never disturbs an idle car's direction. If the car
    /// is idle, its direction is pointed toward the new stop.
    pub fn add_request(&mut self, floor: Floor) -> Result<RequestOutcome, RejectReason> {
        if floor > self.max_floor {
            warn!(
                "car {}: rejecting request for floor {} (max floor {})",
                self.id, floor, self.max_floor
            );
            return Err(RejectReason::FloorOutOfRange {
                floor,
                max_floor: self.max_floor,
            });
        }
        if floor == self.current_floor {
            debug!("car {}: already at floor {}", self.id, floor);
            return Ok(RequestOutcome::AlreadyHere);
        }

        let inserted = if floor > self.current_floor {
            self.up_queue.insert(floor)
        } else {
            self.down_queue.insert(floor)
        };

        if self.direction == Direction::Idle {
            self.direction = if floor > self.current_floor {
                Direction::Up
            } else {
                Direction::Down
            };
            debug!(
                "car {}: idle at {}, heading {} for floor {}",
                self.id, self.current_floor, self.direction, floor
            );
        }

        Ok(if inserted {
            RequestOutcome::Enqueued
        } else {
            RequestOutcome::AlreadyQueued
        })
    }

    /// Pops the next stop of the active sweep: the lowest queued floor while
    /// going up, the highest while going down. Returns `None` when idle.
    pub fn next_stop(&mut self) -> Option<Floor> {
        match self.direction {
            Direction::Up => self.up_queue.pop_first(),
            Direction::Down => self.down_queue.pop_last(),
            Direction::Idle => None,
        }
    }

    /// Moves exactly one floor toward `target` and returns the new floor.
    ///
    /// Callers must not invoke this when already at `target`.
    pub fn step_toward(&mut self, target: Floor) -> Floor {
        debug_assert_ne!(self.current_floor, target, "step with no distance left");
        if target > self.current_floor {
            self.current_floor += 1;
        } else {
            self.current_floor -= 1;
        }
        self.current_floor
    }

    /// Decides the sweep direction after a completed stop (doors closed).
    ///
    /// Both queues empty parks the car idle; an exhausted active queue with
    /// work on the other side reverses the sweep; otherwise the sweep
    /// continues. Reversals are silent — only the idle transition is
    /// observable as an event.
    pub fn settle_after_stop(&mut self) -> StopOutcome {
        if self.up_queue.is_empty() && self.down_queue.is_empty() {
            self.direction = Direction::Idle;
            debug!("car {}: idle at floor {}", self.id, self.current_floor);
            return StopOutcome::NowIdle;
        }
        let reversed = match self.direction {
            Direction::Up if self.up_queue.is_empty() => Some(Direction::Down),
            Direction::Down if self.down_queue.is_empty() => Some(Direction::Up),
            _ => None,
        };
        match reversed {
            Some(dir) => {
                self.direction = dir;
                debug!(
                    "car {}: reversing to {} at floor {}",
                    self.id, dir, self.current_floor
                );
                StopOutcome::Reversed(dir)
            }
            None => StopOutcome::Continue,
        }
    }

    /// Snapshot of the car for strategy scoring and the public state API.
    pub fn state(&self) -> CarState {
        CarState {
            id: self.id,
            floor: self.current_floor,
            direction: self.direction,
            up_stops: self.up_queue.iter().copied().collect(),
            down_stops: self.down_queue.iter().rev().copied().collect(),
        }
    }
}

/// Direction decision after a completed stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopOutcome {
    /// Work remains in the active direction; the sweep continues.
    Continue,
    /// The active queue is exhausted; the sweep reversed to the other side.
    Reversed(Direction),
    /// Both queues are empty; the car parked idle.
    NowIdle,
}

// ============================================================================
// Snapshot
// ============================================================================

/// Point-in-time snapshot of a car.
///
/// `up_stops` and `down_stops` are listed in *service order*: ascending for
/// the up sweep, descending for the down sweep, so the first element of the
/// active list is the car's next committed stop. Strategies score against
/// these snapshots without holding any car's lock, so the view may be
/// slightly stale by the time a request is forwarded — a suboptimal but
/// never unsafe assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarState {
    /// Car id.
    pub id: CarId,
    /// Floor at snapshot time.
    pub floor: Floor,
    /// Sweep direction at snapshot time.
    pub direction: Direction,
    /// Pending up-sweep stops, ascending.
    pub up_stops: Vec<Floor>,
    /// Pending down-sweep stops, descending.
    pub down_stops: Vec<Floor>,
}

impl CarState {
    /// Number of pending up-sweep stops.
    pub fn up_queue_len(&self) -> usize {
        self.up_stops.len()
    }

    /// Number of pending down-sweep stops.
    pub fn down_queue_len(&self) -> usize {
        self.down_stops.len()
    }
}
