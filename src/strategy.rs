//! Car selection strategies for hall-call dispatch.
//!
//! This module defines the [`SelectionStrategy`] trait and provides two
//! built-in policies for ranking cars against a hall call.
//!
//! # Built-in Strategies
//!
//! | Strategy | Identifier | Approach |
//! |----------|------------|----------|
//! | [`NearestCar`] | `"nearest"` | Closest car already matching the call |
//! | [`CostPenalty`] | `"cost-penalty"` | Weighted penalty over distance, direction, and queue load |
//!
//! Strategies are pure functions over `(car snapshots, call)`: scoring never
//! mutates car state. Only the dispatcher's subsequent request forwarding
//! does. Lower score wins; ties break in scan order, so the lowest-id car.
//!
//! # Penalty model
//!
//! [`CostPenalty`] charges every car `distance * distance_per_floor`, plus a
//! situational surcharge:
//!
//! - same sweep as the call, call floor already queued — nothing (free ride)
//! - same sweep, but the car already passed the call floor — the full
//!   opposite-direction charge (it must finish the sweep and come back)
//! - same sweep, next committed stop beyond the call floor — `pass_by_floor`
//!   (every committed stop gets pushed back by the insertion)
//! - same sweep otherwise — `insert` (clean insertion into the scan order)
//! - idle — `idle` (cheapest; the car can leave immediately)
//! - opposite sweep — `opposite_direction` plus a congestion surcharge per
//!   stop already queued on the car's far side
//!
//! # Example
//!
//! ```rust
//! use rs_liftz::{CallDirection, CostPenalty, HallCall, SelectionStrategy};
//! use rs_liftz::{CarState, Direction};
//!
//! let cars = vec![
//!     CarState { id: 0, floor: 0, direction: Direction::Idle, up_stops: vec![], down_stops: vec![] },
//!     CarState { id: 1, floor: 10, direction: Direction::Idle, up_stops: vec![], down_stops: vec![] },
//! ];
//! let call = HallCall { floor: 2, direction: CallDirection::Up };
//!
//! // The nearer idle car wins
//! let strategy = CostPenalty::default();
//! assert_eq!(strategy.select(&cars, call), Some(0));
//! ```

use log::trace;

use crate::calls::{CallDirection, CarId, ConfigError, Direction, Floor, HallCall};
use crate::car::CarState;

// ============================================================================
// Strategy trait
// ============================================================================

/// Ranks candidate cars for a hall call.
///
/// Implementations must be pure with respect to the inputs: `select` is
/// advisory only and runs against possibly slightly stale snapshots.
/// Returning `None` means no car is eligible under this policy; the
/// dispatcher falls back to the lowest-id car in that case.
pub trait SelectionStrategy: Send + Sync {
    /// Chooses a car for `call` from `cars`, or `None` if no car qualifies.
    fn select(&self, cars: &[CarState], call: HallCall) -> Option<CarId>;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;
}

// ============================================================================
// NearestCar
// ============================================================================

/// Picks the closest car whose sweep matches the call (or which is idle).
///
/// Cars moving opposite to the call are not candidates at all, so this
/// policy can genuinely find nothing — e.g. when every car is sweeping away
/// from the call.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestCar;

impl SelectionStrategy for NearestCar {
    fn select(&self, cars: &[CarState], call: HallCall) -> Option<CarId> {
        cars.iter()
            .filter(|car| car.direction.matches(call.direction))
            .min_by_key(|car| car.floor.abs_diff(call.floor))
            .map(|car| car.id)
    }

    fn name(&self) -> &'static str {
        "nearest"
    }
}

// ============================================================================
// CostPenalty
// ============================================================================

/// Weights for the [`CostPenalty`] strategy. Lower total = preferred car.
///
/// Defaults follow observed real-world lift tuning: an idle car is nearly
/// free, clean insertions cost little, and sending a car sweeping the wrong
/// way costs two orders of magnitude more than a floor of distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PenaltyWeights {
    /// Charge per floor of distance between car and call.
    pub distance_per_floor: u32,
    /// Charge when the insertion delays every already-committed stop.
    pub pass_by_floor: u32,
    /// Charge for a clean insertion into the current sweep.
    pub insert: u32,
    /// Charge for a car sweeping opposite to the call, and for a
    /// same-sweep car that has already passed the call floor.
    pub opposite_direction: u32,
    /// Congestion surcharge per stop queued on an opposite-sweep car's
    /// far side.
    pub opposite_queue: u32,
    /// Charge for an idle car.
    pub idle: u32,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            distance_per_floor: 3,
            pass_by_floor: 8,
            insert: 12,
            opposite_direction: 200,
            opposite_queue: 15,
            idle: 1,
        }
    }
}

impl PenaltyWeights {
    /// Set the per-floor distance charge.
    pub fn with_distance_per_floor(mut self, weight: u32) -> Self {
        self.distance_per_floor = weight;
        self
    }

    /// Set the pass-by charge.
    pub fn with_pass_by_floor(mut self, weight: u32) -> Self {
        self.pass_by_floor = weight;
        self
    }

    /// Set the clean-insertion charge.
    pub fn with_insert(mut self, weight: u32) -> Self {
        self.insert = weight;
        self
    }

    /// Set the opposite-direction charge.
    pub fn with_opposite_direction(mut self, weight: u32) -> Self {
        self.opposite_direction = weight;
        self
    }

    /// Set the per-stop congestion surcharge.
    pub fn with_opposite_queue(mut self, weight: u32) -> Self {
        self.opposite_queue = weight;
        self
    }

    /// Set the idle-car charge.
    pub fn with_idle(mut self, weight: u32) -> Self {
        self.idle = weight;
        self
    }
}

/// Scores every car with a weighted penalty and picks the minimum.
///
/// Unlike [`NearestCar`] every car is a candidate — an opposite-sweep car is
/// merely expensive, not excluded — so this policy always produces a choice
/// for a non-empty car set.
#[derive(Clone, Copy, Debug, Default)]
pub struct CostPenalty {
    /// Tunable weights; see [`PenaltyWeights`].
    pub weights: PenaltyWeights,
}

impl CostPenalty {
    /// Creates the strategy with the given weights.
    pub fn new(weights: PenaltyWeights) -> Self {
        Self { weights }
    }

    /// Penalty for serving `call` with `car`. Exposed for tuning and tests.
    pub fn penalty(&self, car: &CarState, call: HallCall) -> u64 {
        let w = &self.weights;
        let distance = u64::from(car.floor.abs_diff(call.floor));
        let mut penalty = distance * u64::from(w.distance_per_floor);

        if car.direction == call.direction.into() {
            penalty += self.same_sweep_penalty(car, call.floor, call.direction);
        } else if car.direction == Direction::Idle {
            penalty += u64::from(w.idle);
        } else {
            let far_side = match car.direction {
                Direction::Up => car.down_stops.len(),
                Direction::Down => car.up_stops.len(),
                Direction::Idle => unreachable!("idle handled above"),
            };
            penalty += u64::from(w.opposite_direction)
                + far_side as u64 * u64::from(w.opposite_queue);
        }
        penalty
    }

    /// Surcharge for a car already sweeping in the call's direction.
    ///
    /// The pass-by case is decided by the next committed stop: if it already
    /// lies beyond the call floor, inserting the call delays every committed
    /// stop; if at least one committed stop precedes the call floor, the
    /// insertion is clean.
    fn same_sweep_penalty(&self, car: &CarState, floor: Floor, dir: CallDirection) -> u64 {
        let w = &self.weights;
        let stops = match dir {
            CallDirection::Up => &car.up_stops,
            CallDirection::Down => &car.down_stops,
        };
        if stops.contains(&floor) {
            return 0;
        }

        // Passed it already: the car must finish this sweep and come back.
        let passed = match dir {
            CallDirection::Up => car.floor > floor,
            CallDirection::Down => car.floor < floor,
        };
        if passed {
            return u64::from(w.opposite_direction);
        }

        if let Some(&next) = stops.first() {
            let beyond = match dir {
                CallDirection::Up => next > floor,
                CallDirection::Down => next < floor,
            };
            if beyond {
                return u64::from(w.pass_by_floor);
            }
        }

        u64::from(w.insert)
    }
}

impl SelectionStrategy for CostPenalty {
    fn select(&self, cars: &[CarState], call: HallCall) -> Option<CarId> {
        let best = cars
            .iter()
            .min_by_key(|car| self.penalty(car, call))
            .map(|car| car.id);
        if let Some(id) = best {
            trace!(
                "cost-penalty chose car {} for {} call at floor {}",
                id,
                call.direction,
                call.floor
            );
        }
        best
    }

    fn name(&self) -> &'static str {
        "cost-penalty"
    }
}

// ============================================================================
// Strategy selection by identifier
// ============================================================================

/// Configuration-level identifier of a built-in strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StrategyKind {
    /// [`NearestCar`].
    Nearest,
    /// [`CostPenalty`].
    #[default]
    CostPenalty,
}

impl StrategyKind {
    /// Builds the boxed strategy, applying `weights` where relevant.
    pub fn build(self, weights: PenaltyWeights) -> Box<dyn SelectionStrategy> {
        match self {
            StrategyKind::Nearest => Box::new(NearestCar),
            StrategyKind::CostPenalty => Box::new(CostPenalty::new(weights)),
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest" => Ok(StrategyKind::Nearest),
            "cost-penalty" => Ok(StrategyKind::CostPenalty),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_at(id: CarId, floor: Floor) -> CarState {
        CarState {
            id,
            floor,
            direction: Direction::Idle,
            up_stops: vec![],
            down_stops: vec![],
        }
    }

    fn sweeping(
        id: CarId,
        floor: Floor,
        direction: Direction,
        up_stops: Vec<Floor>,
        down_stops: Vec<Floor>,
    ) -> CarState {
        CarState {
            id,
            floor,
            direction,
            up_stops,
            down_stops,
        }
    }

    fn up_call(floor: Floor) -> HallCall {
        HallCall {
            floor,
            direction: CallDirection::Up,
        }
    }

    fn down_call(floor: Floor) -> HallCall {
        HallCall {
            floor,
            direction: CallDirection::Down,
        }
    }

    // === NearestCar ===

    #[test]
    fn nearest_prefers_closest_matching_car() {
        let cars = vec![
            sweeping(0, 8, Direction::Up, vec![9], vec![]),
            idle_at(1, 4),
            sweeping(2, 6, Direction::Down, vec![], vec![1]),
        ];
        // Car 2 is closest to floor 5 but sweeps the wrong way
        assert_eq!(NearestCar.select(&cars, up_call(5)), Some(1));
    }

    #[test]
    fn nearest_breaks_ties_by_lowest_id() {
        let cars = vec![idle_at(0, 3), idle_at(1, 7)];
        // Both two floors away from 5
        assert_eq!(NearestCar.select(&cars, up_call(5)), Some(0));
    }

    #[test]
    fn nearest_returns_none_when_no_car_matches() {
        let cars = vec![
            sweeping(0, 8, Direction::Down, vec![], vec![2]),
            sweeping(1, 6, Direction::Down, vec![], vec![1]),
        ];
        assert_eq!(NearestCar.select(&cars, up_call(5)), None);
    }

    #[test]
    fn nearest_on_empty_set_is_none() {
        assert_eq!(NearestCar.select(&[], up_call(5)), None);
    }

    // === CostPenalty: penalty classes ===

    #[test]
    fn free_ride_when_floor_already_queued() {
        let strategy = CostPenalty::default();
        let car = sweeping(0, 2, Direction::Up, vec![5, 8], vec![]);
        // distance 3 * 3, no surcharge
        assert_eq!(strategy.penalty(&car, up_call(5)), 9);
    }

    #[test]
    fn passed_floor_charges_full_reversal() {
        let strategy = CostPenalty::default();
        let car = sweeping(0, 6, Direction::Up, vec![9], vec![]);
        // distance 3 * 3 + opposite_direction 200
        assert_eq!(strategy.penalty(&car, up_call(3)), 209);
    }

    #[test]
    fn next_stop_beyond_call_charges_pass_by() {
        let strategy = CostPenalty::default();
        let car = sweeping(0, 2, Direction::Up, vec![8], vec![]);
        // distance 3 * 3 + pass_by_floor 8
        assert_eq!(strategy.penalty(&car, up_call(5)), 17);
    }

    // Scenario: car at 4 sweeping up with stops {6, 9}; an up call at 7
    // falls after the next committed stop, so the insertion is clean.
    #[test]
    fn stop_between_committed_stops_is_clean_insert() {
        let strategy = CostPenalty::default();
        let car = sweeping(0, 4, Direction::Up, vec![6, 9], vec![]);
        // distance 3 * 3 + insert 12
        assert_eq!(strategy.penalty(&car, up_call(7)), 21);
    }

    #[test]
    fn empty_sweep_queue_is_clean_insert() {
        let strategy = CostPenalty::default();
        let car = sweeping(0, 2, Direction::Up, vec![], vec![]);
        assert_eq!(strategy.penalty(&car, up_call(5)), 9 + 12);
    }

    #[test]
    fn idle_car_charges_idle_weight() {
        let strategy = CostPenalty::default();
        let car = idle_at(0, 2);
        assert_eq!(strategy.penalty(&car, up_call(5)), 9 + 1);
    }

    #[test]
    fn opposite_sweep_adds_congestion_surcharge() {
        let strategy = CostPenalty::default();
        let car = sweeping(0, 5, Direction::Up, vec![7], vec![2, 1]);
        // distance 2 * 3 + opposite 200 + 2 far-side stops * 15
        assert_eq!(strategy.penalty(&car, down_call(3)), 6 + 200 + 30);
    }

    #[test]
    fn down_sweep_penalties_mirror_up() {
        let strategy = CostPenalty::default();
        // Already passed floor 7 on the way down
        let car = sweeping(0, 4, Direction::Down, vec![], vec![1]);
        assert_eq!(strategy.penalty(&car, down_call(7)), 9 + 200);
        // Next committed stop below the call floor
        let car = sweeping(0, 9, Direction::Down, vec![], vec![2]);
        assert_eq!(strategy.penalty(&car, down_call(6)), 9 + 8);
    }

    // === CostPenalty: selection ===

    // Scenario: two idle cars at floors 0 and 10; up call at floor 2.
    #[test]
    fn closer_idle_car_wins() {
        let strategy = CostPenalty::default();
        let cars = vec![idle_at(0, 0), idle_at(1, 10)];
        assert_eq!(strategy.select(&cars, up_call(2)), Some(0));
    }

    #[test]
    fn idle_beats_opposite_sweep_at_equal_distance() {
        let strategy = CostPenalty::default();
        let cars = vec![
            sweeping(0, 7, Direction::Down, vec![], vec![1]),
            idle_at(1, 3),
        ];
        assert_eq!(strategy.select(&cars, up_call(5)), Some(1));
    }

    #[test]
    fn tie_breaks_in_scan_order() {
        let strategy = CostPenalty::default();
        let cars = vec![idle_at(0, 4), idle_at(1, 6)];
        assert_eq!(strategy.select(&cars, up_call(5)), Some(0));
    }

    #[test]
    fn cost_penalty_on_empty_set_is_none() {
        assert_eq!(CostPenalty::default().select(&[], up_call(5)), None);
    }

    // === Weights and identifiers ===

    #[test]
    fn weights_builder_overrides_fields() {
        let weights = PenaltyWeights::default()
            .with_distance_per_floor(1)
            .with_insert(2)
            .with_pass_by_floor(3)
            .with_opposite_direction(100)
            .with_opposite_queue(4)
            .with_idle(0);
        assert_eq!(weights.distance_per_floor, 1);
        assert_eq!(weights.insert, 2);
        assert_eq!(weights.pass_by_floor, 3);
        assert_eq!(weights.opposite_direction, 100);
        assert_eq!(weights.opposite_queue, 4);
        assert_eq!(weights.idle, 0);
    }

    #[test]
    fn strategy_kind_parses_known_identifiers() {
        assert_eq!("nearest".parse(), Ok(StrategyKind::Nearest));
        assert_eq!("cost-penalty".parse(), Ok(StrategyKind::CostPenalty));
    }

    #[test]
    fn strategy_kind_rejects_unknown_identifier() {
        let err = "round-robin".parse::<StrategyKind>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownStrategy("round-robin".into()));
    }

    #[test]
    fn strategy_kind_builds_named_strategies() {
        let weights = PenaltyWeights::default();
        assert_eq!(StrategyKind::Nearest.build(weights).name(), "nearest");
        assert_eq!(
            StrategyKind::CostPenalty.build(weights).name(),
            "cost-penalty"
        );
    }
}
