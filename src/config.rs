//! Construction-time configuration for a dispatcher and its cars.
//!
//! Nothing here is persisted; a [`SystemConfig`] is built in code, validated
//! once, and handed to [`Dispatcher::new`](crate::Dispatcher::new).
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use rs_liftz::{StrategyKind, SystemConfig};
//!
//! let config = SystemConfig::default()
//!     .with_num_cars(4)
//!     .with_num_floors(15)
//!     .with_strategy(StrategyKind::Nearest)
//!     .with_floor_travel(Duration::from_millis(50));
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use crate::calls::{ConfigError, Floor};
use crate::strategy::{PenaltyWeights, StrategyKind};

/// Complete dispatcher configuration.
#[derive(Clone, Debug)]
pub struct SystemConfig {
    /// Number of cars in the bank.
    pub num_cars: usize,
    /// Number of floors; valid floors are `0..num_floors`.
    pub num_floors: Floor,
    /// Time to travel a single floor.
    pub floor_travel: Duration,
    /// Pause between arriving at a stop and opening the doors.
    pub arrival_settle: Duration,
    /// How long the doors stay open.
    pub door_open: Duration,
    /// Which selection strategy routes hall calls.
    pub strategy: StrategyKind,
    /// Weights for the cost-penalty strategy.
    pub weights: PenaltyWeights,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            num_cars: 3,
            num_floors: 10,
            floor_travel: Duration::from_millis(100),
            arrival_settle: Duration::from_millis(200),
            door_open: Duration::from_millis(500),
            strategy: StrategyKind::default(),
            weights: PenaltyWeights::default(),
        }
    }
}

impl SystemConfig {
    /// Set the number of cars.
    pub fn with_num_cars(mut self, num_cars: usize) -> Self {
        self.num_cars = num_cars;
        self
    }

    /// Set the number of floors.
    pub fn with_num_floors(mut self, num_floors: Floor) -> Self {
        self.num_floors = num_floors;
        self
    }

    /// Set the single-floor travel time.
    pub fn with_floor_travel(mut self, delay: Duration) -> Self {
        self.floor_travel = delay;
        self
    }

    /// Set the arrival-to-door-open pause.
    pub fn with_arrival_settle(mut self, delay: Duration) -> Self {
        self.arrival_settle = delay;
        self
    }

    /// Set the door-open dwell time.
    pub fn with_door_open(mut self, delay: Duration) -> Self {
        self.door_open = delay;
        self
    }

    /// Set the selection strategy.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the cost-penalty weights.
    pub fn with_weights(mut self, weights: PenaltyWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Highest valid floor under this configuration.
    pub fn max_floor(&self) -> Floor {
        self.num_floors - 1
    }

    /// Checks the fatal construction-time conditions: a dispatcher without
    /// cars or with fewer than two floors cannot serve any call, and zero
    /// delays would leave worker loops without interruption points.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_cars == 0 {
            return Err(ConfigError::NoCars);
        }
        if self.num_floors < 2 {
            return Err(ConfigError::TooFewFloors);
        }
        if self.floor_travel.is_zero() {
            return Err(ConfigError::ZeroDelay("floor_travel"));
        }
        if self.arrival_settle.is_zero() {
            return Err(ConfigError::ZeroDelay("arrival_settle"));
        }
        if self.door_open.is_zero() {
            return Err(ConfigError::ZeroDelay("door_open"));
        }
        Ok(())
    }
}
