//! The dispatcher: owns the car bank, routes calls, and manages worker
//! lifecycle.
//!
//! A [`Dispatcher`] is an explicit constructed value — there is no global
//! instance. Build a [`SystemConfig`], hand it to [`Dispatcher::new`], and
//! share the dispatcher (it takes `&self` everywhere) between however many
//! callers submit requests.
//!
//! # Call routing
//!
//! - Hall calls go through the configured [`SelectionStrategy`]: the
//!   dispatcher snapshots every car (one brief lock each, none held while
//!   scoring), lets the strategy rank them, and forwards the floor to the
//!   winner.
//! - Car calls skip the strategy entirely — the passenger is already inside
//!   a specific car.
//!
//! The dispatcher holds no scheduling state of its own beyond the car list
//! and the strategy; all queue state lives in the cars.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use rs_liftz::{CallDirection, Dispatcher, SystemConfig};
//!
//! let config = SystemConfig::default()
//!     .with_num_cars(2)
//!     .with_num_floors(10)
//!     .with_floor_travel(Duration::from_millis(1))
//!     .with_arrival_settle(Duration::from_millis(1))
//!     .with_door_open(Duration::from_millis(1));
//! let dispatcher = Dispatcher::new(config).unwrap();
//!
//! let car = dispatcher.submit_hall_call(3, CallDirection::Up).unwrap();
//! assert!(car < 2);
//!
//! dispatcher.shutdown();
//! ```

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Sender};
use log::{info, warn};

use crate::calls::{CallDirection, CarCall, CarId, ConfigError, Floor, HallCall, RejectReason};
use crate::car::CarState;
use crate::config::SystemConfig;
use crate::events::{ElevatorObserver, ObserverRegistry, SubscriptionId};
use crate::strategy::SelectionStrategy;
use crate::worker::{CarHandle, WorkerTiming};

/// Routes hall calls to cars through a selection strategy and owns the
/// per-car worker threads.
pub struct Dispatcher {
    cars: Vec<CarHandle>,
    workers: Vec<JoinHandle<()>>,
    observers: Arc<ObserverRegistry>,
    strategy: Mutex<Box<dyn SelectionStrategy>>,
    shutdown: Option<Sender<()>>,
    max_floor: Floor,
}

impl Dispatcher {
    /// Validates `config`, creates the cars (all at floor 0, idle), and
    /// starts one worker thread per car.
    pub fn new(config: SystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let observers = Arc::new(ObserverRegistry::new());
        let timing = WorkerTiming::from(&config);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        let cars: Vec<CarHandle> = (0..config.num_cars)
            .map(|id| CarHandle::new(id, config.max_floor()))
            .collect();
        let workers = cars
            .iter()
            .map(|car| car.spawn_worker(timing, Arc::clone(&observers), shutdown_rx.clone()))
            .collect();

        info!(
            "dispatcher started: {} cars, floors 0..={}, strategy {:?}",
            config.num_cars,
            config.max_floor(),
            config.strategy
        );

        Ok(Self {
            cars,
            workers,
            observers,
            strategy: Mutex::new(config.strategy.build(config.weights)),
            shutdown: Some(shutdown_tx),
            max_floor: config.max_floor(),
        })
    }

    /// Number of cars in the bank.
    pub fn num_cars(&self) -> usize {
        self.cars.len()
    }

    /// Highest floor served.
    pub fn max_floor(&self) -> Floor {
        self.max_floor
    }

    /// Submits a hall call and returns the id of the car it was assigned
    /// to. Shorthand for [`dispatch_hall_call`](Self::dispatch_hall_call).
    pub fn submit_hall_call(
        &self,
        floor: Floor,
        direction: CallDirection,
    ) -> Result<CarId, RejectReason> {
        self.dispatch_hall_call(HallCall { floor, direction })
    }

    /// Routes a hall call through the selection strategy and returns the id
    /// of the car it was assigned to. The assignment is the strategy's
    /// choice over a point-in-time snapshot; by the time the car serves the
    /// floor it may no longer be the optimal one, but it is always a valid
    /// server.
    pub fn dispatch_hall_call(&self, call: HallCall) -> Result<CarId, RejectReason> {
        self.check_floor(call.floor)?;

        let snapshots: Vec<CarState> = self.cars.iter().map(|car| car.state()).collect();
        let choice = self
            .strategy
            .lock()
            .expect("strategy poisoned")
            .select(&snapshots, call);

        let chosen = match choice {
            Some(id) if id < self.cars.len() => id,
            Some(id) => {
                warn!("strategy chose nonexistent car {id}; falling back to car 0");
                0
            }
            None => {
                warn!(
                    "no eligible car for {} call at floor {}; falling back to car 0",
                    call.direction, call.floor
                );
                0
            }
        };

        self.cars[chosen].add_request(call.floor)?;
        info!(
            "hall call {}@{} assigned to car {chosen}",
            call.direction, call.floor
        );
        Ok(chosen)
    }

    /// Submits a car call. Shorthand for
    /// [`dispatch_car_call`](Self::dispatch_car_call).
    pub fn submit_car_call(&self, car: CarId, floor: Floor) -> Result<(), RejectReason> {
        self.dispatch_car_call(CarCall { car, floor })
    }

    /// Forwards a car call directly to the addressed car, bypassing
    /// strategy selection — the passenger has already chosen their car.
    pub fn dispatch_car_call(&self, call: CarCall) -> Result<(), RejectReason> {
        let handle = self
            .cars
            .get(call.car)
            .ok_or(RejectReason::UnknownCar(call.car))?;
        handle.add_request(call.floor)?;
        info!("car call floor {} queued on car {}", call.floor, call.car);
        Ok(())
    }

    /// Point-in-time snapshot of one car, or `None` for an unknown id.
    pub fn car_state(&self, car: CarId) -> Option<CarState> {
        self.cars.get(car).map(|handle| handle.state())
    }

    /// Registers an observer for all cars' events.
    pub fn subscribe(&self, observer: Box<dyn ElevatorObserver>) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    /// Removes a previously registered observer.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Replaces the selection strategy for subsequent hall calls. Calls
    /// already assigned stay with their cars.
    pub fn set_strategy(&self, strategy: Box<dyn SelectionStrategy>) {
        info!("selection strategy set to {}", strategy.name());
        *self.strategy.lock().expect("strategy poisoned") = strategy;
    }

    /// Signals every worker, wakes idle cars, and joins the threads.
    /// Workers complete their current single-floor movement before exiting,
    /// so no car is left between floors.
    pub fn shutdown(mut self) {
        self.shutdown_workers();
    }

    fn check_floor(&self, floor: Floor) -> Result<(), RejectReason> {
        if floor > self.max_floor {
            warn!(
                "rejecting call for floor {} (max floor {})",
                floor, self.max_floor
            );
            return Err(RejectReason::FloorOutOfRange {
                floor,
                max_floor: self.max_floor,
            });
        }
        Ok(())
    }

    fn shutdown_workers(&mut self) {
        let Some(shutdown_tx) = self.shutdown.take() else {
            return;
        };
        // Closing the channel wakes every sleeping worker; idle-parked
        // workers additionally need their condvar poked.
        drop(shutdown_tx);
        for car in &self.cars {
            car.wake_for_shutdown();
        }
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("a car worker panicked during shutdown");
            }
        }
        info!("dispatcher stopped");
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown_workers();
    }
}
