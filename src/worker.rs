//! Per-car worker threads.
//!
//! Each car gets one OS thread running [`run_car_worker`]. The thread and
//! every producer (`add_request` via the dispatcher) serialize through a
//! single `Mutex<Car>` + `Condvar` pair, so "queue empty, park idle" and
//! "enqueue while idle, point the car" can never interleave into an
//! inconsistent state.
//!
//! Travel and door delays sleep on the shutdown channel's `recv_timeout`,
//! so a shutdown wakes them immediately. A worker always completes the
//! single-floor move it has started — cars stop at floors, never between
//! them — and then exits without finishing the rest of its route.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use log::{debug, trace};

use crate::calls::{CarId, Direction, Floor, RejectReason, RequestOutcome};
use crate::car::{Car, CarState, StopOutcome};
use crate::config::SystemConfig;
use crate::events::{ElevatorEvent, EventKind, ObserverRegistry};

/// Delays a worker observes between steps, taken from [`SystemConfig`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct WorkerTiming {
    floor_travel: Duration,
    arrival_settle: Duration,
    door_open: Duration,
}

impl From<&SystemConfig> for WorkerTiming {
    fn from(config: &SystemConfig) -> Self {
        Self {
            floor_travel: config.floor_travel,
            arrival_settle: config.arrival_settle,
            door_open: config.door_open,
        }
    }
}

/// The per-car critical section: car state plus the condvar that parks the
/// worker while the car is idle.
struct CarCell {
    car: Mutex<Car>,
    wake: Condvar,
}

/// Producer-side handle to one car, shared between the dispatcher and the
/// car's worker thread.
pub(crate) struct CarHandle {
    id: CarId,
    cell: Arc<CarCell>,
}

impl CarHandle {
    pub(crate) fn new(id: CarId, max_floor: Floor) -> Self {
        Self {
            id,
            cell: Arc::new(CarCell {
                car: Mutex::new(Car::new(id, max_floor)),
                wake: Condvar::new(),
            }),
        }
    }

    /// Queues a stop and wakes the worker if it is parked idle.
    pub(crate) fn add_request(&self, floor: Floor) -> Result<RequestOutcome, RejectReason> {
        let mut car = self.lock();
        let outcome = car.add_request(floor)?;
        if outcome == RequestOutcome::Enqueued {
            // Notify while holding the lock so a worker between its idle
            // check and its wait cannot miss the wakeup.
            self.cell.wake.notify_one();
        }
        Ok(outcome)
    }

    /// Brief-lock snapshot for strategy scoring and the state API.
    pub(crate) fn state(&self) -> CarState {
        self.lock().state()
    }

    /// Wakes a possibly idle-parked worker so it can observe shutdown.
    pub(crate) fn wake_for_shutdown(&self) {
        let _car = self.lock();
        self.cell.wake.notify_all();
    }

    /// Spawns this car's worker thread.
    pub(crate) fn spawn_worker(
        &self,
        timing: WorkerTiming,
        observers: Arc<ObserverRegistry>,
        shutdown: Receiver<()>,
    ) -> JoinHandle<()> {
        let cell = Arc::clone(&self.cell);
        let id = self.id;
        std::thread::Builder::new()
            .name(format!("car-{id}"))
            .spawn(move || run_car_worker(id, cell, timing, observers, shutdown))
            .expect("failed to spawn car worker")
    }

    fn lock(&self) -> MutexGuard<'_, Car> {
        self.cell.car.lock().expect("car state poisoned")
    }
}

/// Whether shutdown has been requested (signal sent or channel closed).
fn shutdown_requested(shutdown: &Receiver<()>) -> bool {
    match shutdown.try_recv() {
        Ok(()) | Err(TryRecvError::Disconnected) => true,
        Err(TryRecvError::Empty) => false,
    }
}

/// Sleeps for `delay` unless shutdown arrives first; returns `true` on
/// shutdown.
fn sleep_interruptible(shutdown: &Receiver<()>, delay: Duration) -> bool {
    match shutdown.recv_timeout(delay) {
        Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
        Err(RecvTimeoutError::Timeout) => false,
    }
}

/// Control loop for one car: wait for work, sweep to the next stop one
/// floor at a time, run the door cycle, decide the next direction, repeat.
fn run_car_worker(
    id: CarId,
    cell: Arc<CarCell>,
    timing: WorkerTiming,
    observers: Arc<ObserverRegistry>,
    shutdown: Receiver<()>,
) {
    debug!("car {id}: worker started");
    'running: loop {
        // Claim the next stop, or park on the condvar until a producer
        // queues one. The wait releases the car lock, so add_request can
        // run, and re-checks shutdown on every wakeup.
        let target = {
            let mut car = cell.car.lock().expect("car state poisoned");
            loop {
                if shutdown_requested(&shutdown) {
                    break 'running;
                }
                match car.next_stop() {
                    Some(stop) => break stop,
                    None => car = cell.wake.wait(car).expect("car state poisoned"),
                }
            }
        };
        trace!("car {id}: next stop {target}");

        // Sweep toward the stop. Each iteration completes one floor of
        // travel before looking at the shutdown signal again.
        loop {
            let (floor, direction, arrived) = {
                let mut car = cell.car.lock().expect("car state poisoned");
                if car.current_floor() == target {
                    // Re-queued stop for the floor we are already at; no
                    // movement, straight to the door cycle.
                    break;
                }
                let floor = car.step_toward(target);
                (floor, car.direction(), floor == target)
            };
            observers.publish(ElevatorEvent {
                car: id,
                floor,
                direction,
                kind: EventKind::Moving,
            });
            if sleep_interruptible(&shutdown, timing.floor_travel) {
                break 'running;
            }
            if arrived {
                break;
            }
        }

        // Arrival and door cycle.
        let (floor, direction) = {
            let car = cell.car.lock().expect("car state poisoned");
            (car.current_floor(), car.direction())
        };
        observers.publish(ElevatorEvent {
            car: id,
            floor,
            direction,
            kind: EventKind::Arrived,
        });
        if sleep_interruptible(&shutdown, timing.arrival_settle) {
            break 'running;
        }
        observers.publish(ElevatorEvent {
            car: id,
            floor,
            direction,
            kind: EventKind::DoorOpen,
        });
        if sleep_interruptible(&shutdown, timing.door_open) {
            break 'running;
        }

        // Decide where the sweep goes next. The idle transition and its
        // event stay inside the critical section so a concurrent
        // add_request observes either "busy" or "idle and notified", never
        // a gap between the two.
        {
            let mut car = cell.car.lock().expect("car state poisoned");
            if let StopOutcome::NowIdle = car.settle_after_stop() {
                observers.publish(ElevatorEvent {
                    car: id,
                    floor: car.current_floor(),
                    direction: Direction::Idle,
                    kind: EventKind::Idle,
                });
            }
        }
    }
    debug!("car {id}: worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::RecordingPanel;
    use crossbeam_channel::bounded;

    fn timing_ms(travel: u64, settle: u64, door: u64) -> WorkerTiming {
        WorkerTiming {
            floor_travel: Duration::from_millis(travel),
            arrival_settle: Duration::from_millis(settle),
            door_open: Duration::from_millis(door),
        }
    }

    #[test]
    fn handle_rejects_out_of_range() {
        let handle = CarHandle::new(0, 9);
        assert_eq!(
            handle.add_request(10),
            Err(RejectReason::FloorOutOfRange {
                floor: 10,
                max_floor: 9
            })
        );
    }

    #[test]
    fn handle_snapshot_reflects_requests() {
        let handle = CarHandle::new(0, 9);
        handle.add_request(4).unwrap();
        let state = handle.state();
        assert_eq!(state.direction, Direction::Up);
        assert_eq!(state.up_stops, vec![4]);
    }

    #[test]
    fn worker_serves_a_request_then_idles() {
        let handle = CarHandle::new(0, 9);
        let observers = Arc::new(ObserverRegistry::new());
        let panel = Arc::new(RecordingPanel::new());
        observers.subscribe(Box::new(Arc::clone(&panel)));

        let (tx, rx) = bounded::<()>(0);
        let worker = handle.spawn_worker(timing_ms(1, 1, 1), observers, rx);

        handle.add_request(2).unwrap();
        assert!(panel.wait_for(Duration::from_secs(5), |events| {
            events.iter().any(|e| e.kind == EventKind::Idle)
        }));

        let state = handle.state();
        assert_eq!(state.floor, 2);
        assert_eq!(state.direction, Direction::Idle);

        drop(tx);
        handle.wake_for_shutdown();
        worker.join().unwrap();
    }

    #[test]
    fn idle_worker_shuts_down_promptly() {
        let handle = CarHandle::new(0, 9);
        let observers = Arc::new(ObserverRegistry::new());
        let (tx, rx) = bounded::<()>(0);
        let worker = handle.spawn_worker(timing_ms(1, 1, 1), observers, rx);

        // Worker is parked on the condvar with no work
        std::thread::sleep(Duration::from_millis(20));
        drop(tx);
        handle.wake_for_shutdown();
        worker.join().unwrap();
    }
}
