//! Desktop simulation of a small elevator bank.
//!
//! Builds a three-car, ten-floor dispatcher, subscribes lobby displays, and
//! replays a short burst of morning traffic. Run with:
//!
//! ```sh
//! RUST_LOG=info cargo run --bin sim
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;

use rs_liftz::{
    CallDirection, Dispatcher, EventKind, FloorDisplay, RecordingPanel, SystemConfig,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SystemConfig::default().with_num_cars(3).with_num_floors(10);
    let num_cars = config.num_cars;
    let dispatcher = Dispatcher::new(config)?;

    // Lobby display per car, plus a recorder for the closing summary
    for car in 0..num_cars {
        dispatcher.subscribe(Box::new(FloorDisplay::new(0, car)));
    }
    let recorder = Arc::new(RecordingPanel::new());
    dispatcher.subscribe(Box::new(Arc::clone(&recorder)));

    // Morning burst: lobby calls going up, a few cabin destinations, one
    // down call from the middle of the building.
    dispatcher.submit_hall_call(2, CallDirection::Up)?;
    dispatcher.submit_hall_call(1, CallDirection::Up)?;
    dispatcher.submit_car_call(0, 3)?;
    dispatcher.submit_car_call(0, 9)?;
    thread::sleep(Duration::from_millis(400));
    dispatcher.submit_hall_call(4, CallDirection::Down)?;
    dispatcher.submit_car_call(1, 5)?;

    // Let the bank drain: wait until every car has gone idle after the
    // last request, then a little grace for stragglers.
    let all_idle = recorder.wait_for(Duration::from_secs(30), |events| {
        let idles = events.iter().filter(|e| e.kind == EventKind::Idle).count();
        idles >= 2
    });
    if !all_idle {
        log::warn!("bank did not drain within the deadline");
    }
    thread::sleep(Duration::from_secs(2));

    let events = recorder.events();
    let stops = events
        .iter()
        .filter(|e| e.kind == EventKind::Arrived)
        .count();
    let moves = events
        .iter()
        .filter(|e| e.kind == EventKind::Moving)
        .count();
    log::info!("simulation done: {stops} stops served, {moves} floor moves");

    dispatcher.shutdown();
    Ok(())
}
