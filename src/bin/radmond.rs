//! Host simulation runner
//!
//! Runs the appliance as an ordinary process with its serial ports
//! bridged over local TCP. A session looks like:
//!
//! ```bash
//! RUST_LOG=info cargo run --features sim --bin radmond
//!
//! # Play the instrument (another terminal):
//! while true; do echo "CPS, 5, CPM, 120, uSv/hr, 0.05, SLOW"; sleep 1; done | nc 127.0.0.1 7001
//!
//! # Operate the console:
//! nc 127.0.0.1 7002
//!
//! # Poll it like the dashboard does:
//! curl http://127.0.0.1:8080/rdata
//! ```
//!
//! A restart — operator save or remote `/reset` — tears the whole
//! appliance down and bootstraps it again from persisted settings,
//! the same way the device firmware restarts from the top.

use radmon::core::runner::{Appliance, LoopSignal};
use radmon::platform::sim::SimPlatform;
use radmon::platform::traits::Platform;
use radmon::{log_error, log_info};
use std::time::Duration;

/// Loop pacing so an idle appliance does not spin a host core
const IDLE_PACE: Duration = Duration::from_millis(1);

fn main() {
    env_logger::init();

    loop {
        let platform = match SimPlatform::init() {
            Ok(platform) => platform,
            Err(e) => {
                log_error!("platform init failed: {}", e);
                std::process::exit(1);
            }
        };

        let mut appliance = match Appliance::bootstrap(platform) {
            Ok(appliance) => appliance,
            Err(e) => {
                log_error!("bootstrap failed: {}", e);
                std::process::exit(1);
            }
        };

        loop {
            match appliance.run_once() {
                Ok(LoopSignal::Continue) => std::thread::sleep(IDLE_PACE),
                Ok(LoopSignal::Restart) => break,
                Err(e) => {
                    log_error!("loop iteration failed: {}", e);
                    std::thread::sleep(IDLE_PACE);
                }
            }
        }

        // Drop the appliance so sockets are released before rebinding.
        drop(appliance);
        log_info!("restarting");
    }
}
