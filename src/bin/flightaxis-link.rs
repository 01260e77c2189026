//! Demo driver for the FlightAxis link.
//!
//! Connects to a running RealFlight (optionally at `<ip> [port]` given as
//! positional arguments), ramps throttle from idle as a smoke test, and
//! polls until interrupted. Exit code 0 on clean shutdown.

use anyhow::Result;
use tracing::{info, warn};

use flightaxis::{ControlInput, FlightAxis, LinkConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut config = LinkConfig::default();
    let mut args = std::env::args().skip(1);
    if let Some(host) = args.next() {
        config.host = host;
    }
    if let Some(port) = args.next() {
        config.port = port.parse()?;
    }

    info!(endpoint = %config.endpoint(), "Connecting to RealFlight");
    let mut link = FlightAxis::connect_with(config);

    let mut input = ControlInput::neutral();
    let mut updates: u64 = 0;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received, shutting down");
                break;
            }
            result = link.update(&input) => {
                match result {
                    Ok(()) => {
                        updates += 1;
                        if updates == 1 {
                            info!("Connected and received first response");
                        }
                        if updates % 100 == 0 {
                            let state = link.state();
                            info!(
                                updates,
                                airspeed = state.airspeed_mps,
                                altitude_agl = state.altitude_agl_m,
                                engine_running = state.engine_running > 0.5,
                                "Telemetry"
                            );
                        }
                        // Gradually open the throttle as a visible smoke test
                        if input.throttle < 1.0 {
                            input.throttle += 0.03;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Update failed, retrying");
                        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                    }
                }
            }
        }
    }

    link.shutdown();
    info!(updates, "Clean shutdown");
    Ok(())
}
