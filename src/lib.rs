//! Async Rust client for the RealFlight FlightAxis link protocol.
//!
//! RealFlight exposes a SOAP-over-HTTP control interface with one strict
//! rule: every request needs a fresh TCP connection. This crate hides the
//! resulting connection-setup latency behind a background-maintained
//! socket pool and drives the two-action protocol end to end:
//!
//! - **Handshake**: a one-time `InjectUAVControllerInterface` transaction
//!   enabling external control
//! - **Exchange**: repeated `ExchangeData` transactions sending a 12-slot
//!   channel vector and extracting vehicle telemetry from the reply
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use flightaxis::{ControlInput, FlightAxis};
//!
//! #[tokio::main]
//! async fn main() -> flightaxis::Result<()> {
//!     let mut link = FlightAxis::connect();
//!
//!     let mut input = ControlInput::neutral();
//!     for _ in 0..100 {
//!         if link.update(&input).await.is_ok() {
//!             println!("airspeed: {:.1} m/s", link.state().airspeed_mps);
//!         }
//!         input.throttle = (input.throttle + 0.03).min(1.0);
//!     }
//!
//!     link.shutdown();
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod config;
mod error;
pub mod types;

// Transport and protocol layers
pub mod pool;
pub mod protocol;
pub mod session;
pub mod telemetry;

// Core exports
pub use config::{LinkConfig, REPLY_BUFFER_CAPACITY};
pub use error::{LinkError, Result};
pub use pool::ConnectionPool;
pub use session::SessionLink;
pub use types::{CHANNEL_COUNT, ChannelVector, ControlInput, VehicleState};

/// Unified entry point for FlightAxis link sessions.
///
/// Builds the connection pool and session in one step. For custom pool
/// wiring, construct [`ConnectionPool`] and [`SessionLink`] directly.
pub struct FlightAxis;

impl FlightAxis {
    /// Connect to a local RealFlight with default settings.
    ///
    /// The pool maintainer starts immediately; the handshake runs on the
    /// first [`SessionLink::update`] call. Must be called within a Tokio
    /// runtime.
    pub fn connect() -> SessionLink {
        Self::connect_with(LinkConfig::default())
    }

    /// Connect with an explicit configuration.
    pub fn connect_with(config: LinkConfig) -> SessionLink {
        let pool = ConnectionPool::new(config.endpoint(), config.pool_size);
        SessionLink::new(config, pool)
    }
}
