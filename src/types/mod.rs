//! Core types for the FlightAxis link.
//!
//! - [`ControlInput`] is the caller-facing control axes, each in `[0, 1]`
//! - [`ChannelVector`] is the fixed 12-slot wire layout built per exchange
//! - [`VehicleState`] is the last-extracted telemetry record

mod control;
mod state;

pub use control::{CHANNEL_COUNT, ChannelVector, ControlInput};
pub use state::VehicleState;
