//! Vehicle telemetry state record

use serde::Serialize;

/// Last-known vehicle telemetry, one scalar per FlightAxis field.
///
/// Zero-initialized at startup and refreshed in place after each fully
/// received exchange reply. Boolean fields from the wire (`true`/`false`)
/// are stored as `1.0`/`0.0`; a field missing from a reply resolves to
/// `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct VehicleState {
    /// Indicated airspeed in meters per second
    pub airspeed_mps: f64,
    /// Groundspeed in meters per second
    pub groundspeed_mps: f64,
    /// Altitude above sea level in meters
    pub altitude_asl_m: f64,
    /// Altitude above ground level in meters
    pub altitude_agl_m: f64,
    /// World-frame position X in meters
    pub position_x_m: f64,
    /// World-frame position Y in meters
    pub position_y_m: f64,
    /// World-frame velocity U in meters per second
    pub velocity_world_u_mps: f64,
    /// World-frame velocity V in meters per second
    pub velocity_world_v_mps: f64,
    /// World-frame velocity W in meters per second
    pub velocity_world_w_mps: f64,
    /// Roll angle in degrees
    pub roll_deg: f64,
    /// Pitch (inclination) angle in degrees
    pub inclination_deg: f64,
    /// Heading (azimuth) angle in degrees
    pub azimuth_deg: f64,
    /// 1.0 while any part of the aircraft touches the ground
    pub touching_ground: f64,
    /// 1.0 while at least one engine is running
    pub engine_running: f64,
    /// Battery voltage in volts
    pub battery_voltage_v: f64,
    /// Battery current draw in amps
    pub battery_current_a: f64,
}
