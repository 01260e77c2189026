//! Telemetry extraction from exchange replies.
//!
//! RealFlight replies are flat XML with no nesting worth parsing: every
//! telemetry field is a single `<tag>value</tag>` pair somewhere in the
//! document. Extraction is a first-occurrence substring scan that treats
//! the reply as untrusted text. A field that is missing, truncated, or
//! unparseable resolves to `0.0` instead of erroring, so a partial reply
//! still yields a defined state.

use tracing::trace;

use crate::types::VehicleState;

/// Target slot inside [`VehicleState`] for one wire field.
type FieldSlot = fn(&mut VehicleState) -> &mut f64;

/// Ordered table mapping wire tags to state slots.
///
/// Tag names must be unique; lookups are independent so ordering does not
/// affect correctness.
const FIELD_TABLE: &[(&str, FieldSlot)] = &[
    ("m-airspeed_MPS", |s| &mut s.airspeed_mps),
    ("m-groundspeed_MPS", |s| &mut s.groundspeed_mps),
    ("m-altitudeASL_MTR", |s| &mut s.altitude_asl_m),
    ("m-altitudeAGL_MTR", |s| &mut s.altitude_agl_m),
    ("m-aircraftPositionX_MTR", |s| &mut s.position_x_m),
    ("m-aircraftPositionY_MTR", |s| &mut s.position_y_m),
    ("m-velocityWorldU_MPS", |s| &mut s.velocity_world_u_mps),
    ("m-velocityWorldV_MPS", |s| &mut s.velocity_world_v_mps),
    ("m-velocityWorldW_MPS", |s| &mut s.velocity_world_w_mps),
    ("m-roll_DEG", |s| &mut s.roll_deg),
    ("m-inclination_DEG", |s| &mut s.inclination_deg),
    ("m-azimuth_DEG", |s| &mut s.azimuth_deg),
    ("m-isTouchingGround", |s| &mut s.touching_ground),
    ("m-anEngineIsRunning", |s| &mut s.engine_running),
    ("m-batteryVoltage_VOLTS", |s| &mut s.battery_voltage_v),
    ("m-batteryCurrentDraw_AMPS", |s| &mut s.battery_current_a),
];

/// Refresh `state` from raw reply bytes.
///
/// Every table entry is resolved to a defined number; this routine cannot
/// fail. Invalid UTF-8 is replaced lossily before scanning.
pub fn extract(reply: &[u8], state: &mut VehicleState) {
    let text = String::from_utf8_lossy(reply);
    for (tag, slot) in FIELD_TABLE {
        *slot(state) = scan_tag(&text, tag);
    }
    trace!(airspeed = state.airspeed_mps, altitude_agl = state.altitude_agl_m, "State refreshed");
}

/// Scan for the first `<tag>…</tag>` pair and convert its content.
///
/// Returns `0.0` when either tag is absent. `true` and `false` map to
/// `1.0` and `0.0`; anything else is parsed as a decimal with a `0.0`
/// fallback.
pub fn scan_tag(reply: &str, tag: &str) -> f64 {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let Some(start) = reply.find(&open).map(|at| at + open.len()) else {
        return 0.0;
    };
    let Some(end) = reply[start..].find(&close).map(|at| start + at) else {
        return 0.0;
    };

    parse_scalar(&reply[start..end])
}

fn parse_scalar(text: &str) -> f64 {
    match text {
        "true" => 1.0,
        "false" => 0.0,
        _ => text.trim().parse().unwrap_or(0.0),
    }
}
