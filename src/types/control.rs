//! Control input and channel vector types

use serde::{Deserialize, Serialize};

/// Number of control channels carried per exchange.
pub const CHANNEL_COUNT: usize = 12;

/// Bitmask selecting all 12 channels (`0b1111_1111_1111`).
const ALL_CHANNELS: u16 = 4095;

/// Neutral position for an unmapped channel.
const NEUTRAL: f64 = 0.5;

/// Pilot control input, each axis in `[0, 1]`.
///
/// Values outside the range are clamped when the channel vector is built,
/// so callers can feed raw stick math without pre-clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlInput {
    /// Roll axis (channel 0)
    pub aileron: f64,
    /// Pitch axis (channel 1)
    pub elevator: f64,
    /// Throttle (channel 2)
    pub throttle: f64,
    /// Yaw axis (channel 3)
    pub rudder: f64,
    /// Flap position (channel 4)
    pub flaps: f64,
    /// Landing gear (channel 5)
    pub gear: f64,
}

impl Default for ControlInput {
    /// Neutral sticks, idle throttle, flaps retracted, gear down.
    fn default() -> Self {
        Self {
            aileron: NEUTRAL,
            elevator: NEUTRAL,
            throttle: 0.0,
            rudder: NEUTRAL,
            flaps: 0.0,
            gear: 0.0,
        }
    }
}

impl ControlInput {
    /// Neutral control input, identical to [`Default`].
    pub fn neutral() -> Self {
        Self::default()
    }
}

/// Fixed 12-slot channel vector sent with every `ExchangeData` request.
///
/// Slots 0–5 carry roll, pitch, throttle, yaw, flap, and gear; slots 6–11
/// are reserved and stay at the neutral position. Built fresh for each
/// exchange, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelVector([f64; CHANNEL_COUNT]);

impl Default for ChannelVector {
    fn default() -> Self {
        Self([NEUTRAL; CHANNEL_COUNT])
    }
}

impl From<&ControlInput> for ChannelVector {
    fn from(input: &ControlInput) -> Self {
        let mut channels = [NEUTRAL; CHANNEL_COUNT];
        channels[0] = input.aileron.clamp(0.0, 1.0);
        channels[1] = input.elevator.clamp(0.0, 1.0);
        channels[2] = input.throttle.clamp(0.0, 1.0);
        channels[3] = input.rudder.clamp(0.0, 1.0);
        channels[4] = input.flaps.clamp(0.0, 1.0);
        channels[5] = input.gear.clamp(0.0, 1.0);
        Self(channels)
    }
}

impl ChannelVector {
    /// The raw channel values in wire order.
    pub fn values(&self) -> &[f64; CHANNEL_COUNT] {
        &self.0
    }

    /// Build the `ExchangeData` payload fragment.
    ///
    /// Emits the `pControlInputs` block with all channels selected and
    /// exactly [`CHANNEL_COUNT`] `<item>` entries in slot order.
    pub fn control_payload(&self) -> String {
        let mut payload = String::with_capacity(256);
        payload.push_str("<pControlInputs>");
        payload.push_str(&format!("<m-selectedChannels>{ALL_CHANNELS}</m-selectedChannels>"));
        payload.push_str("<m-channelValues-0to1>");
        for value in &self.0 {
            payload.push_str(&format!("<item>{value}</item>"));
        }
        payload.push_str("</m-channelValues-0to1>");
        payload.push_str("</pControlInputs>");
        payload
    }
}
