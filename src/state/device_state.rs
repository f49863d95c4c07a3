// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live device state and incremental updates.

use serde::{Deserialize, Serialize};

use crate::types::FanDirection;

/// Fan speed assumed until the device reports one.
pub const DEFAULT_FAN_SPEED: u8 = 3;

/// Light brightness assumed until the device reports one.
pub const DEFAULT_LIGHT_BRIGHTNESS: u8 = 100;

/// Breeze speed assumed until the device reports one.
pub const DEFAULT_WIND_SPEED: u8 = 2;

/// Operational state of a Modern Forms fan.
///
/// Sleep timers are Unix timestamps in seconds; `0` means no timer.
/// `wind` is `None` on fans without breeze mode.
///
/// # Examples
///
/// ```
/// use modernforms::state::{DeviceState, StateUpdate};
///
/// let mut state = DeviceState::default();
/// assert_eq!(state.light_brightness, 100);
///
/// let update: StateUpdate = serde_json::from_str(r#"{"lightOn": true}"#).unwrap();
/// state.apply(&update);
/// assert!(state.light_on);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StateUpdate", rename_all = "camelCase")]
// Each boolean mirrors an independent device switch.
#[allow(clippy::struct_excessive_bools)]
pub struct DeviceState {
    /// Fan motor power.
    pub fan_on: bool,
    /// Fan speed step.
    pub fan_speed: u8,
    /// Rotation direction.
    pub fan_direction: FanDirection,
    /// Fan auto-off deadline.
    pub fan_sleep_timer: i64,
    /// Light power.
    pub light_on: bool,
    /// Light brightness percentage.
    pub light_brightness: u8,
    /// Light auto-off deadline.
    pub light_sleep_timer: i64,
    /// Away mode (randomized light schedule).
    pub away_mode_enabled: bool,
    /// Adaptive learning of usage patterns.
    #[serde(rename = "adaptiveLearning")]
    pub adaptive_learning_enabled: bool,
    /// Breeze mode power, present only on breeze-capable fans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind: Option<bool>,
    /// Breeze speed step.
    pub wind_speed: u8,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            fan_on: false,
            fan_speed: DEFAULT_FAN_SPEED,
            fan_direction: FanDirection::Forward,
            fan_sleep_timer: 0,
            light_on: false,
            light_brightness: DEFAULT_LIGHT_BRIGHTNESS,
            light_sleep_timer: 0,
            away_mode_enabled: false,
            adaptive_learning_enabled: false,
            wind: None,
            wind_speed: DEFAULT_WIND_SPEED,
        }
    }
}

impl DeviceState {
    /// Creates a state from a raw JSON response, defaulting missing and
    /// `null` fields.
    ///
    /// # Errors
    ///
    /// Returns an error if a known field has the wrong JSON type.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// Returns `true` if the fan reported breeze mode in its last state.
    #[must_use]
    pub fn has_wind(&self) -> bool {
        self.wind.is_some()
    }

    /// Merges a partial update, such as a command echo, into this state.
    ///
    /// Fields present in the update overwrite the cached values; absent fields
    /// keep them.
    ///
    /// Returns `true` if any field changed.
    pub fn apply(&mut self, update: &StateUpdate) -> bool {
        let before = self.clone();
        self.merge(update);
        merge(&mut self.wind, update.wind.map(Some));
        *self != before
    }

    /// Merges a full status response into this state.
    ///
    /// Like [`apply`](Self::apply), except that `wind` always takes the
    /// response's value, so breeze support follows the latest status.
    ///
    /// Returns `true` if any field changed.
    pub fn apply_status(&mut self, update: &StateUpdate) -> bool {
        let before = self.clone();
        self.merge(update);
        self.wind = update.wind;
        *self != before
    }

    fn merge(&mut self, update: &StateUpdate) {
        merge(&mut self.fan_on, update.fan_on);
        merge(&mut self.fan_speed, update.fan_speed);
        merge(&mut self.fan_direction, update.fan_direction);
        merge(&mut self.fan_sleep_timer, update.fan_sleep_timer);
        merge(&mut self.light_on, update.light_on);
        merge(&mut self.light_brightness, update.light_brightness);
        merge(&mut self.light_sleep_timer, update.light_sleep_timer);
        merge(&mut self.away_mode_enabled, update.away_mode_enabled);
        merge(
            &mut self.adaptive_learning_enabled,
            update.adaptive_learning_enabled,
        );
        merge(&mut self.wind_speed, update.wind_speed);
    }
}

fn merge<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

/// A partial state as sent by the device.
///
/// Every field is optional and `null` reads as absent; see
/// [`DeviceState::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateUpdate {
    /// Fan motor power.
    pub fan_on: Option<bool>,
    /// Fan speed step.
    pub fan_speed: Option<u8>,
    /// Rotation direction.
    pub fan_direction: Option<FanDirection>,
    /// Fan auto-off deadline.
    pub fan_sleep_timer: Option<i64>,
    /// Light power.
    pub light_on: Option<bool>,
    /// Light brightness percentage.
    pub light_brightness: Option<u8>,
    /// Light auto-off deadline.
    pub light_sleep_timer: Option<i64>,
    /// Away mode.
    pub away_mode_enabled: Option<bool>,
    /// Adaptive learning.
    #[serde(rename = "adaptiveLearning")]
    pub adaptive_learning_enabled: Option<bool>,
    /// Breeze mode power.
    pub wind: Option<bool>,
    /// Breeze speed step.
    pub wind_speed: Option<u8>,
}

impl StateUpdate {
    /// Creates an update from a raw JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if a known field has the wrong JSON type.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

impl From<StateUpdate> for DeviceState {
    fn from(update: StateUpdate) -> Self {
        let mut state = Self::default();
        state.apply_status(&update);
        state
    }
}
