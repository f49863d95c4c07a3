// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Modern Forms command definitions.
//!
//! The device accepts a flat JSON object whose keys name the fields to change
//! and whose values are the new settings. Any request without a command is a
//! status query (`{"queryStatus": true}`); the device answers every request
//! with its complete state.
//!
//! # Available Commands
//!
//! | Command | Wire field | Value |
//! |---------|------------|-------|
//! | [`Command::LightPower`] | `lightOn` | bool |
//! | [`Command::LightBrightness`] | `lightBrightness` | 1-100 |
//! | [`Command::LightSleepTimer`] | `lightSleepTimer` | epoch seconds |
//! | [`Command::FanPower`] | `fanOn` | bool |
//! | [`Command::FanSpeed`] | `fanSpeed` | 1-6 |
//! | [`Command::FanDirection`] | `fanDirection` | `forward` / `reverse` |
//! | [`Command::FanSleepTimer`] | `fanSleepTimer` | epoch seconds |
//! | [`Command::Wind`] | `wind` | bool |
//! | [`Command::WindSpeed`] | `windSpeed` | 1-3 |
//! | [`Command::AwayMode`] | `awayModeEnabled` | bool |
//! | [`Command::AdaptiveLearning`] | `adaptiveLearning` | bool |
//! | [`Command::Reboot`] | `reboot` | `true` |
//! | [`Command::QueryStatus`] | `queryStatus` | `true` |
//! | [`Command::QueryStaticData`] | `queryStaticData` | `true` |
//!
//! # Examples
//!
//! ```
//! use modernforms::command::{Command, CommandSet};
//! use modernforms::types::Brightness;
//!
//! let commands: CommandSet = [
//!     Command::LightPower(true),
//!     Command::LightBrightness(Brightness::new(50).unwrap()),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(
//!     serde_json::to_value(&commands).unwrap(),
//!     serde_json::json!({"lightOn": true, "lightBrightness": 50})
//! );
//! ```

mod fan;
mod light;

pub use fan::FanSettings;
pub use light::LightSettings;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{Brightness, FanDirection, FanSpeed, WindSpeed};

/// A single field change understood by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Switch the light on or off.
    LightPower(bool),
    /// Set the light brightness.
    LightBrightness(Brightness),
    /// Set the light sleep timer (epoch seconds, `0` clears it).
    LightSleepTimer(i64),
    /// Switch the fan on or off.
    FanPower(bool),
    /// Set the fan speed.
    FanSpeed(FanSpeed),
    /// Set the fan rotation direction.
    FanDirection(FanDirection),
    /// Set the fan sleep timer (epoch seconds, `0` clears it).
    FanSleepTimer(i64),
    /// Switch breeze mode on or off.
    Wind(bool),
    /// Set the breeze speed.
    WindSpeed(WindSpeed),
    /// Enable or disable away mode.
    AwayMode(bool),
    /// Enable or disable adaptive learning.
    AdaptiveLearning(bool),
    /// Reboot the controller.
    Reboot,
    /// Ask for the current state.
    QueryStatus,
    /// Ask for the static device information.
    QueryStaticData,
}

impl Command {
    /// Returns the wire field name.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::LightPower(_) => "lightOn",
            Self::LightBrightness(_) => "lightBrightness",
            Self::LightSleepTimer(_) => "lightSleepTimer",
            Self::FanPower(_) => "fanOn",
            Self::FanSpeed(_) => "fanSpeed",
            Self::FanDirection(_) => "fanDirection",
            Self::FanSleepTimer(_) => "fanSleepTimer",
            Self::Wind(_) => "wind",
            Self::WindSpeed(_) => "windSpeed",
            Self::AwayMode(_) => "awayModeEnabled",
            Self::AdaptiveLearning(_) => "adaptiveLearning",
            Self::Reboot => "reboot",
            Self::QueryStatus => "queryStatus",
            Self::QueryStaticData => "queryStaticData",
        }
    }

    /// Returns the wire value.
    #[must_use]
    pub fn value(&self) -> Value {
        match *self {
            Self::LightPower(on)
            | Self::FanPower(on)
            | Self::Wind(on)
            | Self::AwayMode(on)
            | Self::AdaptiveLearning(on) => Value::Bool(on),
            Self::LightBrightness(brightness) => Value::from(brightness.value()),
            Self::FanSpeed(speed) => Value::from(speed.value()),
            Self::WindSpeed(speed) => Value::from(speed.value()),
            Self::LightSleepTimer(timestamp) | Self::FanSleepTimer(timestamp) => {
                Value::from(timestamp)
            }
            Self::FanDirection(direction) => Value::from(direction.as_str()),
            Self::Reboot | Self::QueryStatus | Self::QueryStaticData => Value::Bool(true),
        }
    }
}

/// The JSON command dictionary sent in one request.
///
/// Later insertions of the same field replace earlier ones. An empty set is
/// sent as a status query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CommandSet(Map<String, Value>);

impl CommandSet {
    /// Creates an empty command set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the status query body.
    #[must_use]
    pub fn query_status() -> Self {
        Self::from(Command::QueryStatus)
    }

    /// Creates the static-data query body.
    #[must_use]
    pub fn query_static_data() -> Self {
        Self::from(Command::QueryStaticData)
    }

    /// Adds a command, replacing any earlier value for the same field.
    pub fn push(&mut self, command: Command) {
        self.0.insert(command.field().to_string(), command.value());
    }

    /// Adds a command and returns the set.
    #[must_use]
    pub fn with(mut self, command: Command) -> Self {
        self.push(command);
        self
    }

    /// Returns `true` if no command has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of fields in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the value queued for a wire field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns `true` if the set contains the wire field.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns the body to send, turning an empty set into a status query.
    #[must_use]
    pub fn or_query_status(self) -> Self {
        if self.is_empty() {
            Self::query_status()
        } else {
            self
        }
    }
}

impl From<Command> for CommandSet {
    fn from(command: Command) -> Self {
        Self::new().with(command)
    }
}

impl FromIterator<Command> for CommandSet {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Command> for CommandSet {
    fn extend<I: IntoIterator<Item = Command>>(&mut self, iter: I) {
        for command in iter {
            self.push(command);
        }
    }
}
