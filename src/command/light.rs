// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light control settings.

use chrono::{DateTime, Utc};

use crate::command::{Command, CommandSet};
use crate::error::ValueError;
use crate::types::{Brightness, SleepTimer};

/// Changes to apply to the fan's light.
///
/// Every field is optional; unset fields are left unchanged on the device.
/// Values are validated only when the settings are encoded, so a single
/// invalid field rejects the whole change.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use modernforms::command::LightSettings;
/// use modernforms::types::SleepTimer;
///
/// let settings = LightSettings::new()
///     .on(true)
///     .brightness(50)
///     .sleep(SleepTimer::seconds(120));
///
/// let commands = settings.encode(Utc::now()).unwrap();
/// assert_eq!(commands.len(), 3);
///
/// // Out-of-range brightness is rejected
/// assert!(LightSettings::new().brightness(0).encode(Utc::now()).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightSettings {
    brightness: Option<u8>,
    on: Option<bool>,
    sleep: Option<SleepTimer>,
}

impl LightSettings {
    /// Creates settings that change nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the brightness percentage (1-100).
    #[must_use]
    pub fn brightness(mut self, brightness: u8) -> Self {
        self.brightness = Some(brightness);
        self
    }

    /// Switches the light on or off.
    #[must_use]
    pub fn on(mut self, on: bool) -> Self {
        self.on = Some(on);
        self
    }

    /// Sets or clears the sleep timer.
    #[must_use]
    pub fn sleep(mut self, sleep: impl Into<SleepTimer>) -> Self {
        self.sleep = Some(sleep.into());
        self
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brightness.is_none() && self.on.is_none() && self.sleep.is_none()
    }

    /// Validates the settings and encodes them into a command set.
    ///
    /// `now` anchors relative sleep timers and bounds absolute ones.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the brightness is out of range or the sleep
    /// deadline is not within the next 24 hours.
    pub fn encode(&self, now: DateTime<Utc>) -> Result<CommandSet, ValueError> {
        let mut commands = CommandSet::new();

        if let Some(brightness) = self.brightness {
            commands.push(Command::LightBrightness(Brightness::new(brightness)?));
        }
        if let Some(on) = self.on {
            commands.push(Command::LightPower(on));
        }
        if let Some(sleep) = self.sleep {
            commands.push(Command::LightSleepTimer(sleep.resolve(now)?));
        }

        Ok(commands)
    }
}
