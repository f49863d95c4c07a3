// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan control settings.

use chrono::{DateTime, Utc};

use crate::command::{Command, CommandSet};
use crate::error::ValueError;
use crate::types::{FanDirection, FanSpeed, SleepTimer, WindSpeed};

/// Changes to apply to the fan motor.
///
/// Every field is optional; unset fields are left unchanged on the device.
/// Breeze fields (`wind`, `wind_speed`) are only accepted by fans that report
/// breeze support.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use modernforms::command::FanSettings;
/// use modernforms::types::FanDirection;
///
/// let settings = FanSettings::new()
///     .on(true)
///     .speed(3)
///     .direction(FanDirection::Reverse);
/// assert_eq!(settings.encode(false, Utc::now()).unwrap().len(), 3);
///
/// // Breeze settings need a breeze-capable fan
/// let breeze = FanSettings::new().wind(true);
/// assert!(breeze.encode(false, Utc::now()).is_err());
/// assert!(breeze.encode(true, Utc::now()).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanSettings {
    on: Option<bool>,
    sleep: Option<SleepTimer>,
    speed: Option<u8>,
    direction: Option<FanDirection>,
    wind: Option<bool>,
    wind_speed: Option<u8>,
}

impl FanSettings {
    /// Creates settings that change nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches the fan on or off.
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

    /// Sets the fan speed (1-6).
    #[must_use]
    pub fn speed(mut self, speed: u8) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Sets the rotation direction.
    ///
    /// Use [`FanDirection::from_str`](std::str::FromStr::from_str) to accept
    /// textual input.
    #[must_use]
    pub fn direction(mut self, direction: FanDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Switches breeze mode on or off.
    #[must_use]
    pub fn wind(mut self, wind: bool) -> Self {
        self.wind = Some(wind);
        self
    }

    /// Sets the breeze speed (1-3).
    #[must_use]
    pub fn wind_speed(mut self, wind_speed: u8) -> Self {
        self.wind_speed = Some(wind_speed);
        self
    }

    /// Returns `true` if a breeze field is set.
    #[must_use]
    pub fn uses_breeze(&self) -> bool {
        self.wind.is_some() || self.wind_speed.is_some()
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.uses_breeze()
            && self.on.is_none()
            && self.sleep.is_none()
            && self.speed.is_none()
            && self.direction.is_none()
    }

    /// Validates the settings and encodes them into a command set.
    ///
    /// `has_breeze_mode` tells whether the target fan supports breeze
    /// settings; `now` anchors relative sleep timers and bounds absolute ones.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if a speed is out of range, the sleep deadline is
    /// not within the next 24 hours, or breeze settings are requested on a fan
    /// without breeze mode.
    pub fn encode(
        &self,
        has_breeze_mode: bool,
        now: DateTime<Utc>,
    ) -> Result<CommandSet, ValueError> {
        let mut commands = CommandSet::new();

        if let Some(speed) = self.speed {
            commands.push(Command::FanSpeed(FanSpeed::new(speed)?));
        }
        if let Some(on) = self.on {
            commands.push(Command::FanPower(on));
        }
        if let Some(sleep) = self.sleep {
            commands.push(Command::FanSleepTimer(sleep.resolve(now)?));
        }
        if let Some(direction) = self.direction {
            commands.push(Command::FanDirection(direction));
        }

        if self.uses_breeze() && !has_breeze_mode {
            return Err(ValueError::BreezeModeUnsupported);
        }
        if let Some(wind_speed) = self.wind_speed {
            commands.push(Command::WindSpeed(WindSpeed::new(wind_speed)?));
        }
        if let Some(wind) = self.wind {
            commands.push(Command::Wind(wind));
        }

        Ok(commands)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};
    use serde_json::json;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn encodes_motor_fields() {
        let deadline = now() + TimeDelta::minutes(2);
        let commands = FanSettings::new()
            .on(true)
            .speed(FanSpeed::HIGH)
            .direction(FanDirection::Forward)
            .sleep(deadline)
            .encode(false, now())
            .unwrap();

        assert_eq!(
            serde_json::to_value(&commands).unwrap(),
            json!({
                "fanOn": true,
                "fanSpeed": 6,
                "fanDirection": "forward",
                "fanSleepTimer": deadline.timestamp(),
            })
        );
    }

    #[test]
    fn speed_bounds_are_inclusive() {
        assert!(FanSettings::new().speed(FanSpeed::LOW).encode(false, now()).is_ok());
        assert!(FanSettings::new().speed(FanSpeed::HIGH).encode(false, now()).is_ok());
        assert!(FanSettings::new().speed(FanSpeed::LOW - 1).encode(false, now()).is_err());
        assert!(FanSettings::new().speed(FanSpeed::HIGH + 1).encode(false, now()).is_err());
    }

    #[test]
    fn breeze_fields_need_breeze_mode() {
        let settings = FanSettings::new().wind_speed(WindSpeed::HIGH).wind(true);
        assert_eq!(
            settings.encode(false, now()),
            Err(ValueError::BreezeModeUnsupported)
        );

        let commands = settings.encode(true, now()).unwrap();
        assert_eq!(commands.get("wind"), Some(&json!(true)));
        assert_eq!(commands.get("windSpeed"), Some(&json!(3)));
    }

    #[test]
    fn wind_speed_bounds() {
        assert!(FanSettings::new().wind_speed(0).encode(true, now()).is_err());
        assert!(FanSettings::new().wind_speed(4).encode(true, now()).is_err());
        assert!(FanSettings::new().wind_speed(1).encode(true, now()).is_ok());
    }

    #[test]
    fn past_sleep_deadline_is_rejected() {
        let result = FanSettings::new()
            .sleep(now() - TimeDelta::minutes(1))
            .encode(false, now());
        assert!(matches!(result, Err(ValueError::InvalidSleepTime(_))));
    }

    #[test]
    fn sleep_clear_encodes_zero() {
        let commands = FanSettings::new().sleep(0_u64).encode(false, now()).unwrap();
        assert_eq!(commands.get("fanSleepTimer"), Some(&json!(0)));
    }

    #[test]
    fn emptiness() {
        assert!(FanSettings::new().is_empty());
        assert!(!FanSettings::new().wind(false).is_empty());
        assert!(FanSettings::new().wind(false).uses_breeze());
    }
}
