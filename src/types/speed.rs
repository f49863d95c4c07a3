// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan and breeze speed types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Fan speed step (1-6).
///
/// # Examples
///
/// ```
/// use modernforms::types::FanSpeed;
///
/// let speed = FanSpeed::new(3).unwrap();
/// assert_eq!(speed.value(), 3);
///
/// assert!(FanSpeed::new(0).is_err());
/// assert!(FanSpeed::new(7).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FanSpeed(u8);

impl FanSpeed {
    /// Slowest speed value.
    pub const LOW: u8 = 1;

    /// Fastest speed value.
    pub const HIGH: u8 = 6;

    /// Slowest fan speed.
    pub const MIN: Self = Self(Self::LOW);

    /// Fastest fan speed.
    pub const MAX: Self = Self(Self::HIGH);

    /// Creates a new fan speed.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [1, 6].
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if !(Self::LOW..=Self::HIGH).contains(&value) {
            return Err(ValueError::OutOfRange {
                name: "speed",
                min: Self::LOW,
                max: Self::HIGH,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the speed step.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for FanSpeed {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FanSpeed> for u8 {
    fn from(value: FanSpeed) -> Self {
        value.0
    }
}

/// Breeze (wind) speed step (1-3).
///
/// Only meaningful on fans that support breeze mode.
///
/// # Examples
///
/// ```
/// use modernforms::types::WindSpeed;
///
/// assert_eq!(WindSpeed::MAX.value(), 3);
/// assert!(WindSpeed::new(4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WindSpeed(u8);

impl WindSpeed {
    /// Gentlest breeze value.
    pub const LOW: u8 = 1;

    /// Strongest breeze value.
    pub const HIGH: u8 = 3;

    /// Gentlest breeze.
    pub const MIN: Self = Self(Self::LOW);

    /// Strongest breeze.
    pub const MAX: Self = Self(Self::HIGH);

    /// Creates a new wind speed.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [1, 3].
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if !(Self::LOW..=Self::HIGH).contains(&value) {
            return Err(ValueError::OutOfRange {
                name: "wind_speed",
                min: Self::LOW,
                max: Self::HIGH,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the wind speed step.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for WindSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for WindSpeed {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WindSpeed> for u8 {
    fn from(value: WindSpeed) -> Self {
        value.0
    }
}
