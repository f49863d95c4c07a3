// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light brightness type.
//!
//! Modern Forms lights accept a brightness percentage between 1 and 100.
//! Zero is not a valid brightness; the light is switched off with the power
//! flag instead.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Light brightness as a percentage (1-100).
///
/// # Examples
///
/// ```
/// use modernforms::types::Brightness;
///
/// let half = Brightness::new(50).unwrap();
/// assert_eq!(half.value(), 50);
///
/// assert_eq!(Brightness::MIN.value(), 1);
/// assert_eq!(Brightness::MAX.value(), 100);
///
/// // Zero and values above 100 are rejected
/// assert!(Brightness::new(0).is_err());
/// assert!(Brightness::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Brightness(u8);

impl Brightness {
    /// Lowest accepted brightness value.
    pub const LOW: u8 = 1;

    /// Highest accepted brightness value.
    pub const HIGH: u8 = 100;

    /// Dimmest setting (1%).
    pub const MIN: Self = Self(Self::LOW);

    /// Full brightness (100%).
    pub const MAX: Self = Self(Self::HIGH);

    /// Creates a new brightness value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [1, 100].
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if !(Self::LOW..=Self::HIGH).contains(&value) {
            return Err(ValueError::OutOfRange {
                name: "brightness",
                min: Self::LOW,
                max: Self::HIGH,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the brightness percentage.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Brightness {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Brightness> for u8 {
    fn from(value: Brightness) -> Self {
        value.0
    }
}
