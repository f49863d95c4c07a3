// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sleep timer settings.
//!
//! The device stores a sleep timer as an absolute Unix timestamp in seconds,
//! with `0` meaning "no timer". A [`SleepTimer`] describes the requested timer
//! relative to the caller's clock and is resolved to that timestamp right
//! before a command is sent.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::ValueError;

/// Wire value that disables a sleep timer.
pub const SLEEP_TIMER_CANCEL: i64 = 0;

/// How far ahead an absolute sleep deadline may be.
pub const MAX_SLEEP_AHEAD: TimeDelta = TimeDelta::hours(24);

/// A requested light or fan sleep timer.
///
/// # Examples
///
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use modernforms::types::SleepTimer;
///
/// let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
///
/// // Two minutes from now
/// assert_eq!(SleepTimer::seconds(120).resolve(now).unwrap(), 1_700_000_120);
///
/// // Zero seconds cancels the timer
/// assert_eq!(SleepTimer::seconds(0).resolve(now).unwrap(), 0);
///
/// // Absolute deadlines must be within the next 24 hours
/// let later = now + TimeDelta::hours(25);
/// assert!(SleepTimer::until(later).resolve(now).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SleepTimer {
    /// Clear the current timer.
    Cancel,
    /// Sleep after the given number of seconds; `0` clears the timer.
    Seconds(u64),
    /// Sleep at an absolute point in time.
    Until(DateTime<Utc>),
}

impl SleepTimer {
    /// Creates a timer that fires after `seconds`; `0` clears the timer.
    #[must_use]
    pub const fn seconds(seconds: u64) -> Self {
        Self::Seconds(seconds)
    }

    /// Creates a timer that fires at `deadline`.
    #[must_use]
    pub fn until(deadline: impl Into<DateTime<Utc>>) -> Self {
        Self::Until(deadline.into())
    }

    /// Resolves the timer to the epoch-second value sent to the device.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidSleepTime` if an absolute deadline is not
    /// strictly after `now` or more than 24 hours after it, and
    /// `ValueError::SleepTimerOverflow` if a relative timer ends past the
    /// last representable date.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<i64, ValueError> {
        match *self {
            Self::Cancel | Self::Seconds(0) => Ok(SLEEP_TIMER_CANCEL),
            Self::Seconds(seconds) => i64::try_from(seconds)
                .ok()
                .and_then(TimeDelta::try_seconds)
                .and_then(|delta| now.checked_add_signed(delta))
                .map(|deadline| deadline.timestamp())
                .ok_or(ValueError::SleepTimerOverflow(seconds)),
            Self::Until(deadline) => {
                if deadline <= now || deadline > now + MAX_SLEEP_AHEAD {
                    return Err(ValueError::InvalidSleepTime(deadline));
                }
                Ok(deadline.timestamp())
            }
        }
    }
}

impl From<u64> for SleepTimer {
    fn from(seconds: u64) -> Self {
        Self::Seconds(seconds)
    }
}

impl From<DateTime<Utc>> for SleepTimer {
    fn from(deadline: DateTime<Utc>) -> Self {
        Self::Until(deadline)
    }
}

impl From<std::time::Duration> for SleepTimer {
    fn from(duration: std::time::Duration) -> Self {
        Self::Seconds(duration.as_secs())
    }
}
