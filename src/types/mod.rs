// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Modern Forms device control.
//!
//! Each type ensures values are within the range the device accepts at
//! construction time.
//!
//! # Types
//!
//! - [`Brightness`] - Light brightness (1-100%)
//! - [`FanSpeed`] - Fan speed step (1-6)
//! - [`WindSpeed`] - Breeze speed step (1-3)
//! - [`FanDirection`] - Forward / reverse rotation
//! - [`SleepTimer`] - Relative or absolute auto-off timer

mod brightness;
mod direction;
mod sleep;
mod speed;

pub use brightness::Brightness;
pub use direction::FanDirection;
pub use sleep::{MAX_SLEEP_AHEAD, SLEEP_TIMER_CANCEL, SleepTimer};
pub use speed::{FanSpeed, WindSpeed};
