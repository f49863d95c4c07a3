// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state model.
//!
//! A Modern Forms fan exposes two kinds of data:
//!
//! - [`DeviceInfo`]: static identity and firmware details, fetched with a
//!   static-data query;
//! - [`DeviceState`]: live operational state, returned by every status query
//!   and command.
//!
//! [`DeviceSnapshot`] pairs the two. State responses are merged through
//! [`StateUpdate`], so fields a response omits keep their cached value.
//!
//! # Examples
//!
//! ```
//! use modernforms::state::{DeviceInfo, DeviceSnapshot, DeviceState, StateUpdate};
//!
//! let mut snapshot = DeviceSnapshot::new(DeviceInfo::default(), DeviceState::default());
//!
//! let update: StateUpdate = serde_json::from_str(r#"{"fanOn": true, "fanSpeed": 5}"#).unwrap();
//! snapshot.apply(&update);
//!
//! assert!(snapshot.state.fan_on);
//! assert_eq!(snapshot.state.fan_speed, 5);
//! ```

mod device_info;
mod device_state;
mod snapshot;

pub use device_info::DeviceInfo;
pub use device_state::{
    DEFAULT_FAN_SPEED, DEFAULT_LIGHT_BRIGHTNESS, DEFAULT_WIND_SPEED, DeviceState, StateUpdate,
};
pub use snapshot::DeviceSnapshot;
