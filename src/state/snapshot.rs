// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::Serialize;

use super::{DeviceInfo, DeviceState, StateUpdate};

/// Everything known about a device after a successful full update.
///
/// Both records are always present: a snapshot only exists once the device
/// has answered a static-data query and a status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSnapshot {
    /// Static identity and hardware details.
    pub info: DeviceInfo,
    /// Live operational state.
    pub state: DeviceState,
}

impl DeviceSnapshot {
    /// Creates a snapshot from the two query responses.
    #[must_use]
    pub fn new(info: DeviceInfo, state: DeviceState) -> Self {
        Self { info, state }
    }

    /// Merges a partial state response; see [`DeviceState::apply`].
    pub fn apply(&mut self, update: &StateUpdate) -> bool {
        self.state.apply(update)
    }

    /// Merges a full status response; see [`DeviceState::apply_status`].
    pub fn apply_status(&mut self, update: &StateUpdate) -> bool {
        self.state.apply_status(update)
    }

    /// Returns `true` if the fan supports breeze mode.
    #[must_use]
    pub fn has_breeze_mode(&self) -> bool {
        self.state.has_wind()
    }
}
