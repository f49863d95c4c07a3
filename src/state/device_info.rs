// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static device information.

use serde::{Deserialize, Deserializer, Serialize};

/// Identity and hardware details of a Modern Forms fan.
///
/// Returned by the `queryStaticData` request. Missing and `null` fields
/// default to the empty string and unknown fields are ignored.
///
/// # Examples
///
/// ```
/// use modernforms::state::DeviceInfo;
///
/// let info: DeviceInfo = serde_json::from_str(r#"{
///     "clientId": "MF_000000000000",
///     "mac": "CC:CC:CC:CC:CC:CC",
///     "fanType": "1818-56",
///     "somethingNew": 1
/// }"#).unwrap();
///
/// assert_eq!(info.mac_address, "CC:CC:CC:CC:CC:CC");
/// assert_eq!(info.fan_type, "1818-56");
/// assert!(info.owner.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Cloud client identifier, e.g. `MF_000000000000`.
    #[serde(deserialize_with = "null_as_empty")]
    pub client_id: String,
    /// Hardware MAC address.
    #[serde(rename = "mac", deserialize_with = "null_as_empty")]
    pub mac_address: String,
    /// Light kit hardware type.
    #[serde(deserialize_with = "null_as_empty")]
    pub light_type: String,
    /// Fan model.
    #[serde(deserialize_with = "null_as_empty")]
    pub fan_type: String,
    /// Motor hardware type.
    #[serde(deserialize_with = "null_as_empty")]
    pub fan_motor_type: String,
    /// Production lot number.
    #[serde(deserialize_with = "null_as_empty")]
    pub production_lot_number: String,
    /// Product SKU.
    #[serde(deserialize_with = "null_as_empty")]
    pub product_sku: String,
    /// Owner account.
    #[serde(deserialize_with = "null_as_empty")]
    pub owner: String,
    /// Federated cloud identity.
    #[serde(deserialize_with = "null_as_empty")]
    pub federated_identity: String,
    /// User-assigned device name.
    #[serde(deserialize_with = "null_as_empty")]
    pub device_name: String,
    /// Wi-Fi module firmware version.
    #[serde(deserialize_with = "null_as_empty")]
    pub firmware_version: String,
    /// Main MCU firmware version.
    #[serde(deserialize_with = "null_as_empty")]
    pub main_mcu_firmware_version: String,
    /// Firmware download URL.
    #[serde(deserialize_with = "null_as_empty")]
    pub firmware_url: String,
}

/// Reads a string field, treating JSON `null` as empty.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl DeviceInfo {
    /// Creates device info from a raw JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if a known field has the wrong JSON type.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}
