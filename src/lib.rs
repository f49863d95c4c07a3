// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `modernforms` - An async Rust client for Modern Forms smart fans.
//!
//! Modern Forms fans expose a small JSON API on the local network: every
//! request is a POST to `/mf`, and every answer carries the fan's full state.
//! This crate wraps that API in a typed, validated handle.
//!
//! # Supported Features
//!
//! - **Light control**: Power, brightness, sleep timer
//! - **Fan control**: Power, speed, direction, sleep timer
//! - **Breeze mode**: On fans that report it
//! - **Device settings**: Away mode, adaptive learning, reboot
//! - **State tracking**: A cached snapshot merged with every response
//!
//! # Quick Start
//!
//! ```no_run
//! use modernforms::Device;
//! use modernforms::command::{FanSettings, LightSettings};
//! use modernforms::types::{FanDirection, SleepTimer};
//!
//! #[tokio::main]
//! async fn main() -> modernforms::Result<()> {
//!     // Returns (device, initial_snapshot) tuple
//!     let (device, snapshot) = Device::http("192.168.1.100").build().await?;
//!     println!("{} runs firmware {}", snapshot.info.device_name, snapshot.info.firmware_version);
//!
//!     // Dim the light and switch it off in 30 minutes
//!     device
//!         .light(&LightSettings::new().on(true).brightness(40).sleep(SleepTimer::seconds(30 * 60)))
//!         .await?;
//!
//!     // Reverse the fan at speed 2
//!     device
//!         .fan(&FanSettings::new().on(true).speed(2).direction(FanDirection::Reverse))
//!         .await?;
//!
//!     // Breeze settings are only accepted by fans that support them
//!     if device.has_breeze_mode()? {
//!         device.fan(&FanSettings::new().wind(true).wind_speed(3)).await?;
//!     }
//!
//!     // Clear the light's sleep timer
//!     device.light(&LightSettings::new().sleep(SleepTimer::Cancel)).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors and Retries
//!
//! Invalid settings are rejected before anything is sent. Connection failures
//! and timeouts are retried with exponential backoff, as are empty answers to
//! a full update; see [`RetryPolicy`]. Every other failure is returned as is.

pub mod command;
mod device;
pub mod error;
pub mod protocol;
mod retry;
pub mod state;
pub mod types;

pub use command::{Command, CommandSet, FanSettings, LightSettings};
pub use device::{Device, HttpDeviceBuilder};
pub use error::{Error, ParseError, ProtocolError, Result, ValueError};
pub use protocol::{HttpClient, HttpConfig, Protocol};
pub use retry::RetryPolicy;
pub use state::{DeviceInfo, DeviceSnapshot, DeviceState};
pub use types::{Brightness, FanDirection, FanSpeed, SleepTimer, WindSpeed};
