// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level handle for a Modern Forms fan.
//!
//! A [`Device`] caches the last known [`DeviceSnapshot`] and keeps it in sync
//! with every response the fan sends. The first call that needs the snapshot
//! fetches it; afterwards each command response is merged into it.
//!
//! ```no_run
//! use modernforms::Device;
//! use modernforms::command::{FanSettings, LightSettings};
//!
//! # async fn example() -> modernforms::Result<()> {
//! let (device, snapshot) = Device::http("192.168.1.100").build().await?;
//! println!("Connected to {}", snapshot.info.device_name);
//!
//! device.light(&LightSettings::new().on(true).brightness(60)).await?;
//! device.fan(&FanSettings::new().on(true).speed(4)).await?;
//! # Ok(())
//! # }
//! ```

mod http_builder;

pub use http_builder::HttpDeviceBuilder;

use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;

use crate::command::{Command, CommandSet, FanSettings, LightSettings};
use crate::error::{Error, ParseError, Result};
use crate::protocol::{HttpClient, HttpConfig, Protocol};
use crate::retry::RetryPolicy;
use crate::state::{DeviceInfo, DeviceSnapshot, DeviceState, StateUpdate};

/// A Modern Forms fan reachable through protocol `P`.
///
/// All methods take `&self`. The cached snapshot sits behind a lock, so the
/// handle can be shared between tasks; overlapping calls may interleave their
/// merges.
///
/// # Creating a Device
///
/// ```no_run
/// use modernforms::Device;
/// use std::time::Duration;
///
/// # async fn example() -> modernforms::Result<()> {
/// // Query the device immediately
/// let (device, _snapshot) = Device::http("192.168.1.100")
///     .with_timeout(Duration::from_secs(5))
///     .build()
///     .await?;
///
/// // No network access until the first call
/// let device = Device::http("192.168.1.100").build_without_probe()?;
/// let snapshot = device.update(false).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Device<P: Protocol> {
    protocol: P,
    snapshot: RwLock<Option<DeviceSnapshot>>,
    retry: RetryPolicy,
}

impl<P: Protocol> Device<P> {
    /// Creates a device on top of an existing protocol.
    ///
    /// No request is sent until the first update or command.
    #[must_use]
    pub fn new(protocol: P, retry: RetryPolicy) -> Self {
        Self {
            protocol,
            snapshot: RwLock::new(None),
            retry,
        }
    }

    /// Returns the host of the device.
    #[must_use]
    pub fn host(&self) -> &str {
        self.protocol.host()
    }

    /// Returns the underlying protocol.
    #[must_use]
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// Returns the retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    // ========== Cached State ==========

    /// Returns the last known operational state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before the first successful update.
    pub fn status(&self) -> Result<DeviceState> {
        self.with_snapshot(|snapshot| snapshot.state.clone())
    }

    /// Returns the static device information.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before the first successful update.
    pub fn info(&self) -> Result<DeviceInfo> {
        self.with_snapshot(|snapshot| snapshot.info.clone())
    }

    /// Returns a copy of the cached snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before the first successful update.
    pub fn snapshot(&self) -> Result<DeviceSnapshot> {
        self.with_snapshot(Clone::clone)
    }

    /// Returns `true` if the latest status response reported breeze mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before the first successful update.
    pub fn has_breeze_mode(&self) -> Result<bool> {
        self.with_snapshot(DeviceSnapshot::has_breeze_mode)
    }

    /// Returns `true` once a snapshot has been fetched.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.snapshot.read().is_some()
    }

    fn with_snapshot<T>(&self, f: impl FnOnce(&DeviceSnapshot) -> T) -> Result<T> {
        self.snapshot.read().as_ref().map(f).ok_or(Error::NotInitialized)
    }

    // ========== Update & Requests ==========

    /// Fetches the device state, and its static information when needed.
    ///
    /// The static-data query is sent when no snapshot exists yet or when
    /// `full_update` is set; the snapshot is then replaced. Otherwise only the
    /// status is queried and merged.
    ///
    /// An empty status response is retried with exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResponse`] if every attempt got an empty status,
    /// or the transport error that ended the exchange.
    pub async fn update(&self, full_update: bool) -> Result<DeviceSnapshot> {
        self.retry
            .run(
                "update",
                |err: &Error| matches!(err, Error::EmptyResponse { .. }),
                move || self.update_once(full_update),
            )
            .await
    }

    async fn update_once(&self, full_update: bool) -> Result<DeviceSnapshot> {
        let needs_info = full_update || !self.is_initialized();

        let info = if needs_info {
            let value = self.exchange(&CommandSet::query_static_data()).await?;
            Some(DeviceInfo::from_json(&value).map_err(ParseError::from)?)
        } else {
            None
        };

        let value = self.exchange(&CommandSet::query_status()).await?;
        if value.as_object().is_none_or(serde_json::Map::is_empty) {
            return Err(Error::EmptyResponse {
                host: self.host().to_string(),
            });
        }
        let update = StateUpdate::from_json(&value).map_err(ParseError::from)?;

        let mut snapshot = self.snapshot.write();
        if let Some(info) = info {
            tracing::info!(
                host = %self.host(),
                device_name = %info.device_name,
                firmware = %info.firmware_version,
                "Fetched device snapshot"
            );
            *snapshot = Some(DeviceSnapshot::new(info, DeviceState::from(update)));
        } else if let Some(current) = snapshot.as_mut() {
            current.apply_status(&update);
        }

        snapshot.clone().ok_or(Error::NotInitialized)
    }

    /// Sends a raw command set and returns the resulting state.
    ///
    /// Runs an update first if no snapshot exists. An empty set is sent as a
    /// status query.
    ///
    /// # Errors
    ///
    /// Returns error if the implicit update fails, the transport fails after
    /// all retries, or the device rejects the request.
    pub async fn request(&self, commands: CommandSet) -> Result<DeviceState> {
        if !self.is_initialized() {
            self.update(false).await?;
        }

        let value = self.exchange(&commands).await?;
        let update = StateUpdate::from_json(&value).map_err(ParseError::from)?;

        let mut snapshot = self.snapshot.write();
        let current = snapshot.as_mut().ok_or(Error::NotInitialized)?;
        if current.apply(&update) {
            tracing::debug!(host = %self.host(), "Device state changed");
        }
        Ok(current.state.clone())
    }

    /// Sends one command set, retrying connection failures, and decodes the
    /// response body.
    async fn exchange(&self, commands: &CommandSet) -> Result<Value> {
        let response = self
            .retry
            .run(
                "request",
                Error::is_connection_error,
                move || async move { self.protocol.send(commands).await.map_err(Error::from) },
            )
            .await?;

        match response.json()? {
            Value::Null => Ok(Value::Object(serde_json::Map::new())),
            value @ Value::Object(_) => Ok(value),
            other => Err(ParseError::UnexpectedFormat(format!(
                "expected a JSON object, got {other}"
            ))
            .into()),
        }
    }

    // ========== Controls ==========

    /// Changes light settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSettings`] without any network access if a
    /// setting is invalid; otherwise as [`request`](Self::request).
    pub async fn light(&self, settings: &LightSettings) -> Result<DeviceState> {
        let commands = settings.encode(Utc::now())?;
        self.request(commands).await
    }

    /// Changes fan settings.
    ///
    /// Breeze settings need to know whether the fan supports breeze mode, so
    /// they trigger an update first if no snapshot exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSettings`] if a setting is out of range or
    /// breeze settings are sent to a fan without breeze mode; otherwise as
    /// [`request`](Self::request).
    pub async fn fan(&self, settings: &FanSettings) -> Result<DeviceState> {
        // Range errors surface before any request.
        settings.encode(true, Utc::now())?;

        if settings.uses_breeze() && !self.is_initialized() {
            self.update(false).await?;
        }

        let has_breeze_mode = self.has_breeze_mode().unwrap_or(false);
        let commands = settings.encode(has_breeze_mode, Utc::now())?;
        self.request(commands).await
    }

    /// Enables or disables away mode.
    ///
    /// # Errors
    ///
    /// Returns error as [`request`](Self::request).
    pub async fn away(&self, enabled: bool) -> Result<DeviceState> {
        self.request(CommandSet::from(Command::AwayMode(enabled)).with(Command::QueryStatus))
            .await
    }

    /// Enables or disables adaptive learning.
    ///
    /// # Errors
    ///
    /// Returns error as [`request`](Self::request).
    pub async fn adaptive_learning(&self, enabled: bool) -> Result<DeviceState> {
        self.request(
            CommandSet::from(Command::AdaptiveLearning(enabled)).with(Command::QueryStatus),
        )
        .await
    }

    /// Reboots the fan controller.
    ///
    /// The request is sent once. The controller usually restarts before
    /// answering, so a timeout counts as success.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails for any reason other than a
    /// timeout.
    pub async fn reboot(&self) -> Result<()> {
        match self.protocol.send(&CommandSet::from(Command::Reboot)).await {
            Ok(_) => Ok(()),
            Err(err) => {
                let err = Error::from(err);
                if err.is_timeout() {
                    tracing::debug!(host = %self.host(), "No answer to reboot request");
                    Ok(())
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Releases the transport session if this handle created it.
    pub fn close(&self) {
        self.protocol.close();
    }
}

impl<P: Protocol> Drop for Device<P> {
    fn drop(&mut self) {
        self.protocol.close();
    }
}

impl Device<HttpClient> {
    /// Creates a builder for an HTTP device.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use modernforms::Device;
    ///
    /// # async fn example() -> modernforms::Result<()> {
    /// let (device, snapshot) = Device::http("192.168.1.100")
    ///     .with_credentials("admin", "password")
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn http(host: impl Into<String>) -> HttpDeviceBuilder {
        HttpDeviceBuilder::new(HttpConfig::new(host))
    }

    /// Creates a builder for an HTTP device from a full configuration.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use modernforms::Device;
    /// use modernforms::protocol::HttpConfig;
    ///
    /// # async fn example() -> modernforms::Result<()> {
    /// let config = HttpConfig::new("192.168.1.100")
    ///     .with_port(8080)
    ///     .with_base_path("/fan");
    ///
    /// let device = Device::http_config(config).build_without_probe()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn http_config(config: HttpConfig) -> HttpDeviceBuilder {
        HttpDeviceBuilder::new(config)
    }
}
