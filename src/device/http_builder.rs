// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP device builder.

use std::time::Duration;

use crate::device::Device;
use crate::error::Error;
use crate::protocol::{HttpClient, HttpConfig};
use crate::retry::RetryPolicy;
use crate::state::DeviceSnapshot;

/// Builder for creating HTTP-based devices.
///
/// This builder can be created in two ways:
/// - `Device::http("host")` - Simple host string
/// - `Device::http_config(HttpConfig::new("host").with_port(8080))` - Advanced configuration
///
/// # Examples
///
/// ```no_run
/// use modernforms::{Device, RetryPolicy};
/// use std::time::Duration;
///
/// # async fn example() -> modernforms::Result<()> {
/// // Simple: fetch the first snapshot right away
/// let (device, snapshot) = Device::http("192.168.1.100")
///     .build()
///     .await?;
///
/// // Behind a reverse proxy with TLS and basic auth
/// let (device, snapshot) = Device::http("fans.example.com")
///     .with_tls()
///     .with_base_path("/living-room")
///     .with_credentials("admin", "password")
///     .build()
///     .await?;
///
/// // Without any network access, and without retries
/// let device = Device::http("192.168.1.100")
///     .with_retry_policy(RetryPolicy::disabled())
///     .with_timeout(Duration::from_secs(2))
///     .build_without_probe()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpDeviceBuilder {
    config: HttpConfig,
    session: Option<reqwest::Client>,
    retry: RetryPolicy,
}

impl HttpDeviceBuilder {
    /// Creates a new builder with the specified HTTP configuration.
    pub(crate) fn new(config: HttpConfig) -> Self {
        Self {
            config,
            session: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.config = self.config.with_port(port);
        self
    }

    /// Sets authentication credentials.
    ///
    /// # Arguments
    ///
    /// * `username` - The username for HTTP basic authentication
    /// * `password` - The password for HTTP basic authentication
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.config = self.config.with_credentials(username, password);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Enables HTTPS.
    #[must_use]
    pub fn with_tls(mut self) -> Self {
        self.config = self.config.with_tls();
        self
    }

    /// Enables or disables TLS certificate verification.
    #[must_use]
    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.config = self.config.with_verify_ssl(verify_ssl);
        self
    }

    /// Sets the path prefix in front of the API endpoint.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.config = self.config.with_base_path(base_path);
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config = self.config.with_user_agent(user_agent);
        self
    }

    /// Reuses an existing `reqwest::Client`.
    ///
    /// The device never closes a session supplied this way.
    #[must_use]
    pub fn with_session(mut self, session: reqwest::Client) -> Self {
        self.session = Some(session);
        self
    }

    /// Sets the retry policy for requests and updates.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the HTTP configuration built so far.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Builds the device and fetches its first snapshot.
    ///
    /// Use [`build_without_probe`](Self::build_without_probe) to defer all
    /// network access to the first call.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The configuration does not form a valid URL
    /// - The initial update fails
    pub async fn build(self) -> Result<(Device<HttpClient>, DeviceSnapshot), Error> {
        let device = self.build_without_probe()?;
        let snapshot = device.update(false).await?;
        Ok((device, snapshot))
    }

    /// Builds the device without contacting it.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration does not form a valid URL.
    pub fn build_without_probe(self) -> Result<Device<HttpClient>, Error> {
        let mut client = self.config.into_client()?;
        if let Some(session) = self.session {
            client = client.with_session(session);
        }
        Ok(Device::new(client, self.retry))
    }
}
