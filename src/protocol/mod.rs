// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport for communicating with Modern Forms devices.
//!
//! The device exposes a single JSON endpoint; every exchange is one POST
//! whose body is a [`CommandSet`] and whose response is a JSON object.
//! [`HttpClient`] implements this over HTTP(S) with `reqwest`.

mod http;

pub use http::{HttpClient, HttpConfig};

use crate::command::CommandSet;
use crate::error::{ParseError, ProtocolError};

/// Response from a Modern Forms request.
#[derive(Debug, Clone)]
pub struct CommandResponse {
    /// The raw JSON response body.
    body: String,
}

impl CommandResponse {
    /// Creates a new command response with the given body.
    #[must_use]
    pub fn new(body: String) -> Self {
        Self { body }
    }

    /// Returns the raw JSON response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the body as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns error if the body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value, ParseError> {
        serde_json::from_str(&self.body).map_err(Into::into)
    }

    /// Parses the response as a specific type.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON cannot be parsed into the target type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, ParseError> {
        serde_json::from_str(&self.body).map_err(Into::into)
    }
}

/// Trait for transports that can exchange commands with a device.
#[allow(async_fn_in_trait)]
pub trait Protocol {
    /// Returns the host of the device, for diagnostics.
    fn host(&self) -> &str;

    /// Sends a command set and returns the device's answer.
    ///
    /// An empty set must be sent as a status query.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the exchange fails or the device rejects
    /// the request.
    async fn send(&self, commands: &CommandSet) -> Result<CommandResponse, ProtocolError>;

    /// Releases transport resources owned by this protocol.
    fn close(&self) {}
}
