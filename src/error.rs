// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `modernforms` library.
//!
//! Errors fall into three groups:
//!
//! - caller mistakes, raised before any network I/O: [`Error::InvalidSettings`]
//!   and [`Error::NotInitialized`];
//! - transient failures that are retried automatically: connection failures,
//!   timeouts and [`Error::EmptyResponse`];
//! - device rejections ([`ProtocolError::Status`]) and undecodable payloads,
//!   which are surfaced immediately.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A setting was out of range or otherwise invalid.
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] ValueError),

    /// Error occurred during communication with the device.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while decoding a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The device answered a full update with an empty state payload.
    #[error("Modern Forms device at {host} returned an empty API response on full update")]
    EmptyResponse {
        /// Host of the device that sent the empty response.
        host: String,
    },

    /// State or info was read before any successful update.
    #[error("the device has not been initialized, run update on the device first")]
    NotInitialized,
}

impl Error {
    /// Returns `true` for connection-level failures, timeouts included.
    ///
    /// These are the failures the request layer retries.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Protocol(ProtocolError::Connection { .. } | ProtocolError::Timeout { .. })
        )
    }

    /// Returns `true` if the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Protocol(ProtocolError::Timeout { .. }))
    }

    /// Returns the HTTP status code if the device rejected the request.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Protocol(ProtocolError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric setting is outside the allowed range.
    #[error("{name} value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the setting.
        name: &'static str,
        /// Minimum allowed value.
        min: u8,
        /// Maximum allowed value.
        max: u8,
        /// The value that was provided.
        actual: u8,
    },

    /// An unknown fan direction was provided.
    #[error("fan direction must be forward or reverse, got {0:?}")]
    InvalidFanDirection(String),

    /// A sleep deadline is in the past or more than 24 hours ahead.
    #[error(
        "the time to sleep till must not be in the past or more than 24 hours into the future \
         (got {0})"
    )]
    InvalidSleepTime(chrono::DateTime<chrono::Utc>),

    /// A relative sleep timer ends past the last representable date.
    #[error("sleep timer of {0} seconds is out of range")]
    SleepTimerOverflow(u64),

    /// Breeze settings were requested on a device without breeze mode.
    #[error("device does not support breeze mode")]
    BreezeModeUnsupported,
}

/// Errors related to HTTP communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The underlying HTTP client could not be created.
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The device could not be reached or the exchange failed midway.
    #[error("error occurred while communicating with Modern Forms device at {host}: {source}")]
    Connection {
        /// Host of the device.
        host: String,
        /// Transport error reported by the HTTP client.
        #[source]
        source: reqwest::Error,
    },

    /// The request timed out.
    #[error("timeout occurred while connecting to Modern Forms device at {host} ({timeout_ms} ms)")]
    Timeout {
        /// Host of the device.
        host: String,
        /// Configured request timeout.
        timeout_ms: u64,
    },

    /// The device answered with a 4xx or 5xx status.
    ///
    /// `body` holds the parsed JSON body when the device sent JSON, otherwise
    /// `{"message": <raw text>}`.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: serde_json::Value,
    },

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to decoding device responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response was valid JSON but not an object.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
