// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP protocol implementation for Modern Forms devices.

use std::time::Duration;

use parking_lot::Mutex;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Url};

use crate::command::CommandSet;
use crate::error::ProtocolError;
use crate::protocol::{CommandResponse, Protocol};

/// Path of the device API, relative to the base path.
const API_ENDPOINT: &str = "mf";

// ============================================================================
// HttpConfig - Connection parameters
// ============================================================================

/// Configuration for an HTTP Modern Forms device.
///
/// # Examples
///
/// ```
/// use modernforms::protocol::HttpConfig;
/// use std::time::Duration;
///
/// // Simple configuration
/// let config = HttpConfig::new("192.168.1.100");
/// assert_eq!(config.endpoint(), "http://192.168.1.100/mf");
///
/// // With all options
/// let config = HttpConfig::new("192.168.1.100")
///     .with_port(8443)
///     .with_tls()
///     .with_verify_ssl(false)
///     .with_base_path("/proxy")
///     .with_credentials("admin", "password")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.endpoint(), "https://192.168.1.100:8443/proxy/mf");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    port: u16,
    base_path: String,
    use_tls: bool,
    verify_ssl: bool,
    credentials: Option<(String, String)>,
    timeout: Duration,
    user_agent: String,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default HTTPS port.
    pub const DEFAULT_TLS_PORT: u16 = 443;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
    /// Default `User-Agent` header.
    pub const DEFAULT_USER_AGENT: &'static str = concat!("modernforms/", env!("CARGO_PKG_VERSION"));

    /// Creates a new HTTP configuration for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the fan
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            base_path: "/".to_string(),
            use_tls: false,
            verify_ssl: true,
            credentials: None,
            timeout: Self::DEFAULT_TIMEOUT,
            user_agent: Self::DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables HTTPS.
    ///
    /// If port hasn't been explicitly set, it will be changed to 443.
    #[must_use]
    pub fn with_tls(mut self) -> Self {
        self.use_tls = true;
        if self.port == Self::DEFAULT_PORT {
            self.port = Self::DEFAULT_TLS_PORT;
        }
        self
    }

    /// Enables or disables TLS certificate verification.
    #[must_use]
    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    /// Sets the path prefix in front of the API endpoint.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        let mut base_path = base_path.into();
        if !base_path.starts_with('/') {
            base_path.insert(0, '/');
        }
        if !base_path.ends_with('/') {
            base_path.push('/');
        }
        self.base_path = base_path;
        self
    }

    /// Sets basic authentication credentials.
    ///
    /// Credentials are only sent when both values are non-empty.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the base path, always with leading and trailing `/`.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns whether HTTPS is enabled.
    #[must_use]
    pub fn use_tls(&self) -> bool {
        self.use_tls
    }

    /// Returns whether TLS certificates are verified.
    #[must_use]
    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    /// Returns the credentials that will be sent, if any.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.credentials
            .as_ref()
            .filter(|(u, p)| !u.is_empty() && !p.is_empty())
            .map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        let port_suffix = if (self.use_tls && self.port == Self::DEFAULT_TLS_PORT)
            || (!self.use_tls && self.port == Self::DEFAULT_PORT)
        {
            String::new()
        } else {
            format!(":{}", self.port)
        };
        format!("{scheme}://{}{port_suffix}", self.host)
    }

    /// Builds the full API endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{}{API_ENDPOINT}", self.base_url(), self.base_path)
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// No connection is opened until the first request.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration does not form a valid URL.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        HttpClient::new(self)
    }
}

// ============================================================================
// HttpClient - Session management and request/response handling
// ============================================================================

/// HTTP client for communicating with a Modern Forms fan.
///
/// The underlying `reqwest::Client` is created on the first request, unless
/// one was supplied with [`with_session`](Self::with_session). Only a session
/// created here is released by [`close`](Protocol::close); a supplied
/// session belongs to the caller.
///
/// # Examples
///
/// ```no_run
/// use modernforms::command::CommandSet;
/// use modernforms::protocol::{HttpConfig, Protocol};
///
/// # async fn example() -> modernforms::Result<()> {
/// let client = HttpConfig::new("192.168.1.100").into_client()?;
/// let response = client.send(&CommandSet::query_status()).await?;
/// println!("{}", response.body());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpClient {
    config: HttpConfig,
    url: Url,
    session: Mutex<Option<Client>>,
    owns_session: bool,
}

impl HttpClient {
    /// Creates a new HTTP client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration does not form a valid URL.
    pub fn new(config: HttpConfig) -> Result<Self, ProtocolError> {
        let endpoint = config.endpoint();
        let url = Url::parse(&endpoint)
            .map_err(|e| ProtocolError::InvalidAddress(format!("{endpoint}: {e}")))?;

        Ok(Self {
            config,
            url,
            session: Mutex::new(None),
            owns_session: true,
        })
    }

    /// Uses an existing `reqwest::Client` instead of creating one.
    ///
    /// The session is shared with the caller and never closed by this client.
    #[must_use]
    pub fn with_session(mut self, session: Client) -> Self {
        self.session = Mutex::new(Some(session));
        self.owns_session = false;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Returns the API endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns `true` if the session was created by this client.
    #[must_use]
    pub fn owns_session(&self) -> bool {
        self.owns_session
    }

    /// Returns `true` if a session is currently held.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session.lock().is_some()
    }

    /// Returns the session, creating it on first use.
    fn session(&self) -> Result<Client, ProtocolError> {
        let mut session = self.session.lock();
        if let Some(client) = session.as_ref() {
            return Ok(client.clone());
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(!self.config.verify_ssl)
            .build()
            .map_err(ProtocolError::Client)?;

        tracing::debug!(host = %self.config.host, "Created HTTP session");
        *session = Some(client.clone());
        Ok(client)
    }

    fn transport_error(&self, error: reqwest::Error) -> ProtocolError {
        if error.is_timeout() {
            ProtocolError::Timeout {
                host: self.config.host.clone(),
                timeout_ms: u64::try_from(self.config.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            ProtocolError::Connection {
                host: self.config.host.clone(),
                source: error,
            }
        }
    }
}

/// Builds the error body for a rejected request.
///
/// JSON bodies are kept as parsed; anything else is wrapped as
/// `{"message": <text>}`.
fn error_body(content_type: &str, text: String) -> serde_json::Value {
    if content_type.starts_with("application/json")
        && let Ok(value) = serde_json::from_str(&text)
    {
        return value;
    }
    serde_json::json!({ "message": text })
}

impl Protocol for HttpClient {
    fn host(&self) -> &str {
        &self.config.host
    }

    async fn send(&self, commands: &CommandSet) -> Result<CommandResponse, ProtocolError> {
        let session = self.session()?;
        let body = commands.clone().or_query_status();

        tracing::debug!(url = %self.url, body = ?body, "Sending HTTP request");

        let mut request = session
            .post(self.url.clone())
            .timeout(self.config.timeout)
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, "application/json")
            .json(&body);

        if let Some((username, password)) = self.config.credentials() {
            request = request.basic_auth(username, Some(password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if status.is_client_error() || status.is_server_error() {
            tracing::debug!(status = status.as_u16(), body = %text, "Device rejected request");
            return Err(ProtocolError::Status {
                status: status.as_u16(),
                body: error_body(&content_type, text),
            });
        }

        tracing::debug!(body = %text, "Received HTTP response");

        Ok(CommandResponse::new(text))
    }

    fn close(&self) {
        if self.owns_session && self.session.lock().take().is_some() {
            tracing::debug!(host = %self.config.host, "Closed HTTP session");
        }
    }
}
