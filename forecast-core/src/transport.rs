//! The seam between the client and the network.
//!
//! [`ForecastClient`](crate::ForecastClient) only ever talks to a
//! [`Transport`]; production code uses [`ReqwestTransport`], tests plug in a
//! stub that hands back canned bodies.

use std::{
    fmt::{self, Debug},
    io::{Cursor, Read},
    time::Duration,
};

use reqwest::{
    StatusCode,
    blocking::{Client, Request},
};
use thiserror::Error;

/// Transport timeout used when the configuration does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// "Send a request, get a response".
pub trait Transport: Send + Sync + Debug {
    fn execute(&self, request: Request) -> Result<TransportResponse, TransportError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// DNS, connection refused, TLS handshake and similar.
    #[error("Connection failed: {0}")]
    Connect(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

/// Inbound response: status plus a body that is read at most once.
///
/// The body is owned, so dropping the response releases the underlying
/// connection whatever happens during decoding.
pub struct TransportResponse {
    status: StatusCode,
    body: Box<dyn Read + Send>,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Read + Send + 'static) -> Self {
        Self {
            status,
            body: Box::new(body),
        }
    }

    /// Response backed by an in-memory body.
    pub fn from_bytes(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, Cursor::new(body.into()))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn into_body(self) -> Box<dyn Read + Send> {
        self.body
    }
}

impl Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Blocking `reqwest` transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { http })
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: Request) -> Result<TransportResponse, TransportError> {
        let response = self.http.execute(request)?;
        let status = response.status();

        Ok(TransportResponse::new(status, response))
    }
}
