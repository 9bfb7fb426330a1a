//! HTTP transport seam for the registry client.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::error::RegistrationError;

/// HTTP method used against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

/// Basic-auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One outgoing registry request.
#[derive(Debug, Clone, Copy)]
pub struct RegistryRequest<'a> {
    pub method: Method,
    pub url: &'a str,
    pub credentials: &'a Credentials,
    pub accept: Option<&'a str>,
    pub body: Option<&'a Value>,
}

/// Status and body of a registry response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryResponse {
    pub status: u16,
    pub body: String,
}

impl RegistryResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

/// The request could not be completed.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Sends registry requests. Synchronous from the caller's point of view.
pub trait RegistryTransport: Send + Sync {
    fn send(&self, request: &RegistryRequest<'_>) -> Result<RegistryResponse, TransportError>;
}

/// Transport over a blocking `reqwest` client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, RegistrationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                RegistrationError::Config(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }
}

impl RegistryTransport for HttpTransport {
    fn send(&self, request: &RegistryRequest<'_>) -> Result<RegistryResponse, TransportError> {
        let builder = match request.method {
            Method::Get => self.client.get(request.url),
            Method::Post => self.client.post(request.url),
            Method::Delete => self.client.delete(request.url),
        };
        let mut builder = builder.basic_auth(
            &request.credentials.username,
            Some(&request.credentials.password),
        );
        if let Some(accept) = request.accept {
            builder = builder.header(ACCEPT, accept);
        }
        if let Some(body) = request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| {
                TransportError(format!("{} {} failed: {}", request.method, request.url, e))
            })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError(format!("Failed to read response body: {}", e)))?;

        Ok(RegistryResponse { status, body })
    }
}
