//! DOI registry client: create and conditionally delete DOIs.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::DoiSettings;

use super::error::{RegistrationError, RegistryOperation};
use super::transport::{
    Credentials, HttpTransport, Method, RegistryRequest, RegistryResponse, RegistryTransport,
};

/// Media type of registry documents.
pub const JSON_API: &str = "application/vnd.api+json";

/// A fully configured registry endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEndpoint {
    pub url: String,
    pub credentials: Credentials,
}

impl RegistryEndpoint {
    pub fn new(url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            url: url.into(),
            credentials,
        }
    }

    /// URL of one DOI resource.
    pub fn doi_url(&self, doi: &str) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), doi)
    }
}

/// Whether registry calls are made at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// No registry settings present; every call is a logged no-op.
    Disabled,
    Enabled(RegistryEndpoint),
}

impl Registration {
    /// Derive the registration mode from settings.
    ///
    /// Returns a configuration error when some but not all of URL, user and
    /// password are set.
    pub fn from_settings(settings: &DoiSettings) -> Result<Self, RegistrationError> {
        if !settings.is_configured() {
            return Ok(Registration::Disabled);
        }

        let missing: Vec<&str> = [
            ("DANDI_DOI_API_URL", &settings.api_url),
            ("DANDI_DOI_API_USER", &settings.api_user),
            ("DANDI_DOI_API_PASSWORD", &settings.api_password),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect();

        match (&settings.api_url, &settings.api_user, &settings.api_password) {
            (Some(url), Some(user), Some(password)) => {
                let credentials = Credentials::new(user.clone(), password.clone());
                Ok(Registration::Enabled(RegistryEndpoint::new(url.clone(), credentials)))
            }
            _ => Err(RegistrationError::Config(format!(
                "DOI registry is partially configured; missing {}",
                missing.join(", ")
            ))),
        }
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Registration is disabled; nothing was sent.
    Disabled,
    /// The registry does not know the DOI.
    Absent,
    /// The DOI exists but is not a draft, so it was left alone.
    Retained { state: String },
    /// The draft DOI was deleted.
    Deleted,
}

#[derive(Deserialize)]
struct StateDocument {
    data: StateData,
}

#[derive(Deserialize)]
struct StateData {
    attributes: StateAttributes,
}

#[derive(Deserialize)]
struct StateAttributes {
    state: String,
}

/// Client for a DataCite-style DOI registry.
pub struct RegistryClient<T = HttpTransport> {
    registration: Registration,
    transport: T,
}

impl RegistryClient<HttpTransport> {
    /// Build an HTTP client from settings.
    pub fn from_settings(settings: &DoiSettings) -> Result<Self, RegistrationError> {
        let registration = Registration::from_settings(settings)?;
        let transport = HttpTransport::new(settings.timeout())?;
        Ok(Self::with_transport(registration, transport))
    }
}

impl<T: RegistryTransport> RegistryClient<T> {
    pub fn with_transport(registration: Registration, transport: T) -> Self {
        Self {
            registration,
            transport,
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.registration, Registration::Enabled(_))
    }

    pub fn registration(&self) -> &Registration {
        &self.registration
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Register `doi` with `payload`.
    ///
    /// A non-2xx answer is logged together with the payload and returned as
    /// an error.
    pub fn create(&self, doi: &str, payload: &Value) -> Result<(), RegistrationError> {
        let Registration::Enabled(endpoint) = &self.registration else {
            debug!(doi = %doi, "DOI registration disabled, not creating");
            return Ok(());
        };

        let request = RegistryRequest {
            method: Method::Post,
            url: &endpoint.url,
            credentials: &endpoint.credentials,
            accept: None,
            body: Some(payload),
        };

        let response = self.transport.send(&request).map_err(|e| {
            error!(doi = %doi, error = %e, "Failed to create DOI");
            error!(payload = %payload, "Rejected DOI payload");
            RegistrationError::Transport {
                doi: doi.to_string(),
                operation: RegistryOperation::Create,
                message: e.to_string(),
            }
        })?;

        if !response.is_success() {
            error!(
                doi = %doi,
                status = response.status,
                body = %response.body,
                "Failed to create DOI"
            );
            error!(payload = %payload, "Rejected DOI payload");
            return Err(http_error(doi, RegistryOperation::Create, response));
        }

        info!(doi = %doi, "DOI created");
        Ok(())
    }

    /// Current registry state of `doi` (`draft`, `registered`, `findable`),
    /// or `None` if the registry does not know it.
    pub fn fetch_state(&self, doi: &str) -> Result<Option<String>, RegistrationError> {
        let Registration::Enabled(endpoint) = &self.registration else {
            return Ok(None);
        };
        self.fetch_state_at(endpoint, doi)
    }

    /// Delete `doi` if and only if it is still a draft.
    ///
    /// An unknown DOI is a warning, not an error. Findable or registered
    /// DOIs are never deleted.
    pub fn delete(&self, doi: &str) -> Result<DeleteOutcome, RegistrationError> {
        let Registration::Enabled(endpoint) = &self.registration else {
            debug!(doi = %doi, "DOI registration disabled, not deleting");
            return Ok(DeleteOutcome::Disabled);
        };

        let Some(state) = self.fetch_state_at(endpoint, doi)? else {
            warn!(doi = %doi, "Tried to get data for nonexistent DOI");
            return Ok(DeleteOutcome::Absent);
        };

        if state != "draft" {
            info!(doi = %doi, state = %state, "DOI is not a draft, leaving it in place");
            return Ok(DeleteOutcome::Retained { state });
        }

        let url = endpoint.doi_url(doi);
        let request = RegistryRequest {
            method: Method::Delete,
            url: &url,
            credentials: &endpoint.credentials,
            accept: None,
            body: None,
        };

        let response = self.transport.send(&request).map_err(|e| {
            error!(doi = %doi, error = %e, "Failed to delete DOI");
            RegistrationError::Transport {
                doi: doi.to_string(),
                operation: RegistryOperation::Delete,
                message: e.to_string(),
            }
        })?;

        if !response.is_success() {
            error!(doi = %doi, status = response.status, "Failed to delete DOI");
            return Err(http_error(doi, RegistryOperation::Delete, response));
        }

        info!(doi = %doi, "Draft DOI deleted");
        Ok(DeleteOutcome::Deleted)
    }

    fn fetch_state_at(
        &self,
        endpoint: &RegistryEndpoint,
        doi: &str,
    ) -> Result<Option<String>, RegistrationError> {
        let url = endpoint.doi_url(doi);
        let request = RegistryRequest {
            method: Method::Get,
            url: &url,
            credentials: &endpoint.credentials,
            accept: Some(JSON_API),
            body: None,
        };

        let response = self.transport.send(&request).map_err(|e| {
            error!(doi = %doi, error = %e, "Failed to fetch data for DOI");
            RegistrationError::Transport {
                doi: doi.to_string(),
                operation: RegistryOperation::Fetch,
                message: e.to_string(),
            }
        })?;

        if response.status == 404 {
            return Ok(None);
        }
        if !response.is_success() {
            error!(doi = %doi, status = response.status, "Failed to fetch data for DOI");
            return Err(http_error(doi, RegistryOperation::Fetch, response));
        }

        let document: StateDocument =
            response
                .json()
                .map_err(|e| RegistrationError::MalformedResponse {
                    doi: doi.to_string(),
                    message: e.to_string(),
                })?;
        Ok(Some(document.data.attributes.state))
    }
}

fn http_error(
    doi: &str,
    operation: RegistryOperation,
    response: RegistryResponse,
) -> RegistrationError {
    RegistrationError::Http {
        doi: doi.to_string(),
        operation,
        status: response.status,
        body: response.body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doi::MockTransport;
    use serde_json::json;

    fn endpoint() -> Registration {
        Registration::Enabled(RegistryEndpoint::new(
            "https://api.test.datacite.org/dois/",
            Credentials::new("dandi", "secret"),
        ))
    }

    #[test]
    fn test_doi_url_joins_single_slash() {
        let Registration::Enabled(endpoint) = endpoint() else {
            unreachable!()
        };
        assert_eq!(
            endpoint.doi_url("10.80507/dandi.000123/1.0.0"),
            "https://api.test.datacite.org/dois/10.80507/dandi.000123/1.0.0"
        );
    }

    #[test]
    fn test_partial_configuration_is_rejected() {
        let settings = DoiSettings {
            api_url: Some("https://api.test.datacite.org/dois".into()),
            ..Default::default()
        };
        let err = Registration::from_settings(&settings).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("DANDI_DOI_API_USER"));
        assert!(message.contains("DANDI_DOI_API_PASSWORD"));
        assert!(!message.contains("DANDI_DOI_API_URL"));
    }

    #[test]
    fn test_unconfigured_is_disabled() {
        let registration = Registration::from_settings(&DoiSettings::default()).unwrap();
        assert_eq!(registration, Registration::Disabled);
    }

    #[test]
    fn test_fetch_state_reads_attributes() {
        let transport = MockTransport::new().respond_state("findable");
        let client = RegistryClient::with_transport(endpoint(), transport);
        let state = client.fetch_state("10.80507/dandi.000123/1.0.0").unwrap();
        assert_eq!(state.as_deref(), Some("findable"));

        let requests = client.transport().requests();
        assert_eq!(requests[0].accept.as_deref(), Some(JSON_API));
    }

    #[test]
    fn test_malformed_state_document() {
        let transport =
            MockTransport::new().respond(Method::Get, 200, json!({"data": {}}).to_string());
        let client = RegistryClient::with_transport(endpoint(), transport);
        let err = client.delete("10.80507/dandi.000123/1.0.0").unwrap_err();
        assert!(matches!(err, RegistrationError::MalformedResponse { .. }));
        assert_eq!(client.transport().count(Method::Delete), 0);
    }

    #[test]
    fn test_server_error_on_fetch_is_fatal() {
        let transport = MockTransport::new().respond(Method::Get, 503, "unavailable");
        let client = RegistryClient::with_transport(endpoint(), transport);
        let err = client.delete("10.80507/dandi.000123/1.0.0").unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(client.transport().count(Method::Delete), 0);
    }
}
