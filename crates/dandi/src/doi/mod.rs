//! DOI lifecycle: build, register and retract DOIs for dataset versions.
//!
//! The registry is reached through the [`RegistryTransport`] trait.
//! [`HttpTransport`] talks to a real DataCite endpoint; [`MockTransport`]
//! replays scripted responses in tests.

mod builder;
mod client;
mod datacite;
mod error;
mod mock;
mod publisher;
mod transport;

pub use builder::{doi_string, DoiData, DoiDataBuilder};
pub use client::{DeleteOutcome, Registration, RegistryClient, RegistryEndpoint, JSON_API};
pub use datacite::{DataciteTransform, MetadataTransform};
pub use error::{RegistrationError, RegistryOperation};
pub use mock::{MockTransport, RecordedRequest};
pub use publisher::DoiPublisher;
pub use transport::{
    Credentials, HttpTransport, Method, RegistryRequest, RegistryResponse, RegistryTransport,
    TransportError,
};
