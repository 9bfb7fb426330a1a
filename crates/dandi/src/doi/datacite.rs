//! Conversion of dataset-version metadata into a DataCite registration
//! document.

use chrono::{DateTime, Datelike, Utc};
use serde_json::{json, Map, Value};

use crate::error::{DandiError, Result};
use crate::schema::{check_url, ValidationMode};

/// Converts version metadata into a registry payload.
///
/// Implementations must be deterministic for a fixed input, apart from
/// documented fallbacks.
pub trait MetadataTransform: Send + Sync {
    fn to_payload(
        &self,
        metadata: &Map<String, Value>,
        publish: bool,
        mode: ValidationMode,
    ) -> Result<Value>;
}

const AUTHOR_ROLE: &str = "dcite:Author";
const SPDX_PREFIX: &str = "spdx:";

/// DataCite JSON:API payload builder.
#[derive(Debug, Clone)]
pub struct DataciteTransform {
    publisher: String,
}

impl Default for DataciteTransform {
    fn default() -> Self {
        Self {
            publisher: "DANDI Archive".to_string(),
        }
    }
}

impl DataciteTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self
    }
}

impl MetadataTransform for DataciteTransform {
    fn to_payload(
        &self,
        metadata: &Map<String, Value>,
        publish: bool,
        mode: ValidationMode,
    ) -> Result<Value> {
        let doi = required_str(metadata, "doi")?;
        let name = required_str(metadata, "name")?;
        let description = required_str(metadata, "description")?;
        let version = required_str(metadata, "version")?;

        let contributors = metadata
            .get("contributor")
            .and_then(Value::as_array)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| transform_error("contributor", "at least one contributor is required"))?;

        let mut attributes = json!({
            "doi": doi,
            "creators": creators(contributors)?,
            "titles": [{"title": name}],
            "descriptions": [{"description": description, "descriptionType": "Abstract"}],
            "publisher": self.publisher,
            "publicationYear": publication_year(metadata),
            "types": {"resourceType": "Neural Data", "resourceTypeGeneral": "Dataset"},
            "version": version,
            "rightsList": rights(metadata),
            "subjects": subjects(metadata),
            "schemaVersion": "http://datacite.org/schema/kernel-4",
        });

        if let Some(url) = metadata.get("url").and_then(Value::as_str) {
            if let Some(err) = check_url(url, &["url".into()], mode) {
                return Err(transform_error("url", &err.msg));
            }
            attributes["url"] = json!(url);
        }
        if publish {
            attributes["event"] = json!("publish");
        }

        Ok(json!({
            "data": {
                "id": doi,
                "type": "dois",
                "attributes": attributes,
            }
        }))
    }
}

fn transform_error(field: &str, message: &str) -> DandiError {
    DandiError::Transform(format!("{}: {}", field, message))
}

fn required_str<'m>(metadata: &'m Map<String, Value>, key: &str) -> Result<&'m str> {
    metadata
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| transform_error(key, "field required"))
}

// Contributors flagged as authors, or everyone when nobody is.
fn creators(contributors: &[Value]) -> Result<Vec<Value>> {
    let is_author = |c: &Value| {
        c.get("roleName")
            .and_then(Value::as_array)
            .is_some_and(|roles| roles.iter().any(|r| r.as_str() == Some(AUTHOR_ROLE)))
    };
    let authors: Vec<(usize, &Value)> = contributors
        .iter()
        .enumerate()
        .filter(|(_, c)| is_author(c))
        .collect();
    let selected = if authors.is_empty() {
        contributors.iter().enumerate().collect()
    } else {
        authors
    };

    selected
        .into_iter()
        .map(|(i, contributor)| creator(i, contributor))
        .collect()
}

fn creator(index: usize, contributor: &Value) -> Result<Value> {
    let name = contributor
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            transform_error(&format!("contributor -> {} -> name", index), "field required")
        })?;

    let organization = contributor.get("schemaKey").and_then(Value::as_str) == Some("Organization");
    let mut creator = json!({
        "name": name,
        "nameType": if organization { "Organizational" } else { "Personal" },
    });

    if !organization {
        if let Some((family, given)) = name.split_once(',') {
            creator["familyName"] = json!(family.trim());
            creator["givenName"] = json!(given.trim());
        }
        if let Some(orcid) = contributor.get("identifier").and_then(Value::as_str) {
            creator["nameIdentifiers"] = json!([{
                "nameIdentifier": format!("https://orcid.org/{}", orcid),
                "nameIdentifierScheme": "ORCID",
                "schemeUri": "https://orcid.org",
            }]);
        }
    }

    Ok(creator)
}

fn publication_year(metadata: &Map<String, Value>) -> i32 {
    metadata
        .get("datePublished")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|date| date.year())
        .unwrap_or_else(|| Utc::now().year())
}

fn rights(metadata: &Map<String, Value>) -> Vec<Value> {
    string_items(metadata, "license")
        .map(|license| {
            let id = license.strip_prefix(SPDX_PREFIX).unwrap_or(license);
            json!({
                "rights": id,
                "rightsIdentifier": id,
                "rightsIdentifierScheme": "SPDX",
                "schemeUri": "https://spdx.org/licenses/",
            })
        })
        .collect()
}

fn subjects(metadata: &Map<String, Value>) -> Vec<Value> {
    string_items(metadata, "keywords")
        .map(|keyword| json!({"subject": keyword}))
        .collect()
}

fn string_items<'m>(metadata: &'m Map<String, Value>, key: &str) -> impl Iterator<Item = &'m str> {
    metadata
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}
