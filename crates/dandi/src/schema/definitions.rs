//! Built-in schema versions for published assets and dandisets.

use once_cell::sync::Lazy;
use regex::Regex;

use super::field::{FieldSpec, FieldType};
use super::registry::{Schema, SchemaSet};

/// Newest built-in schema version.
pub const CURRENT_SCHEMA_VERSION: &str = "0.6.0";

/// Licenses a published dandiset may carry.
pub static LICENSES: &[&str] = &["spdx:CC0-1.0", "spdx:CC-BY-4.0"];

static CONTRIBUTOR_KEYS: &[&str] = &["Person", "Organization"];

static DANDISET_IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^DANDI:\d{6}$").unwrap());

/// What changed between schema revisions.
#[derive(Debug, Clone, Copy)]
struct Revision {
    /// Assets must list where their content can be downloaded.
    content_url_required: bool,
    /// Dandisets may carry ethics approvals.
    ethics_approval: bool,
}

const REVISIONS: &[(&str, Revision)] = &[
    (
        "0.4.4",
        Revision {
            content_url_required: false,
            ethics_approval: false,
        },
    ),
    (
        "0.5.0",
        Revision {
            content_url_required: true,
            ethics_approval: false,
        },
    ),
    (
        "0.5.1",
        Revision {
            content_url_required: true,
            ethics_approval: false,
        },
    ),
    (
        CURRENT_SCHEMA_VERSION,
        Revision {
            content_url_required: true,
            ethics_approval: true,
        },
    ),
];

/// All built-in versions, oldest first.
pub(crate) fn builtin() -> Vec<(&'static str, SchemaSet)> {
    REVISIONS
        .iter()
        .map(|(version, revision)| {
            (
                *version,
                SchemaSet {
                    asset: asset_schema(*revision),
                    dandiset: dandiset_schema(*revision),
                },
            )
        })
        .collect()
}

fn asset_schema(revision: Revision) -> Schema {
    let content_url = FieldType::list_of(FieldType::Url);
    let mut fields = vec![
        FieldSpec::optional("id", FieldType::string()),
        FieldSpec::optional("schemaKey", FieldType::Const("Asset")),
        FieldSpec::required("schemaVersion", FieldType::string()),
        FieldSpec::required("identifier", FieldType::string()),
        FieldSpec::optional("keywords", FieldType::list_of(FieldType::string())),
        FieldSpec::required("contentSize", FieldType::Integer),
        FieldSpec::required("encodingFormat", FieldType::string()),
        FieldSpec::required("digest", FieldType::Digest),
        FieldSpec::required("path", FieldType::string()),
    ];
    fields.push(if revision.content_url_required {
        FieldSpec::required("contentUrl", content_url)
    } else {
        FieldSpec::optional("contentUrl", content_url)
    });
    fields.extend([
        FieldSpec::optional("dateModified", FieldType::DateTime),
        FieldSpec::optional("blobDateModified", FieldType::DateTime),
    ]);

    Schema {
        model: "PublishedAsset",
        fields,
    }
}

fn contributor() -> FieldType {
    FieldType::Object(vec![
        FieldSpec::optional("schemaKey", FieldType::Enum(CONTRIBUTOR_KEYS)),
        FieldSpec::required("name", FieldType::string()),
        FieldSpec::optional("email", FieldType::string()),
        FieldSpec::optional("identifier", FieldType::string()),
        FieldSpec::optional("roleName", FieldType::list_of(FieldType::string())),
    ])
}

fn dandiset_schema(revision: Revision) -> Schema {
    let mut fields = vec![
        FieldSpec::optional("id", FieldType::string()),
        FieldSpec::optional("schemaKey", FieldType::Const("Dandiset")),
        FieldSpec::required("schemaVersion", FieldType::string()),
        FieldSpec::required("name", FieldType::bounded_string(150)),
        FieldSpec::required("description", FieldType::bounded_string(3000)),
        FieldSpec::required("contributor", FieldType::non_empty_list_of(contributor())),
        FieldSpec::required("license", FieldType::list_of(FieldType::Enum(LICENSES))),
        FieldSpec::optional("keywords", FieldType::list_of(FieldType::string())),
        FieldSpec::required("identifier", FieldType::Pattern(&DANDISET_IDENTIFIER)),
        FieldSpec::required("citation", FieldType::string()),
        FieldSpec::optional("url", FieldType::Url),
        FieldSpec::optional("repository", FieldType::Url),
        FieldSpec::required("version", FieldType::string()),
        FieldSpec::optional("doi", FieldType::string()),
        FieldSpec::optional("datePublished", FieldType::DateTime),
        FieldSpec::optional("assetsSummary", FieldType::Map),
    ];
    if revision.ethics_approval {
        fields.push(FieldSpec::optional(
            "ethicsApproval",
            FieldType::list_of(FieldType::Object(vec![FieldSpec::required(
                "identifier",
                FieldType::string(),
            )])),
        ));
    }

    Schema {
        model: "PublishedDandiset",
        fields,
    }
}
