//! Field definitions and per-field checks.

use std::net::IpAddr;

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use serde_json::{Map, Value};

use crate::record::BlobDigest;

use super::error::{FieldError, PathSegment};
use super::registry::ValidationMode;

/// Expected shape of a field value.
#[derive(Debug, Clone)]
pub enum FieldType {
    /// A string, optionally length-bounded.
    Str { max_length: Option<usize> },
    /// A string matching a regular expression.
    Pattern(&'static Lazy<Regex>),
    Integer,
    /// RFC 3339 timestamp.
    DateTime,
    /// http(s) URL with a top-level domain.
    Url,
    /// A fixed string.
    Const(&'static str),
    /// One of a fixed set of strings.
    Enum(&'static [&'static str]),
    List { item: Box<FieldType>, min_items: usize },
    /// Nested object with its own declared fields.
    Object(Vec<FieldSpec>),
    /// Free-form mapping.
    Map,
    /// Blob digest mapping; must carry both the sha256 and dandi-etag keys.
    Digest,
}

impl FieldType {
    pub fn string() -> Self {
        FieldType::Str { max_length: None }
    }

    pub fn bounded_string(max_length: usize) -> Self {
        FieldType::Str {
            max_length: Some(max_length),
        }
    }

    pub fn list_of(item: FieldType) -> Self {
        FieldType::List {
            item: Box::new(item),
            min_items: 0,
        }
    }

    pub fn non_empty_list_of(item: FieldType) -> Self {
        FieldType::List {
            item: Box::new(item),
            min_items: 1,
        }
    }
}

/// A declared field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
}

impl FieldSpec {
    pub fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: true,
        }
    }

    pub fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
        }
    }
}

/// Check an object against declared fields, in declaration order.
pub(crate) fn check_fields(
    fields: &[FieldSpec],
    object: &Map<String, Value>,
    loc: &mut Vec<PathSegment>,
    mode: ValidationMode,
    errors: &mut Vec<FieldError>,
) {
    for spec in fields {
        loc.push(PathSegment::from(spec.name));
        match object.get(spec.name) {
            None if spec.required => errors.push(FieldError::missing(loc.clone())),
            None => {}
            Some(Value::Null) if spec.required => errors.push(FieldError::wrong_type(
                loc.clone(),
                "none is not an allowed value",
                "type_error.none.not_allowed",
            )),
            Some(Value::Null) => {}
            Some(value) => check_value(&spec.field_type, value, loc, mode, errors),
        }
        loc.pop();
    }
}

fn check_value(
    field_type: &FieldType,
    value: &Value,
    loc: &mut Vec<PathSegment>,
    mode: ValidationMode,
    errors: &mut Vec<FieldError>,
) {
    match field_type {
        FieldType::Str { max_length } => {
            let Some(s) = expect_str(value, loc, errors) else {
                return;
            };
            if let Some(max) = max_length {
                if s.chars().count() > *max {
                    errors.push(FieldError::custom(
                        loc.clone(),
                        format!("ensure this value has at most {} characters", max),
                        "value_error.any_str.max_length",
                    ));
                }
            }
        }
        FieldType::Pattern(re) => {
            let Some(s) = expect_str(value, loc, errors) else {
                return;
            };
            if !re.is_match(s) {
                errors.push(FieldError::custom(
                    loc.clone(),
                    format!("string does not match regex \"{}\"", re.as_str()),
                    "value_error.str.regex",
                ));
            }
        }
        FieldType::Integer => {
            if !(value.is_i64() || value.is_u64()) {
                errors.push(FieldError::wrong_type(
                    loc.clone(),
                    "value is not a valid integer",
                    "type_error.integer",
                ));
            }
        }
        FieldType::DateTime => {
            let parsed = value
                .as_str()
                .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok());
            if !parsed {
                errors.push(FieldError::custom(
                    loc.clone(),
                    "invalid datetime format",
                    "value_error.datetime",
                ));
            }
        }
        FieldType::Url => {
            let Some(s) = expect_str(value, loc, errors) else {
                return;
            };
            if let Some(err) = check_url(s, loc, mode) {
                errors.push(err);
            }
        }
        FieldType::Const(expected) => {
            if value.as_str() != Some(*expected) {
                errors.push(FieldError::custom(
                    loc.clone(),
                    format!("unexpected value; permitted: '{}'", expected),
                    "value_error.const",
                ));
            }
        }
        FieldType::Enum(permitted) => {
            let ok = value.as_str().is_some_and(|s| permitted.contains(&s));
            if !ok {
                let permitted = permitted
                    .iter()
                    .map(|p| format!("'{}'", p))
                    .collect::<Vec<_>>()
                    .join(", ");
                errors.push(FieldError::wrong_type(
                    loc.clone(),
                    format!("value is not a valid enumeration member; permitted: {}", permitted),
                    "type_error.enum",
                ));
            }
        }
        FieldType::List { item, min_items } => {
            let Some(items) = value.as_array() else {
                errors.push(FieldError::wrong_type(
                    loc.clone(),
                    "value is not a valid list",
                    "type_error.list",
                ));
                return;
            };
            if items.len() < *min_items {
                errors.push(FieldError::custom(
                    loc.clone(),
                    format!("ensure this value has at least {} items", min_items),
                    "value_error.list.min_items",
                ));
            }
            for (i, element) in items.iter().enumerate() {
                loc.push(PathSegment::Index(i));
                if element.is_null() {
                    errors.push(FieldError::wrong_type(
                        loc.clone(),
                        "none is not an allowed value",
                        "type_error.none.not_allowed",
                    ));
                } else {
                    check_value(item, element, loc, mode, errors);
                }
                loc.pop();
            }
        }
        FieldType::Object(fields) => {
            if let Some(object) = expect_dict(value, loc, errors) {
                check_fields(fields, object, loc, mode, errors);
            }
        }
        FieldType::Map => {
            expect_dict(value, loc, errors);
        }
        FieldType::Digest => {
            let Some(digest) = expect_dict(value, loc, errors) else {
                return;
            };
            if !digest.contains_key(BlobDigest::ETAG_KEY)
                || !digest.contains_key(BlobDigest::SHA256_KEY)
            {
                errors.push(FieldError::custom(
                    loc.clone(),
                    "Digest is missing dandi-etag or sha256 keys.",
                    "value_error",
                ));
            }
        }
    }
}

fn expect_str<'v>(
    value: &'v Value,
    loc: &[PathSegment],
    errors: &mut Vec<FieldError>,
) -> Option<&'v str> {
    let s = value.as_str();
    if s.is_none() {
        errors.push(FieldError::wrong_type(
            loc.to_vec(),
            "str type expected",
            "type_error.str",
        ));
    }
    s
}

fn expect_dict<'v>(
    value: &'v Value,
    loc: &[PathSegment],
    errors: &mut Vec<FieldError>,
) -> Option<&'v Map<String, Value>> {
    let object = value.as_object();
    if object.is_none() {
        errors.push(FieldError::wrong_type(
            loc.to_vec(),
            "value is not a valid dict",
            "type_error.dict",
        ));
    }
    object
}

pub(crate) fn check_url(s: &str, loc: &[PathSegment], mode: ValidationMode) -> Option<FieldError> {
    let url = match Url::parse(s) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url,
        _ => {
            return Some(FieldError::custom(
                loc.to_vec(),
                "invalid or missing URL scheme",
                "value_error.url.scheme",
            ));
        }
    };

    let host = url.host_str().unwrap_or_default();
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    let local = match bare.parse::<IpAddr>() {
        Ok(ip) => ip.is_loopback(),
        Err(_) => host == "localhost",
    };
    let has_tld = bare.parse::<IpAddr>().is_ok() || host.contains('.');

    if local && mode.allow_localhost_urls {
        return None;
    }
    if local || !has_tld {
        return Some(FieldError::custom(
            loc.to_vec(),
            "URL host invalid, top level domain required",
            "value_error.url.host",
        ));
    }
    None
}
