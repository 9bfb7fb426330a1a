//! Field-level validation errors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error type tag for a rejected schema version.
pub(crate) const VERSION_NOT_ALLOWED: &str = "value_error.schema_version";

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    /// A required field is absent.
    Missing,
    /// A field holds a value of the wrong JSON type.
    WrongType,
    /// A semantic rule was violated (pattern, enumeration, digest, ...).
    Custom,
    /// A version references child assets that are not valid.
    ChildInvalid,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Missing => "missing",
            ErrorCategory::WrongType => "wrong-type",
            ErrorCategory::Custom => "custom",
            ErrorCategory::ChildInvalid => "child-invalid",
        }
    }
}

/// One segment of a field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => f.write_str(k),
            PathSegment::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(s: &str) -> Self {
        PathSegment::Key(s.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        PathSegment::Index(i)
    }
}

/// A single field-level error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Path to the offending field.
    pub loc: Vec<PathSegment>,
    /// Human-readable message.
    pub msg: String,
    pub category: ErrorCategory,
    /// Detailed error tag, rendered as `(type=...)`.
    #[serde(rename = "type")]
    pub error_type: String,
}

impl FieldError {
    pub fn new(
        loc: Vec<PathSegment>,
        msg: impl Into<String>,
        category: ErrorCategory,
        error_type: impl Into<String>,
    ) -> Self {
        Self {
            loc,
            msg: msg.into(),
            category,
            error_type: error_type.into(),
        }
    }

    /// A required field is absent.
    pub fn missing(loc: Vec<PathSegment>) -> Self {
        Self::new(loc, "field required", ErrorCategory::Missing, "value_error.missing")
    }

    pub fn wrong_type(
        loc: Vec<PathSegment>,
        msg: impl Into<String>,
        error_type: impl Into<String>,
    ) -> Self {
        Self::new(loc, msg, ErrorCategory::WrongType, error_type)
    }

    pub fn custom(
        loc: Vec<PathSegment>,
        msg: impl Into<String>,
        error_type: impl Into<String>,
    ) -> Self {
        Self::new(loc, msg, ErrorCategory::Custom, error_type)
    }

    /// The metadata names a schema version the oracle does not know.
    ///
    /// `None` is echoed as the literal `None`.
    pub fn version_not_allowed(version: Option<&str>, allowed: &[String]) -> Self {
        Self::custom(
            vec![PathSegment::from("schemaVersion")],
            format!(
                "Metadata version {} is not allowed. Allowed are: {}.",
                version.unwrap_or("None"),
                allowed.join(", ")
            ),
            VERSION_NOT_ALLOWED,
        )
    }

    pub fn is_version_rejection(&self) -> bool {
        self.error_type == VERSION_NOT_ALLOWED
    }

    /// Field path, segments joined with ` -> `.
    pub fn path(&self) -> String {
        self.loc
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n  {} (type={})", self.path(), self.msg, self.error_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_path() {
        let err = FieldError::missing(vec!["contributor".into(), 0.into(), "name".into()]);
        assert_eq!(err.path(), "contributor -> 0 -> name");
        assert_eq!(
            err.to_string(),
            "contributor -> 0 -> name\n  field required (type=value_error.missing)"
        );
    }

    #[test]
    fn test_version_rejection_message() {
        let allowed = vec!["0.5.1".to_string(), "0.6.0".to_string()];
        let err = FieldError::version_not_allowed(None, &allowed);
        assert_eq!(
            err.msg,
            "Metadata version None is not allowed. Allowed are: 0.5.1, 0.6.0."
        );
        assert!(err.is_version_rejection());
        assert_eq!(err.category, ErrorCategory::Custom);
        assert_eq!(err.path(), "schemaVersion");
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&ErrorCategory::ChildInvalid).unwrap();
        assert_eq!(json, "\"child-invalid\"");
        assert_eq!(ErrorCategory::WrongType.as_str(), "wrong-type");
    }
}
