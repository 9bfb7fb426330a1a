//! Rendering of field errors into the stored `validation_error` text.

use std::fmt;

use crate::record::{AssetRef, RecordStatus};
use crate::schema::{ErrorCategory, FieldError, PathSegment};

/// All errors found for one record, in reporting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    model: &'static str,
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn new(model: &'static str, errors: Vec<FieldError>) -> Self {
        Self { model, errors }
    }

    pub fn model(&self) -> &'static str {
        self.model
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Render the report.
    ///
    /// ```text
    /// 2 validation errors for PublishedDandiset
    /// description
    ///   field required (type=value_error.missing)
    /// license
    ///   value is not a valid list (type=type_error.list)
    /// ```
    ///
    /// An empty report renders as the empty string. A rejected schema
    /// version renders as its message alone.
    pub fn render(&self) -> String {
        match self.errors.first() {
            None => String::new(),
            Some(first) if first.is_version_rejection() => first.msg.clone(),
            Some(_) => {
                let n = self.errors.len();
                let mut lines = vec![format!(
                    "{} validation error{} for {}",
                    n,
                    if n == 1 { "" } else { "s" },
                    self.model
                )];
                lines.extend(self.errors.iter().map(ToString::to_string));
                lines.join("\n")
            }
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Aggregate error for children that are not `VALID`, if any.
pub fn child_invalid_error(children: &[AssetRef]) -> Option<FieldError> {
    let bad: Vec<String> = children
        .iter()
        .filter(|child| child.status != RecordStatus::Valid)
        .map(|child| format!("{} ({})", child.id, child.status))
        .collect();
    if bad.is_empty() {
        return None;
    }
    Some(FieldError::new(
        vec![PathSegment::from("assets")],
        format!(
            "{} of {} assets are not valid: {}",
            bad.len(),
            children.len(),
            bad.join(", ")
        ),
        ErrorCategory::ChildInvalid,
        "value_error.child_invalid",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;

    #[test]
    fn test_single_error_header() {
        let report = ValidationReport::new(
            "PublishedAsset",
            vec![FieldError::missing(vec!["encodingFormat".into()])],
        );
        assert_eq!(
            report.render(),
            "1 validation error for PublishedAsset\n\
             encodingFormat\n  field required (type=value_error.missing)"
        );
    }

    #[test]
    fn test_plural_header() {
        let report = ValidationReport::new(
            "PublishedDandiset",
            vec![
                FieldError::missing(vec!["description".into()]),
                FieldError::wrong_type(
                    vec!["license".into()],
                    "value is not a valid list",
                    "type_error.list",
                ),
            ],
        );
        assert_eq!(
            report.render(),
            "2 validation errors for PublishedDandiset\n\
             description\n  field required (type=value_error.missing)\n\
             license\n  value is not a valid list (type=type_error.list)"
        );
    }

    #[test]
    fn test_empty_report() {
        let report = ValidationReport::new("PublishedAsset", Vec::new());
        assert_eq!(report.render(), "");
        assert!(report.is_empty());
    }

    #[test]
    fn test_version_rejection_renders_bare() {
        let allowed = vec!["0.6.0".to_string()];
        let report = ValidationReport::new(
            "PublishedAsset",
            vec![FieldError::version_not_allowed(Some("xxx"), &allowed)],
        );
        assert_eq!(
            report.render(),
            "Metadata version xxx is not allowed. Allowed are: 0.6.0."
        );
    }

    #[test]
    fn test_child_invalid_error() {
        let children = vec![
            AssetRef { id: RecordId::from("a1"), status: RecordStatus::Valid },
            AssetRef { id: RecordId::from("a2"), status: RecordStatus::Invalid },
            AssetRef { id: RecordId::from("a3"), status: RecordStatus::Pending },
        ];
        let err = child_invalid_error(&children).unwrap();
        assert_eq!(err.category, ErrorCategory::ChildInvalid);
        assert_eq!(err.msg, "2 of 3 assets are not valid: a2 (INVALID), a3 (PENDING)");

        assert!(child_invalid_error(&children[..1]).is_none());
        assert!(child_invalid_error(&[]).is_none());
    }
}
