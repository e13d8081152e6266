//! Validation helpers
//!
//! Flattens `validator` failures into field/message pairs, using the same
//! shape the TaskNest API uses for its own validation errors.

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Flattens validation errors into one detail per failed rule
///
/// Details are sorted by field name so output is stable.
pub fn details(errors: &ValidationErrors) -> Vec<ValidationErrorDetail> {
    let mut details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

/// Joins all validation messages into a single line
pub fn summary(errors: &ValidationErrors) -> String {
    details(errors)
        .into_iter()
        .map(|d| d.message)
        .collect::<Vec<_>>()
        .join("; ")
}
