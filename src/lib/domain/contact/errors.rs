//! Validation errors

use thiserror::Error;

/// Errors that can occur when validating a form submission
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Required fields are absent, blank or not text
    #[error("missing required fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<String>),

    /// A field holds something other than text
    #[error("all fields must be strings")]
    InvalidFieldType,

    /// More extra fields than allowed
    #[error("only {limit} extra fields are allowed")]
    TooManyExtraFields {
        /// The configured limit
        limit: usize,
    },
}
