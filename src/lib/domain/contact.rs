//! Contact form submissions: validation, rendering and response messages

mod errors;
mod messages;
mod render;
mod submission;

pub use errors::ValidationError;
pub use messages::{format_message, ResponseMessages};
pub use render::{build_html, build_text, escape_html};
pub use submission::{
    FieldValue, FormSubmission, MAX_EXTRA_FIELD_LIMIT, REQUIRED_FIELDS, RESERVED_FIELDS,
};
