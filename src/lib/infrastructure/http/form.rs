//! Contact form request bodies

use axum::{
    async_trait,
    body::to_bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};
use http_body_util::LengthLimitError;
use serde_json::Value;
use tracing::debug;

use crate::{
    domain::contact::{FieldValue, FormSubmission},
    infrastructure::http::errors::ApiError,
};

/// Maximum size of a url-encoded body
pub const FORM_BODY_LIMIT: usize = 50 * 1024;

/// Maximum size of a JSON body
pub const JSON_BODY_LIMIT: usize = 100 * 1024;

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

impl BodyKind {
    fn of(headers: &HeaderMap) -> Self {
        let mime = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if mime == "application/json" || mime.ends_with("+json") {
            BodyKind::Json
        } else if mime == "application/x-www-form-urlencoded" {
            BodyKind::Form
        } else {
            BodyKind::Other
        }
    }
}

/// A form submission read from a JSON or url-encoded body.
///
/// Bodies of any other content type yield an empty submission, which then
/// fails validation on its required fields.
#[derive(Debug)]
pub struct ContactForm(pub FormSubmission);

#[async_trait]
impl<S> FromRequest<S> for ContactForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let kind = BodyKind::of(req.headers());

        let limit = match kind {
            BodyKind::Json => JSON_BODY_LIMIT,
            BodyKind::Form => FORM_BODY_LIMIT,
            BodyKind::Other => return Ok(Self(FormSubmission::default())),
        };

        let bytes = to_bytes(req.into_body(), limit)
            .await
            .map_err(body_error)?;

        let submission = match kind {
            BodyKind::Json => from_json(&bytes)?,
            _ => from_form(&bytes)?,
        };

        Ok(Self(submission))
    }
}

fn body_error(err: axum::Error) -> ApiError {
    let err = err.into_inner();

    if err.is::<LengthLimitError>() {
        return ApiError::new_413("Request body too large");
    }

    debug!(error = %err, "could not read request body");
    ApiError::new_400("Could not read request body")
}

fn field_value(value: Value) -> FieldValue {
    match value {
        Value::String(text) => FieldValue::Text(text),
        _ => FieldValue::Structured,
    }
}

fn from_json(bytes: &[u8]) -> Result<FormSubmission, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(FormSubmission::default());
    }

    let value: Value =
        serde_json::from_slice(bytes).map_err(|_| ApiError::new_400("Invalid JSON body"))?;

    Ok(match value {
        Value::Object(fields) => FormSubmission::new(
            fields
                .into_iter()
                .map(|(name, value)| (name, field_value(value))),
        ),
        _ => FormSubmission::default(),
    })
}

/// Repeated names and bracketed names (`tags[]`, `a[b]`) become structured
/// values under their base name.
fn from_form(bytes: &[u8]) -> Result<FormSubmission, ApiError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(bytes)
        .map_err(|_| ApiError::new_400("Invalid form body"))?;

    let mut submission = FormSubmission::default();

    for (name, value) in pairs {
        let base = name
            .strip_suffix(']')
            .and_then(|name| name.split_once('['))
            .map(|(base, _)| base.to_string())
            .filter(|base| !base.is_empty());

        if let Some(base) = base {
            submission.insert(base, FieldValue::Structured);
        } else if submission.get(&name).is_some() {
            submission.insert(name, FieldValue::Structured);
        } else {
            submission.insert(name, FieldValue::Text(value));
        }
    }

    Ok(submission)
}
