//! Form submissions and their validation

use super::ValidationError;

/// Fields every submission must carry, in the order they are rendered
pub const REQUIRED_FIELDS: [&str; 5] = ["remitente", "nombre", "correo", "telefono", "mensaje"];

/// Legacy field names that are accepted but neither rendered nor counted as extra
pub const RESERVED_FIELDS: [&str; 4] = ["name", "phone", "email", "message"];

/// Upper bound for the configurable extra field limit
pub const MAX_EXTRA_FIELD_LIMIT: u8 = 30;

/// The value of a submitted field
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// Plain text
    Text(String),

    /// Anything else: numbers, lists, nested objects, repeated keys
    Structured,
}

impl FieldValue {
    fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Structured => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

/// A contact form submission, in the order the fields were received
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormSubmission {
    fields: Vec<(String, FieldValue)>,
}

impl FormSubmission {
    /// Create a submission from its fields.
    ///
    /// A repeated name replaces the earlier value but keeps its position.
    pub fn new(fields: impl IntoIterator<Item = (String, FieldValue)>) -> Self {
        let mut submission = Self::default();

        for (name, value) in fields {
            submission.insert(name, value);
        }

        submission
    }

    /// Set a field, replacing any earlier value under the same name
    pub fn insert(&mut self, name: String, value: FieldValue) {
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Look a field up by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Returns the trimmed text of a field, if it is text
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text).map(str::trim)
    }

    /// Validate the submission.
    ///
    /// Checks, in order: required fields are non-blank text, every field is
    /// text, and no more than `extra_field_limit` extra fields are present.
    ///
    /// # Returns
    /// The required fields in canonical order followed by the extra fields in
    /// submission order, all trimmed.
    pub fn validate(
        &self,
        extra_field_limit: usize,
    ) -> Result<Vec<(String, String)>, ValidationError> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|name| self.text(name).map_or(true, str::is_empty))
            .map(|name| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(ValidationError::MissingRequiredFields(missing));
        }

        if self.fields.iter().any(|(_, value)| value.as_text().is_none()) {
            return Err(ValidationError::InvalidFieldType);
        }

        let extra: Vec<(&str, &str)> = self
            .fields
            .iter()
            .filter(|(name, _)| !is_reserved(name))
            .filter_map(|(name, value)| Some((name.as_str(), value.as_text()?)))
            .collect();

        if extra.len() > extra_field_limit {
            return Err(ValidationError::TooManyExtraFields {
                limit: extra_field_limit,
            });
        }

        let required = REQUIRED_FIELDS
            .iter()
            .filter_map(|name| Some((name.to_string(), self.text(name)?.to_string())));

        let extra = extra
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.trim().to_string()));

        Ok(required.chain(extra).collect())
    }
}

fn is_reserved(name: &str) -> bool {
    REQUIRED_FIELDS.contains(&name) || RESERVED_FIELDS.contains(&name)
}
