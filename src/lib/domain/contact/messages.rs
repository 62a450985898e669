//! User-facing response messages

use super::ValidationError;

/// Replaces every `%name%` token in `template` with its value.
pub fn format_message(template: &str, replacements: &[(&str, &str)]) -> String {
    replacements
        .iter()
        .fold(template.to_string(), |message, (name, value)| {
            message.replace(&format!("%{name}%"), value)
        })
}

/// Localizable messages returned to clients
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseMessages {
    /// Delivered through the Brevo API
    pub success_brevo: String,

    /// Delivered through SMTP
    pub success_smtp: String,

    /// Required fields are missing, `%fields%` lists them
    pub missing_required: String,

    /// A field is not a string
    pub invalid_type: String,

    /// Too many extra fields, `%limit%` is the limit
    pub extra_limit: String,

    /// Delivery failed
    pub send_error: String,

    /// No such route
    pub not_found: String,
}

impl Default for ResponseMessages {
    fn default() -> Self {
        Self {
            success_brevo: "Correo enviado mediante Brevo.".to_string(),
            success_smtp: "Correo enviado mediante SMTP.".to_string(),
            missing_required: "Faltan campos obligatorios: %fields%".to_string(),
            invalid_type: "Todos los campos deben ser cadenas de texto.".to_string(),
            extra_limit: "Solo se permiten %limit% campos adicionales.".to_string(),
            send_error: "No se pudo enviar el correo electrónico.".to_string(),
            not_found: "Ruta no encontrada.".to_string(),
        }
    }
}

impl ResponseMessages {
    /// Renders the message for a validation error
    pub fn validation_error(&self, err: &ValidationError) -> String {
        match err {
            ValidationError::MissingRequiredFields(fields) => format_message(
                &self.missing_required,
                &[("fields", fields.join(", ").as_str())],
            ),
            ValidationError::InvalidFieldType => self.invalid_type.clone(),
            ValidationError::TooManyExtraFields { limit } => {
                format_message(&self.extra_limit, &[("limit", limit.to_string().as_str())])
            }
        }
    }
}
