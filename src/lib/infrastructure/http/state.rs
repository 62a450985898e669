//! Application state module

use std::{fmt, sync::Arc};

use axum::http::{header::InvalidHeaderValue, HeaderValue};
use clap::{value_parser, Parser};

use crate::{
    domain::{
        communication::delivery::DeliveryService,
        contact::{ResponseMessages, MAX_EXTRA_FIELD_LIMIT},
    },
    infrastructure::email::smtp::SMTPConfig,
};

/// Contact form configuration
#[derive(Clone, Debug, Parser)]
pub struct ContactConfig {
    /// How many fields beyond the required ones a submission may carry
    #[arg(
        long,
        env = "EXTRA_FIELD_LIMIT",
        default_value = "30",
        value_parser = value_parser!(u8).range(0..=i64::from(MAX_EXTRA_FIELD_LIMIT))
    )]
    pub extra_field_limit: u8,

    /// Prefix of the subject of every relayed email
    #[arg(long, env = "SUBJECT_PREFIX", default_value = "Nuevo mensaje de formulario")]
    pub subject_prefix: String,

    /// Value of the `Access-Control-Allow-Origin` header
    #[arg(long, env = "CORS_ALLOW_ORIGIN", default_value = "*", value_parser = parse_header_value)]
    pub cors_allow_origin: HeaderValue,

    /// Name of the environment variable exposed by `GET /env`
    #[arg(long, env = "ECHO_VARIABLE", default_value = "envar1")]
    pub echo_variable: String,
}

fn parse_header_value(raw: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(raw.trim())
}

/// Overrides for the messages returned to clients, blank values are ignored
#[derive(Clone, Debug, Default, Parser)]
pub struct MessagesConfig {
    /// Success message for delivery through Brevo
    #[arg(long, env = "MESSAGE_SUCCESS_BREVO")]
    pub message_success_brevo: Option<String>,

    /// Success message for delivery through SMTP
    #[arg(long, env = "MESSAGE_SUCCESS_SMTP")]
    pub message_success_smtp: Option<String>,

    /// Missing fields message, `%fields%` is replaced by the field names
    #[arg(long, env = "MESSAGE_ERROR_MISSING_REQUIRED")]
    pub message_error_missing_required: Option<String>,

    /// Non-string field message
    #[arg(long, env = "MESSAGE_ERROR_INVALID_TYPE")]
    pub message_error_invalid_type: Option<String>,

    /// Extra field limit message, `%limit%` is replaced by the limit
    #[arg(long, env = "MESSAGE_ERROR_EXTRA_LIMIT")]
    pub message_error_extra_limit: Option<String>,

    /// Delivery failure message
    #[arg(long, env = "MESSAGE_ERROR_SEND")]
    pub message_error_send: Option<String>,

    /// Unknown route message
    #[arg(long, env = "MESSAGE_ERROR_NOT_FOUND")]
    pub message_error_not_found: Option<String>,
}

fn message_or(value: Option<String>, default: String) -> String {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
}

impl From<MessagesConfig> for ResponseMessages {
    fn from(config: MessagesConfig) -> Self {
        let defaults = ResponseMessages::default();

        Self {
            success_brevo: message_or(config.message_success_brevo, defaults.success_brevo),
            success_smtp: message_or(config.message_success_smtp, defaults.success_smtp),
            missing_required: message_or(
                config.message_error_missing_required,
                defaults.missing_required,
            ),
            invalid_type: message_or(config.message_error_invalid_type, defaults.invalid_type),
            extra_limit: message_or(config.message_error_extra_limit, defaults.extra_limit),
            send_error: message_or(config.message_error_send, defaults.send_error),
            not_found: message_or(config.message_error_not_found, defaults.not_found),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// The sender of relayed emails
    pub sender: String,

    /// The recipients of relayed emails, comma separated
    pub recipient: String,

    /// Prefix of every subject
    pub subject_prefix: String,

    /// Maximum number of extra fields
    pub extra_field_limit: usize,

    /// Value of the `Access-Control-Allow-Origin` header
    pub cors_allow_origin: HeaderValue,

    /// Messages returned to clients
    pub messages: ResponseMessages,

    /// Name and startup value of the echoed environment variable
    pub echo: (String, String),
}

impl AppConfig {
    /// Build the configuration from the parsed command line.
    ///
    /// The echoed environment variable is read once, here.
    pub fn new(contact: ContactConfig, messages: MessagesConfig, smtp: &SMTPConfig) -> Self {
        let echo_value = std::env::var(&contact.echo_variable).unwrap_or_default();

        Self {
            sender: smtp.sender.clone(),
            recipient: smtp.recipient.clone(),
            subject_prefix: contact.subject_prefix,
            extra_field_limit: usize::from(contact.extra_field_limit),
            cors_allow_origin: contact.cors_allow_origin,
            messages: messages.into(),
            echo: (contact.echo_variable, echo_value),
        }
    }
}

/// Global application state
#[derive(Clone)]
pub struct AppState<D: DeliveryService> {
    /// The application configuration
    pub config: AppConfig,

    /// Delivery service
    pub delivery: Arc<D>,
}

impl<D> AppState<D>
where
    D: DeliveryService,
{
    /// Create a new application state
    pub fn new(config: AppConfig, delivery: D) -> Self {
        Self {
            config,
            delivery: Arc::new(delivery),
        }
    }
}

impl<D> fmt::Debug for AppState<D>
where
    D: DeliveryService,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("delivery", &"DeliveryService")
            .finish()
    }
}
