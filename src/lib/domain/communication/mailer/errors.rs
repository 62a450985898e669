//! Mailer errors

use thiserror::Error;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// The sender address has no email
    #[error("could not determine the sender address")]
    MissingSender,

    /// No recipient address has an email
    #[error("no valid recipients")]
    NoValidRecipients,

    /// An address could not be used by the transport
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// The mail API answered with a non-success status
    #[error("mail API responded {status}: {body}")]
    ApiRejected {
        /// HTTP status code
        status: u16,

        /// Response body, for diagnostics
        body: String,
    },

    /// The transport did not accept any recipient
    #[error("the SMTP server did not accept any recipient")]
    NoRecipientsAccepted,

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}
