//! Mailer module

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::mock;

mod errors;
mod message;

pub use errors::MailerError;
pub use message::MailOptions;

/// The transport that delivered a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    /// The Brevo transactional email API
    Brevo,

    /// A direct SMTP session
    Smtp,
}

/// The outcome of a successful delivery
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryResult {
    /// The transport that accepted the message
    pub method: DeliveryMethod,

    /// The identifier assigned to the message, if any
    pub message_id: Option<String>,

    /// The recipients accepted by the transport, when it reports them
    pub accepted: Option<Vec<String>>,
}

/// A mail transport
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Deliver a message
    ///
    /// # Arguments
    /// * `options` - The [`MailOptions`] describing the message.
    ///
    /// # Returns
    /// A [`DeliveryResult`] on success, or a [`MailerError`] describing why
    /// the transport could not deliver the message.
    async fn deliver(&self, options: &MailOptions) -> Result<DeliveryResult, MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn deliver(&self, options: &MailOptions) -> Result<DeliveryResult, MailerError>;
    }
}
