//! Delivery service: the Brevo API first, SMTP as the fallback

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info, warn};

#[cfg(test)]
use mockall::mock;

use super::mailer::{DeliveryResult, MailOptions, Mailer, MailerError};

/// Errors that can occur when delivering a message
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Every available transport failed
    #[error("could not deliver the message")]
    DeliveryFailed(#[source] MailerError),
}

/// Delivers composed messages by any available means
#[async_trait]
pub trait DeliveryService: Clone + Send + Sync + 'static {
    /// Sends a message.
    ///
    /// # Arguments
    /// * `options` - The [`MailOptions`] to deliver.
    ///
    /// # Returns
    /// The [`DeliveryResult`] of the transport that accepted the message, or a
    /// [`DeliveryError`] once every transport has been tried.
    async fn send(&self, options: &MailOptions) -> Result<DeliveryResult, DeliveryError>;
}

#[cfg(test)]
mock! {
    pub DeliveryService {}

    impl Clone for DeliveryService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl DeliveryService for DeliveryService {
        async fn send(&self, options: &MailOptions) -> Result<DeliveryResult, DeliveryError>;
    }
}

/// Delivery service implementation
///
/// Tries the primary transport when one is configured. Any primary failure is
/// logged and the fallback transport is tried next; only the fallback's error
/// is surfaced.
#[derive(Clone)]
pub struct DeliveryServiceImpl<P, S>
where
    P: Mailer,
    S: Mailer,
{
    primary: Option<Arc<P>>,
    fallback: Arc<S>,
}

impl<P, S> DeliveryServiceImpl<P, S>
where
    P: Mailer,
    S: Mailer,
{
    /// Creates a new delivery service.
    pub fn new(primary: Option<Arc<P>>, fallback: Arc<S>) -> Self {
        Self { primary, fallback }
    }
}

impl<P, S> fmt::Debug for DeliveryServiceImpl<P, S>
where
    P: Mailer,
    S: Mailer,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryServiceImpl")
            .field("primary", &self.primary.as_ref().map(|_| "Mailer"))
            .field("fallback", &"Mailer")
            .finish()
    }
}

#[async_trait]
impl<P, S> DeliveryService for DeliveryServiceImpl<P, S>
where
    P: Mailer,
    S: Mailer,
{
    async fn send(&self, options: &MailOptions) -> Result<DeliveryResult, DeliveryError> {
        if let Some(primary) = &self.primary {
            match primary.deliver(options).await {
                Ok(result) => {
                    info!(method = ?result.method, message_id = ?result.message_id, "message delivered");

                    return Ok(result);
                }
                Err(err) => warn!(error = %err, "primary delivery failed, falling back to SMTP"),
            }
        }

        match self.fallback.deliver(options).await {
            Ok(result) => {
                info!(method = ?result.method, message_id = ?result.message_id, "message delivered");

                Ok(result)
            }
            Err(err) => {
                error!(error = %err, "fallback delivery failed");

                Err(DeliveryError::DeliveryFailed(err))
            }
        }
    }
}
