//! SMTP email service implementation

use std::{fmt, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use clap::{builder::NonEmptyStringValueParser, ArgAction, Parser};
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters, TlsVersion},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::warn;
use uuid::Uuid;

use crate::domain::communication::{
    addresses::Address,
    mailer::{DeliveryMethod, DeliveryResult, MailOptions, Mailer, MailerError},
};

/// SMTP configuration
#[derive(Clone, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST", value_parser = NonEmptyStringValueParser::new())]
    pub host: String,

    /// The SMTP port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// The SMTP username
    #[clap(long = "smtp-user", env = "SMTP_USER", value_parser = NonEmptyStringValueParser::new())]
    pub username: String,

    /// The SMTP password
    #[clap(
        long = "smtp-pass",
        env = "SMTP_PASS",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub password: String,

    /// The sender, e.g. `Website <web@example.com>`
    #[clap(long = "smtp-from", env = "SMTP_FROM", value_parser = NonEmptyStringValueParser::new())]
    pub sender: String,

    /// The recipients, comma separated
    #[clap(long = "smtp-to", env = "SMTP_TO", value_parser = NonEmptyStringValueParser::new())]
    pub recipient: String,

    /// Verify the TLS certificate
    #[clap(
        long = "smtp-verify-tls",
        env = "SMTP_VERIFY_TLS",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub verify_tls: bool,
}

/// SMTP mailer
///
/// Holds one pooled transport for the lifetime of the process. STARTTLS is
/// required and TLS 1.2 is the minimum accepted version.
#[derive(Clone)]
pub struct SMTPMailer {
    host: String,
    port: u16,
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: &SMTPConfig) -> Result<Self> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let tls = TlsParameters::builder(config.host.clone())
            .dangerous_accept_invalid_certs(!config.verify_tls)
            .set_min_tls_version(TlsVersion::Tlsv12)
            .build()?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .tls(Tls::Required(tls))
            .credentials(credentials)
            .build();

        Ok(Self {
            host: config.host.clone(),
            port: config.port,
            transport: Arc::new(transport),
        })
    }
}

impl fmt::Debug for SMTPMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SMTPMailer")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

fn mailbox(address: &Address) -> Result<Mailbox, MailerError> {
    let email = address
        .email
        .parse()
        .map_err(|_| MailerError::InvalidAddress(address.email.clone()))?;

    Ok(Mailbox::new(address.name.clone(), email))
}

fn message_id(from: &Address) -> String {
    let domain = from
        .email
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
        .unwrap_or("localhost");

    format!("<{}@{}>", Uuid::now_v7(), domain)
}

fn build_message(options: &MailOptions, message_id: &str) -> Result<Message, MailerError> {
    if options.to.is_empty() {
        return Err(MailerError::NoRecipientsAccepted);
    }

    let mut builder = Message::builder()
        .from(mailbox(&options.from)?)
        .subject(options.subject.clone())
        .message_id(Some(message_id.to_string()));

    for recipient in &options.to {
        builder = builder.to(mailbox(recipient)?);
    }

    if let Some(reply_to) = &options.reply_to {
        match mailbox(reply_to) {
            Ok(mailbox) => builder = builder.reply_to(mailbox),
            Err(err) => warn!(error = %err, "leaving out the Reply-To header"),
        }
    }

    builder
        .multipart(MultiPart::alternative_plain_html(
            options.text.clone(),
            options.html.clone(),
        ))
        .map_err(|err| MailerError::UnknownError(err.into()))
}

#[async_trait]
impl Mailer for SMTPMailer {
    async fn deliver(&self, options: &MailOptions) -> Result<DeliveryResult, MailerError> {
        let message_id = message_id(&options.from);
        let message = build_message(options, &message_id)?;

        let accepted: Vec<String> = message
            .envelope()
            .to()
            .iter()
            .map(ToString::to_string)
            .collect();

        self.transport
            .send(message)
            .await
            .map_err(|err| MailerError::UnknownError(err.into()))?;

        Ok(DeliveryResult {
            method: DeliveryMethod::Smtp,
            message_id: Some(message_id),
            accepted: Some(accepted),
        })
    }
}
