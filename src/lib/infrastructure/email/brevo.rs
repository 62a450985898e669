//! Brevo transactional email API
//!
//! See <https://developers.brevo.com/reference/sendtransacemail>

use std::fmt;

use async_trait::async_trait;
use clap::Parser;
use reqwest::{header::ACCEPT, Client};
use serde::{Deserialize, Serialize};

use crate::domain::communication::{
    addresses::Address,
    mailer::{DeliveryMethod, DeliveryResult, MailOptions, Mailer, MailerError},
};

const BREVO_BASE_URL: &str = "https://api.brevo.com/v3";
const BREVO_SEND_ENDPOINT: &str = "/smtp/email";

/// Brevo configuration
#[derive(Clone, Debug, Parser)]
pub struct BrevoConfig {
    /// The Brevo API key, Brevo is skipped when unset or blank
    #[clap(long = "brevo-api-key", env = "BREVO_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// The Brevo API base URL
    #[clap(long = "brevo-api-url", env = "BREVO_API_URL", default_value = BREVO_BASE_URL)]
    pub base_url: String,
}

#[derive(Debug, Serialize)]
struct BrevoContact {
    email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl From<&Address> for BrevoContact {
    fn from(address: &Address) -> Self {
        Self {
            email: address.email.clone(),
            name: address.name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoRequest {
    sender: BrevoContact,
    to: Vec<BrevoContact>,
    subject: String,
    html_content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    text_content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<BrevoContact>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrevoResponse {
    message_id: Option<String>,

    #[serde(default)]
    message_ids: Vec<String>,
}

/// Brevo mailer
#[derive(Clone)]
pub struct BrevoMailer {
    api_key: String,
    base_url: String,
    client: Client,
}

impl BrevoMailer {
    /// Create a new Brevo mailer
    pub fn new(api_key: &str, base_url: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a Brevo mailer if an API key is configured
    pub fn from_config(config: &BrevoConfig) -> Option<Self> {
        config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| Self::new(key, &config.base_url))
    }

    fn build_request(options: &MailOptions) -> Result<BrevoRequest, MailerError> {
        if options.from.is_empty() {
            return Err(MailerError::MissingSender);
        }

        if options.to.is_empty() {
            return Err(MailerError::NoValidRecipients);
        }

        Ok(BrevoRequest {
            sender: BrevoContact::from(&options.from),
            to: options.to.iter().map(BrevoContact::from).collect(),
            subject: options.subject.clone(),
            html_content: options.html.clone(),
            text_content: Some(options.text.clone()).filter(|text| !text.is_empty()),
            reply_to: options
                .reply_to
                .as_ref()
                .filter(|address| !address.is_empty())
                .map(BrevoContact::from),
        })
    }
}

impl fmt::Debug for BrevoMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrevoMailer")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Mailer for BrevoMailer {
    async fn deliver(&self, options: &MailOptions) -> Result<DeliveryResult, MailerError> {
        let request = Self::build_request(options)?;

        let response = self
            .client
            .post(format!("{}{}", self.base_url, BREVO_SEND_ENDPOINT))
            .header(ACCEPT, "application/json")
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| MailerError::UnknownError(err.into()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(MailerError::ApiRejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: BrevoResponse = response.json().await.unwrap_or_default();
        let message_id = body
            .message_id
            .or_else(|| body.message_ids.into_iter().next());

        Ok(DeliveryResult {
            method: DeliveryMethod::Brevo,
            message_id,
            accepted: None,
        })
    }
}
