#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Contact form relay server

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use contact_relay::{
    domain::communication::delivery::DeliveryServiceImpl,
    infrastructure::{
        email::{
            brevo::{BrevoConfig, BrevoMailer},
            smtp::{SMTPConfig, SMTPMailer},
        },
        http::{
            state::{AppConfig, AppState, ContactConfig, MessagesConfig},
            HttpServer, HttpServerConfig,
        },
    },
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The contact form configuration
    #[clap(flatten)]
    pub contact: ContactConfig,

    /// The SMTP configuration
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// The Brevo configuration
    #[clap(flatten)]
    pub brevo: BrevoConfig,

    /// Response message overrides
    #[clap(flatten)]
    pub messages: MessagesConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let smtp = Arc::new(SMTPMailer::new(&args.smtp)?);
    let brevo = BrevoMailer::from_config(&args.brevo).map(Arc::new);

    match &brevo {
        Some(_) => info!("delivering through Brevo with SMTP as fallback"),
        None => info!("no Brevo API key configured, delivering through SMTP only"),
    }

    let config = AppConfig::new(args.contact, args.messages, &args.smtp);
    debug!(?config, "configuration loaded");

    let state = AppState::new(config, DeliveryServiceImpl::new(brevo, smtp));

    HttpServer::new(&args.server, state)?.run().await
}
