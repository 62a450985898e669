//! HTTP Server

use std::{
    net::{IpAddr, SocketAddr, TcpListener},
    time::Duration,
};

use anyhow::{Context, Result};
use axum::{
    extract::Request,
    middleware,
    routing::{get, post},
    Json, Router,
};
use axum_server::Handle;
use clap::{value_parser, Parser};
use handlers::{environment, health, not_found, panic_handler, send_email};
use open_api::ApiDocs;
use tokio::signal;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{debug, info, info_span};
use utoipa::OpenApi;

use crate::domain::communication::delivery::DeliveryService;

use self::state::AppState;

mod cors;
mod errors;
mod form;
mod handlers;
mod open_api;
pub mod state;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct HttpServerConfig {
    /// The address to listen on
    #[arg(long = "api-host", env = "API_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// The port to listen on
    #[arg(
        short,
        long = "api-port",
        env = "API_PORT",
        default_value = "7522",
        value_parser = value_parser!(u16).range(1..)
    )]
    pub port: u16,
}

/// The application's HTTP server
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the address specified in `config`.
    pub fn new<D: DeliveryService>(
        config: &HttpServerConfig,
        state: AppState<D>,
    ) -> Result<Self> {
        let address = SocketAddr::new(config.host, config.port);

        let listener = TcpListener::bind(address)
            .with_context(|| format!("failed to listen on {address}"))?;
        listener
            .set_nonblocking(true)
            .context("failed to configure listener")?;

        Ok(Self {
            router: router(state),
            listener,
        })
    }

    /// Runs the HTTP server until a shutdown signal arrives.
    #[mutants::skip]
    pub async fn run(self) -> Result<()> {
        info!(
            "API listening on http://{}",
            self.listener
                .local_addr()
                .context("failed to get local address")?
        );

        let handle = Handle::new();

        tokio::spawn(shutdown_signal(handle.clone()));

        axum_server::from_tcp(self.listener)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await
            .context("server error")?;

        info!("HTTP server stopped");

        Ok(())
    }
}

/// Create the application's router
pub fn router<D: DeliveryService>(state: AppState<D>) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let uri = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    let allow_origin = state.config.cors_allow_origin.clone();

    Router::new()
        .route(
            "/api/email",
            post(send_email::handler::<D>).fallback(not_found::handler::<D>),
        )
        .route(
            "/send",
            post(send_email::handler::<D>).fallback(not_found::handler::<D>),
        )
        .route(
            "/health",
            get(health::handler).fallback(not_found::handler::<D>),
        )
        .route(
            "/env",
            get(environment::handler::<D>).fallback(not_found::handler::<D>),
        )
        .route(
            "/api/openapi.json",
            get(Json(ApiDocs::openapi())).fallback(not_found::handler::<D>),
        )
        .fallback(not_found::handler::<D>)
        .layer(CatchPanicLayer::custom(panic_handler))
        .layer(middleware::from_fn_with_state(
            allow_origin,
            cors::cors_headers,
        ))
        .layer(trace_layer)
        .with_state(state)
}

#[mutants::skip]
async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    debug!("shutting down gracefully");
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
