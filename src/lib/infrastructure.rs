//! Adapters: mail transports and the HTTP server

pub mod email;
pub mod http;
