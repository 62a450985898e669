//! Mail transports

pub mod brevo;
pub mod smtp;
