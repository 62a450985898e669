//! Email addresses, mail composition and delivery

pub mod addresses;
pub mod delivery;
pub mod mailer;
