//! Domain logic: contact form handling and mail delivery

pub mod communication;
pub mod contact;
