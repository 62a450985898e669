//! Email message

use crate::domain::communication::addresses::{parse_address, parse_address_list, Address};

/// A fully composed message, ready to hand to a transport
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailOptions {
    /// The sender
    pub from: Address,

    /// The recipients
    pub to: Vec<Address>,

    /// Where replies should go
    pub reply_to: Option<Address>,

    /// The subject of the email
    pub subject: String,

    /// The HTML body of the email
    pub html: String,

    /// The plain text body of the email
    pub text: String,
}

impl MailOptions {
    /// Compose a message from raw address strings.
    ///
    /// `to` may hold several comma-separated addresses. Addresses without an
    /// email are dropped, and an empty `reply_to` is omitted.
    pub fn new(
        from: &str,
        to: &str,
        reply_to: &str,
        subject: impl Into<String>,
        html: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let reply_to = parse_address(reply_to);

        Self {
            from: parse_address(from),
            to: parse_address_list(to),
            reply_to: (!reply_to.is_empty()).then_some(reply_to),
            subject: subject.into(),
            html: html.into(),
            text: text.into(),
        }
    }
}
