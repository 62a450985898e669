//! Email addresses

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NAMED_ADDRESS_REGEX: Regex = Regex::new(r"^(.*)<([^<>]+)>$").unwrap();
}

/// An email address with an optional display name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Address {
    /// The email address itself, empty if none could be parsed
    pub email: String,

    /// The display name
    pub name: Option<String>,
}

impl Address {
    /// Create a new address
    pub fn new(email: &str, name: Option<&str>) -> Self {
        Self {
            email: email.to_string(),
            name: name.filter(|n| !n.is_empty()).map(str::to_string),
        }
    }

    /// Whether the address carries an email
    pub fn is_empty(&self) -> bool {
        self.email.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => write!(f, "{}", self.email),
        }
    }
}

/// Raw input for an address list
#[derive(Clone, Copy, Debug)]
pub enum AddressInput<'a> {
    /// A single string, possibly holding several comma-separated addresses
    Single(&'a str),

    /// One address per element
    List(&'a [String]),
}

impl<'a> From<&'a str> for AddressInput<'a> {
    fn from(raw: &'a str) -> Self {
        AddressInput::Single(raw)
    }
}

impl<'a> From<&'a [String]> for AddressInput<'a> {
    fn from(raw: &'a [String]) -> Self {
        AddressInput::List(raw)
    }
}

fn strip_quotes(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'').trim()
}

/// Parses `Display Name <email@host>` or a bare email address.
///
/// Never fails: input that yields no email produces an [`Address`] with an
/// empty `email`, which callers are expected to filter out.
pub fn parse_address(raw: &str) -> Address {
    let trimmed = raw.trim();

    if let Some(captures) = NAMED_ADDRESS_REGEX.captures(trimmed) {
        let name = strip_quotes(captures[1].trim());
        let email = captures[2].trim();

        return Address::new(email, Some(name));
    }

    let without_brackets: String = trimmed.chars().filter(|c| *c != '<' && *c != '>').collect();

    Address::new(strip_quotes(&without_brackets), None)
}

/// Parses a list of addresses, silently dropping entries without an email.
pub fn parse_address_list<'a>(raw: impl Into<AddressInput<'a>>) -> Vec<Address> {
    let parts: Vec<&str> = match raw.into() {
        AddressInput::Single(raw) if raw.is_empty() => return Vec::new(),
        AddressInput::Single(raw) => raw.split(',').collect(),
        AddressInput::List(raw) => raw.iter().map(String::as_str).collect(),
    };

    parts
        .into_iter()
        .map(parse_address)
        .filter(|address| !address.is_empty())
        .collect()
}
