//! Pairing address composition and field validation
//!
//! The pairing form collects the host and the port in two separate fields.
//! [`AddressJoin`] decides how they are combined into the address carried
//! by a [`PairingSubmission`](crate::PairingSubmission), and the `validate_*`
//! helpers check each field before a submission is sent.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use thiserror::Error;

/// Maximum length of the port field
pub const PORT_MAX_LEN: usize = 5;

/// Exact length of a pairing code
pub const PAIRING_CODE_LEN: usize = 6;

/// How the host and port fields are combined into one address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressJoin {
    /// `host:port`, with IPv6 hosts bracketed (`[fe80::1]:5555`)
    #[default]
    Separator,
    /// `host` immediately followed by `port`, without anything in between
    Literal,
}

impl AddressJoin {
    /// Combine raw host and port text according to this policy
    ///
    /// Used when validation is off, so the text is passed on unchecked.
    pub fn join(self, host: &str, port: &str) -> String {
        match self {
            AddressJoin::Literal => format!("{}{}", host, port),
            AddressJoin::Separator => {
                if host.contains(':') && !host.starts_with('[') {
                    format!("[{}]:{}", host, port)
                } else {
                    format!("{}:{}", host, port)
                }
            }
        }
    }

    /// Combine a validated host and port according to this policy
    ///
    /// `Separator` always yields text that parses back as a [`SocketAddr`].
    pub fn join_validated(self, form: &ValidatedForm) -> String {
        match self {
            AddressJoin::Literal => format!("{}{}", form.ip, form.port),
            AddressJoin::Separator => SocketAddr::new(form.ip, form.port).to_string(),
        }
    }
}

/// Field values that passed validation, normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub ip: IpAddr,
    pub port: u16,
    pub pairing_code: String,
}

/// Which form field a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Ip,
    Port,
    PairingCode,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::Ip => "IP address",
            Field::Port => "port",
            Field::PairingCode => "pairing code",
        };
        f.write_str(name)
    }
}

/// A rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Empty(Field),

    #[error("'{0}' is not a valid IP address")]
    InvalidIp(String),

    #[error("'{0}' is not a port number between 1 and 65535")]
    InvalidPort(String),

    #[error("pairing code must be {} digits", PAIRING_CODE_LEN)]
    InvalidPairingCode,
}

impl FieldError {
    /// The field this error belongs to
    pub fn field(&self) -> Field {
        match self {
            FieldError::Empty(field) => *field,
            FieldError::InvalidIp(_) => Field::Ip,
            FieldError::InvalidPort(_) => Field::Port,
            FieldError::InvalidPairingCode => Field::PairingCode,
        }
    }
}

/// Validate the host field: an IPv4 or IPv6 literal
///
/// One pair of brackets is accepted around an IPv6 literal (`[fe80::1]`).
pub fn validate_ip(text: &str) -> Result<IpAddr, FieldError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Empty(Field::Ip));
    }
    let invalid = || FieldError::InvalidIp(trimmed.to_string());
    match trimmed.strip_prefix('[') {
        Some(bracketed) => bracketed
            .strip_suffix(']')
            .and_then(|inner| inner.parse::<Ipv6Addr>().ok())
            .map(IpAddr::V6)
            .ok_or_else(invalid),
        None => trimmed.parse::<IpAddr>().map_err(|_| invalid()),
    }
}

/// Validate the port field: decimal, 1..=65535
pub fn validate_port(text: &str) -> Result<u16, FieldError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Empty(Field::Port));
    }
    if trimmed.len() > PORT_MAX_LEN || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::InvalidPort(trimmed.to_string()));
    }
    match trimmed.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(FieldError::InvalidPort(trimmed.to_string())),
    }
}

/// Validate the pairing code: exactly six ASCII digits
pub fn validate_pairing_code(text: &str) -> Result<(), FieldError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Empty(Field::PairingCode));
    }
    if trimmed.len() != PAIRING_CODE_LEN || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::InvalidPairingCode);
    }
    Ok(())
}

/// Validate all three fields, collecting every failure in field order
pub fn validate_form(
    ip: &str,
    port: &str,
    pairing_code: &str,
) -> Result<ValidatedForm, Vec<FieldError>> {
    match (
        validate_ip(ip),
        validate_port(port),
        validate_pairing_code(pairing_code),
    ) {
        (Ok(ip), Ok(port), Ok(())) => Ok(ValidatedForm {
            ip,
            port,
            pairing_code: pairing_code.trim().to_string(),
        }),
        (ip, port, code) => Err([ip.err(), port.err(), code.err()]
            .into_iter()
            .flatten()
            .collect()),
    }
}
