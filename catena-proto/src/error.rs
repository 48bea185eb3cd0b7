//! Custom error type definitions.

use thiserror::Error;

use crate::RecordType;

/// Errors that may arise while parsing presentation-format resolver output.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed record line: {0}.")]
    MalformedLine(String),

    #[error("Malformed {0} rdata: {1}.")]
    MalformedRdata(RecordType, String),

    #[error("Unknown record type mnemonic: {0}.")]
    UnknownRecordType(String),

    #[error("Invalid base64 or hex payload.")]
    Decode(#[from] data_encoding::DecodeError),

    #[error("Invalid integer field.")]
    InvalidInteger(#[from] std::num::ParseIntError),

    #[error("Invalid signature timestamp: {0}.")]
    InvalidTimestamp(String),

    #[error("Invalid quoted string: {0}.")]
    InvalidQuotedString(String),

    #[error("Invalid name length: must be smaller than 255, is {0}.")]
    NameTooLong(usize),

    #[error("Invalid label length in name: must be smaller than 64, is {0}.")]
    LabelTooLong(usize),

    #[error("Invalid name: labels must contain only a-z, A-Z, 0-9, underscores, and hyphens, and must not start or end with a hyphen.")]
    NameInvalidChars,

    #[error("Invalid name: contains an empty label.")]
    EmptyLabel,

    #[error("Invalid DNSKEY protocol field: must be 3, is {0}.")]
    InvalidDnskeyProtocol(u8),
}

/// Errors that may arise during wire encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("IO error.")]
    IoError(#[from] std::io::Error),
}
