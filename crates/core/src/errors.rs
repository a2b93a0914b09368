//! Core error types for price import.
//!
//! Value parsing failures are described by [`ParseError`]. The property setter
//! wraps them in a [`PropertyError`] that carries the composed, user-facing
//! message for the column. Storage-specific errors are converted to strings
//! by the store implementations so this module stays backend-agnostic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::import::PricePropType;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the price import core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Property(#[from] PropertyError),

    #[error("Price is incomplete: {0}")]
    Essentials(#[from] EssentialsError),

    #[error("Price store operation failed: {0}")]
    Store(String),

    #[error("Failed to read price file: {0}")]
    Input(String),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Reasons a raw column value could not be turned into a typed price field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseError {
    #[error("Column value can not be empty.")]
    EmptyValue,

    #[error("Value doesn't appear to contain a valid number.")]
    EmptyOrNonNumeric,

    #[error("Value can't be parsed into a number using the selected currency format.")]
    FormatMismatch,

    #[error("Value can't be parsed into a valid commodity.")]
    UnknownCommodity,

    #[error("Value can't be parsed into a valid namespace.")]
    UnknownNamespace,

    #[error("Value can't be parsed into a valid date using the selected date format.")]
    BadDate,

    #[error("'Commodity From' can not be the same as 'Currency To'.")]
    SelfReferentialPair,

    #[error("Value parsed into an invalid currency for a currency column type.")]
    InvalidCurrency,

    #[error("Failed to create price from selected columns.")]
    StoreRejected,
}

impl ParseError {
    /// Returns true if the error describes the symbol/namespace pair as a whole
    /// rather than the raw text of a single column.
    ///
    /// A column whose only problem is a pair-level error still holds a usable
    /// raw value; correcting its partner column may make the pair resolvable.
    pub fn is_pair_level(&self) -> bool {
        matches!(
            self,
            ParseError::UnknownCommodity | ParseError::SelfReferentialPair
        )
    }
}

/// A failed attempt to set one price property.
///
/// `message` is the composed text shown to the user: the column label
/// followed by the underlying cause on its own line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct PropertyError {
    pub kind: PricePropType,
    pub cause: ParseError,
    pub message: String,
}

impl PropertyError {
    pub fn new(kind: PricePropType, cause: ParseError) -> Self {
        let message = format!(
            "Column '{}' could not be understood.\n{}",
            kind.label(),
            cause
        );
        Self {
            kind,
            cause,
            message,
        }
    }
}

/// The first missing or inconsistent essential of a price.
///
/// Variants are declared in the order `verify_essentials` checks them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EssentialsError {
    #[error("No date column.")]
    MissingDate,

    #[error("No amount column.")]
    MissingAmount,

    #[error("No 'Currency to'.")]
    MissingToCurrency,

    #[error("No 'Commodity from'.")]
    MissingFromCommodity,

    #[error("'Commodity From' can not be the same as 'Currency To'.")]
    SelfReferentialPair,
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfigValue(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ConfigIO(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Input(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_error_message_includes_label_and_cause() {
        let err = PropertyError::new(PricePropType::Amount, ParseError::FormatMismatch);
        assert_eq!(
            err.message,
            "Column 'Amount' could not be understood.\n\
             Value can't be parsed into a number using the selected currency format."
        );
        assert_eq!(err.to_string(), err.message);
    }

    #[test]
    fn test_pair_level_errors() {
        assert!(ParseError::UnknownCommodity.is_pair_level());
        assert!(ParseError::SelfReferentialPair.is_pair_level());
        assert!(!ParseError::UnknownNamespace.is_pair_level());
        assert!(!ParseError::EmptyValue.is_pair_level());
    }

    #[test]
    fn test_root_error_wraps_parse_error() {
        let err: Error = ParseError::StoreRejected.into();
        assert!(matches!(err, Error::Parse(ParseError::StoreRejected)));
        assert_eq!(
            err.to_string(),
            "Failed to create price from selected columns."
        );
    }
}
