//! Error types for Paysheet operations.
//!
//! The sheet is an interaction surface: almost every caller mistake is absorbed
//! by clamping or falling back to defaults. The variants here cover the few
//! places where a failure must be reported to the embedding code.

use thiserror::Error;

/// Error codes for FFI and JS integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PaysheetErrorCode {
    /// The host document (or its body) is not available yet
    HostUnavailable = 1000,
    /// Invalid input data
    InvalidInput = 5000,
    /// Serialization error
    Serialization = 5002,
}

/// Error type for Paysheet operations.
#[derive(Debug, Error)]
pub enum PaysheetError {
    /// The rendering host could not be reached.
    ///
    /// Raised when the shared instance is requested before the document body
    /// exists. There is no recovery other than retrying once the document is ready.
    #[error("host unavailable: {0}")]
    HostUnavailable(String),

    /// Input could not be interpreted.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl PaysheetError {
    /// Get the error code for FFI.
    pub fn code(&self) -> PaysheetErrorCode {
        match self {
            Self::HostUnavailable(_) => PaysheetErrorCode::HostUnavailable,
            Self::InvalidInput { .. } => PaysheetErrorCode::InvalidInput,
            Self::Serialization(_) => PaysheetErrorCode::Serialization,
        }
    }

    /// Shorthand for an [`InvalidInput`](Self::InvalidInput) error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for PaysheetError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
