//! Error types for the encoder and the gateway/phone reference model.

use thiserror::Error;

/// Errors that can occur while coercing text into the UCS-2 masquerade.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoerceError {
    /// `max_pages` was zero; rejected before any work is done.
    #[error("max_pages must be at least 1")]
    MaxPagesZero,

    /// A grapheme could not be masqueraded in either endianness, under
    /// [`UnsupportedPolicy::Error`](crate::UnsupportedPolicy::Error).
    #[error("grapheme {grapheme:?} is not encodable under the strict policy")]
    UnencodableGrapheme { grapheme: String },
}

/// Result type for encoder operations.
pub type Result<T> = std::result::Result<T, CoerceError>;

/// Errors raised by the reference gateway model (used only by tests and the
/// CLI's `--simulate-gateway` flag).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The gateway refuses to transmit an empty message.
    #[error("empty input is not supported; send a lone BOM instead")]
    EmptyInput,

    /// The gateway drops any page containing a NUL codepoint.
    #[error("input contains NUL, which the gateway cannot transmit")]
    ContainsNul,
}

/// Result type for gateway model operations.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
