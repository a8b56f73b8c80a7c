//! Error types for text parsing.

/// Result type alias for text parsing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Text parsing error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No text was supplied where a definition block was required.
    #[error("Missing input: text can not be absent")]
    MissingInput,

    /// The `received:` line does not match `yyyy-MM-dd HH:mm`.
    #[error("Invalid received timestamp '{value}': {source}")]
    InvalidTimestamp {
        /// The offending value line.
        value: String,
        /// Underlying chrono parse failure.
        #[source]
        source: chrono::ParseError,
    },
}
