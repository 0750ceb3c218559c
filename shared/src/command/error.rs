use thiserror::Error;

/// Errors produced while resolving one inbound command line.
///
/// All of these are recoverable per-message failures: the session logs
/// them and keeps running, and no byte reaches the serial link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The line matched no known phrase and no canonical command name.
    #[error("Unrecognized command received: {0}")]
    Unrecognized(String),

    /// The speed offset drove the resolved code outside the single-byte
    /// range the serial protocol can carry.
    #[error(
        "offset {offset} drives command {canonical} (base 0x{base:02X}) outside the 0-255 serial range"
    )]
    OffsetOutOfRange {
        canonical: String,
        base: u8,
        offset: i32,
    },

    /// A speed offset was attached to the shutdown sentinel, which takes
    /// no argument.
    #[error("the shutdown command takes no speed argument (got {0})")]
    SentinelOffset(i32),
}

/// Errors detected while validating the command table at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A phrase maps to a canonical name that has no serial code.
    #[error("phrase '{phrase}' maps to canonical '{canonical}' which has no serial code")]
    MissingCanonical { phrase: String, canonical: String },
}
