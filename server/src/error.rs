use std::path::PathBuf;

use thiserror::Error;

use crate::serial::SinkClosed;

/// Fatal relay errors.
///
/// Everything here aborts startup (or, for listener failures, the accept
/// loop). Per-message failures never appear in this enum: unrecognized
/// commands, bad offsets and auth rejections are
/// [`turret_shared::CommandError`] values handled inside the session.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The serial device could not be opened while hardware mode is
    /// enabled. The only fatal hardware condition.
    #[error("Failed to connect to turret on {port}: {source}")]
    SerialOpen {
        port: String,
        #[source]
        source: tokio_serial::Error,
    },

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to bind command listener on port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load TLS certificate from {path}: {reason}")]
    TlsCertificate { path: PathBuf, reason: String },

    #[error("command table is inconsistent: {0}")]
    Table(#[from] turret_shared::TableError),

    /// The serial writer task died while commands were still being
    /// issued (test-mode sequence only; sessions handle this per
    /// connection).
    #[error(transparent)]
    SerialSink(#[from] SinkClosed),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_closed_converts_without_losing_the_message() {
        let err: RelayError = SinkClosed.into();
        assert!(matches!(err, RelayError::SerialSink(_)));
        assert_eq!(err.to_string(), SinkClosed.to_string());
    }
}
