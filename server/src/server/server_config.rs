use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::RelayError;

/// Contains Config properties which will be used by the relay.
///
/// Loaded once at startup from a TOML file (every field optional, with
/// defaults matching the reference deployment), then adjusted by CLI
/// overrides. Immutable afterwards.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    /// Serial baud rate the turret firmware is flashed for.
    pub baud_rate: u32,
    /// Device path of the turret's serial connection.
    pub serial_port: String,
    /// Run without any serial connection: commands are resolved and
    /// logged but never written to a device. An explicitly selected
    /// mode, never a fallback from a failed connection.
    pub no_turret: bool,
    /// Terminate TLS on the command listener.
    pub use_tls: bool,
    /// Skip authentication entirely: every connection starts
    /// pre-authenticated.
    pub validation_bypass: bool,
    /// Shared password each client must submit as its first message.
    pub password: String,
    /// Port the command listener binds on.
    pub listen_port: u16,
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
    /// Sound played once the turret is ready to take commands.
    pub ready_sound_file: PathBuf,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            serial_port: "/dev/ttyUSB0".to_string(),
            no_turret: false,
            use_tls: false,
            validation_bypass: false,
            password: "Z".to_string(),
            listen_port: 9001,
            cert_file: PathBuf::from("/etc/turret-relay/fullchain.pem"),
            key_file: PathBuf::from("/etc/turret-relay/privkey.pem"),
            ready_sound_file: PathBuf::from("/usr/share/turret-relay/turret_ready.wav"),
        }
    }
}

impl RelayConfig {
    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self, RelayError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RelayError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| RelayError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}
