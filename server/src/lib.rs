//! # Turret Server
//! A relay that accepts authenticated text commands over a persistent
//! socket connection and translates them into single-byte codes written to
//! the serial-connected turret, while streaming the turret's own serial
//! output back to the operator console.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod cli;
pub mod error;
pub mod serial;
pub mod server;
pub mod session;
pub mod shutdown;
pub mod sound;
pub mod test_sequence;

pub use error::RelayError;
pub use serial::{CommandSink, SerialLink};
pub use server::{RelayConfig, RelayServer};
pub use session::{AuthGate, AuthOutcome, SessionContext};
pub use shutdown::ShutdownSignal;
