//! Wire-level constants for the relay protocol.
//!
//! Inbound traffic is newline-delimited UTF-8 text. Outbound traffic to the
//! client consists of exactly two fixed reply strings, both tied to
//! authentication; successful turret commands are fire-and-forget and
//! produce no reply.

/// Reply sent when a submitted credential matches the configured password.
pub const LOGIN_SUCCESSFUL: &str = "Login successful";

/// Reply sent just before closing the connection of a client that
/// submitted a wrong credential.
pub const INVALID_PASSWORD: &str = "Invalid password. Connection terminated.";

/// Serial command codes understood by the turret firmware.
///
/// One byte per command, no framing, no acknowledgement. The rotate and
/// pitch "zero" codes sit in the middle of a signed range: adding a speed
/// offset to them encodes direction and magnitude in a single byte, bounded
/// by the corresponding `*_MAX` codes.
pub mod codes {
    /// Reserved sentinel: terminate the relay process, never sent on the wire.
    pub const STOP_SERVER: u8 = 0x00;
    pub const FIRE: u8 = 0x21;
    pub const STOP_FIRE: u8 = 0x22;
    pub const SAFETY_ON: u8 = 0x23;
    pub const SAFETY_OFF: u8 = 0x24;
    pub const REBOOT: u8 = 0x25;
    pub const ROTATE_LEFT_MAX: u8 = 0x26;
    pub const ROTATE_ZERO: u8 = 0x30;
    pub const ROTATE_RIGHT_MAX: u8 = 0x3A;
    pub const PITCH_DOWN_MAX: u8 = 0x3B;
    pub const PITCH_ZERO: u8 = 0x45;
    pub const PITCH_UP_MAX: u8 = 0x4F;
}
