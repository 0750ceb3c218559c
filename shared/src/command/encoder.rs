use log::{debug, info};

use super::error::CommandError;
use super::table::CommandTable;

/// Outcome of resolving one inbound command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedCommand {
    /// A byte to write to the serial link.
    Serial(u8),
    /// The shutdown sentinel: terminate the relay process, write nothing.
    Shutdown,
}

/// Turns one raw inbound line into zero or one serial byte.
///
/// Pure and stateless aside from the immutable table: resolving the same
/// line twice always yields the same result.
pub struct CommandEncoder {
    table: CommandTable,
}

impl CommandEncoder {
    pub fn new(table: CommandTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Resolves a command line such as `"FIRE"` or `"ROTATE SPEED -7"`.
    ///
    /// A trailing token is treated as a speed offset only when the line
    /// has at least three tokens and the token parses as a signed
    /// integer; anything else is part of the phrase. Offsets that drive
    /// the resolved code outside 0-255 are rejected, never clamped or
    /// wrapped.
    pub fn resolve(&self, line: &str) -> Result<ResolvedCommand, CommandError> {
        debug!("Processing incoming cmd: {line}");
        let (phrase, offset) = split_offset(line);

        let canonical = self
            .table
            .resolve_canonical(phrase)
            .ok_or_else(|| CommandError::Unrecognized(line.to_string()))?;

        // Table is validated at startup.
        let base = self
            .table
            .code_for(canonical)
            .ok_or_else(|| CommandError::Unrecognized(line.to_string()))?;

        info!("Executing cmd: {canonical}");

        // The sentinel is recognized by its base code, before any offset
        // is applied. It takes no argument.
        if base == 0 {
            if offset != 0 {
                return Err(CommandError::SentinelOffset(offset));
            }
            return Ok(ResolvedCommand::Shutdown);
        }

        let resolved = i32::from(base) + offset;
        let byte = u8::try_from(resolved).map_err(|_| CommandError::OffsetOutOfRange {
            canonical: canonical.to_string(),
            base,
            offset,
        })?;

        Ok(ResolvedCommand::Serial(byte))
    }
}

/// Splits `"ROTATE SPEED -7"` into `("ROTATE SPEED", -7)`. Lines with
/// fewer than three tokens, or whose final token is not an integer, keep
/// offset 0 and the whole line as the phrase.
fn split_offset(line: &str) -> (&str, i32) {
    let tokens: Vec<&str> = line.split(' ').collect();
    if tokens.len() < 3 {
        return (line, 0);
    }
    let last = tokens[tokens.len() - 1];
    match last.parse::<i32>() {
        // Strip the argument and the space before it.
        Ok(offset) => (&line[..line.len() - last.len() - 1], offset),
        Err(_) => (line, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codes;

    fn encoder() -> CommandEncoder {
        CommandEncoder::new(CommandTable::standard())
    }

    #[test]
    fn bare_phrases_resolve_to_table_bytes() {
        let enc = encoder();
        assert_eq!(enc.resolve("FIRE"), Ok(ResolvedCommand::Serial(0x21)));
        assert_eq!(enc.resolve("CEASE FIRE"), Ok(ResolvedCommand::Serial(0x22)));
        assert_eq!(enc.resolve("SAFETY ON"), Ok(ResolvedCommand::Serial(0x23)));
        assert_eq!(enc.resolve("SAFETY OFF"), Ok(ResolvedCommand::Serial(0x24)));
    }

    #[test]
    fn rotate_offset_arithmetic() {
        let enc = encoder();
        assert_eq!(
            enc.resolve("ROTATE SPEED 7"),
            Ok(ResolvedCommand::Serial(0x37))
        );
        assert_eq!(
            enc.resolve("ROTATE SPEED -7"),
            Ok(ResolvedCommand::Serial(0x29))
        );
        assert_eq!(
            enc.resolve("ROTATE SPEED 0"),
            Ok(ResolvedCommand::Serial(codes::ROTATE_ZERO))
        );
    }

    #[test]
    fn pitch_offset_reaches_max_code() {
        assert_eq!(
            encoder().resolve("PITCH SPEED 10"),
            Ok(ResolvedCommand::Serial(codes::PITCH_UP_MAX))
        );
    }

    #[test]
    fn canonical_names_resolve_directly() {
        let enc = encoder();
        assert_eq!(
            enc.resolve("STOP_FIRE"),
            Ok(ResolvedCommand::Serial(codes::STOP_FIRE))
        );
        assert_eq!(
            enc.resolve("REBOOT"),
            Ok(ResolvedCommand::Serial(codes::REBOOT))
        );
    }

    #[test]
    fn shutdown_sentinel() {
        let enc = encoder();
        assert_eq!(enc.resolve("STOP SERVER"), Ok(ResolvedCommand::Shutdown));
        assert_eq!(enc.resolve("STOP_SERVER"), Ok(ResolvedCommand::Shutdown));
    }

    #[test]
    fn resolution_is_idempotent() {
        let enc = encoder();
        assert_eq!(enc.resolve("PITCH SPEED 3"), enc.resolve("PITCH SPEED 3"));
        assert_eq!(enc.resolve("FIRE"), enc.resolve("FIRE"));
    }

    #[test]
    fn two_token_line_with_number_is_not_an_offset() {
        // "FIRE 5" has only two tokens, so the 5 is part of the phrase
        // and the phrase matches nothing.
        assert_eq!(
            encoder().resolve("FIRE 5"),
            Err(CommandError::Unrecognized("FIRE 5".to_string()))
        );
    }
}
