use std::collections::HashMap;

use crate::protocol::codes;

use super::error::TableError;

// The phrases the operator-facing clients send, before any trailing
// speed argument is stripped off.
const PHRASE_ENTRIES: &[(&str, &str)] = &[
    ("FIRE", "FIRE"),
    ("CEASE FIRE", "STOP_FIRE"),
    ("SAFETY ON", "SAFETY_ON"),
    ("SAFETY OFF", "SAFETY_OFF"),
    ("ROTATE SPEED", "ROTATE_ZERO"),
    ("PITCH SPEED", "PITCH_ZERO"),
    ("STOP SERVER", "STOP_SERVER"),
];

const CODE_ENTRIES: &[(&str, u8)] = &[
    ("FIRE", codes::FIRE),
    ("STOP_FIRE", codes::STOP_FIRE),
    ("SAFETY_ON", codes::SAFETY_ON),
    ("SAFETY_OFF", codes::SAFETY_OFF),
    ("REBOOT", codes::REBOOT),
    ("ROTATE_LEFT_MAX", codes::ROTATE_LEFT_MAX),
    ("ROTATE_ZERO", codes::ROTATE_ZERO),
    ("ROTATE_RIGHT_MAX", codes::ROTATE_RIGHT_MAX),
    ("PITCH_DOWN_MAX", codes::PITCH_DOWN_MAX),
    ("PITCH_ZERO", codes::PITCH_ZERO),
    ("PITCH_UP_MAX", codes::PITCH_UP_MAX),
    ("STOP_SERVER", codes::STOP_SERVER),
];

/// Bidirectional command mapping: operator phrases to canonical command
/// names, canonical names to serial byte codes.
///
/// Built once at startup, validated, then shared read-only. Invariant:
/// every phrase target exists as a key of the code map.
pub struct CommandTable {
    phrase_to_canonical: HashMap<&'static str, &'static str>,
    canonical_to_code: HashMap<&'static str, u8>,
}

impl CommandTable {
    /// The table the turret firmware understands.
    pub fn standard() -> Self {
        Self {
            phrase_to_canonical: PHRASE_ENTRIES.iter().copied().collect(),
            canonical_to_code: CODE_ENTRIES.iter().copied().collect(),
        }
    }

    /// Checks the completeness invariant. Run once at startup; a failure
    /// here is a programming error in the table data and aborts startup.
    pub fn validate(&self) -> Result<(), TableError> {
        for (phrase, canonical) in &self.phrase_to_canonical {
            if !self.canonical_to_code.contains_key(canonical) {
                return Err(TableError::MissingCanonical {
                    phrase: (*phrase).to_string(),
                    canonical: (*canonical).to_string(),
                });
            }
        }
        Ok(())
    }

    /// Resolves an operator phrase to its canonical command name, falling
    /// back to treating the input itself as canonical when a client sends
    /// the canonical name directly (e.g. "FIRE" maps to itself,
    /// "REBOOT" is reachable only this way).
    pub fn resolve_canonical(&self, phrase: &str) -> Option<&'static str> {
        if let Some(canonical) = self.phrase_to_canonical.get(phrase).copied() {
            return Some(canonical);
        }
        self.canonical_to_code
            .get_key_value(phrase)
            .map(|(canonical, _)| *canonical)
    }

    /// Returns the base serial code for a canonical command name.
    pub fn code_for(&self, canonical: &str) -> Option<u8> {
        self.canonical_to_code.get(canonical).copied()
    }

    /// Iterates all canonical names, for startup diagnostics and tests.
    pub fn canonical_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.canonical_to_code.keys().copied()
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::standard()
    }
}
