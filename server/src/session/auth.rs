use log::info;

/// Result of one credential submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credential matched; the session may now carry commands.
    Accepted,
    /// Credential did not match; the caller must close the connection.
    /// No retry within the same connection.
    Rejected,
}

/// Per-connection authentication state machine.
///
/// Two states. While unauthenticated, every inbound message is treated as
/// a credential; once authenticated, credentials are never re-checked.
/// Owned by exactly one connection task and dropped with it, so one
/// client's login can never leak to another.
pub struct AuthGate {
    authenticated: bool,
    password: String,
}

impl AuthGate {
    /// `bypass` pre-authenticates the connection, disabling the gate.
    pub fn new(password: &str, bypass: bool) -> Self {
        Self {
            authenticated: bypass,
            password: password.to_string(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Validates one credential submission.
    pub fn submit(&mut self, attempt: &str) -> AuthOutcome {
        info!("Authenticating client.");
        if attempt == self.password {
            self.authenticated = true;
            info!("Client is validated.");
            AuthOutcome::Accepted
        } else {
            info!("Client used an invalid password. Terminating connection.");
            AuthOutcome::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unauthenticated_without_bypass() {
        let gate = AuthGate::new("hunter2", false);
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn bypass_pre_authenticates() {
        let gate = AuthGate::new("hunter2", true);
        assert!(gate.is_authenticated());
    }

    #[test]
    fn correct_password_authenticates() {
        let mut gate = AuthGate::new("hunter2", false);
        assert_eq!(gate.submit("hunter2"), AuthOutcome::Accepted);
        assert!(gate.is_authenticated());
    }

    #[test]
    fn wrong_password_is_rejected_and_state_unchanged() {
        let mut gate = AuthGate::new("hunter2", false);
        assert_eq!(gate.submit("hunter3"), AuthOutcome::Rejected);
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn command_phrase_is_not_a_password() {
        // A valid command phrase submitted before login is still just a
        // wrong credential.
        let mut gate = AuthGate::new("hunter2", false);
        assert_eq!(gate.submit("FIRE"), AuthOutcome::Rejected);
        assert!(!gate.is_authenticated());
    }
}
