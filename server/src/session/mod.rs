mod auth;
mod session;

pub use auth::{AuthGate, AuthOutcome};
pub use session::{run_session, SessionContext};
