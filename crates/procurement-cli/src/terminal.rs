use procurement_core::{Navigator, Notifier};
use tracing::{debug, warn};

/// Printed whenever the session ends or is missing. It follows both an
/// explicit logout and a refused command, so it only says what to do next.
pub const LOGIN_HINT: &str = "Run `procurement login` to start a new session.";

/// Terminal stand-in for page navigation and toast notifications.
///
/// Navigating to the entry route means the user has to log in again, so
/// the terminal just says how.
#[derive(Debug, Default, Clone, Copy)]
pub struct Terminal;

impl Navigator for Terminal {
    fn navigate(&self, route: &str) {
        debug!(route, "Redirect to entry route");
        eprintln!("{}", LOGIN_HINT);
    }
}

impl Notifier for Terminal {
    fn error(&self, message: &str) {
        warn!("{}", message);
        eprintln!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_hint_reads_after_logout() {
        // Shown right after "Logged out.", so it must not claim otherwise
        assert!(!LOGIN_HINT.to_lowercase().contains("not logged in"));
        assert!(LOGIN_HINT.contains("procurement login"));
    }
}
