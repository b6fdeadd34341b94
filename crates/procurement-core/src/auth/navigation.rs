/// Moves the user back to an entry route when the session ends or is
/// missing. In a browser this is a full-page load; a terminal front end
/// prints how to log in again.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Surfaces user-visible messages raised by the API client.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}
