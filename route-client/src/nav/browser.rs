//! Abstraction over the browser's location bar and history stack.

/// The navigation surface the URL sync talks to. In production this wraps
/// the host's history API; tests substitute an in-memory fake.
pub trait Browser: Send + Sync + 'static {
    fn current_url(&self) -> String;

    /// Add a history entry.
    fn push(&self, url: &str);

    /// Overwrite the current history entry.
    fn replace(&self, url: &str);
}
