/// Errors that can occur across the refgate hook.
///
/// Each variant wraps a specific failure domain. Library crates use this
/// type directly; the binary converts to `miette` diagnostics at the
/// boundary.
///
/// # Examples
///
/// ```
/// use refgate_core::GateError;
///
/// let err = GateError::Config("master-branch-name is not set".into());
/// assert!(err.to_string().contains("master-branch-name"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// Filesystem or pipe I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed ref-update input from the pushing client.
    #[error("input error: {0}")]
    Input(String),

    /// A history query could not be executed or failed.
    #[error("git error: {0}")]
    Git(String),

    /// A sink process could not be started or finished cleanly. Always
    /// downgraded to a warning by the caller.
    #[error("sink error: {0}")]
    Sink(String),

    /// An internal consistency check failed. This is a bug or a change
    /// in the history-query output format, never a policy rejection.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: GateError = io_err.into();
        assert!(err.to_string().contains("pipe closed"));
    }

    #[test]
    fn input_error_displays_message() {
        let err = GateError::Input("expected three fields".into());
        assert_eq!(err.to_string(), "input error: expected three fields");
    }

    #[test]
    fn internal_error_is_tagged_as_internal() {
        let err = GateError::Internal("commit count mismatch".into());
        assert!(err.to_string().starts_with("internal error:"));
    }
}
