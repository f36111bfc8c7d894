use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
///
/// Everything recoverable stays local to the component that hit it (an error
/// leaf in the tree, a warning status from the move engine); these variants
/// cover what actually propagates.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A supplied path does not exist or is not a directory.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("denied"));
    }

    #[test]
    fn terminal_error_display() {
        let err = AppError::Terminal("event channel closed".into());
        assert_eq!(err.to_string(), "Terminal error: event channel closed");
    }

    #[test]
    fn invalid_path_error_display() {
        let err = AppError::InvalidPath("/no/such/dir is not a directory".into());
        assert!(err.to_string().starts_with("Invalid path:"));
    }
}
