//! Global error handling for repodump
//!
//! Only run-level failures live here. Problems with a single directory
//! entry are absorbed by the scanner and never become a `DumpError`.

use std::io;
use thiserror::Error;

use crate::git::GitError;

/// Global error type for repodump operations
#[derive(Error, Debug)]
pub enum DumpError {
    /// Git-related errors (bad URL, clone failure)
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writer errors
    #[error("Writer error: {0}")]
    Writer(String),
}

/// Specialized Result type for repodump operations
pub type Result<T> = std::result::Result<T, DumpError>;

/// Creates a DumpError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::DumpError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_limit(limit: u64) -> Result<u64> {
        ensure!(limit > 0, Config, "size limit must be positive, got {}", limit);
        Ok(limit)
    }

    #[test]
    fn test_ensure_macro() {
        assert_eq!(check_limit(10).unwrap(), 10);
        let err = check_limit(0).unwrap_err();
        assert!(matches!(err, DumpError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: size limit must be positive, got 0"
        );
    }

    #[test]
    fn test_git_error_conversion() {
        let err: DumpError = GitError::InvalidUrl("nope".to_string()).into();
        assert_eq!(err.to_string(), "Git error: Invalid Git URL: nope");
    }
}
