//! Global error handling for allcode
//!
//! Every stage of the export pipeline reports failures through
//! [`AllCodeError`]. All of them are fatal: the run aborts on the first one.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Global error type for allcode operations
#[derive(Error, Debug)]
pub enum AllCodeError {
    /// The configured root does not exist
    #[error("Project root does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    /// The configured root exists but is not a directory
    #[error("Project root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Discovery produced no candidates
    #[error("No exportable files found under {} (extensions: {extensions})", .root.display())]
    NothingToExport { root: PathBuf, extensions: String },

    /// Reading or writing a specific path failed
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Directory traversal errors
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AllCodeError {
    /// Attach the failing path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Specialized Result type for allcode operations
pub type Result<T> = std::result::Result<T, AllCodeError>;

/// Creates an AllCodeError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::AllCodeError::$error_type(format!($($arg)*))
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

/// Extension trait for attaching a path to I/O results
pub trait IoResultExt<T> {
    /// Wrap the error with the path that was being accessed
    fn at_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| AllCodeError::io(path, e))
    }
}

// Allow converting AllCodeError to io::Error for io::Result based callers and tests
impl From<AllCodeError> for io::Error {
    fn from(err: AllCodeError) -> Self {
        match err {
            AllCodeError::Io { source, .. } => source,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
