use std::fmt;
use std::path::PathBuf;

/// Result type for nwbpack-catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the catalog layer
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// Directory traversal failed
    WalkDir(walkdir::Error),

    /// A catalog root cannot be read at all. Fatal for the whole run:
    /// a partial catalog is not trustworthy.
    StorageUnavailable { root: PathBuf, detail: String },

    /// Filter or layout parsing failed (bad date string, bad type token)
    Parse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::WalkDir(err) => write!(f, "Directory traversal error: {}", err),
            Error::StorageUnavailable { root, detail } => {
                write!(f, "Cannot read catalog root '{}': {}", root.display(), detail)
            }
            Error::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::StorageUnavailable { .. } | Error::Parse(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDir(err)
    }
}
