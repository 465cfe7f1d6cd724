use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed classification of everything that can go wrong in a batch run.
///
/// Heterogeneous failures from external collaborators are normalized into
/// this set at the executor boundary; library-specific error types never
/// appear in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A catalog source cannot be read. Fatal: aborts before any plan.
    StorageUnavailable,
    /// Two artifacts claim the same session. Reported; newest wins.
    DuplicateArtifact,
    /// Session lacks raw data required for packaging. Per-item.
    MissingModality,
    /// The external writer failed mid-conversion. Per-item; the prior
    /// artifact is left untouched.
    WriteFailure,
    /// A shutdown request arrived before the item was dispatched.
    Interrupted,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::StorageUnavailable => "storage_unavailable",
            ErrorKind::DuplicateArtifact => "duplicate_artifact",
            ErrorKind::MissingModality => "missing_modality",
            ErrorKind::WriteFailure => "write_failure",
            ErrorKind::Interrupted => "interrupted",
        };
        write!(f, "{}", s)
    }
}
