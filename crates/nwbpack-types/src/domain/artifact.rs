use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::session::{Fingerprint, SessionId};

/// Validity of a produced artifact, as derived by the Artifact Catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    /// Artifact and sidecar agree; safe to trust.
    Complete,
    /// A write never finished (leftover temporary, or artifact without
    /// a sidecar).
    Partial,
    /// Sidecar and artifact disagree; never trusted.
    Corrupt,
}

impl fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArtifactStatus::Complete => "complete",
            ArtifactStatus::Partial => "partial",
            ArtifactStatus::Corrupt => "corrupt",
        };
        write!(f, "{}", s)
    }
}

/// One packaged output file as enumerated by the Artifact Catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub session_id: SessionId,
    pub artifact_path: PathBuf,
    /// Session fingerprint recorded when the artifact was built.
    /// Absent for partial leftovers that never got a sidecar.
    pub source_fingerprint: Option<Fingerprint>,
    pub status: ArtifactStatus,
    /// Filesystem mtime of the artifact; newest wins on duplicate session ids.
    pub modified_at: DateTime<Utc>,
    pub size_bytes: u64,
}

impl ArtifactRecord {
    pub fn is_complete(&self) -> bool {
        self.status == ArtifactStatus::Complete
    }
}

/// Durable record written next to each artifact on successful packaging.
///
/// The sidecar doubles as the manifest of prior work: the Artifact Catalog
/// is recomputed from artifacts plus sidecars on every run, so no separate
/// database exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSidecar {
    pub session_id: SessionId,
    pub source_fingerprint: Fingerprint,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

impl ArtifactSidecar {
    /// Sidecar path for a given artifact path (`x.nwb` -> `x.nwb.json`).
    pub fn path_for(artifact_path: &std::path::Path) -> PathBuf {
        let mut name = artifact_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        name.push_str(".json");
        artifact_path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn sidecar_path_appends_json() {
        let p = Path::new("/out/VG1-01/VG1-01_230517_task.nwb");
        assert_eq!(
            ArtifactSidecar::path_for(p),
            PathBuf::from("/out/VG1-01/VG1-01_230517_task.nwb.json")
        );
    }
}
