use crate::{Error, Result};
use chrono::{DateTime, Utc};
use nwbpack_types::{ArtifactRecord, ArtifactSidecar, ArtifactStatus, SessionId};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const ARTIFACT_EXT: &str = "nwb";
pub const PART_SUFFIX: &str = ".nwb.part";
pub const SIDECAR_SUFFIX: &str = ".nwb.json";

/// Read-only enumeration of packaged artifacts under an output root.
///
/// Layout mirrors the session store: `<output_root>/<animal>/<session_id>.nwb`
/// with a JSON sidecar per artifact. The catalog is recomputed from disk on
/// every run; there is no other record of prior work.
pub struct ArtifactCatalog {
    output_root: PathBuf,
}

impl ArtifactCatalog {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Final artifact path for a session id, `<output_root>/<animal>/<id>.nwb`.
    pub fn artifact_path(&self, animal: &str, session_id: &SessionId) -> PathBuf {
        self.output_root
            .join(animal)
            .join(format!("{}.{}", session_id, ARTIFACT_EXT))
    }

    /// Enumerate artifacts, deriving a validity status for each.
    ///
    /// A missing output root is an empty catalog (first run); an unreadable
    /// one is fatal. Malformed sidecars degrade the artifact to corrupt,
    /// they never abort the scan.
    pub fn list_artifacts(&self) -> Result<Vec<ArtifactRecord>> {
        if !self.output_root.exists() {
            return Ok(Vec::new());
        }
        // Distinguish "nothing there yet" from "cannot be read"
        fs::read_dir(&self.output_root).map_err(|err| Error::StorageUnavailable {
            root: self.output_root.clone(),
            detail: err.to_string(),
        })?;

        let mut artifacts = Vec::new();

        for entry in WalkDir::new(&self.output_root).min_depth(1).max_depth(2) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if let Some(stem) = name.strip_suffix(PART_SUFFIX) {
                // A leftover temporary only matters when the write never
                // produced a final artifact; otherwise the prior artifact
                // stands and the executor reclaims the temp on refresh.
                let final_path = path.with_file_name(format!("{}.{}", stem, ARTIFACT_EXT));
                if !final_path.exists() {
                    artifacts.push(partial_record(stem, path)?);
                }
            } else if let Some(stem) = name.strip_suffix(SIDECAR_SUFFIX) {
                let final_path = path.with_file_name(format!("{}.{}", stem, ARTIFACT_EXT));
                if !final_path.exists() {
                    artifacts.push(orphaned_sidecar_record(stem, path)?);
                }
            } else if let Some(stem) = name.strip_suffix(".nwb") {
                artifacts.push(artifact_record(stem, path)?);
            }
        }

        Ok(artifacts)
    }
}

fn modified_at(path: &Path) -> Result<(DateTime<Utc>, u64)> {
    let metadata = fs::metadata(path)?;
    let mtime = metadata.modified().map(DateTime::<Utc>::from)?;
    Ok((mtime, metadata.len()))
}

fn partial_record(stem: &str, part_path: &Path) -> Result<ArtifactRecord> {
    let (mtime, size) = modified_at(part_path)?;
    Ok(ArtifactRecord {
        session_id: SessionId::new(stem),
        artifact_path: part_path.to_path_buf(),
        source_fingerprint: None,
        status: ArtifactStatus::Partial,
        modified_at: mtime,
        size_bytes: size,
    })
}

fn orphaned_sidecar_record(stem: &str, sidecar_path: &Path) -> Result<ArtifactRecord> {
    let (mtime, _) = modified_at(sidecar_path)?;
    let fingerprint = read_sidecar(sidecar_path)
        .ok()
        .map(|s| s.source_fingerprint);
    Ok(ArtifactRecord {
        session_id: SessionId::new(stem),
        artifact_path: sidecar_path.to_path_buf(),
        source_fingerprint: fingerprint,
        status: ArtifactStatus::Corrupt,
        modified_at: mtime,
        size_bytes: 0,
    })
}

fn artifact_record(stem: &str, artifact_path: &Path) -> Result<ArtifactRecord> {
    let (mtime, size) = modified_at(artifact_path)?;
    let session_id = SessionId::new(stem);
    let sidecar_path = ArtifactSidecar::path_for(artifact_path);

    let (status, fingerprint) = if !sidecar_path.exists() {
        // Write finished but the sidecar never landed
        (ArtifactStatus::Partial, None)
    } else {
        match read_sidecar(&sidecar_path) {
            Ok(sidecar) => {
                if sidecar.session_id != session_id || sidecar.size_bytes != size {
                    (ArtifactStatus::Corrupt, Some(sidecar.source_fingerprint))
                } else {
                    (ArtifactStatus::Complete, Some(sidecar.source_fingerprint))
                }
            }
            Err(_) => (ArtifactStatus::Corrupt, None),
        }
    };

    Ok(ArtifactRecord {
        session_id,
        artifact_path: artifact_path.to_path_buf(),
        source_fingerprint: fingerprint,
        status,
        modified_at: mtime,
        size_bytes: size,
    })
}

fn read_sidecar(path: &Path) -> std::io::Result<ArtifactSidecar> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(std::io::Error::other)
}
