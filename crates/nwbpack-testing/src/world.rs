use anyhow::Result;
use chrono::Utc;
use filetime::{FileTime, set_file_mtime};
use nwbpack_types::{ArtifactSidecar, Fingerprint, SessionId};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway source/output directory pair with builder-style fixture
/// placement.
pub struct TestWorld {
    _temp_dir: TempDir,
    source_root: PathBuf,
    output_root: PathBuf,
}

impl TestWorld {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let source_root = temp_dir.path().join("sessions");
        let output_root = temp_dir.path().join("nwb");
        fs::create_dir_all(&source_root)?;

        Ok(Self {
            _temp_dir: temp_dir,
            source_root,
            output_root,
        })
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Lay out one raw session directory, e.g.
    /// `add_session("VG1-01", "230517_task", &["behavior", "videos"])`.
    ///
    /// Every modality subdirectory gets one data file with a pinned mtime
    /// so fingerprints are stable across test runs.
    pub fn add_session(&self, animal: &str, dir_name: &str, modalities: &[&str]) -> Result<PathBuf> {
        let session_dir = self.source_root.join(animal).join(dir_name);
        fs::create_dir_all(&session_dir)?;

        for modality in modalities {
            let subdir = session_dir.join(modality);
            fs::create_dir_all(&subdir)?;
            let data = subdir.join("data.bin");
            fs::write(&data, format!("{} raw data", modality))?;
            set_file_mtime(&data, FileTime::from_unix_time(1_700_000_000, 0))?;
        }

        Ok(session_dir)
    }

    /// Touch one file inside a session so its fingerprint changes.
    pub fn modify_session(&self, animal: &str, dir_name: &str) -> Result<()> {
        let data = self
            .source_root
            .join(animal)
            .join(dir_name)
            .join("behavior")
            .join("data.bin");
        fs::write(&data, "behavior raw data, appended")?;
        set_file_mtime(&data, FileTime::from_unix_time(1_700_000_500, 0))?;
        Ok(())
    }

    /// Place a finished artifact plus a consistent sidecar, as a prior
    /// successful run would have left it.
    pub fn add_artifact(&self, animal: &str, session_id: &str, fingerprint: &str) -> Result<PathBuf> {
        let dir = self.output_root.join(animal);
        fs::create_dir_all(&dir)?;
        let artifact_path = dir.join(format!("{}.nwb", session_id));
        fs::write(&artifact_path, b"nwb-bytes")?;

        let sidecar = ArtifactSidecar {
            session_id: SessionId::new(session_id),
            source_fingerprint: Fingerprint::new(fingerprint),
            size_bytes: 9,
            created_at: Utc::now(),
        };
        fs::write(
            ArtifactSidecar::path_for(&artifact_path),
            serde_json::to_string_pretty(&sidecar)?,
        )?;

        Ok(artifact_path)
    }

    /// Place a half-written temporary with no final artifact.
    pub fn add_partial_artifact(&self, animal: &str, session_id: &str) -> Result<PathBuf> {
        let dir = self.output_root.join(animal);
        fs::create_dir_all(&dir)?;
        let part_path = dir.join(format!("{}.nwb.part", session_id));
        fs::write(&part_path, b"half")?;
        Ok(part_path)
    }
}
