use crate::writer::ArtifactWriter;
use chrono::Utc;
use nwbpack_catalog::ArtifactCatalog;
use nwbpack_types::{ArtifactSidecar, ErrorKind, ItemOutcome, PlanItem, SessionRecord};
use std::fs;
use std::path::{Path, PathBuf};

/// Packages one session per call, isolating every failure at the item
/// boundary.
///
/// Write discipline: the writer targets `<final>.part`; only a fully
/// written temporary is renamed over the final path, and the sidecar lands
/// after the rename. A crash at any point leaves the prior artifact (if
/// any) intact — the worst leftover is a visible `.part` file the next run
/// classifies as partial.
pub struct Executor<W> {
    pub(crate) writer: W,
    pub(crate) output: ArtifactCatalog,
}

impl<W: ArtifactWriter> Executor<W> {
    pub fn new(writer: W, output: ArtifactCatalog) -> Self {
        Self { writer, output }
    }

    /// Run one `create`/`refresh` item. Never panics, never propagates:
    /// every failure comes back as an `ItemOutcome::Failed`.
    pub fn execute(&self, item: &PlanItem, session: &SessionRecord) -> ItemOutcome {
        debug_assert!(item.action.is_actionable());

        if !session.has_raw_data() {
            return ItemOutcome::Failed {
                kind: ErrorKind::MissingModality,
                message: format!(
                    "session {} has no raw behavior data",
                    session.session_id
                ),
            };
        }

        let final_path = self
            .output
            .artifact_path(&session.animal, &session.session_id);
        let temp_path = temp_path_for(&final_path);

        if let Err(err) = prepare_destination(&final_path, &temp_path) {
            return ItemOutcome::Failed {
                kind: ErrorKind::WriteFailure,
                message: err.to_string(),
            };
        }

        if let Err(err) = self.writer.write(session, &temp_path) {
            // Reclaim the temporary so a retry starts clean
            let _ = fs::remove_file(&temp_path);
            return ItemOutcome::Failed {
                kind: ErrorKind::WriteFailure,
                message: err.to_string(),
            };
        }

        match finalize(session, &final_path, &temp_path) {
            Ok(()) => ItemOutcome::Succeeded {
                artifact_path: final_path,
            },
            Err(err) => {
                let _ = fs::remove_file(&temp_path);
                ItemOutcome::Failed {
                    kind: ErrorKind::WriteFailure,
                    message: err.to_string(),
                }
            }
        }
    }
}

fn temp_path_for(final_path: &Path) -> PathBuf {
    let name = final_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    final_path.with_file_name(format!("{}.part", name))
}

fn prepare_destination(final_path: &Path, temp_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = final_path.parent() {
        fs::create_dir_all(parent)?;
    }
    // A stale temporary from an interrupted run must not survive into the
    // new write
    if temp_path.exists() {
        fs::remove_file(temp_path)?;
    }
    Ok(())
}

fn finalize(
    session: &SessionRecord,
    final_path: &Path,
    temp_path: &Path,
) -> std::io::Result<()> {
    let metadata = fs::metadata(temp_path).map_err(|_| {
        std::io::Error::other("writer reported success but produced no output file")
    })?;

    fs::rename(temp_path, final_path)?;

    let sidecar = ArtifactSidecar {
        session_id: session.session_id.clone(),
        source_fingerprint: session.content_fingerprint.clone(),
        size_bytes: metadata.len(),
        created_at: Utc::now(),
    };
    let sidecar_path = ArtifactSidecar::path_for(final_path);
    fs::write(&sidecar_path, serde_json::to_string_pretty(&sidecar)?)?;
    Ok(())
}
