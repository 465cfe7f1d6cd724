use crate::fingerprint::fingerprint_dir;
use crate::{Error, Result, SessionFilter};
use chrono::NaiveDate;
use nwbpack_types::{Modality, SessionId, SessionRecord, SessionType};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Subdirectory names holding each raw data stream inside a session
/// directory.
fn modality_subdir(modality: Modality) -> &'static str {
    match modality {
        Modality::Behavior => "behavior",
        Modality::Imaging => "imaging",
        Modality::Videos => "videos",
        Modality::PoseTracking => "pose",
        Modality::Pupil => "pupil",
    }
}

/// Read-only enumeration of raw sessions under a source root.
///
/// Expected layout: `<source_root>/<animal>/<YYMMDD>_<type>/`, with one
/// subdirectory per recorded modality. Entries that do not match the layout
/// are skipped; an unreadable root is fatal.
pub struct SessionCatalog {
    source_root: PathBuf,
}

impl SessionCatalog {
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Enumerate sessions matching `filter`.
    ///
    /// Ordering of the returned records is not part of the contract;
    /// planning sorts by session id before emitting anything.
    pub fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<SessionRecord>> {
        let animals = read_dir_sorted(&self.source_root).map_err(|err| {
            Error::StorageUnavailable {
                root: self.source_root.clone(),
                detail: err.to_string(),
            }
        })?;

        let mut sessions = Vec::new();

        for animal_dir in animals {
            if !animal_dir.is_dir() {
                continue;
            }
            let Some(animal) = file_name_str(&animal_dir) else {
                continue;
            };

            for session_dir in read_dir_sorted(&animal_dir)? {
                if !session_dir.is_dir() {
                    continue;
                }
                let Some(name) = file_name_str(&session_dir) else {
                    continue;
                };
                let Some((date, session_type)) = parse_session_dir_name(&name) else {
                    continue;
                };

                let modalities = detect_modalities(&session_dir)?;
                let content_fingerprint = fingerprint_dir(&session_dir)?;

                let record = SessionRecord {
                    session_id: SessionId::compose(&animal, date, session_type),
                    animal: animal.clone(),
                    date,
                    session_type,
                    source_path: session_dir,
                    content_fingerprint,
                    modalities,
                };

                if filter.matches(&record) {
                    sessions.push(record);
                }
            }
        }

        Ok(sessions)
    }
}

fn read_dir_sorted(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();
    Ok(entries)
}

fn file_name_str(path: &Path) -> Option<String> {
    path.file_name().and_then(|n| n.to_str()).map(String::from)
}

/// Parse `<YYMMDD>_<type>` session directory names, e.g. `230517_task`
/// or `230518_resting-state`.
fn parse_session_dir_name(name: &str) -> Option<(NaiveDate, SessionType)> {
    let (date_part, type_part) = name.split_once('_')?;
    let date = NaiveDate::parse_from_str(date_part, "%y%m%d").ok()?;
    let session_type = type_part.parse::<SessionType>().ok()?;
    Some((date, session_type))
}

/// A modality counts as present when its subdirectory holds at least one
/// regular file.
fn detect_modalities(session_dir: &Path) -> Result<BTreeSet<Modality>> {
    let mut modalities = BTreeSet::new();

    for modality in Modality::ALL {
        let subdir = session_dir.join(modality_subdir(modality));
        if !subdir.is_dir() {
            continue;
        }
        let has_file = fs::read_dir(&subdir)?
            .filter_map(|e| e.ok())
            .any(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false));
        if has_file {
            modalities.insert(modality);
        }
    }

    Ok(modalities)
}
