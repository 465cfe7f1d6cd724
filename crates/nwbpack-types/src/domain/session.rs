use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Kind of experiment run, as encoded in the session directory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionType {
    Task,
    RestingState,
    SensoryStim,
}

impl SessionType {
    /// Directory-name token for this type (also the canonical CLI spelling).
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Task => "task",
            SessionType::RestingState => "resting-state",
            SessionType::SensoryStim => "sensory-stim",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = String;

    /// Accepts the canonical spellings plus the shorthand aliases
    /// (`rest`, `ss`) used by the acquisition side.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(SessionType::Task),
            "resting-state" | "rest" => Ok(SessionType::RestingState),
            "sensory-stim" | "ss" => Ok(SessionType::SensoryStim),
            other => Err(format!(
                "expected one of ('task', 'resting-state', 'sensory-stim'), got '{}'",
                other
            )),
        }
    }
}

/// A raw data stream recorded during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    /// DAQ/behavioral records. The only stream every session must have.
    Behavior,
    Imaging,
    Videos,
    PoseTracking,
    Pupil,
}

impl Modality {
    pub const ALL: [Modality; 5] = [
        Modality::Behavior,
        Modality::Imaging,
        Modality::Videos,
        Modality::PoseTracking,
        Modality::Pupil,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Behavior => "behavior",
            Modality::Imaging => "imaging",
            Modality::Videos => "videos",
            Modality::PoseTracking => "pose_tracking",
            Modality::Pupil => "pupil",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque comparable value over the raw inputs of a session.
///
/// Equality is the only meaningful operation; how the value is derived is
/// the catalog's business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for table output.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable unique session key: `<animal>_<YYMMDD>_<type>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn compose(animal: &str, date: NaiveDate, session_type: SessionType) -> Self {
        Self(format!(
            "{}_{}_{}",
            animal,
            date.format("%y%m%d"),
            session_type
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// One raw experiment session as enumerated by the Session Catalog.
///
/// A snapshot of the raw-data store; never mutated by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub animal: String,
    pub date: NaiveDate,
    pub session_type: SessionType,
    /// Session directory under the source root.
    pub source_path: PathBuf,
    pub content_fingerprint: Fingerprint,
    /// Data streams actually present on disk.
    pub modalities: BTreeSet<Modality>,
}

impl SessionRecord {
    /// Whether the session carries the raw DAQ records packaging starts from.
    pub fn has_raw_data(&self) -> bool {
        self.modalities.contains(&Modality::Behavior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_type_parses_aliases() {
        assert_eq!("rest".parse::<SessionType>(), Ok(SessionType::RestingState));
        assert_eq!("ss".parse::<SessionType>(), Ok(SessionType::SensoryStim));
        assert_eq!("task".parse::<SessionType>(), Ok(SessionType::Task));
        assert!("training".parse::<SessionType>().is_err());
    }

    #[test]
    fn session_id_composition() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 17).unwrap();
        let id = SessionId::compose("VG1-01", date, SessionType::Task);
        assert_eq!(id.as_str(), "VG1-01_230517_task");
    }

    #[test]
    fn fingerprint_short_handles_small_digests() {
        assert_eq!(Fingerprint::new("abc").short(), "abc");
        let long = Fingerprint::new("0123456789abcdef");
        assert_eq!(long.short(), "0123456789ab");
    }
}
