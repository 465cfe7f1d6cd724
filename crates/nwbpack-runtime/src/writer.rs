use nwbpack_types::SessionRecord;
use std::fmt;
use std::path::Path;
use std::process::Command;

/// Failure surface of an artifact writer. Classified into the closed
/// `ErrorKind` set at the executor boundary; writer-specific detail only
/// survives in the message.
#[derive(Debug)]
pub enum WriteError {
    /// IO operation failed
    Io(std::io::Error),

    /// The converter ran but did not produce a usable artifact
    Failed(String),
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::Io(err) => write!(f, "IO error: {}", err),
            WriteError::Failed(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WriteError::Io(err) => Some(err),
            WriteError::Failed(_) => None,
        }
    }
}

impl From<std::io::Error> for WriteError {
    fn from(err: std::io::Error) -> Self {
        WriteError::Io(err)
    }
}

/// The external collaborator that turns one raw session into one artifact.
///
/// Implementations must write to `dest` only; the executor owns the
/// temporary-then-rename discipline around the call.
pub trait ArtifactWriter: Send + Sync {
    fn write(&self, session: &SessionRecord, dest: &Path) -> Result<(), WriteError>;
}

/// Production writer: runs a configured converter command per session.
///
/// The argv template substitutes `{source}` (session directory), `{dest}`
/// (output path, a temporary during batch runs) and `{session}` (session
/// id) in every element.
pub struct CommandWriter {
    argv: Vec<String>,
}

impl CommandWriter {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    fn render(&self, session: &SessionRecord, dest: &Path) -> Vec<String> {
        self.argv
            .iter()
            .map(|arg| {
                arg.replace("{source}", &session.source_path.to_string_lossy())
                    .replace("{dest}", &dest.to_string_lossy())
                    .replace("{session}", session.session_id.as_str())
            })
            .collect()
    }
}

impl ArtifactWriter for CommandWriter {
    fn write(&self, session: &SessionRecord, dest: &Path) -> Result<(), WriteError> {
        let argv = self.render(session, dest);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| WriteError::Failed("writer command is empty".to_string()))?;

        let output = Command::new(program).args(args).output().map_err(|err| {
            WriteError::Failed(format!("failed to launch writer '{}': {}", program, err))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WriteError::Failed(format!(
                "writer exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use nwbpack_types::{Fingerprint, Modality, SessionId, SessionType};
    use std::collections::BTreeSet;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn session(source: PathBuf) -> SessionRecord {
        let date = NaiveDate::from_ymd_opt(2023, 5, 17).unwrap();
        SessionRecord {
            session_id: SessionId::compose("VG1-01", date, SessionType::Task),
            animal: "VG1-01".to_string(),
            date,
            session_type: SessionType::Task,
            source_path: source,
            content_fingerprint: Fingerprint::new("fp"),
            modalities: BTreeSet::from([Modality::Behavior]),
        }
    }

    #[test]
    fn placeholders_are_substituted() {
        let writer = CommandWriter::new(vec![
            "convert".into(),
            "--id={session}".into(),
            "{source}".into(),
            "{dest}".into(),
        ]);
        let argv = writer.render(&session(PathBuf::from("/raw/s1")), Path::new("/out/s1.nwb.part"));
        assert_eq!(
            argv,
            vec![
                "convert",
                "--id=VG1-01_230517_task",
                "/raw/s1",
                "/out/s1.nwb.part"
            ]
        );
    }

    #[test]
    fn successful_command_writes_dest() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.nwb.part");
        let writer = CommandWriter::new(vec![
            "sh".into(),
            "-c".into(),
            "printf nwb > \"$0\"".into(),
            "{dest}".into(),
        ]);

        writer.write(&session(dir.path().to_path_buf()), &dest).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"nwb");
    }

    #[test]
    fn nonzero_exit_is_a_write_failure() {
        let dir = TempDir::new().unwrap();
        let writer = CommandWriter::new(vec![
            "sh".into(),
            "-c".into(),
            "echo boom >&2; exit 3".into(),
        ]);

        let err = writer
            .write(&session(dir.path().to_path_buf()), &dir.path().join("x"))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("boom"), "unexpected message: {}", msg);
    }

    #[test]
    fn missing_program_is_a_write_failure() {
        let dir = TempDir::new().unwrap();
        let writer = CommandWriter::new(vec!["definitely-not-a-real-converter".into()]);
        let err = writer
            .write(&session(dir.path().to_path_buf()), &dir.path().join("x"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to launch"));
    }
}
