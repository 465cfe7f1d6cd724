use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::plan::{PlanAction, PlanItem};
use super::session::SessionId;
use crate::error::ErrorKind;

/// Result of processing one plan item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ItemOutcome {
    Succeeded { artifact_path: PathBuf },
    Failed { kind: ErrorKind, message: String },
    Skipped { reason: String },
}

impl ItemOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ItemOutcome::Failed { .. })
    }
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemOutcome::Succeeded { .. } => write!(f, "succeeded"),
            ItemOutcome::Failed { kind, message } => write!(f, "failed ({}): {}", kind, message),
            ItemOutcome::Skipped { reason } => write!(f, "skipped: {}", reason),
        }
    }
}

/// One row of the batch report: a plan item paired with its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub session_id: SessionId,
    pub action: PlanAction,
    pub outcome: ItemOutcome,
}

impl ReportRow {
    pub fn new(item: &PlanItem, outcome: ItemOutcome) -> Self {
        Self {
            session_id: item.session_id.clone(),
            action: item.action,
            outcome,
        }
    }
}

/// Aggregate outcome of a batch run. Rows preserve plan order regardless
/// of execution order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub rows: Vec<ReportRow>,
    /// Set when a shutdown request cut the run short.
    pub interrupted: bool,
}

impl BatchResult {
    pub fn succeeded(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.outcome, ItemOutcome::Succeeded { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.rows.iter().filter(|r| r.outcome.is_failure()).count()
    }

    pub fn skipped(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.outcome, ItemOutcome::Skipped { .. }))
            .count()
    }

    pub fn count_action(&self, action: PlanAction) -> usize {
        self.rows.iter().filter(|r| r.action == action).count()
    }

    /// True only when no item failed.
    pub fn overall_success(&self) -> bool {
        self.failed() == 0
    }

    /// Process exit code: 0 on full success, 2 when some items failed.
    /// Fatal errors never reach a BatchResult and exit 1 upstream.
    pub fn exit_code(&self) -> i32 {
        if self.overall_success() { 0 } else { 2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, action: PlanAction, outcome: ItemOutcome) -> ReportRow {
        ReportRow {
            session_id: SessionId::new(id),
            action,
            outcome,
        }
    }

    #[test]
    fn counts_and_exit_code() {
        let result = BatchResult {
            rows: vec![
                row(
                    "a_230101_task",
                    PlanAction::Create,
                    ItemOutcome::Succeeded {
                        artifact_path: PathBuf::from("/out/a.nwb"),
                    },
                ),
                row(
                    "b_230102_task",
                    PlanAction::Refresh,
                    ItemOutcome::Failed {
                        kind: ErrorKind::WriteFailure,
                        message: "converter exited with status 1".into(),
                    },
                ),
                row(
                    "c_230103_task",
                    PlanAction::Skip,
                    ItemOutcome::Skipped {
                        reason: "up to date".into(),
                    },
                ),
            ],
            interrupted: false,
        };

        assert_eq!(result.succeeded(), 1);
        assert_eq!(result.failed(), 1);
        assert_eq!(result.skipped(), 1);
        assert!(!result.overall_success());
        assert_eq!(result.exit_code(), 2);
    }

    #[test]
    fn empty_result_is_success() {
        let result = BatchResult::default();
        assert!(result.overall_success());
        assert_eq!(result.exit_code(), 0);
    }
}
