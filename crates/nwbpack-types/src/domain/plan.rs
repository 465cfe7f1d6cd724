use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::session::SessionId;

/// Decision for one session or orphaned artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    /// Artifact is complete and current; nothing to do.
    Skip,
    /// No artifact exists for the session.
    Create,
    /// Artifact is stale, partial, or corrupt.
    Refresh,
    /// Artifact has no matching session. Reported, never deleted.
    ReportOrphan,
}

impl PlanAction {
    pub fn is_actionable(&self) -> bool {
        matches!(self, PlanAction::Create | PlanAction::Refresh)
    }
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlanAction::Skip => "skip",
            PlanAction::Create => "create",
            PlanAction::Refresh => "refresh",
            PlanAction::ReportOrphan => "report_orphan",
        };
        write!(f, "{}", s)
    }
}

/// One decision unit in a reconciliation plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanItem {
    pub session_id: SessionId,
    pub action: PlanAction,
    /// Human-readable justification for the decision.
    pub reason: String,
}

/// Integrity finding surfaced during planning. Reported alongside the plan;
/// never aborts the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanNote {
    DuplicateArtifact {
        session_id: SessionId,
        kept: PathBuf,
        discarded: PathBuf,
    },
}

impl fmt::Display for PlanNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanNote::DuplicateArtifact {
                session_id,
                kept,
                discarded,
            } => write!(
                f,
                "duplicate artifacts for {}: kept {}, flagged {}",
                session_id,
                kept.display(),
                discarded.display()
            ),
        }
    }
}

/// Deterministic list of per-session actions, computed before any write.
///
/// Items are sorted by session id ascending; a session id appears at most
/// once. Transient: recomputed fresh on every run, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    pub items: Vec<PlanItem>,
    pub notes: Vec<PlanNote>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Items the executor will actually run (`create` and `refresh`).
    pub fn actionable(&self) -> impl Iterator<Item = &PlanItem> {
        self.items.iter().filter(|item| item.action.is_actionable())
    }

    pub fn count(&self, action: PlanAction) -> usize {
        self.items.iter().filter(|item| item.action == action).count()
    }
}
