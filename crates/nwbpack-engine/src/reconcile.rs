use nwbpack_types::{
    ArtifactRecord, ArtifactStatus, Plan, PlanAction, PlanItem, PlanNote, SessionId, SessionRecord,
};
use std::collections::HashMap;

/// Knobs that change planning decisions without changing its purity.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    /// Re-package sessions whose artifact is complete and current.
    pub force: bool,
}

/// Compare the session and artifact catalogs and decide, per session, what
/// a batch run should do.
///
/// Pure and total: no I/O, no side effects; the same catalogs always produce
/// the same plan. Catalog ordering is irrelevant — items are emitted sorted
/// by session id ascending, so reports are reproducible.
pub fn plan(
    sessions: &[SessionRecord],
    artifacts: &[ArtifactRecord],
    opts: &PlanOptions,
) -> Plan {
    let mut notes = Vec::new();
    let (by_session, duplicate_losers) = index_artifacts(artifacts, &mut notes);

    let mut items = Vec::with_capacity(sessions.len() + duplicate_losers.len());

    for session in sessions {
        items.push(decide(session, by_session.get(&session.session_id).copied(), opts));
    }

    let known: HashMap<&SessionId, ()> =
        sessions.iter().map(|s| (&s.session_id, ())).collect();

    for artifact in by_session.values() {
        if !known.contains_key(&artifact.session_id) {
            items.push(PlanItem {
                session_id: artifact.session_id.clone(),
                action: PlanAction::ReportOrphan,
                reason: format!(
                    "artifact {} has no matching session",
                    artifact.artifact_path.display()
                ),
            });
        }
    }

    // Superseded duplicates surface as orphan items only when no session
    // would otherwise claim the id; a session id appears in the plan at
    // most once.
    for artifact in duplicate_losers {
        if !known.contains_key(&artifact.session_id) {
            items.push(PlanItem {
                session_id: artifact.session_id.clone(),
                action: PlanAction::ReportOrphan,
                reason: format!(
                    "duplicate artifact {} superseded by a newer file",
                    artifact.artifact_path.display()
                ),
            });
        }
    }

    items.sort_by(|a, b| {
        a.session_id
            .cmp(&b.session_id)
            .then_with(|| a.reason.cmp(&b.reason))
    });
    items.dedup_by(|a, b| a.session_id == b.session_id && a.action == b.action);

    Plan { items, notes }
}

/// Index artifacts by session id. Two artifacts claiming the same session
/// is a data-integrity error: the newest by modification time wins, the
/// rest are returned as losers and flagged in the notes.
fn index_artifacts<'a>(
    artifacts: &'a [ArtifactRecord],
    notes: &mut Vec<PlanNote>,
) -> (HashMap<&'a SessionId, &'a ArtifactRecord>, Vec<&'a ArtifactRecord>) {
    let mut by_session: HashMap<&SessionId, &ArtifactRecord> = HashMap::new();
    let mut losers = Vec::new();

    // Deterministic winner selection regardless of catalog order: sort by
    // (mtime, path) and let later entries displace earlier ones.
    let mut ordered: Vec<&ArtifactRecord> = artifacts.iter().collect();
    ordered.sort_by(|a, b| {
        a.modified_at
            .cmp(&b.modified_at)
            .then_with(|| a.artifact_path.cmp(&b.artifact_path))
    });

    for artifact in ordered {
        if let Some(previous) = by_session.insert(&artifact.session_id, artifact) {
            notes.push(PlanNote::DuplicateArtifact {
                session_id: artifact.session_id.clone(),
                kept: artifact.artifact_path.clone(),
                discarded: previous.artifact_path.clone(),
            });
            losers.push(previous);
        }
    }

    (by_session, losers)
}

fn decide(
    session: &SessionRecord,
    artifact: Option<&ArtifactRecord>,
    opts: &PlanOptions,
) -> PlanItem {
    let (action, reason) = match artifact {
        None => (PlanAction::Create, "no artifact exists".to_string()),
        Some(artifact) => match artifact.status {
            // A corrupt or half-written artifact is never trusted, no
            // matter what fingerprint it claims.
            ArtifactStatus::Partial => (
                PlanAction::Refresh,
                "existing artifact is partial".to_string(),
            ),
            ArtifactStatus::Corrupt => (
                PlanAction::Refresh,
                "existing artifact is corrupt".to_string(),
            ),
            ArtifactStatus::Complete => {
                let current = artifact.source_fingerprint.as_ref()
                    == Some(&session.content_fingerprint);
                if !current {
                    (
                        PlanAction::Refresh,
                        "raw data changed since artifact was built".to_string(),
                    )
                } else if opts.force {
                    (PlanAction::Refresh, "forced refresh requested".to_string())
                } else {
                    (
                        PlanAction::Skip,
                        "artifact is complete and current".to_string(),
                    )
                }
            }
        },
    };

    PlanItem {
        session_id: session.session_id.clone(),
        action,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use nwbpack_types::{Fingerprint, Modality, SessionType};
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn session(id: &str, fingerprint: &str) -> SessionRecord {
        SessionRecord {
            session_id: SessionId::new(id),
            animal: id.split('_').next().unwrap_or("x").to_string(),
            date: NaiveDate::from_ymd_opt(2023, 5, 17).unwrap(),
            session_type: SessionType::Task,
            source_path: PathBuf::from(format!("/raw/{}", id)),
            content_fingerprint: Fingerprint::new(fingerprint),
            modalities: BTreeSet::from([Modality::Behavior]),
        }
    }

    fn artifact(id: &str, fingerprint: &str, status: ArtifactStatus) -> ArtifactRecord {
        artifact_at(id, fingerprint, status, 0)
    }

    fn artifact_at(
        id: &str,
        fingerprint: &str,
        status: ArtifactStatus,
        mtime_offset_secs: i64,
    ) -> ArtifactRecord {
        ArtifactRecord {
            session_id: SessionId::new(id),
            artifact_path: PathBuf::from(format!("/out/{}-{}.nwb", id, mtime_offset_secs)),
            source_fingerprint: Some(Fingerprint::new(fingerprint)),
            status,
            modified_at: Utc.timestamp_opt(1_700_000_000 + mtime_offset_secs, 0).unwrap(),
            size_bytes: 1024,
        }
    }

    fn actions(plan: &Plan) -> Vec<(&str, PlanAction)> {
        plan.items
            .iter()
            .map(|i| (i.session_id.as_str(), i.action))
            .collect()
    }

    #[test]
    fn session_without_artifact_is_created() {
        // Scenario: one session, empty artifact store
        let result = plan(&[session("s1", "a")], &[], &PlanOptions::default());
        assert_eq!(actions(&result), vec![("s1", PlanAction::Create)]);
    }

    #[test]
    fn matching_complete_artifact_is_skipped() {
        let result = plan(
            &[session("s1", "a")],
            &[artifact("s1", "a", ArtifactStatus::Complete)],
            &PlanOptions::default(),
        );
        assert_eq!(actions(&result), vec![("s1", PlanAction::Skip)]);
    }

    #[test]
    fn changed_fingerprint_is_refreshed() {
        let result = plan(
            &[session("s1", "b")],
            &[artifact("s1", "a", ArtifactStatus::Complete)],
            &PlanOptions::default(),
        );
        assert_eq!(actions(&result), vec![("s1", PlanAction::Refresh)]);
    }

    #[test]
    fn artifact_without_session_is_reported_as_orphan() {
        let result = plan(
            &[],
            &[artifact("s9", "x", ArtifactStatus::Complete)],
            &PlanOptions::default(),
        );
        assert_eq!(actions(&result), vec![("s9", PlanAction::ReportOrphan)]);
    }

    #[test]
    fn partial_and_corrupt_artifacts_refresh_regardless_of_fingerprint() {
        for status in [ArtifactStatus::Partial, ArtifactStatus::Corrupt] {
            let result = plan(
                &[session("s1", "a")],
                &[artifact("s1", "a", status)],
                &PlanOptions::default(),
            );
            assert_eq!(actions(&result), vec![("s1", PlanAction::Refresh)]);
        }
    }

    #[test]
    fn force_turns_skip_into_refresh() {
        let result = plan(
            &[session("s1", "a")],
            &[artifact("s1", "a", ArtifactStatus::Complete)],
            &PlanOptions { force: true },
        );
        assert_eq!(actions(&result), vec![("s1", PlanAction::Refresh)]);
        assert_eq!(result.items[0].reason, "forced refresh requested");
    }

    #[test]
    fn output_is_sorted_by_session_id() {
        let result = plan(
            &[session("s3", "c"), session("s1", "a"), session("s2", "b")],
            &[],
            &PlanOptions::default(),
        );
        let ids: Vec<&str> = result.items.iter().map(|i| i.session_id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn planning_is_idempotent_and_order_independent() {
        let sessions = vec![session("s2", "b"), session("s1", "a")];
        let artifacts = vec![
            artifact("s1", "a", ArtifactStatus::Complete),
            artifact("s9", "x", ArtifactStatus::Complete),
        ];

        let first = plan(&sessions, &artifacts, &PlanOptions::default());
        let second = plan(&sessions, &artifacts, &PlanOptions::default());
        assert_eq!(actions(&first), actions(&second));

        let mut shuffled_sessions = sessions.clone();
        shuffled_sessions.reverse();
        let mut shuffled_artifacts = artifacts.clone();
        shuffled_artifacts.reverse();
        let third = plan(&shuffled_sessions, &shuffled_artifacts, &PlanOptions::default());
        assert_eq!(actions(&first), actions(&third));
    }

    #[test]
    fn duplicate_artifacts_newest_wins() {
        // The newer duplicate carries the current fingerprint, so the
        // session is up to date; the loss is flagged, not fatal.
        let result = plan(
            &[session("s1", "b")],
            &[
                artifact_at("s1", "a", ArtifactStatus::Complete, 0),
                artifact_at("s1", "b", ArtifactStatus::Complete, 100),
            ],
            &PlanOptions::default(),
        );
        assert_eq!(actions(&result), vec![("s1", PlanAction::Skip)]);
        assert_eq!(result.notes.len(), 1);
        let PlanNote::DuplicateArtifact { kept, discarded, .. } = &result.notes[0];
        assert!(kept.to_string_lossy().contains("-100"));
        assert!(discarded.to_string_lossy().contains("-0"));
    }

    #[test]
    fn duplicate_orphans_surface_once() {
        // No session claims s9: the winner is an orphan item, the loser a
        // superseded-duplicate item, each reported exactly once.
        let result = plan(
            &[],
            &[
                artifact_at("s9", "a", ArtifactStatus::Complete, 0),
                artifact_at("s9", "b", ArtifactStatus::Complete, 100),
            ],
            &PlanOptions::default(),
        );
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].action, PlanAction::ReportOrphan);
        assert_eq!(result.notes.len(), 1);
    }

    #[test]
    fn session_id_appears_at_most_once() {
        let result = plan(
            &[session("s1", "b")],
            &[
                artifact_at("s1", "a", ArtifactStatus::Complete, 0),
                artifact_at("s1", "b", ArtifactStatus::Complete, 100),
            ],
            &PlanOptions::default(),
        );
        let mut ids: Vec<&str> = result.items.iter().map(|i| i.session_id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), result.items.len());
    }

    #[test]
    fn complete_artifact_without_recorded_fingerprint_is_refreshed() {
        let mut record = artifact("s1", "a", ArtifactStatus::Complete);
        record.source_fingerprint = None;
        let result = plan(&[session("s1", "a")], &[record], &PlanOptions::default());
        assert_eq!(actions(&result), vec![("s1", PlanAction::Refresh)]);
    }
}
