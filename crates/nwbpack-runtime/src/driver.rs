use crate::executor::Executor;
use crate::writer::ArtifactWriter;
use nwbpack_types::{
    BatchResult, ItemOutcome, Plan, PlanItem, ReportRow, SessionId, SessionRecord,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};

/// Cooperative shutdown request shared between the CLI signal handler and
/// the worker pool. Workers finish the item in flight; nothing new is
/// dispatched once the flag is set.
#[derive(Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Worker pool bound for `create`/`refresh` items.
    pub concurrency: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// Progress events surfaced to the caller while a batch runs. Rendering is
/// the CLI's business; the runtime never prints.
#[derive(Debug, Clone)]
pub enum BatchProgress {
    Started {
        actionable: usize,
        total: usize,
    },
    ItemStarted {
        session_id: SessionId,
    },
    ItemFinished {
        session_id: SessionId,
        outcome: ItemOutcome,
    },
    Interrupted {
        undispatched: usize,
    },
    Completed {
        succeeded: usize,
        failed: usize,
        skipped: usize,
    },
}

/// Runs a reconciliation plan to completion.
///
/// `skip` and `report_orphan` items are recorded without touching the
/// executor. Execution order across workers is unspecified; results land in
/// one pre-allocated slot per plan item, so the report is always in plan
/// order.
pub struct BatchDriver<W> {
    executor: Executor<W>,
    options: BatchOptions,
}

enum WorkerMessage {
    Started(usize),
    Finished(usize, ItemOutcome),
}

impl<W: ArtifactWriter> BatchDriver<W> {
    pub fn new(executor: Executor<W>, options: BatchOptions) -> Self {
        Self { executor, options }
    }

    pub fn run<F>(
        &self,
        plan: &Plan,
        sessions: &[SessionRecord],
        shutdown: &ShutdownFlag,
        mut on_progress: F,
    ) -> BatchResult
    where
        F: FnMut(BatchProgress),
    {
        let sessions_by_id: HashMap<&SessionId, &SessionRecord> =
            sessions.iter().map(|s| (&s.session_id, s)).collect();

        let mut slots: Vec<Option<ItemOutcome>> = vec![None; plan.items.len()];
        let mut actionable: Vec<usize> = Vec::new();

        for (idx, item) in plan.items.iter().enumerate() {
            if item.action.is_actionable() {
                actionable.push(idx);
            } else {
                slots[idx] = Some(ItemOutcome::Skipped {
                    reason: item.reason.clone(),
                });
            }
        }

        on_progress(BatchProgress::Started {
            actionable: actionable.len(),
            total: plan.items.len(),
        });

        let workers = self.options.concurrency.max(1).min(actionable.len().max(1));
        if workers <= 1 {
            self.run_sequential(plan, &sessions_by_id, &actionable, &mut slots, shutdown, &mut on_progress);
        } else {
            self.run_pool(
                plan,
                &sessions_by_id,
                &actionable,
                &mut slots,
                shutdown,
                workers,
                &mut on_progress,
            );
        }

        let undispatched = slots.iter().filter(|s| s.is_none()).count();
        if undispatched > 0 {
            on_progress(BatchProgress::Interrupted { undispatched });
        }

        let rows: Vec<ReportRow> = plan
            .items
            .iter()
            .zip(slots)
            .map(|(item, slot)| {
                let outcome = slot.unwrap_or(ItemOutcome::Skipped {
                    reason: "interrupted before dispatch".to_string(),
                });
                ReportRow::new(item, outcome)
            })
            .collect();

        let result = BatchResult {
            rows,
            interrupted: shutdown.is_requested(),
        };

        on_progress(BatchProgress::Completed {
            succeeded: result.succeeded(),
            failed: result.failed(),
            skipped: result.skipped(),
        });

        result
    }

    fn run_sequential<F>(
        &self,
        plan: &Plan,
        sessions_by_id: &HashMap<&SessionId, &SessionRecord>,
        actionable: &[usize],
        slots: &mut [Option<ItemOutcome>],
        shutdown: &ShutdownFlag,
        on_progress: &mut F,
    ) where
        F: FnMut(BatchProgress),
    {
        for &idx in actionable {
            if shutdown.is_requested() {
                break;
            }
            let item = &plan.items[idx];
            on_progress(BatchProgress::ItemStarted {
                session_id: item.session_id.clone(),
            });
            let outcome = self.run_item(item, sessions_by_id);
            on_progress(BatchProgress::ItemFinished {
                session_id: item.session_id.clone(),
                outcome: outcome.clone(),
            });
            slots[idx] = Some(outcome);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn run_pool<F>(
        &self,
        plan: &Plan,
        sessions_by_id: &HashMap<&SessionId, &SessionRecord>,
        actionable: &[usize],
        slots: &mut [Option<ItemOutcome>],
        shutdown: &ShutdownFlag,
        workers: usize,
        on_progress: &mut F,
    ) where
        F: FnMut(BatchProgress),
    {
        let cursor = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<WorkerMessage>();

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let cursor = &cursor;
                scope.spawn(move || {
                    loop {
                        if shutdown.is_requested() {
                            break;
                        }
                        let claim = cursor.fetch_add(1, Ordering::SeqCst);
                        if claim >= actionable.len() {
                            break;
                        }
                        let idx = actionable[claim];
                        let item = &plan.items[idx];
                        if tx.send(WorkerMessage::Started(idx)).is_err() {
                            break;
                        }
                        let outcome = self.run_item(item, sessions_by_id);
                        if tx.send(WorkerMessage::Finished(idx, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(tx);

            // Each slot is written exactly once, by the single receiver.
            for message in rx {
                match message {
                    WorkerMessage::Started(idx) => {
                        on_progress(BatchProgress::ItemStarted {
                            session_id: plan.items[idx].session_id.clone(),
                        });
                    }
                    WorkerMessage::Finished(idx, outcome) => {
                        on_progress(BatchProgress::ItemFinished {
                            session_id: plan.items[idx].session_id.clone(),
                            outcome: outcome.clone(),
                        });
                        slots[idx] = Some(outcome);
                    }
                }
            }
        });
    }

    fn run_item(
        &self,
        item: &PlanItem,
        sessions_by_id: &HashMap<&SessionId, &SessionRecord>,
    ) -> ItemOutcome {
        match sessions_by_id.get(&item.session_id) {
            Some(session) => self.executor.execute(item, session),
            // A plan item with no session record cannot occur for plans
            // built from the same catalogs; treat it as skipped, not fatal.
            None => ItemOutcome::Skipped {
                reason: "session record unavailable".to_string(),
            },
        }
    }
}
