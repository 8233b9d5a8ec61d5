// ── Job writer handle ──
//
// The executor task owns the only `JobHandle` for a job and publishes
// every state change through the slot's watch channel. Readers never
// block it.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use uuid::Uuid;

use crate::model::{ImportJob, ImportSummary, ItemError, JobStatus};

/// Storage for one job: the watch sender holding its latest state.
pub(crate) struct JobSlot {
    pub(crate) state: watch::Sender<ImportJob>,
}

impl JobSlot {
    pub(crate) fn new(id: Uuid) -> Self {
        let (state, _) = watch::channel(ImportJob::queued(id));
        Self { state }
    }

    pub(crate) fn snapshot(&self) -> ImportJob {
        self.state.borrow().clone()
    }
}

/// Write access to a job's progress.
///
/// The final `processed` increment is held back until `complete` or
/// `fail`, so readers see `processed == total` only on a terminal job.
pub struct JobHandle {
    slot: Arc<JobSlot>,
}

impl JobHandle {
    pub(crate) fn new(slot: Arc<JobSlot>) -> Self {
        Self { slot }
    }

    /// A handle not tracked by any registry, for synchronous runs.
    pub fn detached() -> Self {
        Self::new(Arc::new(JobSlot::new(Uuid::new_v4())))
    }

    pub fn id(&self) -> Uuid {
        self.slot.state.borrow().id
    }

    pub fn snapshot(&self) -> ImportJob {
        self.slot.snapshot()
    }

    /// Move to `processing`. Records the start time on first call.
    pub fn start(&self) {
        self.slot.state.send_modify(|job| {
            job.status = JobStatus::Processing;
            job.started_at.get_or_insert_with(Utc::now);
        });
    }

    /// Fix the number of entries this job will process.
    pub fn set_total(&self, total: usize) {
        self.slot.state.send_modify(|job| {
            job.total = total;
            job.processed = 0;
        });
    }

    /// Count one processed entry, recording its failure if any.
    pub fn advance(&self, error: Option<ItemError>) {
        self.slot.state.send_modify(|job| {
            if job.processed + 1 < job.total {
                job.processed += 1;
            }
            job.errors.extend(error);
        });
    }

    /// Terminal success.
    pub fn complete(&self, summary: ImportSummary) {
        self.slot.state.send_modify(|job| {
            job.processed = job.total;
            job.status = JobStatus::Completed;
            job.completed_at = Some(Utc::now());
            job.summary = Some(summary);
        });
    }

    /// Terminal batch-level failure.
    pub fn fail(&self, error: ItemError) {
        self.slot.state.send_modify(|job| {
            job.errors.push(error);
            job.processed = job.total;
            job.status = JobStatus::Failed;
            job.started_at.get_or_insert_with(Utc::now);
            job.completed_at = Some(Utc::now());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_increment_waits_for_terminal_state() {
        let handle = JobHandle::detached();
        handle.start();
        handle.set_total(2);

        handle.advance(None);
        assert_eq!(handle.snapshot().processed, 1);

        handle.advance(Some(ItemError::new("10.0.0.0/24", "boom")));
        let job = handle.snapshot();
        assert_eq!(job.processed, 1);
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.errors.len(), 1);

        handle.complete(ImportSummary::default());
        let job = handle.snapshot();
        assert_eq!(job.processed, 2);
        assert_eq!(job.progress(), 100);
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn fail_marks_job_terminal() {
        let handle = JobHandle::detached();
        handle.fail(ItemError::new("inventory.csv", "no such file"));
        let job = handle.snapshot();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.errors.len(), 1);
        assert_eq!(job.progress(), 100);
    }
}
