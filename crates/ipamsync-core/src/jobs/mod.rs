// ── Background import jobs ──
//
// In-memory registry of import jobs. Each job runs on its own tokio task
// with a single writer; any number of readers poll or subscribe.

mod handle;
mod stream;

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::analyze::analyze_with;
use crate::config::ImportOptions;
use crate::error::CoreError;
use crate::execute::execute_with_progress;
use crate::ipam::IpamClient;
use crate::model::{ImportJob, ItemError, JobProgress, MappingRule, Plan, Source};
use crate::normalize::normalize_file;

pub use handle::JobHandle;
pub use stream::{JobWatch, ProgressStream};

use handle::JobSlot;

/// Registry of import jobs, keyed by id.
///
/// Jobs stay queryable after they finish until removed or pruned.
#[derive(Default)]
pub struct JobRegistry {
    jobs: DashMap<Uuid, Arc<JobSlot>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a queued job and return its writer handle.
    pub fn create(&self) -> JobHandle {
        let id = Uuid::new_v4();
        let slot = Arc::new(JobSlot::new(id));
        self.jobs.insert(id, Arc::clone(&slot));
        JobHandle::new(slot)
    }

    /// Execute an analyzed plan on a background task. Must be called
    /// from within a tokio runtime.
    pub fn spawn_import<C>(
        &self,
        client: Arc<C>,
        plan: Plan,
        rules: Vec<MappingRule>,
        view: String,
        options: ImportOptions,
    ) -> Uuid
    where
        C: IpamClient + 'static,
    {
        let handle = self.create();
        let id = handle.id();
        let span = info_span!("import_job", %id);

        tokio::spawn(
            async move {
                handle.start();
                let summary =
                    execute_with_progress(&client, plan, &rules, &view, &options, &handle).await;
                info!(
                    created = summary.created,
                    updated = summary.updated,
                    skipped = summary.skipped_overlap,
                    failed = summary.failed,
                    "import finished"
                );
            }
            .instrument(span),
        );

        id
    }

    /// Read, normalize, analyze, and execute `path` on a background task.
    ///
    /// An unreadable or undecodable file fails the whole job, as does an
    /// IPAM that does not answer before analysis starts.
    pub fn spawn_file_import<C>(
        &self,
        client: Arc<C>,
        path: PathBuf,
        source: Source,
        rules: Vec<MappingRule>,
        view: String,
        options: ImportOptions,
    ) -> Uuid
    where
        C: IpamClient + 'static,
    {
        let handle = self.create();
        let id = handle.id();
        let span = info_span!("import_job", %id, path = %path.display());

        tokio::spawn(
            async move {
                handle.start();

                let label = path.display().to_string();
                let parsed = tokio::task::spawn_blocking(move || normalize_file(&path, source))
                    .await
                    .map_err(|e| CoreError::Internal(e.to_string()))
                    .and_then(|r| r);

                let records = match parsed {
                    Ok(records) => records,
                    Err(e) => {
                        error!(error = %e, "cannot load input");
                        handle.fail(ItemError::new(label, e.to_string()));
                        return;
                    }
                };

                if let Err(e) = client.check_connectivity().await {
                    error!(error = %e, "IPAM unreachable");
                    handle.fail(ItemError::new("ipam", e.to_string()));
                    return;
                }

                let plan = analyze_with(&client, records, &view, &options, |_, _| {}).await;
                execute_with_progress(&client, plan, &rules, &view, &options, &handle).await;
            }
            .instrument(span),
        );

        id
    }

    /// Snapshot of a job's progress.
    pub fn progress(&self, id: Uuid) -> Option<JobProgress> {
        self.jobs.get(&id).map(|slot| slot.snapshot().snapshot())
    }

    /// Full job state, including errors and summary.
    pub fn job(&self, id: Uuid) -> Option<ImportJob> {
        self.jobs.get(&id).map(|slot| slot.snapshot())
    }

    /// Subscribe to a job's state changes.
    pub fn subscribe(&self, id: Uuid) -> Result<JobWatch, CoreError> {
        self.jobs
            .get(&id)
            .map(|slot| JobWatch::new(slot.state.subscribe()))
            .ok_or(CoreError::JobNotFound { id })
    }

    /// Progress of every job, oldest first.
    pub fn list(&self) -> Vec<JobProgress> {
        let mut jobs: Vec<ImportJob> = self.jobs.iter().map(|e| e.value().snapshot()).collect();
        jobs.sort_by(|a, b| a.started_at.cmp(&b.started_at).then(a.id.cmp(&b.id)));
        jobs.iter().map(ImportJob::snapshot).collect()
    }

    /// Forget a job. Returns its last state.
    pub fn remove(&self, id: Uuid) -> Option<ImportJob> {
        self.jobs.remove(&id).map(|(_, slot)| slot.snapshot())
    }

    /// Drop every completed or failed job. Returns how many were removed.
    pub fn prune_finished(&self) -> usize {
        let mut removed = 0;
        self.jobs.retain(|_, slot| {
            let keep = !slot.state.borrow().status.is_terminal();
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
