// ── Job progress subscriptions ──

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::{ImportJob, JobProgress};

/// A subscription to one job's state.
///
/// Dropping it leaves the job untouched.
pub struct JobWatch {
    current: ImportJob,
    receiver: watch::Receiver<ImportJob>,
}

impl JobWatch {
    pub(crate) fn new(receiver: watch::Receiver<ImportJob>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// State captured at subscription or the last `changed()`.
    pub fn current(&self) -> &ImportJob {
        &self.current
    }

    /// Latest published state.
    pub fn latest(&self) -> ImportJob {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. `None` once the job's writer and
    /// registry entry are both gone.
    pub async fn changed(&mut self) -> Option<JobProgress> {
        self.receiver.changed().await.ok()?;
        self.current = self.receiver.borrow_and_update().clone();
        Some(self.current.snapshot())
    }

    /// Wait until the job is completed or failed and return its final state.
    pub async fn wait_terminal(&mut self) -> ImportJob {
        loop {
            if self.current.status.is_terminal() {
                return self.current.clone();
            }
            if self.changed().await.is_none() {
                return self.latest();
            }
        }
    }

    /// Convert into a `Stream` of progress snapshots.
    pub fn into_stream(self) -> ProgressStream {
        ProgressStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding a `JobProgress` for every published change,
/// starting with the current state.
pub struct ProgressStream {
    inner: WatchStream<ImportJob>,
}

impl Stream for ProgressStream {
    type Item = JobProgress;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner)
            .poll_next(cx)
            .map(|job| job.map(|j| j.snapshot()))
    }
}
