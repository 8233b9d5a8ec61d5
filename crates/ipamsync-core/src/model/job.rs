// ── Import job state and results ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One failed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemError {
    /// CIDR of the record, or the input path for batch-fatal failures.
    pub network: String,
    pub message: String,
}

impl ItemError {
    pub fn new(network: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            message: message.into(),
        }
    }
}

/// Network skipped because it overlaps existing IPAM networks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedNetwork {
    pub network: String,
    pub name: String,
    /// CIDRs of the conflicting IPAM networks.
    pub conflicts: Vec<String>,
}

/// Outcome counts of one execution. The four action counts are disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped_overlap: usize,
    pub failed: usize,
    pub up_to_date: usize,
    /// Bounded; `failed` still counts every failure.
    pub errors: Vec<ItemError>,
    pub created_networks: Vec<String>,
    pub updated_networks: Vec<String>,
    pub skipped: Vec<SkippedNetwork>,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.skipped_overlap + self.failed + self.up_to_date
    }

    /// True when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// A tracked import. Written only by its executor task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportJob {
    pub id: Uuid,
    pub status: JobStatus,
    pub total: usize,
    pub processed: usize,
    /// Every item failure, in input order.
    pub errors: Vec<ItemError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ImportSummary>,
}

impl ImportJob {
    pub fn queued(id: Uuid) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            total: 0,
            processed: 0,
            errors: Vec::new(),
            started_at: None,
            completed_at: None,
            summary: None,
        }
    }

    /// Percentage complete, truncated. A finished empty job reads 100.
    pub fn progress(&self) -> u8 {
        if self.total == 0 {
            return if self.status.is_terminal() { 100 } else { 0 };
        }
        let pct = (self.processed.min(self.total) * 100) / self.total;
        u8::try_from(pct).unwrap_or(100)
    }

    pub fn snapshot(&self) -> JobProgress {
        JobProgress {
            id: self.id,
            status: self.status,
            progress: self.progress(),
            processed: self.processed,
            total: self.total,
            error_count: self.errors.len(),
        }
    }
}

/// Point-in-time progress of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProgress {
    pub id: Uuid,
    pub status: JobStatus,
    pub progress: u8,
    pub processed: usize,
    pub total: usize,
    pub error_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_truncates() {
        let mut job = ImportJob::queued(Uuid::new_v4());
        job.total = 3;
        job.processed = 1;
        assert_eq!(job.progress(), 33);
        job.processed = 2;
        assert_eq!(job.progress(), 66);
    }

    #[test]
    fn empty_job_reads_complete_only_when_terminal() {
        let mut job = ImportJob::queued(Uuid::new_v4());
        assert_eq!(job.progress(), 0);
        job.status = JobStatus::Completed;
        assert_eq!(job.progress(), 100);
    }
}
