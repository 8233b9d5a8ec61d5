// ── Domain model ──

pub mod ipam;
pub mod job;
pub mod plan;
pub mod record;
pub mod rule;

pub use ipam::{AttributeType, ExtAttrValue, IpamNetwork};
pub use job::{ImportJob, ImportSummary, ItemError, JobProgress, JobStatus, SkippedNetwork};
pub use plan::{ChangeSet, Plan, PlanEntry};
pub use record::{NetworkRecord, Source};
pub use rule::{MappingRule, Transform};
