//! Reconciliation engine between cloud network inventories and Infoblox.
//!
//! - **[`normalize`]** reads AWS, Azure, GCP, Alibaba, property, and custom
//!   exports (CSV or Excel) into canonical [`NetworkRecord`]s.
//!
//! - **[`analyze()`]** classifies each record against the IPAM through an
//!   [`IpamClient`]: new, update, overlap-skip, or error. Records that
//!   already match are counted as up to date.
//!
//! - **[`mapping`]** turns record tags into extensible attributes under
//!   ordered [`MappingRule`]s, stamping provenance attributes.
//!
//! - **[`execute()`]** applies the actionable subset of a [`Plan`], isolating
//!   per-record failures, and reports an [`ImportSummary`].
//!
//! - **[`JobRegistry`]** runs imports on background tasks and exposes their
//!   progress as snapshots or `watch`-backed streams.

pub mod analyze;
pub mod cidr;
pub mod config;
pub mod convert;
pub mod error;
pub mod execute;
pub mod ipam;
pub mod jobs;
pub mod mapping;
pub mod model;
pub mod normalize;

// ── Primary re-exports ──────────────────────────────────────────────
pub use analyze::{analyze, analyze_with, diff_record, has_changes};
pub use cidr::Cidr;
pub use config::{ConnectionConfig, ImportOptions, TlsVerification};
pub use error::CoreError;
pub use execute::{execute, execute_with_progress};
pub use ipam::{IpamClient, build_client, connect};
pub use jobs::{JobHandle, JobRegistry, JobWatch, ProgressStream};
pub use mapping::{
    MappingConfig, load_mapping_file, map_tags_to_attributes, map_with_timestamp, template_for,
};
pub use normalize::{normalize_file, normalize_table};

pub use model::{
    AttributeType, ChangeSet, ExtAttrValue, ImportJob, ImportSummary, IpamNetwork, ItemError,
    JobProgress, JobStatus, MappingRule, NetworkRecord, Plan, PlanEntry, SkippedNetwork, Source,
    Transform,
};

// The concrete IPAM client and its read-only listing types.
pub use ipamsync_api::{ExtensibleAttributeDef, GridMember, NetworkView, WapiClient};
