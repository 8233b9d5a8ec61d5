// ── Analysis output ──

use serde::{Deserialize, Serialize};

use crate::model::ipam::IpamNetwork;
use crate::model::record::NetworkRecord;

/// What differs between a record and its existing IPAM network.
///
/// Only record-side keys are considered; attributes present only on the
/// IPAM side never show up here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// `(old, new)` when the comment differs from the description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<(String, String)>,
    /// Tag keys absent on the existing network.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,
    /// Tag keys whose value differs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changed: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.comment.is_none() && self.added.is_empty() && self.changed.is_empty()
    }

    /// One-line description for reports.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.comment.is_some() {
            parts.push("comment".to_owned());
        }
        if !self.added.is_empty() {
            parts.push(format!("+{}", self.added.join(",+")));
        }
        if !self.changed.is_empty() {
            parts.push(format!("~{}", self.changed.join(",~")));
        }
        parts.join(" ")
    }
}

/// Classification of one proposed network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlanEntry {
    New {
        record: NetworkRecord,
    },
    Update {
        record: NetworkRecord,
        existing_ref: String,
        diff: ChangeSet,
    },
    OverlapSkip {
        record: NetworkRecord,
        conflicts: Vec<IpamNetwork>,
    },
    Error {
        address: String,
        message: String,
    },
}

impl PlanEntry {
    /// The CIDR this entry concerns, as a string.
    pub fn address(&self) -> String {
        match self {
            Self::New { record } | Self::Update { record, .. } | Self::OverlapSkip { record, .. } => {
                record.address.to_string()
            }
            Self::Error { address, .. } => address.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::New { .. } => "new",
            Self::Update { .. } => "update",
            Self::OverlapSkip { .. } => "overlap",
            Self::Error { .. } => "error",
        }
    }
}

/// Ordered classification of an input batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Entries in input order. Up-to-date records are not listed.
    pub entries: Vec<PlanEntry>,
    /// Records that already match the IPAM exactly.
    pub up_to_date: usize,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn new_count(&self) -> usize {
        self.count(|e| matches!(e, PlanEntry::New { .. }))
    }

    pub fn update_count(&self) -> usize {
        self.count(|e| matches!(e, PlanEntry::Update { .. }))
    }

    pub fn overlap_count(&self) -> usize {
        self.count(|e| matches!(e, PlanEntry::OverlapSkip { .. }))
    }

    pub fn error_count(&self) -> usize {
        self.count(|e| matches!(e, PlanEntry::Error { .. }))
    }

    /// True when executing would submit at least one create or update.
    pub fn has_work(&self) -> bool {
        self.new_count() + self.update_count() > 0
    }

    fn count(&self, pred: impl Fn(&PlanEntry) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(e)).count()
    }
}
