// ── Change analysis ──
//
// Classifies each proposed record against the IPAM. Records are analyzed
// independently; a failed lookup turns into an Error entry and analysis
// moves on.

use tracing::{debug, info_span, warn, Instrument};

use crate::config::ImportOptions;
use crate::error::CoreError;
use crate::ipam::IpamClient;
use crate::model::{ChangeSet, IpamNetwork, NetworkRecord, Plan, PlanEntry};

/// Classify `records` against the IPAM view with default pacing.
pub async fn analyze<C: IpamClient>(client: &C, records: Vec<NetworkRecord>, view: &str) -> Plan {
    analyze_with(client, records, view, &ImportOptions::default(), |_, _| {}).await
}

/// Classify `records`, pausing `options.call_delay` between records and
/// calling `on_progress(done, total)` after each one.
pub async fn analyze_with<C, F>(
    client: &C,
    records: Vec<NetworkRecord>,
    view: &str,
    options: &ImportOptions,
    mut on_progress: F,
) -> Plan
where
    C: IpamClient,
    F: FnMut(usize, usize),
{
    let total = records.len();
    let mut plan = Plan::default();

    for (idx, record) in records.into_iter().enumerate() {
        if idx > 0 {
            options.pause().await;
        }

        let span = info_span!("analyze", network = %record.address, name = %record.name);
        match classify(client, record, view).instrument(span).await {
            Ok(Some(entry)) => plan.entries.push(entry),
            Ok(None) => plan.up_to_date += 1,
            Err((address, err)) => {
                warn!(network = %address, error = %err, "analysis failed");
                plan.entries.push(PlanEntry::Error {
                    address,
                    message: err.to_string(),
                });
            }
        }
        on_progress(idx + 1, total);
    }

    plan
}

/// `Ok(None)` means the record is already up to date.
async fn classify<C: IpamClient>(
    client: &C,
    record: NetworkRecord,
    view: &str,
) -> Result<Option<PlanEntry>, (String, CoreError)> {
    let address = record.address.to_string();

    let existing = client
        .find_network_by_cidr(&record.address, view)
        .await
        .map_err(|e| (address.clone(), e))?;

    if let Some(existing) = existing {
        let diff = diff_record(&record, &existing);
        if diff.is_empty() {
            debug!("up to date");
            return Ok(None);
        }
        debug!(changes = %diff.describe(), "update");
        return Ok(Some(PlanEntry::Update {
            record,
            existing_ref: existing.reference,
            diff,
        }));
    }

    let conflicts = client
        .find_overlapping_networks(&record.address, view)
        .await
        .map_err(|e| (address, e))?;

    if conflicts.is_empty() {
        debug!("new");
        Ok(Some(PlanEntry::New { record }))
    } else {
        debug!(conflicts = conflicts.len(), "overlaps existing networks");
        Ok(Some(PlanEntry::OverlapSkip { record, conflicts }))
    }
}

/// Record-side differences against an existing network.
///
/// Comment is compared with the description. Each record tag must be
/// present on the network with the same string value; attributes only on
/// the IPAM side are ignored.
pub fn diff_record(record: &NetworkRecord, existing: &IpamNetwork) -> ChangeSet {
    let mut diff = ChangeSet::default();

    if existing.comment != record.description {
        diff.comment = Some((existing.comment.clone(), record.description.clone()));
    }

    for (key, value) in &record.tags {
        match existing.attribute(key) {
            None => diff.added.push(key.clone()),
            Some(current) if current != *value => diff.changed.push(key.clone()),
            Some(_) => {}
        }
    }

    diff
}

/// True if the record differs from the existing network.
pub fn has_changes(record: &NetworkRecord, existing: &IpamNetwork) -> bool {
    !diff_record(record, existing).is_empty()
}
