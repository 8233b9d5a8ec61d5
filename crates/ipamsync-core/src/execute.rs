// ── Import execution ──
//
// Applies the actionable subset of a plan. Each entry is isolated: a
// failed create or update is recorded and execution continues.

use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::ImportOptions;
use crate::ipam::IpamClient;
use crate::jobs::JobHandle;
use crate::mapping::map_tags_to_attributes;
use crate::model::{
    AttributeType, ImportSummary, ItemError, MappingRule, NetworkRecord, Plan, PlanEntry,
    SkippedNetwork,
};

/// Execute `plan` without external progress tracking.
pub async fn execute<C: IpamClient>(
    client: &C,
    plan: Plan,
    rules: &[MappingRule],
    view: &str,
    options: &ImportOptions,
) -> ImportSummary {
    let handle = JobHandle::detached();
    handle.start();
    execute_with_progress(client, plan, rules, view, options, &handle).await
}

/// Execute `plan`, publishing progress through `handle`.
///
/// `handle` ends in the completed state carrying the returned summary.
pub async fn execute_with_progress<C: IpamClient>(
    client: &C,
    plan: Plan,
    rules: &[MappingRule],
    view: &str,
    options: &ImportOptions,
    handle: &JobHandle,
) -> ImportSummary {
    let mut summary = ImportSummary {
        up_to_date: plan.up_to_date,
        ..ImportSummary::default()
    };
    handle.set_total(plan.entries.len());

    let mut submitted = false;
    for entry in plan.entries {
        let address = entry.address();
        let span = info_span!("execute", network = %address, action = entry.kind());

        let failure = async {
            match entry {
                PlanEntry::New { record } => {
                    if submitted {
                        options.pause().await;
                    }
                    submitted = true;
                    create(client, &record, rules, view, options)
                        .await
                        .map(|()| summary.created_networks.push(address.clone()))
                        .err()
                }
                PlanEntry::Update {
                    record,
                    existing_ref,
                    ..
                } => {
                    if submitted {
                        options.pause().await;
                    }
                    submitted = true;
                    update(client, &record, &existing_ref, rules)
                        .await
                        .map(|()| summary.updated_networks.push(address.clone()))
                        .err()
                }
                PlanEntry::OverlapSkip { record, conflicts } => {
                    debug!(conflicts = conflicts.len(), "skipped: overlaps existing networks");
                    summary.skipped.push(SkippedNetwork {
                        network: address.clone(),
                        name: record.name,
                        conflicts: conflicts.into_iter().map(|c| c.network).collect(),
                    });
                    None
                }
                PlanEntry::Error { message, .. } => Some(message),
            }
        }
        .instrument(span)
        .await;

        let item_error = failure.map(|message| {
            warn!(network = %address, error = %message, "import failed");
            summary.failed += 1;
            let err = ItemError::new(address, message);
            if summary.errors.len() < options.max_reported_errors {
                summary.errors.push(err.clone());
            }
            err
        });

        handle.advance(item_error);
    }

    summary.created = summary.created_networks.len();
    summary.updated = summary.updated_networks.len();
    summary.skipped_overlap = summary.skipped.len();

    info!(
        created = summary.created,
        updated = summary.updated,
        skipped = summary.skipped_overlap,
        failed = summary.failed,
        up_to_date = summary.up_to_date,
        "execution complete"
    );
    handle.complete(summary.clone());
    summary
}

async fn create<C: IpamClient>(
    client: &C,
    record: &NetworkRecord,
    rules: &[MappingRule],
    view: &str,
    options: &ImportOptions,
) -> Result<(), String> {
    let attributes = map_tags_to_attributes(record, rules);

    for name in attributes.keys() {
        // Definition already existing, or lacking rights to create it, is
        // not fatal; the create call reports anything that matters.
        if let Err(e) = client
            .ensure_attribute_definition(name, AttributeType::String)
            .await
        {
            debug!(attribute = %name, error = %e, "attribute definition not ensured");
        }
        options.pause().await;
    }

    let reference = client
        .create_network(&record.address, view, &record.description, &attributes)
        .await
        .map_err(|e| e.to_string())?;
    debug!(reference = %reference, "created");
    Ok(())
}

async fn update<C: IpamClient>(
    client: &C,
    record: &NetworkRecord,
    existing_ref: &str,
    rules: &[MappingRule],
) -> Result<(), String> {
    let attributes = map_tags_to_attributes(record, rules);
    let reference = client
        .update_network(existing_ref, &record.description, &attributes)
        .await
        .map_err(|e| e.to_string())?;
    debug!(reference = %reference, "updated");
    Ok(())
}
