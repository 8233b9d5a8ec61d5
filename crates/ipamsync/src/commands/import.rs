//! `import`: normalize an inventory, preview the plan, and apply it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tabled::Tabled;

use ipamsync_core::{
    CoreError, ImportJob, ImportSummary, JobRegistry, JobStatus, MappingRule, NetworkRecord, Plan,
    PlanEntry, Source, WapiClient, analyze_with, load_mapping_file, normalize_file,
};

use crate::cli::{GlobalOpts, ImportArgs, OutputFormat};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::grid::auth_context;
use super::util;

/// Plan entries listed per category before collapsing.
const PREVIEW_LIMIT: usize = 5;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
}

#[derive(Tabled)]
struct ErrorRow {
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Error")]
    message: String,
}

// ── Rendering ───────────────────────────────────────────────────────

fn plan_detail(plan: &Plan) -> String {
    let counts = [
        CountRow {
            category: "New Networks",
            count: plan.new_count(),
        },
        CountRow {
            category: "Updated Networks",
            count: plan.update_count(),
        },
        CountRow {
            category: "Overlapping Networks",
            count: plan.overlap_count(),
        },
        CountRow {
            category: "Errors",
            count: plan.error_count(),
        },
        CountRow {
            category: "Up to date",
            count: plan.up_to_date,
        },
    ];
    let mut out = output::render_table(&counts);

    let pick = |kind: &str| -> Vec<&PlanEntry> {
        plan.entries.iter().filter(|e| e.kind() == kind).collect()
    };
    let sections: [(&str, Vec<&PlanEntry>); 4] = [
        ("New networks to create:", pick("new")),
        ("Networks to update:", pick("update")),
        ("Overlapping networks (will be skipped):", pick("overlap")),
        ("Errors:", pick("error")),
    ];
    for (title, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        out.push_str("\n\n");
        out.push_str(title);
        for line in util::truncated(&entries, PREVIEW_LIMIT, |e| entry_line(e)) {
            out.push('\n');
            out.push_str(&line);
        }
    }
    out
}

fn entry_line(entry: &PlanEntry) -> String {
    match entry {
        PlanEntry::New { record } => format!("  • {} - {}", record.address, record.name),
        PlanEntry::Update { record, diff, .. } => {
            format!("  • {} - {} ({})", record.address, record.name, diff.describe())
        }
        PlanEntry::OverlapSkip { record, conflicts } => format!(
            "  • {} overlaps with {} existing network(s): {}",
            record.address,
            conflicts.len(),
            conflicts
                .iter()
                .map(|c| c.network.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        PlanEntry::Error { address, message } => format!("  • {address}: {message}"),
    }
}

fn plan_ids(plan: &Plan) -> String {
    plan.entries
        .iter()
        .map(|e| format!("{}\t{}", e.kind(), e.address()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn summary_detail(summary: &ImportSummary) -> String {
    let counts = [
        CountRow {
            category: "Created",
            count: summary.created,
        },
        CountRow {
            category: "Updated",
            count: summary.updated,
        },
        CountRow {
            category: "Skipped (overlap)",
            count: summary.skipped_overlap,
        },
        CountRow {
            category: "Failed",
            count: summary.failed,
        },
        CountRow {
            category: "Up to date",
            count: summary.up_to_date,
        },
    ];
    let mut out = output::render_table(&counts);
    if !summary.errors.is_empty() {
        let rows: Vec<ErrorRow> = summary
            .errors
            .iter()
            .map(|e| ErrorRow {
                network: e.network.clone(),
                message: e.message.clone(),
            })
            .collect();
        out.push_str("\n\nErrors:\n");
        out.push_str(&output::render_table(&rows));
    }
    out
}

fn summary_ids(summary: &ImportSummary) -> String {
    summary
        .created_networks
        .iter()
        .chain(&summary.updated_networks)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Steps ───────────────────────────────────────────────────────────

async fn load_records(path: PathBuf, source: Source) -> Result<Vec<NetworkRecord>, CliError> {
    let records = tokio::task::spawn_blocking(move || normalize_file(&path, source))
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))??;
    Ok(records)
}

/// A mapping file that fails to load is reported and ignored.
fn load_rules(args: &ImportArgs, quiet: bool) -> Vec<MappingRule> {
    let Some(ref path) = args.mapping_file else {
        return Vec::new();
    };
    match load_mapping_file(path) {
        Ok(config) => {
            if !quiet {
                output::success(&format!("Loaded {} mapping rule(s)", config.mappings.len()));
            }
            config.mappings
        }
        Err(e) => {
            tracing::warn!(error = %e, "ignoring mapping file");
            output::warning(&format!("Failed to load mapping file: {e}"));
            Vec::new()
        }
    }
}

/// Follow a background job until it finishes, driving a progress bar.
async fn follow(
    registry: &JobRegistry,
    id: uuid::Uuid,
    quiet: bool,
) -> Result<ImportJob, CliError> {
    let mut watch = registry.subscribe(id)?;
    let bar = util::counter(watch.current().total, "Importing", quiet);

    let job = loop {
        let current = watch.current();
        bar.set_length(util::as_u64(current.total));
        bar.set_position(util::as_u64(current.processed));
        if current.status.is_terminal() {
            break current.clone();
        }
        if watch.changed().await.is_none() {
            break watch.latest();
        }
    };

    bar.finish_and_clear();
    Ok(job)
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    args: ImportArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let quiet = global.quiet;
    let source = Source::from(args.source);
    let view = resolved.connection.network_view.clone();
    let mut options = resolved.import.clone();
    if let Some(ms) = args.delay_ms {
        options.call_delay = Duration::from_millis(ms);
    }

    if !quiet {
        output::heading("Infoblox network import");
        eprintln!("Source: {source} | File: {} | View: {view}\n", args.file.display());
    }

    // 1. Connect
    let spinner = util::spinner("Connecting to Infoblox...", quiet);
    let connected = ipamsync_core::connect(&resolved.connection).await;
    spinner.finish_and_clear();
    let client: WapiClient = connected.map_err(|e| auth_context(e, &resolved.profile_name))?;
    if !quiet {
        output::success("Connected to Infoblox Grid Master");
    }

    // 2. Normalize
    let records = load_records(args.file.clone(), source).await?;
    if !quiet {
        output::success(&format!("Parsed {} networks from file", records.len()));
    }

    // 3. Mapping rules
    let rules = load_rules(&args, quiet);

    // 4. Analyze
    let bar = util::counter(records.len(), "Analyzing", quiet);
    let plan = analyze_with(&client, records, &view, &options, |done, _| {
        bar.set_position(util::as_u64(done));
    })
    .await;
    bar.finish_and_clear();

    // Structured formats print only the final document.
    if args.dry_run || matches!(global.output, OutputFormat::Table) {
        let out = output::render_single(&global.output, &plan, plan_detail, plan_ids)?;
        output::print_output(&out, quiet);
    }

    if args.dry_run {
        if !quiet {
            output::warning("Dry run mode - no changes will be applied");
        }
        return Ok(());
    }

    if !plan.has_work() {
        if !quiet {
            output::warning("No changes to apply");
        }
        return Ok(());
    }

    // 5. Confirm
    if !util::confirm("Proceed with import?", global.yes || args.no_confirm)? {
        output::warning("Import cancelled");
        return Ok(());
    }

    // 6. Execute in the background and follow progress
    let registry = JobRegistry::new();
    let id = registry.spawn_import(Arc::new(client), plan, rules, view, options);
    tracing::info!(%id, "import job started");
    let job = follow(&registry, id, quiet).await?;

    let summary = match (job.status, job.summary) {
        (JobStatus::Completed, Some(summary)) => summary,
        _ => {
            let message = job
                .errors
                .first()
                .map_or_else(|| "import job failed".to_owned(), |e| e.message.clone());
            return Err(CliError::ApiError { message });
        }
    };

    let out = output::render_single(&global.output, &summary, summary_detail, summary_ids)?;
    output::print_output(&out, quiet);

    if summary.failed > 0 {
        return Err(CliError::PartialImport {
            failed: summary.failed,
        });
    }
    if !quiet {
        output::success("Import completed");
    }
    Ok(())
}
