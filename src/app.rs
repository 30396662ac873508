use std::path::PathBuf;
use std::time::Duration;

use serde_json::json;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::consts::DEFAULT_API_URL;
use crate::diff::diff_snapshots;
use crate::error::AppError;
use crate::output::{
    TableOptions, TextOptions, diff_json_lines, render_diff, render_snapshot_table,
    snapshot_list_json,
};
use crate::pricing::{DEFAULT_FETCH_TIMEOUT, DeepInfraApi, ModelSource, normalize_model};
use crate::snapshot::{Snapshot, SnapshotStore};
use crate::utils::{Timezone, run_on_change};

/// Result of one fetch run
#[derive(Debug)]
pub(crate) struct FetchOutcome {
    pub(crate) hash: String,
    pub(crate) changed: bool,
    pub(crate) prev_hash: Option<String>,
    pub(crate) models: usize,
    pub(crate) path: PathBuf,
}

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) store: SnapshotStore,
    pub(crate) timezone: Timezone,
}

/// Fetch, normalize and cache the current model list.
///
/// Nothing is written when the fetched records match the latest snapshot.
/// Returning to an older cached state rewrites that file with the new
/// capture time so it becomes the latest again. The on-change command only
/// runs when the state changed and an earlier snapshot existed.
pub(crate) fn fetch_snapshot(
    source: &dyn ModelSource,
    store: &SnapshotStore,
    on_change: Option<&str>,
    now: i64,
) -> Result<FetchOutcome, AppError> {
    tracing::info!("fetching models from {}", source.display_name());
    let raw = source.fetch()?;
    let records = raw
        .iter()
        .map(normalize_model)
        .collect::<Result<Vec<_>, _>>()?;

    let snapshot = Snapshot::new(records, now);
    let hash = snapshot.hash();
    let prev_hash = store.latest()?.map(|entry| entry.hash);
    if prev_hash.as_deref() == Some(hash.as_str()) {
        tracing::info!(hash = %hash, "no changes detected");
        return Ok(FetchOutcome {
            path: store.path_for(&hash),
            hash,
            changed: false,
            prev_hash: None,
            models: snapshot.len(),
        });
    }

    if store.contains(&hash) {
        tracing::info!(hash = %hash, "returned to an earlier snapshot");
    }
    let (hash, path) = store.save(&snapshot)?;
    tracing::info!(hash = %hash, models = snapshot.len(), "saved new snapshot");

    if let (Some(template), Some(prev)) = (on_change, prev_hash.as_deref()) {
        run_on_change(template, &hash, prev)?;
    }

    Ok(FetchOutcome {
        hash,
        changed: true,
        prev_hash,
        models: snapshot.len(),
        path,
    })
}

fn handle_fetch(
    ctx: &CommandContext<'_>,
    config: &Config,
    api_url: Option<&str>,
    on_change: Option<&str>,
    timeout: Option<u64>,
) -> Result<(), AppError> {
    let url = api_url
        .or(config.api_url.as_deref())
        .unwrap_or(DEFAULT_API_URL);
    let timeout = timeout
        .or(config.timeout_secs)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_FETCH_TIMEOUT);
    let on_change = on_change.or(config.on_change.as_deref());

    let source = DeepInfraApi::new(url, timeout);
    let outcome = fetch_snapshot(
        &source,
        &ctx.store,
        on_change,
        chrono::Utc::now().timestamp(),
    )?;

    if ctx.cli.json {
        println!(
            "{}",
            json!({
                "hash": outcome.hash,
                "changed": outcome.changed,
                "prev_hash": outcome.prev_hash,
                "models": outcome.models,
            })
        );
    } else if outcome.changed {
        println!(
            "Saved snapshot {} ({} models) to {}",
            outcome.hash,
            outcome.models,
            outcome.path.display()
        );
        if let Some(prev) = &outcome.prev_hash {
            println!("Previous snapshot: {prev}");
        }
    } else {
        println!(
            "No changes since snapshot {} ({} models)",
            outcome.hash, outcome.models
        );
    }
    Ok(())
}

fn handle_diff(ctx: &CommandContext<'_>, old: &str, new: &str) -> Result<(), AppError> {
    let old_hash = ctx.store.resolve(old)?;
    let new_hash = ctx.store.resolve(new)?;

    if old_hash == new_hash {
        if ctx.cli.json {
            tracing::info!("same hashes provided. No comparison needed.");
        } else {
            println!("same hashes provided. No comparison needed.");
        }
        return Ok(());
    }

    let old_snapshot = ctx.store.load(&old_hash)?;
    let new_snapshot = ctx.store.load(&new_hash)?;
    let report = diff_snapshots(&old_snapshot, &new_snapshot);

    if ctx.cli.json {
        tracing::info!("comparing states: {old_hash} -> {new_hash}");
        for line in diff_json_lines(&report) {
            println!("{line}");
        }
    } else {
        print!(
            "{}",
            render_diff(
                &report,
                &old_hash,
                &new_hash,
                TextOptions {
                    use_color: ctx.cli.use_color(),
                    timezone: ctx.timezone,
                },
            )
        );
    }
    Ok(())
}

fn handle_list(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let entries = ctx.store.list()?;
    if ctx.cli.json {
        println!("{}", snapshot_list_json(&entries));
        return Ok(());
    }
    if entries.is_empty() {
        println!("No snapshots found in {}", ctx.store.dir().display());
        return Ok(());
    }
    println!(
        "{}",
        render_snapshot_table(
            &entries,
            TableOptions {
                use_color: ctx.cli.use_color(),
                timezone: ctx.timezone,
            },
        )
    );
    Ok(())
}

pub(crate) fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let timezone = Timezone::parse(cli.timezone.as_deref())?;
    let dir = cli
        .cache_dir
        .clone()
        .unwrap_or_else(SnapshotStore::default_dir);
    tracing::debug!(dir = %dir.display(), "using snapshot cache");

    let ctx = CommandContext {
        cli,
        store: SnapshotStore::new(dir),
        timezone,
    };

    match &cli.command {
        Commands::Fetch {
            api_url,
            on_change,
            timeout,
        } => handle_fetch(
            &ctx,
            config,
            api_url.as_deref(),
            on_change.as_deref(),
            *timeout,
        ),
        Commands::Diff { old, new } => handle_diff(&ctx, old, new),
        Commands::List => handle_list(&ctx),
    }
}
