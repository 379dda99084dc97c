//! CLI entrypoint: parses/validates arguments via `subflow_bootstrap`,
//! builds the composition root (`subflow::bootstrap`), and dispatches on
//! the five operator subcommands (§4.12's CLI surface).

use std::process::ExitCode;

use subflow_bootstrap::{bootstrap_cli, result_to_exit_code, ValidatedCommand};
use subflow_domain::entities::Project;
use subflow_domain::value_objects::StageName;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use subflow::config::Settings;
use subflow::{bootstrap, cleanup_orphan_artifacts, gc_blobs};

/// Target language for a `run_local_pipeline` debug run. The CLI surface
/// has no `--target-language` flag (§4.12); operators needing a different
/// language exercise the queue-backed path instead.
const LOCAL_PIPELINE_TARGET_LANGUAGE: &str = "zh";

#[tokio::main]
async fn main() -> ExitCode {
    let validated = match bootstrap_cli() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("argument error: {err}");
            return ExitCode::from(1);
        }
    };

    init_logging(validated.verbose);

    let result = run(validated).await;
    let code = result_to_exit_code(result);
    ExitCode::from(code.as_cli_status() as u8)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(cli: subflow_bootstrap::ValidatedCli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        ValidatedCommand::DbMigrate => run_db_migrate(settings).await,
        ValidatedCommand::GcBlobs { limit, dry_run } => run_gc_blobs(settings, limit, dry_run).await,
        ValidatedCommand::CleanupOrphanArtifacts { dry_run } => run_cleanup_orphan_artifacts(settings, dry_run).await,
        ValidatedCommand::RunLocalPipeline { media, from_stage, max_duration_s } => {
            run_local_pipeline(settings, media, from_stage, max_duration_s).await
        }
        ValidatedCommand::Worker => run_worker(settings).await,
    }
}

async fn run_db_migrate(settings: Settings) -> anyhow::Result<()> {
    let ctx = bootstrap(settings).await?;
    ctx.db_pool.close().await;
    info!("schema is up to date");
    Ok(())
}

async fn run_gc_blobs(settings: Settings, limit: Option<u64>, dry_run: bool) -> anyhow::Result<()> {
    let ctx = bootstrap(settings).await?;
    let removed = gc_blobs(&ctx, limit, dry_run).await?;
    if dry_run {
        info!(count = removed.len(), "would remove blobs");
    } else {
        info!(count = removed.len(), "removed blobs");
    }
    Ok(())
}

async fn run_cleanup_orphan_artifacts(settings: Settings, dry_run: bool) -> anyhow::Result<()> {
    let ctx = bootstrap(settings).await?;
    let removed = cleanup_orphan_artifacts(&ctx, dry_run).await?;
    if dry_run {
        info!(count = removed.len(), "would remove orphan artifact projects");
    } else {
        info!(count = removed.len(), "removed orphan artifact projects");
    }
    Ok(())
}

async fn run_local_pipeline(
    mut settings: Settings,
    media: std::path::PathBuf,
    from_stage: Option<String>,
    max_duration_s: Option<u64>,
) -> anyhow::Result<()> {
    if let Some(max_duration_s) = max_duration_s {
        settings.audio.max_duration_s = max_duration_s as f64;
    }
    let ctx = bootstrap(settings).await?;

    let media_url = format!("file://{}", media.display());
    let project = Project::new(media.file_stem().and_then(|s| s.to_str()).unwrap_or("local"), &media_url, LOCAL_PIPELINE_TARGET_LANGUAGE);
    ctx.project_repo.create(&project).await?;

    let target_stage = match from_stage {
        Some(name) => name.parse::<StageName>().map_err(|err| anyhow::anyhow!("invalid --from-stage: {err}"))?,
        None => StageName::terminal(),
    };

    let cancel = CancellationToken::new();
    let (project, _ctx) = ctx.orchestrator.run_stage(project, target_stage, &cancel).await?;
    info!(project_id = %project.id, status = ?project.status, current_stage = project.current_stage, "local pipeline run finished");
    Ok(())
}

async fn run_worker(settings: Settings) -> anyhow::Result<()> {
    let ctx = bootstrap(settings).await?;
    ctx.queue_consumer.recover_orphans().await?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    let handler = subflow_bootstrap::signals::create_signal_handler();
    tokio::spawn(async move {
        handler.wait_for_signal(Box::new(move || shutdown.cancel())).await;
    });

    info!("worker started");
    ctx.queue_consumer.run(cancel).await;
    info!("worker stopped");
    Ok(())
}
