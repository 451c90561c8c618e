//! Queue-backed commands: enqueue, worker, status, cleanup.

use std::sync::Arc;

use chatpilot_config::Settings;
use chatpilot_queue::{Job, JobStatus, JobStore, NewJob, Worker, WorkerConfig};
use tokio::sync::broadcast;
use tracing::info;

use crate::cli::JobArgs;
use crate::executor::FlowJobExecutor;
use crate::wiring;

async fn open_store(settings: &Settings) -> Result<JobStore, Box<dyn std::error::Error>> {
    Ok(JobStore::open(settings.db_path()).await?)
}

/// Insert a job and print its id.
pub(crate) async fn enqueue(
    settings: Settings,
    args: JobArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    // Catch unknown providers here rather than at execution time.
    wiring::build_registry(&settings)?.resolve(&args.provider)?;

    let store = open_store(&settings).await?;
    let mut new = NewJob::new(&args.provider, &args.prompt)
        .with_output(args.output())
        .with_max_attempts(settings.queue.max_attempts);
    if let Some(system) = &args.system {
        new = new.with_system_prompt(system);
    }
    if let Some(file) = &args.file {
        new = new.with_attachment(file);
    }

    let job = store.enqueue(new).await?;
    println!("{}", job.id);
    Ok(())
}

/// Run the polling worker until Ctrl-C.
pub(crate) async fn worker(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let registry = Arc::new(wiring::build_registry(&settings)?);
    let store = open_store(&settings).await?;
    let executor = Arc::new(FlowJobExecutor::new(registry, settings.clone()));

    let config = WorkerConfig {
        poll_interval_secs: settings.queue.poll_interval_secs,
        retain_days: settings.queue.retain_days,
        remove_attachments: settings.queue.remove_attachments,
        ..Default::default()
    };

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, finishing the current job");
            let _ = shutdown_tx.send(());
        }
    });

    Worker::new(store, executor, config).run(shutdown_rx).await;
    Ok(())
}

/// Show one job, or the per-status counts.
pub(crate) async fn status(
    settings: Settings,
    job_id: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&settings).await?;

    match job_id {
        Some(id) => {
            let job = store
                .get(&id)
                .await?
                .ok_or_else(|| format!("No such job: {id}"))?;
            print_job(&store, &job).await?;
        }
        None => {
            let counts = store.counts().await?;
            println!("{:<12} COUNT", "STATUS");
            for status in [
                JobStatus::Pending,
                JobStatus::Running,
                JobStatus::Completed,
                JobStatus::Failed,
            ] {
                println!(
                    "{:<12} {}",
                    status,
                    counts.get(&status).copied().unwrap_or(0)
                );
            }
        }
    }
    Ok(())
}

async fn print_job(store: &JobStore, job: &Job) -> Result<(), Box<dyn std::error::Error>> {
    println!("Job:      {}", job.id);
    println!("Provider: {}", job.provider);
    println!("Status:   {}", job.status);
    println!("Attempts: {}/{}", job.attempts, job.max_attempts);
    println!("Created:  {}", job.created_at.to_rfc3339());

    match job.status {
        JobStatus::Pending => {
            if let Some(position) = store.queue_position(&job.id).await? {
                println!("Position: {position}");
            }
            if let Some(eta) = store.estimated_start_seconds(&job.id).await? {
                println!("ETA:      ~{:.0} s until start", eta);
            }
        }
        JobStatus::Completed => {
            if let Some(result) = &job.result {
                println!("Result:   {result}");
            }
        }
        JobStatus::Failed => {
            if let Some(error) = &job.error {
                println!("Error:    {error}");
            }
        }
        JobStatus::Running => {}
    }
    Ok(())
}

/// Prune old terminal jobs.
pub(crate) async fn cleanup(
    settings: Settings,
    retain_days: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&settings).await?;
    let days = retain_days.unwrap_or(settings.queue.retain_days);
    let deleted = store.cleanup(days).await?;
    println!("Removed {deleted} job(s) older than {days} day(s)");
    Ok(())
}
