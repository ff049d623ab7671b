//! Generation command handlers
//!
//! Submits a job, follows its log until the run finishes, and prints a
//! final summary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::*;
use tokio::sync::broadcast;

use scenegen_client::{EndpointFamily, GenerationClient};
use scenegen_core::domain::job::{JobConfiguration, JobStatus, ReferenceImage};
use scenegen_task::{GenerationTask, TaskSnapshot};

use crate::config::Config;

/// Submit an object-generation job with a reference sketch
pub async fn run_object(config: &Config, prompt: String, image: PathBuf) -> Result<()> {
    let reference = load_reference(&image)?;
    let job = JobConfiguration::new(prompt)
        .with_reference(reference)
        .with_poll_interval(config.default_poll_interval);

    run(config, EndpointFamily::Object, job).await
}

/// Submit an HDRI-generation job
pub async fn run_hdri(config: &Config, prompt: String) -> Result<()> {
    let job =
        JobConfiguration::new(prompt).with_poll_interval(config.default_poll_interval);

    run(config, EndpointFamily::Hdri, job).await
}

/// Drive one job from submission to terminal state, streaming its log
async fn run(config: &Config, family: EndpointFamily, job: JobConfiguration) -> Result<()> {
    let client = GenerationClient::new(&config.base_url, &config.client_id, family);
    let task = GenerationTask::new(client);

    let mut log_rx = task.subscribe_log();
    let mut finished_rx = task.subscribe_finished();

    task.initialize(job);
    task.submit().await;

    loop {
        tokio::select! {
            line = log_rx.recv() => match line {
                Ok(line) => print_log_line(&line),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    println!("{}", format!("... {} log line(s) dropped", missed).dimmed());
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = finished_rx.recv() => break,
        }
    }

    // Drain lines that arrived before the finished signal.
    while let Ok(line) = log_rx.try_recv() {
        print_log_line(&line);
    }

    let snapshot = task.snapshot();
    print_summary(&snapshot);

    if snapshot.status != JobStatus::Completed {
        bail!("generation job did not complete successfully");
    }
    Ok(())
}

/// Read a reference image from disk
fn load_reference(path: &Path) -> Result<ReferenceImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read reference image {}", path.display()))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("reference")
        .to_string();

    Ok(ReferenceImage::new(file_name, content_type_for(path), bytes))
}

/// Content type from the file extension; the backend accepts a wildcard
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/*",
    }
}

/// Print a streamed log line with its receive time
fn print_log_line(line: &str) {
    println!(
        "{} {}",
        chrono::Local::now()
            .format("%H:%M:%S")
            .to_string()
            .dimmed(),
        line
    );
}

/// Print the final job summary
fn print_summary(snapshot: &TaskSnapshot) {
    let status_str = format!("{:?}", snapshot.status);
    let status_colored = match snapshot.status {
        JobStatus::NotStarted => status_str.yellow(),
        JobStatus::InProgress => status_str.cyan(),
        JobStatus::Completed => status_str.green(),
        JobStatus::Failed => status_str.red(),
    };

    println!();
    println!("{}", "Generation result:".bold());
    println!("  Status: {}", status_colored);
    if !snapshot.job_id.is_empty() {
        println!("  Job id: {}", snapshot.job_id.as_str().cyan());
    }
    if !snapshot.result_url.is_empty() {
        println!("  Url:    {}", snapshot.result_url);
    }
}
