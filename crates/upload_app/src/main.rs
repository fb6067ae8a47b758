mod cli;
mod config;
mod files;
mod render;

use std::collections::HashMap;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use upload_core::{FileId, FileStatus, UploadViewModel};
use upload_engine::{EngineError, SimulationSettings, UploadHandle};
use upload_logging::{upload_info, upload_warn};

use crate::cli::Cli;

const LOG_FILE: &str = "./upload.log";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    upload_logging::initialize(cli.log.into(), cli.log_level, Path::new(LOG_FILE));

    let mut settings = match &cli.config {
        Some(path) => config::load_settings(path)
            .with_context(|| format!("loading simulation settings from {}", path.display()))?,
        None => SimulationSettings::default(),
    };
    cli.apply_overrides(&mut settings);

    let incoming = cli
        .files
        .iter()
        .map(|path| files::load(path, cli.category))
        .collect::<Result<Vec<_>, _>>()?;

    let handle = UploadHandle::spawn(settings).context("starting upload service")?;
    println!("{}", render::render_header(cli.category));
    let created = handle.add_files(incoming, cli.category).await?;
    upload_info!("Queued {} file(s)", created.len());

    let mut printed = HashMap::new();
    let mut view = follow(&handle, &mut printed).await?;

    if cli.retry_failed {
        let failed: Vec<FileId> = view
            .files
            .iter()
            .filter(|row| row.status == FileStatus::Error)
            .map(|row| row.file_id)
            .collect();
        if !failed.is_empty() {
            upload_warn!("Retrying {} failed file(s)", failed.len());
            for file_id in failed {
                handle.retry_file(file_id).await?;
            }
            view = follow(&handle, &mut printed).await?;
        }
    }

    println!("{}", render::render_summary(&view));
    if cli.json {
        let report = render::report(cli.category, &view);
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    handle.shutdown();

    let any_failed = view.files.iter().any(|row| row.status == FileStatus::Error);
    Ok(if any_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Prints a line whenever a row's rendering changes, until every file has settled.
async fn follow(
    handle: &UploadHandle,
    printed: &mut HashMap<FileId, String>,
) -> Result<UploadViewModel, EngineError> {
    let mut views = handle.subscribe();
    loop {
        let view = views.borrow_and_update().clone();
        for row in &view.files {
            let line = render::render_row(row);
            if printed.get(&row.file_id) != Some(&line) {
                println!("{line}");
                printed.insert(row.file_id, line);
            }
        }
        if view.is_settled() {
            return Ok(view);
        }
        views
            .changed()
            .await
            .map_err(|_| EngineError::ServiceStopped)?;
    }
}
