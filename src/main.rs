use std::{io, process::ExitCode};

use tracing_subscriber::{fmt, EnvFilter};

use catalog_shell::{
    app::{
        bootstrap::build_shell,
        console::{write_preview, ConsoleObserver},
    },
    infra::config::AppConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let config = AppConfig::from_env()?;
    let shell = build_shell(config)?;

    let events = shell.coordinator.start()?;
    let run_id = events.run_id();
    let mut observer = ConsoleObserver::new([shell.movies.clone(), shell.series.clone()]);
    let progress = events.dispatch(&mut observer).await?;

    if observer.failure().is_some() {
        tracing::debug!(%run_id, "exiting after failed catalog initialization");
        return Ok(ExitCode::FAILURE);
    }

    tracing::debug!(
        %run_id,
        current = progress.current(),
        maximum = progress.maximum(),
        "catalog ready"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for table in shell.tables() {
        write_preview(&mut out, table, shell.config.preview_rows)?;
    }

    Ok(ExitCode::SUCCESS)
}
