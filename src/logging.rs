use crate::cli::Args;
use crate::error::AppError;
use std::io::stdout;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_FILE_NAME: &str = "tournament_sync.log";

/// Builds the filter for one layer. `RUST_LOG` is honoured, with the crate's
/// own level set by `--debug`.
fn crate_filter(debug: bool) -> Result<EnvFilter, AppError> {
    let directive = if debug {
        "tournament_sync=debug"
    } else {
        "tournament_sync=info"
    };
    let directive = directive
        .parse()
        .map_err(|e| AppError::log_setup_error(format!("Invalid log directive: {e}")))?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Sets up logging for the application.
///
/// Logs always go to stdout so CI jobs show them. With `--log-file` a daily
/// rolling file receives the same events; the returned guard must be kept
/// alive for the duration of the program so the file is flushed.
pub async fn setup_logging(args: &Args) -> Result<Option<WorkerGuard>, AppError> {
    let stdout_layer = fmt::Layer::new()
        .with_writer(stdout)
        .with_ansi(true)
        .with_filter(crate_filter(args.debug)?);

    let Some(log_file) = &args.log_file else {
        tracing_subscriber::registry().with(stdout_layer).init();
        return Ok(None);
    };

    let log_dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let log_file_name = log_file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_LOG_FILE_NAME);

    if !log_dir.exists() {
        tokio::fs::create_dir_all(log_dir).await.map_err(|e| {
            AppError::log_setup_error(format!("Failed to create log directory: {e}"))
        })?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, log_file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(
            fmt::Layer::new()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(crate_filter(args.debug)?),
        )
        .init();

    tracing::info!(
        "Logs are being written to: {}/{log_file_name}",
        log_dir.display()
    );
    Ok(Some(guard))
}
