// src/main.rs
use clap::Parser;
use tournament_sync::cli::Args;
use tournament_sync::config::Config;
use tournament_sync::data_fetcher::api::create_http_client_with_timeout;
use tournament_sync::data_fetcher::{DeviceAuthProvider, EpicSourceFetcher};
use tournament_sync::error::AppError;
use tournament_sync::logging::setup_logging;
use tournament_sync::pipeline::{self, RunOptions, Services};
use tournament_sync::publish::{GitCli, WebhookNotifier};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Validate before logging, a bad environment must not touch the filesystem
    let mut config = Config::load()?;
    if let Some(output_dir) = &args.output_dir {
        config.set_output_dir("--output-dir", output_dir)?;
    }
    if let Some(locale) = &args.locale {
        config.cms_locale = locale.clone();
    }
    if let Some(change_detection) = args.change_detection {
        config.change_detection = change_detection;
    }

    // The guard must live until the end of main so the log file is flushed
    let _guard = setup_logging(&args).await?;
    tracing::debug!("Running with {config:?}");

    let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
    let credentials = DeviceAuthProvider::new(client.clone(), &config);
    let sources = EpicSourceFetcher::new(client.clone(), &config);
    let vcs = GitCli::new(&args.repo_dir);
    let notifier = WebhookNotifier::new(client);

    let services = Services {
        credentials: &credentials,
        sources: &sources,
        vcs: &vcs,
        notifier: &notifier,
    };
    let options = RunOptions {
        repo_dir: args.repo_dir.clone(),
        dry_run: args.dry_run,
    };

    match pipeline::run(&config, services, &options).await {
        Ok(report) => {
            if let Some(message) = &report.publish.commit_message {
                tracing::info!("Published: {message}");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Synchronization failed: {e}");
            Err(e)
        }
    }
}
