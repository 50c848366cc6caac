//! Tournament data synchronizer
//!
//! Keeps a git repository of JSON snapshots in sync with the tournament CMS
//! and event services. One run acquires a short-lived credential, fetches
//! every source, rewrites the snapshots whose fetch succeeded, revokes the
//! credential and then publishes: a commit for any change and a repository
//! dispatch webhook when a primary snapshot changed.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tournament_sync::config::Config;
//! use tournament_sync::data_fetcher::api::create_http_client_with_timeout;
//! use tournament_sync::data_fetcher::{DeviceAuthProvider, EpicSourceFetcher};
//! use tournament_sync::error::AppError;
//! use tournament_sync::pipeline::{self, RunOptions, Services};
//! use tournament_sync::publish::{GitCli, WebhookNotifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load()?;
//!     let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
//!
//!     let credentials = DeviceAuthProvider::new(client.clone(), &config);
//!     let sources = EpicSourceFetcher::new(client.clone(), &config);
//!     let vcs = GitCli::new(".");
//!     let notifier = WebhookNotifier::new(client);
//!
//!     let services = Services {
//!         credentials: &credentials,
//!         sources: &sources,
//!         vcs: &vcs,
//!         notifier: &notifier,
//!     };
//!     let report = pipeline::run(&config, services, &RunOptions::default()).await?;
//!     println!("{} snapshots written", report.written());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod publish;
pub mod snapshot;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::AppError;
pub use pipeline::{RunOptions, RunReport, Services, run};
pub use publish::ChangeSet;
pub use snapshot::{SnapshotKind, SnapshotWriter};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
