use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use std::path::PathBuf;

use crate::config::ChangeDetection;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Tournament data synchronizer
///
/// Downloads the tournament CMS pages and event listings, stores them as JSON
/// snapshots inside a git repository, commits whatever changed and notifies
/// the website build through a repository dispatch webhook.
///
/// Credentials and publishing switches are read from the environment (and a
/// `.env` file when present). Command line options override the optional
/// `SYNC_*` settings.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Directory the snapshots are written to, relative to the repository.
    #[arg(long = "output-dir", short = 'o', help_heading = "Sync Options")]
    pub output_dir: Option<PathBuf>,

    /// Locale requested for the CMS pages, for example `en-US`.
    #[arg(long = "locale", help_heading = "Sync Options")]
    pub locale: Option<String>,

    /// How changed snapshots are detected.
    #[arg(long = "change-detection", value_enum, help_heading = "Sync Options")]
    pub change_detection: Option<ChangeDetection>,

    /// Repository that holds the output directory and receives the commit.
    #[arg(long = "repo-dir", default_value = ".", help_heading = "Sync Options")]
    pub repo_dir: PathBuf,

    /// Fetch and write snapshots but skip the webhook, commit and push.
    #[arg(long = "dry-run", help_heading = "Sync Options")]
    pub dry_run: bool,

    /// Also write logs to this file, rotated daily.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<PathBuf>,

    /// Enable debug level logging.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,
}
