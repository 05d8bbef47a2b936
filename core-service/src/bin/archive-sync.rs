//! `archive-sync` command line entry point.
//!
//! Intended to be invoked by an external scheduler (cron, systemd timer).
//! Settings come from the environment (see `core_runtime::config`) and can be
//! overridden with flags.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use core_runtime::config::{ChildReplacement, CoreConfigBuilder};
use core_runtime::logging::{init_logging, LogFormat};
use core_service::{archive_status, CoreService};

#[derive(Debug, Parser)]
#[command(name = "archive-sync", version, about = "Refresh convention archive records from YouTube")]
struct Cli {
    /// SQLite archive store
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Log output format (pretty, json, compact)
    #[arg(long, global = true, env = "ARCHIVE_SYNC_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one selection-and-sync pass and exit
    Run {
        /// YouTube Data API key (overrides YOUTUBE_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Maximum records processed in this run
        #[arg(long)]
        max_records: Option<u32>,

        /// Maximum playlistItems pages fetched per playlist
        #[arg(long)]
        max_pages: Option<u32>,

        /// Replace playlist children in the commit instead of before fetching
        #[arg(long)]
        swap_children: bool,
    },

    /// Print record counts without contacting the API
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut builder = CoreConfigBuilder::from_env().context("Failed to read environment")?;
    if let Some(path) = cli.database {
        builder = builder.database_path(path);
    }
    if let Some(format) = cli.log_format {
        builder = builder.log_format(format);
    }

    match cli.command {
        Command::Run {
            api_key,
            timeout_secs,
            max_records,
            max_pages,
            swap_children,
        } => {
            if let Some(key) = api_key {
                builder = builder.api_key(key);
            }
            if let Some(secs) = timeout_secs {
                builder = builder.request_timeout(Duration::from_secs(secs));
            }
            if let Some(limit) = max_records {
                builder = builder.max_records_per_run(limit);
            }
            if let Some(pages) = max_pages {
                builder = builder.max_playlist_pages(pages);
            }
            if swap_children {
                builder = builder.child_replacement(ChildReplacement::SwapOnCommit);
            }

            let config = builder.build().context("Invalid configuration")?;
            init_logging(config.logging.clone()).context("Failed to initialize logging")?;

            let service = CoreService::bootstrap(config)
                .await
                .context("Failed to start archive sync")?;
            let report = service.run_sync().await.context("Archive sync failed")?;

            println!(
                "selected={} synchronized={} skipped={} playlists={} videos={} unavailable={} \
                 children_created={} children_removed={}",
                report.selected,
                report.synchronized,
                report.skipped,
                report.playlists_expanded,
                report.videos_refreshed,
                report.videos_unavailable,
                report.children_created,
                report.children_removed
            );
        }
        Command::Status => {
            let config = builder
                .build_store_config()
                .context("Invalid configuration")?;
            init_logging(config.logging.clone()).context("Failed to initialize logging")?;

            let status = archive_status(&config)
                .await
                .context("Failed to read archive store")?;

            println!("top_level={}", status.top_level);
            println!("due={}", status.due);
            println!("children={}", status.children);
        }
    }

    Ok(())
}
