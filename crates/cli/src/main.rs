mod config_commands;
mod sync_commands;

use std::{path::PathBuf, process::ExitCode};

use {
    clap::{Parser, Subcommand},
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "skillsync", about = "Keep local agent skills in sync with the registry")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Custom config directory (overrides default ~/.config/skillsync/).
    #[arg(long, global = true, env = "SKILLSYNC_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
    /// Custom data directory (overrides default data dir).
    #[arg(long, global = true, env = "SKILLSYNC_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download, verify, and install the current registry release.
    Sync {
        /// Re-transfer every file even if the installed version matches.
        #[arg(long)]
        force: bool,
        /// Print the sync report as JSON.
        #[arg(long)]
        json: bool,
        /// Maximum concurrent downloads (overrides config value).
        #[arg(long)]
        concurrency: Option<usize>,
        /// Install into this directory instead of the configured one.
        #[arg(long)]
        target: Option<PathBuf>,
    },
    /// Compare the installed version with the registry.
    Status {
        #[arg(long)]
        target: Option<PathBuf>,
    },
    /// Show the resolved configuration.
    Config,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    if let Some(ref dir) = cli.config_dir {
        skillsync_config::set_config_dir(dir.clone());
    }
    if let Some(ref dir) = cli.data_dir {
        skillsync_config::set_data_dir(dir.clone());
    }

    let config = skillsync_config::discover_and_load();
    debug!(version = env!("CARGO_PKG_VERSION"), "skillsync starting");

    match cli.command {
        Commands::Sync {
            force,
            json,
            concurrency,
            target,
        } => {
            sync_commands::handle_sync(config, sync_commands::SyncArgs {
                force,
                json,
                concurrency,
                target,
            })
            .await
        },
        Commands::Status { target } => sync_commands::handle_status(config, target).await,
        Commands::Config => Ok(if config_commands::handle_config(&config)? {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }),
    }
}
