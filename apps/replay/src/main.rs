//! Replays a scripted ORP file transfer into files on disk.

mod config;
mod script;

use std::path::PathBuf;

use clap::Parser;
use orpfile_transfer::{FileSinkProvider, TransferReceiver, TransferSession};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON event script to replay.
    script: PathBuf,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to write received files under (overrides the config).
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Stop at the first failing step.
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(root) = cli.root {
        config.transfer.root_dir = Some(root);
    }

    let steps = script::load(&cli.script)?;
    tracing::info!(
        script = %cli.script.display(),
        steps = steps.len(),
        root = ?config.transfer.root_dir,
        "replaying transfer script"
    );

    let provider = FileSinkProvider::from_config(&config.transfer);
    let mut receiver = TransferReceiver::new(TransferSession::new(provider, &config.transfer));

    let summary = script::replay(&mut receiver, &steps, cli.strict)?;
    tracing::info!(
        steps = summary.steps,
        failures = summary.failures,
        "replay finished"
    );

    println!("{}", serde_json::to_string_pretty(&receiver.progress())?);
    Ok(())
}
