//! Subcommand-free dispatch: message mode or sync mode per invocation.

pub mod message;
pub mod sync;

use anyhow::{Context, Result};

use emotesync_core::{Config, RawConfig};
use emotesync_discord::DiscordClient;
use emotesync_sync::{
    pipeline::{self, Mode, RunReport},
    FixedDelay, ScanOrder,
};

use crate::Cli;

/// Resolve configuration, connect, run exactly one mode, and report.
pub fn run(cli: Cli) -> Result<()> {
    let overrides = RawConfig {
        season: cli.season.clone(),
        ..RawConfig::default()
    };
    let config = Config::load(cli.config.as_deref(), RawConfig::from_env(), overrides)
        .context("cannot start emotesync")?;
    tracing::debug!("resolved {config:?}");

    let order = if cli.sorted {
        ScanOrder::ByFileName
    } else {
        ScanOrder::Storage
    };
    let mode = Mode::from_args(cli.message);
    let client = DiscordClient::new(&config.token);

    let report = pipeline::run(mode, &config, &client, &client, FixedDelay::default(), order)
        .with_context(|| format!("run against workspace {} failed", config.workspace_id))?;

    match report {
        RunReport::Message { text, delivered } => message::print_result(&text, delivered),
        RunReport::Sync(result) => sync::print_result(&config.season, &result),
    }
    tracing::info!("done; closing connection");
    Ok(())
}
