//! emotesync: push a season folder of emote images to a Discord server.
//!
//! # Usage
//!
//! ```text
//! emotesync [--config <file>] [--season <name>] [--sorted]   # sync the season folder
//! emotesync [--config <file>] <MESSAGE>...                   # post one message instead
//! ```
//!
//! Settings come from `DISCORD_TOKEN`, `GUILD_ID`, `NOTIFY_CHANNEL_ID`,
//! `EMOJI_FOLDER`, and `CURRENT_SEASON`, layered over the optional YAML file.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "emotesync",
    version,
    about = "Replace a Discord server's custom emotes with a local season folder",
    long_about = None,
)]
pub struct Cli {
    /// YAML file with token, workspace_id, notification_channel_id, asset_folder, season.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Season subfolder to sync (overrides CURRENT_SEASON).
    #[arg(long)]
    pub season: Option<String>,

    /// Process files sorted by name instead of directory order.
    #[arg(long)]
    pub sorted: bool,

    /// Post this message to the notification channel instead of syncing.
    #[arg(value_name = "MESSAGE", trailing_var_arg = true, allow_hyphen_values = true)]
    pub message: Vec<String>,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    commands::run(Cli::parse())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
