//! Error types for emotesync-core.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A single missing or invalid configuration item.
#[derive(Debug, Error)]
pub enum ConfigProblem {
    /// No bot token was supplied.
    #[error("DISCORD_TOKEN is not set")]
    MissingToken,

    /// No workspace id was supplied.
    #[error("GUILD_ID is not set")]
    MissingWorkspaceId,

    /// The workspace id is not a numeric snowflake.
    #[error("GUILD_ID '{value}' is not a numeric id")]
    InvalidWorkspaceId { value: String },

    /// The notification channel id is present but not numeric.
    #[error("NOTIFY_CHANNEL_ID '{value}' is not a numeric id")]
    InvalidChannelId { value: String },

    /// `<asset_folder>/<season>` does not exist or is not a directory.
    #[error("asset folder {path} does not exist")]
    AssetFolderMissing { path: PathBuf },

    /// The YAML config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The YAML config file is malformed.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Every problem found while resolving configuration.
///
/// Resolution never stops at the first problem, so an operator fixing a
/// fresh setup sees the whole list at once.
#[derive(Debug)]
pub struct ConfigError {
    pub problems: Vec<ConfigProblem>,
}

impl ConfigError {
    pub fn new(problems: Vec<ConfigProblem>) -> Self {
        Self { problems }
    }

    /// `true` if any problem matches `predicate`.
    pub fn has(&self, predicate: impl Fn(&ConfigProblem) -> bool) -> bool {
        self.problems.iter().any(predicate)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration ({} problem", self.problems.len())?;
        if self.problems.len() != 1 {
            f.write_str("s")?;
        }
        f.write_str(")")?;
        for problem in &self.problems {
            write!(f, "\n  - {problem}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}
