//! Configuration layering and resolution.
//!
//! # Sources
//!
//! ```text
//! --config <file.yaml>   (optional, lowest precedence)
//! environment variables  (override the file)
//! --season <name>        (CLI override, applied by the binary)
//! ```
//!
//! Each source produces a [`RawConfig`]; [`RawConfig::overlay`] merges them and
//! [`Config::resolve`] validates the result in a single pass, reporting every
//! problem together. Resolution performs no remote calls.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::{ConfigError, ConfigProblem};
use crate::types::{ChannelId, WorkspaceId};

pub const ENV_TOKEN: &str = "DISCORD_TOKEN";
pub const ENV_WORKSPACE_ID: &str = "GUILD_ID";
pub const ENV_CHANNEL_ID: &str = "NOTIFY_CHANNEL_ID";
pub const ENV_ASSET_FOLDER: &str = "EMOJI_FOLDER";
pub const ENV_SEASON: &str = "CURRENT_SEASON";

pub const DEFAULT_ASSET_FOLDER: &str = "emotes";
pub const DEFAULT_SEASON: &str = "base";

// ---------------------------------------------------------------------------
// RawConfig
// ---------------------------------------------------------------------------

/// Unvalidated settings as read from one source. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    pub token: Option<String>,
    #[serde(deserialize_with = "id_scalar")]
    pub workspace_id: Option<String>,
    #[serde(deserialize_with = "id_scalar")]
    pub notification_channel_id: Option<String>,
    pub asset_folder: Option<String>,
    pub season: Option<String>,
}

/// Ids may be written quoted or as bare YAML integers.
fn id_scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Number(n) => n.to_string(),
    }))
}

impl RawConfig {
    /// Build from a variable lookup function (e.g. `std::env::var`).
    ///
    /// Empty values are treated as absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            token: get(ENV_TOKEN),
            workspace_id: get(ENV_WORKSPACE_ID),
            notification_channel_id: get(ENV_CHANNEL_ID),
            asset_folder: get(ENV_ASSET_FOLDER),
            season: get(ENV_SEASON),
        }
    }

    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load a YAML config file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigProblem> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigProblem::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawConfig =
            serde_yaml::from_str(&contents).map_err(|source| ConfigProblem::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(raw.without_blanks())
    }

    /// Layer `top` over `self`: any field set in `top` wins.
    pub fn overlay(self, top: RawConfig) -> Self {
        Self {
            token: top.token.or(self.token),
            workspace_id: top.workspace_id.or(self.workspace_id),
            notification_channel_id: top.notification_channel_id.or(self.notification_channel_id),
            asset_folder: top.asset_folder.or(self.asset_folder),
            season: top.season.or(self.season),
        }
    }

    fn without_blanks(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            token: keep(self.token),
            workspace_id: keep(self.workspace_id),
            notification_channel_id: keep(self.notification_channel_id),
            asset_folder: keep(self.asset_folder),
            season: keep(self.season),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Validated, read-only settings for one run.
#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub workspace_id: WorkspaceId,
    pub notification_channel_id: Option<ChannelId>,
    pub asset_folder: PathBuf,
    pub season: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("workspace_id", &self.workspace_id)
            .field("notification_channel_id", &self.notification_channel_id)
            .field("asset_folder", &self.asset_folder)
            .field("season", &self.season)
            .finish()
    }
}

impl Config {
    /// Validate `raw` and build a [`Config`].
    ///
    /// Checks, without stopping at the first failure:
    /// - the token is present
    /// - the workspace id is present and numeric
    /// - the channel id, when present, is numeric
    /// - `<asset_folder>/<season>` exists and is a directory
    pub fn resolve(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut problems = Vec::new();

        let token = raw.token;
        if token.is_none() {
            problems.push(ConfigProblem::MissingToken);
        }

        let workspace_id = match raw.workspace_id {
            None => {
                problems.push(ConfigProblem::MissingWorkspaceId);
                None
            }
            Some(value) => match value.parse::<WorkspaceId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    problems.push(ConfigProblem::InvalidWorkspaceId { value });
                    None
                }
            },
        };

        let notification_channel_id = match raw.notification_channel_id {
            None => None,
            Some(value) => match value.parse::<ChannelId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    problems.push(ConfigProblem::InvalidChannelId { value });
                    None
                }
            },
        };

        let asset_folder = PathBuf::from(
            raw.asset_folder
                .unwrap_or_else(|| DEFAULT_ASSET_FOLDER.to_string()),
        );
        let season = raw.season.unwrap_or_else(|| DEFAULT_SEASON.to_string());
        let season_dir = asset_folder.join(&season);
        if !season_dir.is_dir() {
            problems.push(ConfigProblem::AssetFolderMissing { path: season_dir });
        }

        match (token, workspace_id) {
            (Some(token), Some(workspace_id)) if problems.is_empty() => Ok(Self {
                token,
                workspace_id,
                notification_channel_id,
                asset_folder,
                season,
            }),
            _ => Err(ConfigError::new(problems)),
        }
    }

    /// Layer `file < env < overrides` and resolve.
    ///
    /// A config file that cannot be read or parsed is reported alongside
    /// any other problem instead of short-circuiting.
    pub fn load(
        file: Option<&Path>,
        env: RawConfig,
        overrides: RawConfig,
    ) -> Result<Self, ConfigError> {
        let mut problems = Vec::new();
        let base = match file.map(RawConfig::from_yaml_file) {
            Some(Ok(raw)) => raw,
            Some(Err(problem)) => {
                problems.push(problem);
                RawConfig::default()
            }
            None => RawConfig::default(),
        };

        match Self::resolve(base.overlay(env).overlay(overrides)) {
            Ok(config) if problems.is_empty() => Ok(config),
            Ok(_) => Err(ConfigError::new(problems)),
            Err(err) => {
                problems.extend(err.problems);
                Err(ConfigError::new(problems))
            }
        }
    }

    /// `<asset_folder>/<season>`, the directory scanned for emotes.
    pub fn season_dir(&self) -> PathBuf {
        self.asset_folder.join(&self.season)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
