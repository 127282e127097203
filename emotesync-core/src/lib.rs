//! emotesync core library: domain types, configuration resolution, errors.
//!
//! Public API surface:
//! - [`types`]: id newtypes, [`EmoteAsset`], [`RemoteEmote`]
//! - [`config`]: [`RawConfig`] layering and [`Config::resolve`]
//! - [`error`]: [`ConfigError`] and its [`ConfigProblem`] list

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, RawConfig};
pub use error::{ConfigError, ConfigProblem};
pub use types::{ChannelId, EmoteAsset, EmoteId, RemoteEmote, WorkspaceId};
