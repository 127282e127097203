//! Contracts for the remote service the engine talks to.
//!
//! Transport, authentication, and per-call timeouts belong to implementors.
//! The engine only sees these operations and the [`RemoteError`] taxonomy.

use thiserror::Error;

use emotesync_core::{ChannelId, EmoteId, RemoteEmote, WorkspaceId};

/// Classified failure of a single remote call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RemoteError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The remote rejected the call for exceeding its rate limit.
    #[error("rate limited (retry after {retry_after_secs:.1}s)")]
    RateLimited { retry_after_secs: f64 },

    #[error("remote API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),
}

/// The resolved remote workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
}

/// A text channel that can receive notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
}

/// Emote management operations on one remote workspace.
pub trait RemoteEmoteStore {
    /// Confirm `workspace` exists and is accessible.
    fn workspace(&self, workspace: WorkspaceId) -> Result<Workspace, RemoteError>;

    /// Snapshot of every emote currently registered in `workspace`.
    fn list(&self, workspace: WorkspaceId) -> Result<Vec<RemoteEmote>, RemoteError>;

    fn delete(&self, workspace: WorkspaceId, emote: &EmoteId) -> Result<(), RemoteError>;

    /// Register a new emote named `name` from raw image bytes.
    fn create(
        &self,
        workspace: WorkspaceId,
        name: &str,
        bytes: &[u8],
    ) -> Result<RemoteEmote, RemoteError>;
}

/// Text notifications to a workspace channel.
pub trait Notifier {
    /// Resolve the notification target.
    ///
    /// Implementors prefer `explicit` when given and otherwise look up the
    /// text channel named `general`. `Ok(None)` means nothing resolved.
    fn resolve_channel(
        &self,
        workspace: WorkspaceId,
        explicit: Option<ChannelId>,
    ) -> Result<Option<Channel>, RemoteError>;

    fn send(&self, channel: &Channel, text: &str) -> Result<(), RemoteError>;
}

/// Name of the channel used when no explicit channel id is configured.
pub const DEFAULT_CHANNEL_NAME: &str = "general";
