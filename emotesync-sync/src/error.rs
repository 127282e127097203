//! Error types for emotesync-sync.

use std::path::PathBuf;

use thiserror::Error;

use emotesync_core::WorkspaceId;

use crate::engine::EngineState;
use crate::remote::RemoteError;

/// Fatal errors: each aborts the run before any emote is touched.
#[derive(Debug, Error)]
pub enum SyncError {
    /// `run` was called on an engine that is no longer idle.
    #[error("sync engine already ran (state: {state:?})")]
    AlreadyRun { state: EngineState },

    /// The workspace id does not resolve to an accessible workspace.
    #[error("workspace {workspace} not found or not accessible: {source}")]
    WorkspaceNotFound {
        workspace: WorkspaceId,
        #[source]
        source: RemoteError,
    },

    /// The season folder could not be enumerated.
    #[error("cannot read asset folder {path}: {source}")]
    AssetFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The initial emote listing failed.
    #[error("failed to list emotes of workspace {workspace}: {source}")]
    Listing {
        workspace: WorkspaceId,
        #[source]
        source: RemoteError,
    },
}

/// One image file that matched a supported extension but could not be read.
#[derive(Debug, Error)]
#[error("cannot read {}: {source}", .path.display())]
pub struct AssetReadError {
    /// Emote name the file would have produced.
    pub name: String,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Why a single asset ended up `Failed`.
#[derive(Debug, Error)]
pub enum AssetFailure {
    #[error(transparent)]
    Read(#[from] AssetReadError),

    /// Deleting the previous remote emote failed; creation was skipped.
    #[error("delete of existing emote failed: {0}")]
    Delete(#[source] RemoteError),

    #[error("create failed: {0}")]
    Create(#[source] RemoteError),
}
