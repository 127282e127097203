//! # emotesync-sync
//!
//! Reconciliation of a local season folder against a remote emote set.
//!
//! - [`inventory`] scans the season folder into [`EmoteAsset`](emotesync_core::EmoteAsset)s.
//! - [`remote`] defines the collaborator contracts the engine drives.
//! - [`engine`] runs one reconciliation and aggregates a [`SyncResult`].
//! - [`pipeline`] dispatches between message mode and sync mode.

pub mod announce;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod pacing;
pub mod pipeline;
pub mod remote;

pub use announce::Announcer;
pub use engine::{EngineState, SyncEngine, SyncOutcome, SyncResult};
pub use error::{AssetFailure, AssetReadError, SyncError};
pub use inventory::ScanOrder;
pub use pacing::{FixedDelay, Pacer, PACING_INTERVAL};
pub use pipeline::{Mode, RunReport};
pub use remote::{Channel, Notifier, RemoteEmoteStore, RemoteError, Workspace};
